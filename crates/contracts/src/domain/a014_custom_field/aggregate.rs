use crate::domain::common::{BaseAggregate, CrmRecord, EntityRef, ENTITY_TYPES};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static FIELD_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,62}$").expect("field key regex"));

// ============================================================================
// CustomField
// ============================================================================

crate::aggregate_id!(
    /// Custom field definition identifier
    CustomFieldId
);

crate::crm_enum! {
    /// Value type of a custom field
    CustomFieldType default Text {
        Text => ("text", "Text"),
        Number => ("number", "Number"),
        Boolean => ("boolean", "Yes / no"),
        Date => ("date", "Date"),
        Select => ("select", "Select"),
    }
}

/// Extra attribute declared for one entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomFieldId>,
    #[serde(flatten)]
    pub data: CustomFieldDto,
}

impl CustomField {
    /// Check a raw value against the declared type. `null` is accepted
    /// unless the field is required.
    pub fn check_value(&self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return if self.data.required {
                Err("This field is required".into())
            } else {
                Ok(())
            };
        }
        let ok = match self.data.field_type {
            CustomFieldType::Text => value.as_str().is_some_and(|s| s.chars().count() <= 1000),
            CustomFieldType::Number => value.as_f64().is_some_and(f64::is_finite),
            CustomFieldType::Boolean => value.is_boolean(),
            CustomFieldType::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            CustomFieldType::Select => value
                .as_str()
                .is_some_and(|s| self.data.options.iter().any(|o| o == s)),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("Expected a {} value", self.data.field_type.display_name().to_lowercase()))
        }
    }
}

crate::impl_aggregate_root!(
    CustomField,
    CustomFieldId,
    index = "a014",
    collection = "custom_fields",
    entity = "custom_field",
    element = "Custom field",
    list = "Custom fields"
);

impl CrmRecord for CustomField {
    crate::crm_record_parts!(CustomFieldId, CustomFieldDto);

    fn validate_dto(dto: &CustomFieldDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check(
            "entityType",
            ENTITY_TYPES.contains(&dto.entity_type.as_str()),
            "Unknown entity type",
        )
        .text("key", &dto.key, &[Rule::Required])
        .check(
            "key",
            dto.key.is_empty() || FIELD_KEY_RE.is_match(&dto.key),
            "Use lowercase letters, digits and underscores",
        )
        .text("label", &dto.label, &[Rule::Required, Rule::MaxLength(100)])
        .check(
            "options",
            dto.field_type != CustomFieldType::Select || !dto.options.is_empty(),
            "A select field needs at least one option",
        );
        v.finish()
    }

    fn validate_record(&self, previous: Option<&Self>) -> Result<(), ValidationErrors> {
        match previous {
            Some(p) if p.data.field_type != self.data.field_type => Err(ValidationErrors::single(
                "fieldType",
                "The type of an existing field cannot change",
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomFieldDto {
    pub entity_type: String,
    pub key: String,
    pub label: String,
    pub field_type: CustomFieldType,
    pub options: Vec<String>,
    pub required: bool,
}

// ============================================================================
// CustomValue
// ============================================================================

crate::aggregate_id!(
    /// Custom value identifier
    CustomValueId
);

/// Value of a custom field on one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomValue {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomValueId>,
    #[serde(flatten)]
    pub data: CustomValueDto,
}

impl CustomValue {
    /// Type check against the field definition; the target must be of the
    /// field's entity type
    pub fn validate_against(&self, field: &CustomField) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check(
            "entityType",
            self.data.target.entity_type == field.data.entity_type,
            "Field is declared for a different entity type",
        );
        if let Err(message) = field.check_value(&self.data.value) {
            v.check("value", false, &message);
        }
        v.finish()
    }
}

crate::impl_aggregate_root!(
    CustomValue,
    CustomValueId,
    index = "a014",
    collection = "custom_values",
    entity = "custom_value",
    element = "Custom value",
    list = "Custom values"
);

impl CrmRecord for CustomValue {
    crate::crm_record_parts!(CustomValueId, CustomValueDto);

    fn validate_dto(dto: &CustomValueDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check("customFieldId", dto.custom_field_id.is_some(), "This field is required")
            .nested("", dto.target.validate());
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomValueDto {
    pub custom_field_id: Option<CustomFieldId>,
    #[serde(flatten)]
    pub target: EntityRef,
    pub value: Value,
}
