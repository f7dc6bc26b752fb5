use crate::domain::common::{BaseAggregate, CrmRecord, EntityRef};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color regex"));

// ============================================================================
// Tag
// ============================================================================

crate::aggregate_id!(
    /// Tag identifier
    TagId
);

/// Free-form label that can be attached to any record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    #[serde(flatten)]
    pub base: BaseAggregate<TagId>,
    #[serde(flatten)]
    pub data: TagDto,
}

crate::impl_aggregate_root!(
    Tag,
    TagId,
    index = "a013",
    collection = "tags",
    entity = "tag",
    element = "Tag",
    list = "Tags"
);

impl CrmRecord for Tag {
    crate::crm_record_parts!(TagId, TagDto);

    fn validate_dto(dto: &TagDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("name", &dto.name, &[Rule::Required, Rule::MaxLength(50)])
            .check(
                "color",
                dto.color.as_deref().map_or(true, |c| HEX_COLOR_RE.is_match(c)),
                "Use a #RRGGBB color",
            )
            .optional_text("description", dto.description.as_deref(), &[Rule::MaxLength(500)]);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagDto {
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// EntityTag
// ============================================================================

crate::aggregate_id!(
    /// Identifier of a tag assignment
    EntityTagId
);

/// Assignment of a tag to a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTag {
    #[serde(flatten)]
    pub base: BaseAggregate<EntityTagId>,
    #[serde(flatten)]
    pub data: EntityTagDto,
}

crate::impl_aggregate_root!(
    EntityTag,
    EntityTagId,
    index = "a013",
    collection = "entity_tags",
    entity = "entity_tag",
    element = "Tag assignment",
    list = "Tag assignments"
);

impl CrmRecord for EntityTag {
    crate::crm_record_parts!(EntityTagId, EntityTagDto);

    fn validate_dto(dto: &EntityTagDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check("tagId", dto.tag_id.is_some(), "This field is required")
            .nested("", dto.target.validate());
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityTagDto {
    pub tag_id: Option<TagId>,
    #[serde(flatten)]
    pub target: EntityRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn color_must_be_hex() {
        assert!(Tag::create_from_json(&json!({"name": "VIP", "color": "#FFAA00"}), Utc::now()).is_ok());
        let errors =
            Tag::create_from_json(&json!({"name": "VIP", "color": "gold"}), Utc::now()).unwrap_err();
        assert!(errors.has_field("color"));
    }

    #[test]
    fn assignment_needs_tag_and_target() {
        let errors = EntityTag::create_from_json(&json!({"entityType": "deal"}), Utc::now()).unwrap_err();
        assert!(errors.has_field("tagId"));
        assert!(errors.has_field("entityType"));
        assert!(errors.has_field("entityId"));
    }
}
