use crate::shared::validation::{ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Polymorphic reference to any aggregate row: `(entity type, id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entity_type.is_empty() || self.entity_id.is_empty()
    }

    /// Field errors are reported under `entityType` / `entityId`
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check(
            "entityType",
            ENTITY_TYPES.contains(&self.entity_type.as_str()),
            "Unknown entity type",
        )
        .check(
            "entityId",
            uuid::Uuid::parse_str(&self.entity_id).is_ok(),
            "Must be a valid identifier",
        );
        v.finish()
    }
}

/// Entity type names accepted in polymorphic references
pub const ENTITY_TYPES: &[&str] = &[
    "user",
    "team",
    "account",
    "contact",
    "lead",
    "opportunity",
    "ticket",
    "quote",
    "invoice",
    "subscription",
    "activity",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_type_and_id() {
        let ok = EntityRef::new("contact", uuid::Uuid::new_v4().to_string());
        assert!(ok.validate().is_ok());

        let errors = EntityRef::new("planet", "42").validate().unwrap_err();
        assert!(errors.has_field("entityType"));
        assert!(errors.has_field("entityId"));
    }
}
