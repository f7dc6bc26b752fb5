use crate::domain::common::EntityRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

crate::aggregate_id!(
    /// Audit entry identifier
    AuditEntryId
);

crate::crm_enum! {
    /// Kind of write captured by an audit entry
    AuditOperation default Update {
        Create => ("create", "Created"),
        Update => ("update", "Updated"),
        Delete => ("delete", "Deleted"),
        Restore => ("restore", "Restored"),
    }
}

/// Append-only record of one write to an entity
///
/// Entries are produced by the write service inside the same transaction as
/// the change they describe and are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub entity_type: String,
    pub entity_id: String,
    pub operation: AuditOperation,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn record(
        target: EntityRef,
        operation: AuditOperation,
        old_values: Option<Value>,
        new_values: Option<Value>,
        actor: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new_v4(),
            entity_type: target.entity_type,
            entity_id: target.entity_id,
            operation,
            old_values,
            new_values,
            actor: actor.into(),
            created_at: now,
        }
    }

    pub fn target(&self) -> EntityRef {
        EntityRef::new(self.entity_type.clone(), self.entity_id.clone())
    }

    /// Top-level keys whose value differs between old and new, sorted
    pub fn changed_fields(&self) -> Vec<String> {
        let empty = serde_json::Map::new();
        let old = self.old_values.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let new = self.new_values.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let mut keys: Vec<String> = old
            .keys()
            .chain(new.keys())
            .filter(|k| old.get(*k) != new.get(*k))
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn changed_fields_compare_snapshots() {
        let entry = AuditEntry::record(
            EntityRef::new("contact", "c-1"),
            AuditOperation::Update,
            Some(json!({"firstName": "Lina", "email": "a@x.com", "version": 1})),
            Some(json!({"firstName": "Lina", "email": "b@x.com", "version": 2, "jobTitle": "CTO"})),
            "sara",
            Utc::now(),
        );
        assert_eq!(entry.changed_fields(), vec!["email", "jobTitle", "version"]);
        assert_eq!(entry.target(), EntityRef::new("contact", "c-1"));
    }

    #[test]
    fn create_has_no_old_values() {
        let entry = AuditEntry::record(
            EntityRef::new("lead", "l-1"),
            AuditOperation::Create,
            None,
            Some(json!({"firstName": "Huda"})),
            "system",
            Utc::now(),
        );
        assert_eq!(entry.changed_fields(), vec!["firstName"]);
        let wire = serde_json::to_value(&entry).unwrap();
        assert_eq!(wire["operation"], "create");
        assert!(wire["oldValues"].is_null());
    }
}
