use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle metadata carried by every aggregate row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete marker; rows are never physically removed
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Incremented on every write, checked when a client sends an expected version
    #[serde(default)]
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        Self::created_at(Utc::now())
    }

    pub fn created_at(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: 1,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }

    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.touch(now);
    }

    pub fn restore(&mut self, now: DateTime<Utc>) {
        self.deleted_at = None;
        self.touch(now);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}
