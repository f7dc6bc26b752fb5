use super::EntityMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and lifecycle fields shared by all aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    /// Immutable identifier
    pub id: Id,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn new_at(id: Id, now: DateTime<Utc>) -> Self {
        Self {
            id,
            metadata: EntityMetadata::created_at(now),
        }
    }

    /// Load with existing metadata (rows read back from storage)
    pub fn with_metadata(id: Id, metadata: EntityMetadata) -> Self {
        Self { id, metadata }
    }
}
