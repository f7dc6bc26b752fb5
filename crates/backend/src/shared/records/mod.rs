//! Generic write path shared by every CRM collection

pub mod codec;
pub mod write_service;

pub use codec::{decode, encode, Record, RecordCodec, TypedCodec};

use crate::shared::data::entity_table::EntityTable;

/// A REST collection: its URL segment, storage table and write rules
pub struct Collection {
    pub path: &'static str,
    /// Extra URL segments served by the same collection
    pub aliases: &'static [&'static str],
    pub table: &'static EntityTable,
    pub codec: &'static dyn RecordCodec,
}

impl Collection {
    pub fn matches(&self, segment: &str) -> bool {
        self.path == segment || self.aliases.contains(&segment)
    }

    pub fn entity_type(&self) -> &'static str {
        self.table.entity_type
    }
}
