//! Common types and traits for all CRM aggregates

pub mod address;
pub mod aggregate_id;
pub mod aggregate_root;
pub mod base_aggregate;
pub mod crm_record;
pub mod entity_metadata;
pub mod entity_ref;
pub mod line_item;

// Re-exports
pub use address::Address;
pub use aggregate_id::AggregateId;
pub use aggregate_root::AggregateRoot;
pub use base_aggregate::BaseAggregate;
pub use crm_record::CrmRecord;
pub use entity_metadata::EntityMetadata;
pub use entity_ref::{EntityRef, ENTITY_TYPES};
pub use line_item::{compute_totals, round_money, validate_line_items, DocumentTotals, LineItem};
