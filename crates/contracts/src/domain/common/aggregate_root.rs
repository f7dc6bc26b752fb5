use super::{AggregateId, EntityMetadata};

/// Root of a CRM aggregate
///
/// Instance accessors plus static naming metadata used for tables, REST
/// collections, audit records and UI captions.
pub trait AggregateRoot {
    type Id: AggregateId;

    // ============================================================================
    // Instance data
    // ============================================================================

    fn id(&self) -> Self::Id;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    // ============================================================================
    // Class metadata
    // ============================================================================

    /// Aggregate index in the system (e.g. "a004")
    fn aggregate_index() -> &'static str;

    /// Table and REST collection name (e.g. "contacts")
    fn collection_name() -> &'static str;

    /// Type name used in audit entries and polymorphic references (e.g. "contact")
    fn entity_type() -> &'static str;

    /// Singular caption for UI
    fn element_name() -> &'static str;

    /// Plural caption for UI
    fn list_name() -> &'static str;

    /// Full aggregate name (e.g. "a004_contacts")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}

/// Implements [`AggregateRoot`] for an aggregate holding `base: BaseAggregate<Id>`.
#[macro_export]
macro_rules! impl_aggregate_root {
    ($ty:ty, $id:ty, index = $index:literal, collection = $collection:literal,
     entity = $entity:literal, element = $element:literal, list = $list:literal) => {
        impl $crate::domain::common::AggregateRoot for $ty {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.base.id
            }

            fn metadata(&self) -> &$crate::domain::common::EntityMetadata {
                &self.base.metadata
            }

            fn metadata_mut(&mut self) -> &mut $crate::domain::common::EntityMetadata {
                &mut self.base.metadata
            }

            fn aggregate_index() -> &'static str {
                $index
            }

            fn collection_name() -> &'static str {
                $collection
            }

            fn entity_type() -> &'static str {
                $entity
            }

            fn element_name() -> &'static str {
                $element
            }

            fn list_name() -> &'static str {
                $list
            }
        }
    };
}
