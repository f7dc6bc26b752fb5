pub mod a001_user;
pub mod a002_team;
pub mod a003_account;
pub mod a004_contact;
pub mod a005_lead;
pub mod a006_opportunity;
pub mod a007_ticket;
pub mod a008_quote;
pub mod a009_invoice;
pub mod a010_subscription;
pub mod a011_activity;
pub mod a012_audit_log;
pub mod a013_tag;
pub mod a014_custom_field;

use crate::shared::records::Collection;

/// Every collection served under `/api/{path}`
pub static COLLECTIONS: &[Collection] = &[
    Collection {
        path: "users",
        aliases: &[],
        table: &a001_user::repository::TABLE,
        codec: &a001_user::repository::CODEC,
    },
    Collection {
        path: "teams",
        aliases: &[],
        table: &a002_team::repository::TABLE,
        codec: &a002_team::repository::CODEC,
    },
    Collection {
        path: "accounts",
        aliases: &["companies"],
        table: &a003_account::repository::TABLE,
        codec: &a003_account::repository::CODEC,
    },
    Collection {
        path: "contacts",
        aliases: &[],
        table: &a004_contact::repository::TABLE,
        codec: &a004_contact::repository::CODEC,
    },
    Collection {
        path: "leads",
        aliases: &[],
        table: &a005_lead::repository::TABLE,
        codec: &a005_lead::repository::CODEC,
    },
    Collection {
        path: "opportunities",
        aliases: &["deals"],
        table: &a006_opportunity::repository::TABLE,
        codec: &a006_opportunity::repository::CODEC,
    },
    Collection {
        path: "tickets",
        aliases: &[],
        table: &a007_ticket::repository::TABLE,
        codec: &a007_ticket::repository::CODEC,
    },
    Collection {
        path: "quotes",
        aliases: &[],
        table: &a008_quote::repository::TABLE,
        codec: &a008_quote::repository::CODEC,
    },
    Collection {
        path: "invoices",
        aliases: &[],
        table: &a009_invoice::repository::TABLE,
        codec: &a009_invoice::repository::CODEC,
    },
    Collection {
        path: "subscriptions",
        aliases: &[],
        table: &a010_subscription::repository::TABLE,
        codec: &a010_subscription::repository::CODEC,
    },
    Collection {
        path: "activities",
        aliases: &[],
        table: &a011_activity::repository::TABLE,
        codec: &a011_activity::repository::CODEC,
    },
    Collection {
        path: "tags",
        aliases: &[],
        table: &a013_tag::repository::TAG_TABLE,
        codec: &a013_tag::repository::TAG_CODEC,
    },
    Collection {
        path: "entity-tags",
        aliases: &["entity_tags"],
        table: &a013_tag::repository::ENTITY_TAG_TABLE,
        codec: &a013_tag::repository::ENTITY_TAG_CODEC,
    },
    Collection {
        path: "custom-fields",
        aliases: &["custom_fields"],
        table: &a014_custom_field::repository::FIELD_TABLE,
        codec: &a014_custom_field::repository::FIELD_CODEC,
    },
    Collection {
        path: "custom-values",
        aliases: &["custom_values"],
        table: &a014_custom_field::repository::VALUE_TABLE,
        codec: &a014_custom_field::repository::VALUE_CODEC,
    },
];

/// Resolve a URL segment (path or alias)
pub fn find_collection(segment: &str) -> Option<&'static Collection> {
    COLLECTIONS.iter().find(|c| c.matches(segment))
}

/// Resolve the entity type used in polymorphic references
pub fn collection_for_entity(entity_type: &str) -> Option<&'static Collection> {
    COLLECTIONS.iter().find(|c| c.entity_type() == entity_type)
}
