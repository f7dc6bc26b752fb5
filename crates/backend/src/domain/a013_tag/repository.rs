use contracts::domain::a013_tag::aggregate::{EntityTag, Tag};

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TAG_TABLE: EntityTable = EntityTable {
    table: "tags",
    entity_type: "tag",
    fields: &[
        FieldDef::text("name", "name").searchable(),
        FieldDef::text("color", "color"),
        FieldDef::text("description", "description").searchable(),
    ],
    unique: &[&["name"]],
    polymorphic: false,
};

pub static TAG_CODEC: TypedCodec<Tag> = TypedCodec::new();

/// Tag assignments
pub static ENTITY_TAG_TABLE: EntityTable = EntityTable {
    table: "entity_tags",
    entity_type: "entity_tag",
    fields: &[
        FieldDef::id("tagId", "tag_id").references("tags"),
        FieldDef::text("entityType", "entity_type"),
        FieldDef::id("entityId", "entity_id"),
    ],
    unique: &[&["tagId", "entityType", "entityId"]],
    polymorphic: true,
};

pub static ENTITY_TAG_CODEC: TypedCodec<EntityTag> = TypedCodec::new();
