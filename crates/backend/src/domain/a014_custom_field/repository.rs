use contracts::domain::a014_custom_field::aggregate::{CustomField, CustomValue};

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static FIELD_TABLE: EntityTable = EntityTable {
    table: "custom_fields",
    entity_type: "custom_field",
    fields: &[
        FieldDef::text("entityType", "entity_type"),
        FieldDef::text("key", "field_key").searchable(),
        FieldDef::text("label", "label").searchable(),
        FieldDef::text("fieldType", "field_type"),
        FieldDef::json("options", "options"),
        FieldDef::boolean("required", "required"),
    ],
    unique: &[&["entityType", "key"]],
    polymorphic: false,
};

pub static FIELD_CODEC: TypedCodec<CustomField> = TypedCodec::new();

pub static VALUE_TABLE: EntityTable = EntityTable {
    table: "custom_values",
    entity_type: "custom_value",
    fields: &[
        FieldDef::id("customFieldId", "custom_field_id").references("custom_fields"),
        FieldDef::text("entityType", "entity_type"),
        FieldDef::id("entityId", "entity_id"),
        FieldDef::json("value", "value"),
    ],
    unique: &[&["customFieldId", "entityId"]],
    polymorphic: true,
};

pub static VALUE_CODEC: TypedCodec<CustomValue> = TypedCodec::new();
