use contracts::domain::a002_team::aggregate::Team;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "teams",
    entity_type: "team",
    fields: &[
        FieldDef::text("name", "name").searchable(),
        FieldDef::id("managerId", "manager_id").references("users"),
        FieldDef::text("region", "region").searchable(),
    ],
    unique: &[&["name"]],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Team> = TypedCodec::new();
