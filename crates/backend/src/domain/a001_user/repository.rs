use contracts::domain::a001_user::aggregate::User;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "users",
    entity_type: "user",
    fields: &[
        FieldDef::text("name", "name").searchable(),
        FieldDef::text("email", "email").searchable(),
        FieldDef::text("role", "role"),
        FieldDef::id("teamId", "team_id").references("teams"),
        FieldDef::text("preferredLanguage", "preferred_language"),
        FieldDef::boolean("isActive", "is_active"),
    ],
    unique: &[&["email"]],
    polymorphic: false,
};

pub static CODEC: TypedCodec<User> = TypedCodec::new();
