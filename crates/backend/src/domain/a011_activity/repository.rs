use contracts::domain::a011_activity::aggregate::Activity;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "activities",
    entity_type: "activity",
    fields: &[
        FieldDef::text("kind", "kind"),
        FieldDef::text("subject", "subject").searchable(),
        FieldDef::text("body", "body").searchable(),
        FieldDef::text("entityType", "entity_type"),
        FieldDef::id("entityId", "entity_id"),
        FieldDef::id("ownerUserId", "owner_user_id").references("users"),
        FieldDef::timestamp("dueAt", "due_at"),
        FieldDef::timestamp("completedAt", "completed_at"),
        FieldDef::integer("durationMinutes", "duration_minutes"),
    ],
    unique: &[],
    polymorphic: true,
};

pub static CODEC: TypedCodec<Activity> = TypedCodec::new();
