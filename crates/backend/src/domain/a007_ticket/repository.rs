use contracts::domain::a007_ticket::aggregate::Ticket;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "tickets",
    entity_type: "ticket",
    fields: &[
        FieldDef::text("subject", "subject").searchable(),
        FieldDef::text("description", "description").searchable(),
        FieldDef::id("contactId", "contact_id").references("contacts"),
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::id("assigneeId", "assignee_id").references("users"),
        FieldDef::text("priority", "priority"),
        FieldDef::text("category", "category"),
        FieldDef::text("status", "status"),
        FieldDef::timestamp("slaDueAt", "sla_due_at"),
        FieldDef::boolean("slaBreached", "sla_breached"),
        FieldDef::timestamp("resolvedAt", "resolved_at"),
        FieldDef::timestamp("closedAt", "closed_at"),
        FieldDef::integer("satisfactionRating", "satisfaction_rating"),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Ticket> = TypedCodec::new();
