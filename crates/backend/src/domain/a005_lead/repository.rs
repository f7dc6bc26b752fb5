use contracts::domain::a005_lead::aggregate::Lead;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "leads",
    entity_type: "lead",
    fields: &[
        FieldDef::text("firstName", "first_name").searchable(),
        FieldDef::text("lastName", "last_name").searchable(),
        FieldDef::text("email", "email").searchable(),
        FieldDef::text("phone", "phone").searchable(),
        FieldDef::text("company", "company").searchable(),
        FieldDef::text("status", "status"),
        FieldDef::text("source", "source"),
        FieldDef::integer("score", "score"),
        FieldDef::integer("fitScore", "fit_score"),
        FieldDef::integer("engagementScore", "engagement_score"),
        FieldDef::integer("probability", "probability"),
        FieldDef::numeric("budget", "budget"),
        FieldDef::text("interest", "interest").searchable(),
        FieldDef::text("notes", "notes"),
        FieldDef::id("ownerUserId", "owner_user_id").references("users"),
        FieldDef::text("utmSource", "utm_source"),
        FieldDef::text("utmMedium", "utm_medium"),
        FieldDef::text("utmCampaign", "utm_campaign"),
        FieldDef::timestamp("convertedAt", "converted_at"),
        FieldDef::id("convertedContactId", "converted_contact_id").references("contacts"),
        FieldDef::id("convertedAccountId", "converted_account_id").references("accounts"),
        FieldDef::id("convertedOpportunityId", "converted_opportunity_id")
            .references("opportunities"),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Lead> = TypedCodec::new();
