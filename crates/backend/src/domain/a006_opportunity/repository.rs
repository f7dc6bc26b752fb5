use contracts::domain::a006_opportunity::aggregate::Opportunity;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

/// Deals
pub static TABLE: EntityTable = EntityTable {
    table: "opportunities",
    entity_type: "opportunity",
    fields: &[
        FieldDef::text("name", "name").searchable(),
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::id("contactId", "contact_id").references("contacts"),
        FieldDef::id("ownerUserId", "owner_user_id").references("users"),
        FieldDef::text("stage", "stage"),
        FieldDef::numeric("value", "value"),
        FieldDef::text("currency", "currency"),
        FieldDef::integer("probability", "probability"),
        FieldDef::text("forecastCategory", "forecast_category"),
        FieldDef::date("expectedCloseDate", "expected_close_date"),
        FieldDef::boolean("isClosed", "is_closed"),
        FieldDef::boolean("isWon", "is_won"),
        FieldDef::timestamp("stageChangedAt", "stage_changed_at"),
        FieldDef::text("lossReason", "loss_reason").searchable(),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Opportunity> = TypedCodec::new();
