use contracts::domain::a010_subscription::aggregate::Subscription;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "subscriptions",
    entity_type: "subscription",
    fields: &[
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::id("contactId", "contact_id").references("contacts"),
        FieldDef::text("productName", "product_name").searchable(),
        FieldDef::text("billingFrequency", "billing_frequency"),
        FieldDef::numeric("amount", "amount"),
        FieldDef::text("currency", "currency"),
        FieldDef::text("status", "status"),
        FieldDef::text("renewalState", "renewal_state"),
        FieldDef::date("startDate", "start_date"),
        FieldDef::date("endDate", "end_date"),
        FieldDef::date("nextRenewalDate", "next_renewal_date"),
        FieldDef::timestamp("cancelledAt", "cancelled_at"),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Subscription> = TypedCodec::new();
