use contracts::domain::a008_quote::aggregate::Quote;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "quotes",
    entity_type: "quote",
    fields: &[
        FieldDef::text("quoteNumber", "quote_number").searchable(),
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::id("opportunityId", "opportunity_id").references("opportunities"),
        FieldDef::text("currency", "currency"),
        FieldDef::json("lineItems", "line_items"),
        FieldDef::numeric("taxRate", "tax_rate"),
        FieldDef::numeric("subtotal", "subtotal"),
        FieldDef::numeric("discountTotal", "discount_total"),
        FieldDef::numeric("taxTotal", "tax_total"),
        FieldDef::numeric("total", "total"),
        FieldDef::text("status", "status"),
        FieldDef::date("validUntil", "valid_until"),
        FieldDef::timestamp("approvedAt", "approved_at"),
    ],
    unique: &[&["quoteNumber"]],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Quote> = TypedCodec::new();
