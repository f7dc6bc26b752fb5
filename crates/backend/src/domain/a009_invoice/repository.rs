use contracts::domain::a009_invoice::aggregate::Invoice;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "invoices",
    entity_type: "invoice",
    fields: &[
        FieldDef::text("invoiceNumber", "invoice_number").searchable(),
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::id("quoteId", "quote_id").references("quotes"),
        FieldDef::id("opportunityId", "opportunity_id").references("opportunities"),
        FieldDef::text("currency", "currency"),
        FieldDef::json("lineItems", "line_items"),
        FieldDef::numeric("taxRate", "tax_rate"),
        FieldDef::numeric("subtotal", "subtotal"),
        FieldDef::numeric("discountTotal", "discount_total"),
        FieldDef::numeric("taxTotal", "tax_total"),
        FieldDef::numeric("total", "total"),
        FieldDef::numeric("amountPaid", "amount_paid"),
        FieldDef::text("status", "status"),
        FieldDef::date("issueDate", "issue_date"),
        FieldDef::date("dueDate", "due_date"),
        FieldDef::timestamp("paidAt", "paid_at"),
    ],
    unique: &[&["invoiceNumber"]],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Invoice> = TypedCodec::new();
