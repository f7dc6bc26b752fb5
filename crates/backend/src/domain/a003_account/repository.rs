use contracts::domain::a003_account::aggregate::Account;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

/// Organizations; exposed to the UI as "companies"
pub static TABLE: EntityTable = EntityTable {
    table: "accounts",
    entity_type: "account",
    fields: &[
        FieldDef::text("name", "name").searchable(),
        FieldDef::text("legalName", "legal_name").searchable(),
        FieldDef::text("accountType", "account_type"),
        FieldDef::text("industry", "industry").searchable(),
        FieldDef::text("sizeTier", "size_tier"),
        FieldDef::text("website", "website"),
        FieldDef::text("email", "email").searchable(),
        FieldDef::text("phone", "phone").searchable(),
        FieldDef::json("billingAddress", "billing_address"),
        FieldDef::json("shippingAddress", "shipping_address"),
        FieldDef::id("ownerTeamId", "owner_team_id").references("teams"),
        FieldDef::id("ownerUserId", "owner_user_id").references("users"),
        FieldDef::id("parentAccountId", "parent_account_id").references("accounts"),
        FieldDef::numeric("annualRevenue", "annual_revenue"),
        FieldDef::integer("employeeCount", "employee_count"),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Account> = TypedCodec::new();
