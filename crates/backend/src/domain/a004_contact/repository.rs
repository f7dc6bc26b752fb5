use contracts::domain::a004_contact::aggregate::Contact;

use crate::shared::data::entity_table::{EntityTable, FieldDef};
use crate::shared::records::TypedCodec;

pub static TABLE: EntityTable = EntityTable {
    table: "contacts",
    entity_type: "contact",
    fields: &[
        FieldDef::text("firstName", "first_name").searchable(),
        FieldDef::text("lastName", "last_name").searchable(),
        FieldDef::text("email", "email").searchable(),
        FieldDef::json("phones", "phones"),
        FieldDef::text("jobTitle", "job_title").searchable(),
        FieldDef::id("accountId", "account_id").references("accounts"),
        FieldDef::boolean("isPrimary", "is_primary"),
        FieldDef::boolean("emailOptIn", "email_opt_in"),
        FieldDef::boolean("smsOptIn", "sms_opt_in"),
        FieldDef::boolean("whatsappOptIn", "whatsapp_opt_in"),
        FieldDef::text("utmSource", "utm_source"),
        FieldDef::text("utmMedium", "utm_medium"),
        FieldDef::text("utmCampaign", "utm_campaign"),
        FieldDef::text("preferredLanguage", "preferred_language"),
    ],
    unique: &[],
    polymorphic: false,
};

pub static CODEC: TypedCodec<Contact> = TypedCodec::new();
