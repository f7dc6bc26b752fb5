use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::enums::Language;
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Contact identifier
    ContactId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Person at an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(flatten)]
    pub base: BaseAggregate<ContactId>,
    #[serde(flatten)]
    pub data: ContactDto,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.data.first_name.trim(), self.data.last_name.trim())
            .trim()
            .to_string()
    }

    /// Channels the contact agreed to be reached on
    pub fn opted_in_channels(&self) -> Vec<&'static str> {
        let mut channels = Vec::new();
        if self.data.email_opt_in {
            channels.push("email");
        }
        if self.data.sms_opt_in {
            channels.push("sms");
        }
        if self.data.whatsapp_opt_in {
            channels.push("whatsapp");
        }
        channels
    }
}

crate::impl_aggregate_root!(
    Contact,
    ContactId,
    index = "a004",
    collection = "contacts",
    entity = "contact",
    element = "Contact",
    list = "Contacts"
);

impl CrmRecord for Contact {
    crate::crm_record_parts!(ContactId, ContactDto);

    fn validate_dto(dto: &ContactDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("firstName", &dto.first_name, &[Rule::Required, Rule::MaxLength(100)])
            .text("lastName", &dto.last_name, &[Rule::MaxLength(100)])
            .optional_text("email", dto.email.as_deref(), &[Rule::Email])
            .optional_text("jobTitle", dto.job_title.as_deref(), &[Rule::MaxLength(150)])
            .optional_text("utmSource", dto.utm_source.as_deref(), &[Rule::MaxLength(100)])
            .optional_text("utmMedium", dto.utm_medium.as_deref(), &[Rule::MaxLength(100)])
            .optional_text("utmCampaign", dto.utm_campaign.as_deref(), &[Rule::MaxLength(100)])
            .check(
                "email",
                !dto.email_opt_in || dto.email.as_deref().is_some_and(|e| !e.trim().is_empty()),
                "Email opt-in requires an email address",
            )
            .check(
                "phones",
                !(dto.sms_opt_in || dto.whatsapp_opt_in) || !dto.phones.is_empty(),
                "SMS or WhatsApp opt-in requires a phone number",
            );
        for (index, phone) in dto.phones.iter().enumerate() {
            v.text(&format!("phones.{index}"), phone, &[Rule::Required, Rule::Phone]);
        }
        v.finish()
    }
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDto {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// International format, first entry is the main number
    pub phones: Vec<String>,
    pub job_title: Option<String>,
    pub account_id: Option<AccountId>,
    pub is_primary: bool,
    pub email_opt_in: bool,
    pub sms_opt_in: bool,
    pub whatsapp_opt_in: bool,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub preferred_language: Language,
}
