use crate::domain::a001_user::aggregate::UserId;
use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a004_contact::aggregate::ContactId;
use crate::domain::a006_opportunity::aggregate::OpportunityId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Lead identifier
    LeadId
);

crate::crm_enum! {
    /// Qualification progress of a lead
    LeadStatus default New {
        New => ("new", "New"),
        Contacted => ("contacted", "Contacted"),
        Qualified => ("qualified", "Qualified"),
        Unqualified => ("unqualified", "Unqualified"),
        Converted => ("converted", "Converted"),
    }
}

impl LeadStatus {
    /// Position in the new → contacted → qualified → converted pipeline
    fn rank(&self) -> u8 {
        match self {
            LeadStatus::New => 0,
            LeadStatus::Contacted => 1,
            LeadStatus::Qualified => 2,
            LeadStatus::Unqualified => 2,
            LeadStatus::Converted => 3,
        }
    }
}

crate::crm_enum! {
    /// Where the lead came from
    LeadSource default Website {
        Website => ("website", "Website"),
        Referral => ("referral", "Referral"),
        Social => ("social", "Social media"),
        Ads => ("ads", "Paid ads"),
        Event => ("event", "Event"),
        Whatsapp => ("whatsapp", "WhatsApp"),
        Other => ("other", "Other"),
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Unqualified prospect captured by a form or imported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub base: BaseAggregate<LeadId>,
    #[serde(flatten)]
    pub data: LeadDto,
}

/// Records created from a lead on conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub contact_id: ContactId,
    pub account_id: Option<AccountId>,
    pub opportunity_id: Option<OpportunityId>,
}

impl Lead {
    pub fn is_converted(&self) -> bool {
        self.data.converted_at.is_some()
    }

    /// Mark the lead converted, setting the timestamp and back-references together
    pub fn convert(&self, conversion: Conversion, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        if self.is_converted() {
            return Err(ValidationErrors::single("status", "Lead is already converted"));
        }
        if self.data.status == LeadStatus::Unqualified {
            return Err(ValidationErrors::single(
                "status",
                "An unqualified lead cannot be converted",
            ));
        }
        let mut dto = self.data.clone();
        dto.status = LeadStatus::Converted;
        dto.converted_at = Some(now);
        dto.converted_contact_id = Some(conversion.contact_id);
        dto.converted_account_id = conversion.account_id;
        dto.converted_opportunity_id = conversion.opportunity_id;
        self.updated(dto, now)
    }
}

crate::impl_aggregate_root!(
    Lead,
    LeadId,
    index = "a005",
    collection = "leads",
    entity = "lead",
    element = "Lead",
    list = "Leads"
);

impl CrmRecord for Lead {
    crate::crm_record_parts!(LeadId, LeadDto);

    fn validate_dto(dto: &LeadDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("firstName", &dto.first_name, &[Rule::Required, Rule::MaxLength(100)])
            .text("lastName", &dto.last_name, &[Rule::MaxLength(100)])
            .optional_text("email", dto.email.as_deref(), &[Rule::Email])
            .optional_text("phone", dto.phone.as_deref(), &[Rule::Phone])
            .optional_text("company", dto.company.as_deref(), &[Rule::MaxLength(200)])
            .optional_number("score", dto.score.map(f64::from), &[Rule::PERCENT])
            .optional_number("fitScore", dto.fit_score.map(f64::from), &[Rule::PERCENT])
            .optional_number(
                "engagementScore",
                dto.engagement_score.map(f64::from),
                &[Rule::PERCENT],
            )
            .optional_number("probability", dto.probability.map(f64::from), &[Rule::PERCENT])
            .optional_number("budget", dto.budget, &[Rule::MONEY])
            .optional_text("utmSource", dto.utm_source.as_deref(), &[Rule::MaxLength(100)])
            .optional_text("utmMedium", dto.utm_medium.as_deref(), &[Rule::MaxLength(100)])
            .optional_text("utmCampaign", dto.utm_campaign.as_deref(), &[Rule::MaxLength(100)]);

        let converted = dto.converted_at.is_some();
        let message = "Only set once the lead is converted";
        v.check("convertedContactId", converted || dto.converted_contact_id.is_none(), message)
            .check("convertedAccountId", converted || dto.converted_account_id.is_none(), message)
            .check(
                "convertedOpportunityId",
                converted || dto.converted_opportunity_id.is_none(),
                message,
            )
            .check(
                "status",
                (dto.status == LeadStatus::Converted) == converted,
                "Status must be converted exactly when convertedAt is set",
            );
        v.finish()
    }

    fn validate_record(&self, previous: Option<&Self>) -> Result<(), ValidationErrors> {
        let Some(previous) = previous else {
            return Ok(());
        };
        let (from, to) = (previous.data.status, self.data.status);
        if from == LeadStatus::Converted && to != LeadStatus::Converted {
            return Err(ValidationErrors::single("status", "A converted lead cannot be reopened"));
        }
        if previous.data.converted_at.is_some() && self.data.converted_at != previous.data.converted_at {
            return Err(ValidationErrors::single("convertedAt", "Conversion time cannot change"));
        }
        // Moving back is allowed only out of "unqualified"
        if to.rank() < from.rank() && from != LeadStatus::Unqualified {
            return Err(ValidationErrors::single(
                "status",
                format!("Cannot move a lead from {} back to {}", from, to),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadDto {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub score: Option<i32>,
    pub fit_score: Option<i32>,
    pub engagement_score: Option<i32>,
    pub probability: Option<i32>,
    pub budget: Option<f64>,
    /// Service the lead asked about (web, mobile app, ERP, ...)
    pub interest: Option<String>,
    pub notes: Option<String>,
    pub owner_user_id: Option<UserId>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub converted_at: Option<DateTime<Utc>>,
    pub converted_contact_id: Option<ContactId>,
    pub converted_account_id: Option<AccountId>,
    pub converted_opportunity_id: Option<OpportunityId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead() -> Lead {
        Lead::create_from_json(
            &json!({"firstName": "Huda", "email": "huda@x.com", "source": "referral"}),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn out_of_range_probability_and_bad_email_are_field_errors() {
        let errors = Lead::create_from_json(
            &json!({"firstName": "Huda", "probability": 150, "email": "a..b@x.com"}),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("probability"));
        assert!(errors.has_field("email"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn conversion_refs_require_converted_at() {
        let errors = Lead::create_from_json(
            &json!({
                "firstName": "Huda",
                "convertedContactId": uuid::Uuid::new_v4().to_string()
            }),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("convertedContactId"));
    }

    #[test]
    fn convert_sets_refs_and_timestamp_together() {
        let lead = lead();
        let contact_id = ContactId::new_v4();
        let converted = lead
            .convert(
                Conversion {
                    contact_id,
                    account_id: None,
                    opportunity_id: None,
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(converted.data.status, LeadStatus::Converted);
        assert!(converted.data.converted_at.is_some());
        assert_eq!(converted.data.converted_contact_id, Some(contact_id));
        assert_eq!(converted.base.metadata.version, 2);

        let again = converted.convert(
            Conversion {
                contact_id,
                account_id: None,
                opportunity_id: None,
            },
            Utc::now(),
        );
        assert!(again.is_err());
    }

    #[test]
    fn status_does_not_move_backwards() {
        let lead = lead();
        let qualified = lead
            .patch_from_json(json!({"status": "qualified"}).as_object().unwrap(), Utc::now())
            .unwrap();
        let errors = qualified
            .patch_from_json(json!({"status": "new"}).as_object().unwrap(), Utc::now())
            .unwrap_err();
        assert!(errors.has_field("status"));
    }
}
