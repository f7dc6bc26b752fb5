use crate::domain::a001_user::aggregate::UserId;
use crate::domain::a002_team::aggregate::TeamId;
use crate::domain::common::{Address, AggregateRoot, BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Account (company) identifier
    AccountId
);

crate::crm_enum! {
    /// Commercial relationship with the organization
    AccountType default Prospect {
        Customer => ("customer", "Customer"),
        Prospect => ("prospect", "Prospect"),
        Partner => ("partner", "Partner"),
        Vendor => ("vendor", "Vendor"),
    }
}

crate::crm_enum! {
    /// Headcount tier
    SizeTier default Small {
        Micro => ("micro", "1-9"),
        Small => ("small", "10-49"),
        Medium => ("medium", "50-249"),
        Large => ("large", "250-999"),
        Enterprise => ("enterprise", "1000+"),
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Organization the agency works with; shown as "Companies" in the admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub base: BaseAggregate<AccountId>,
    #[serde(flatten)]
    pub data: AccountDto,
}

crate::impl_aggregate_root!(
    Account,
    AccountId,
    index = "a003",
    collection = "accounts",
    entity = "account",
    element = "Company",
    list = "Companies"
);

impl CrmRecord for Account {
    crate::crm_record_parts!(AccountId, AccountDto);

    fn validate_dto(dto: &AccountDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("name", &dto.name, &[Rule::Required, Rule::MaxLength(200)])
            .optional_text("legalName", dto.legal_name.as_deref(), &[Rule::MaxLength(300)])
            .optional_text("industry", dto.industry.as_deref(), &[Rule::MaxLength(100)])
            .optional_text("website", dto.website.as_deref(), &[Rule::Url])
            .optional_text("email", dto.email.as_deref(), &[Rule::Email])
            .optional_text("phone", dto.phone.as_deref(), &[Rule::Phone])
            .optional_number("annualRevenue", dto.annual_revenue, &[Rule::MONEY])
            .check(
                "employeeCount",
                dto.employee_count.map_or(true, |n| n >= 0),
                "Must not be negative",
            );
        if let Some(address) = &dto.billing_address {
            v.nested("billingAddress", address.validate());
        }
        if let Some(address) = &dto.shipping_address {
            v.nested("shippingAddress", address.validate());
        }
        v.finish()
    }

    fn validate_record(&self, _previous: Option<&Self>) -> Result<(), ValidationErrors> {
        if self.data.parent_account_id == Some(self.id()) {
            return Err(ValidationErrors::single(
                "parentAccountId",
                "An account cannot be its own parent",
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
pub struct AccountDto {
    pub name: String,
    pub legal_name: Option<String>,
    pub account_type: AccountType,
    pub industry: Option<String>,
    pub size_tier: Option<SizeTier>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub owner_team_id: Option<TeamId>,
    pub owner_user_id: Option<UserId>,
    pub parent_account_id: Option<AccountId>,
    pub annual_revenue: Option<f64>,
    pub employee_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn nested_address_errors_carry_prefix() {
        let errors = Account::create_from_json(
            &json!({
                "name": "Acme Trading",
                "website": "acme.sa",
                "billingAddress": {"line1": "", "city": "Riyadh", "country": "sa"}
            }),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("website"));
        assert!(errors.has_field("billingAddress.line1"));
        assert!(errors.has_field("billingAddress.country"));
    }

    #[test]
    fn self_parent_is_rejected() {
        let account = Account::create_from_json(&json!({"name": "Acme"}), Utc::now()).unwrap();
        let patch = json!({"parentAccountId": account.base.id.to_string()});
        let errors = account
            .patch_from_json(patch.as_object().unwrap(), Utc::now())
            .unwrap_err();
        assert!(errors.has_field("parentAccountId"));
    }
}
