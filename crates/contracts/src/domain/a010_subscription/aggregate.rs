use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a004_contact::aggregate::ContactId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Subscription identifier
    SubscriptionId
);

crate::crm_enum! {
    BillingFrequency default Monthly {
        Monthly => ("monthly", "Monthly"),
        Quarterly => ("quarterly", "Quarterly"),
        Annual => ("annual", "Annual"),
    }
}

impl BillingFrequency {
    pub fn months(&self) -> u32 {
        match self {
            BillingFrequency::Monthly => 1,
            BillingFrequency::Quarterly => 3,
            BillingFrequency::Annual => 12,
        }
    }
}

crate::crm_enum! {
    SubscriptionStatus default Active {
        Trial => ("trial", "Trial"),
        Active => ("active", "Active"),
        PastDue => ("past_due", "Past due"),
        Cancelled => ("cancelled", "Cancelled"),
        Expired => ("expired", "Expired"),
    }
}

crate::crm_enum! {
    /// What happens at the end of the current period
    RenewalState default AutoRenew {
        AutoRenew => ("auto_renew", "Auto-renew"),
        Manual => ("manual", "Manual renewal"),
        CancelAtPeriodEnd => ("cancel_at_period_end", "Cancels at period end"),
    }
}

/// Recurring billing for a product (hosting, support plan, licence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(flatten)]
    pub base: BaseAggregate<SubscriptionId>,
    #[serde(flatten)]
    pub data: SubscriptionDto,
}

impl Subscription {
    /// First renewal date strictly after `after`, counted in whole periods from the start
    pub fn next_renewal_after(&self, after: NaiveDate) -> Option<NaiveDate> {
        let start = self.data.start_date?;
        let step = self.data.billing_frequency.months();
        let mut periods = 1;
        loop {
            let candidate = start.checked_add_months(Months::new(step * periods))?;
            if candidate > after {
                return Some(candidate);
            }
            periods += 1;
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.data.status, SubscriptionStatus::Active | SubscriptionStatus::Trial)
    }
}

crate::impl_aggregate_root!(
    Subscription,
    SubscriptionId,
    index = "a010",
    collection = "subscriptions",
    entity = "subscription",
    element = "Subscription",
    list = "Subscriptions"
);

impl CrmRecord for Subscription {
    crate::crm_record_parts!(SubscriptionId, SubscriptionDto);

    fn validate_dto(dto: &SubscriptionDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check("accountId", dto.account_id.is_some(), "This field is required")
            .text("productName", &dto.product_name, &[Rule::Required, Rule::MaxLength(200)])
            .number("amount", dto.amount, &[Rule::MONEY])
            .text("currency", &dto.currency, &[Rule::Required, Rule::CurrencyCode])
            .check("startDate", dto.start_date.is_some(), "This field is required")
            .check(
                "endDate",
                match (dto.start_date, dto.end_date) {
                    (Some(start), Some(end)) => end >= start,
                    _ => true,
                },
                "End date is before the start date",
            );
        v.finish()
    }

    fn before_write(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        if self.data.status == SubscriptionStatus::Cancelled {
            self.data.cancelled_at.get_or_insert(now);
            self.data.next_renewal_date = None;
            return;
        }
        self.data.cancelled_at = None;
        let schedule_changed = previous.map_or(true, |p| {
            p.data.start_date != self.data.start_date
                || p.data.billing_frequency != self.data.billing_frequency
        });
        if schedule_changed || self.data.next_renewal_date.is_none() {
            self.data.next_renewal_date = self.next_renewal_after(now.date_naive());
        }
        if self.data.renewal_state == RenewalState::CancelAtPeriodEnd {
            if let (Some(end), Some(next)) = (self.data.end_date, self.data.next_renewal_date) {
                if next > end {
                    self.data.next_renewal_date = None;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionDto {
    pub account_id: Option<AccountId>,
    pub contact_id: Option<ContactId>,
    pub product_name: String,
    pub billing_frequency: BillingFrequency,
    pub amount: f64,
    pub currency: String,
    pub status: SubscriptionStatus,
    pub renewal_state: RenewalState,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub next_renewal_date: Option<NaiveDate>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Default for SubscriptionDto {
    fn default() -> Self {
        Self {
            account_id: None,
            contact_id: None,
            product_name: String::new(),
            billing_frequency: BillingFrequency::default(),
            amount: 0.0,
            currency: "USD".to_string(),
            status: SubscriptionStatus::default(),
            renewal_state: RenewalState::default(),
            start_date: None,
            end_date: None,
            next_renewal_date: None,
            cancelled_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn renewal_date_steps_by_frequency() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
        let sub = Subscription::create_from_json(
            &json!({
                "accountId": uuid::Uuid::new_v4().to_string(),
                "productName": "Managed hosting",
                "billingFrequency": "quarterly",
                "amount": 1200,
                "startDate": "2025-01-31"
            }),
            now,
        )
        .unwrap();
        assert_eq!(
            sub.data.next_renewal_date,
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
    }

    #[test]
    fn cancel_clears_renewal() {
        let now = Utc::now();
        let sub = Subscription::create_from_json(
            &json!({
                "accountId": uuid::Uuid::new_v4().to_string(),
                "productName": "Support plan",
                "startDate": now.date_naive().to_string()
            }),
            now,
        )
        .unwrap();
        assert!(sub.data.next_renewal_date.is_some());
        let cancelled = sub
            .patch_from_json(json!({"status": "cancelled"}).as_object().unwrap(), now)
            .unwrap();
        assert_eq!(cancelled.data.next_renewal_date, None);
        assert_eq!(cancelled.data.cancelled_at, Some(now));
        assert!(!cancelled.is_active());
    }
}
