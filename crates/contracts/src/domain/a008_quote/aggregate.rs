use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a006_opportunity::aggregate::OpportunityId;
use crate::domain::common::{compute_totals, validate_line_items, BaseAggregate, CrmRecord, LineItem};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Quote identifier
    QuoteId
);

crate::crm_enum! {
    /// Approval lifecycle of a quote
    QuoteStatus default Draft {
        Draft => ("draft", "Draft"),
        PendingApproval => ("pending_approval", "Pending approval"),
        Approved => ("approved", "Approved"),
        Rejected => ("rejected", "Rejected"),
        Sent => ("sent", "Sent"),
        Accepted => ("accepted", "Accepted"),
        Expired => ("expired", "Expired"),
    }
}

/// Priced offer for an opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(flatten)]
    pub base: BaseAggregate<QuoteId>,
    #[serde(flatten)]
    pub data: QuoteDto,
}

impl Quote {
    pub fn recalculate_totals(&mut self) {
        let totals = compute_totals(&self.data.line_items, self.data.tax_rate);
        self.data.subtotal = totals.subtotal;
        self.data.discount_total = totals.discount_total;
        self.data.tax_total = totals.tax_total;
        self.data.total = totals.total;
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.data.valid_until.is_some_and(|d| d < today)
    }
}

crate::impl_aggregate_root!(
    Quote,
    QuoteId,
    index = "a008",
    collection = "quotes",
    entity = "quote",
    element = "Quote",
    list = "Quotes"
);

impl CrmRecord for Quote {
    crate::crm_record_parts!(QuoteId, QuoteDto);

    fn validate_dto(dto: &QuoteDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("quoteNumber", &dto.quote_number, &[Rule::Required, Rule::MaxLength(50)])
            .check("accountId", dto.account_id.is_some(), "This field is required")
            .text("currency", &dto.currency, &[Rule::Required, Rule::CurrencyCode])
            .optional_number("taxRate", dto.tax_rate, &[Rule::PERCENT])
            .check(
                "lineItems",
                !dto.line_items.is_empty() || dto.status == QuoteStatus::Draft,
                "Add at least one line before leaving draft",
            )
            .nested("", validate_line_items(&dto.line_items))
            .number(
                "total",
                compute_totals(&dto.line_items, dto.tax_rate).total,
                &[Rule::MONEY],
            );
        v.finish()
    }

    fn validate_record(&self, previous: Option<&Self>) -> Result<(), ValidationErrors> {
        let Some(previous) = previous else {
            return Ok(());
        };
        let locked = matches!(previous.data.status, QuoteStatus::Accepted);
        if locked && self.data.line_items != previous.data.line_items {
            return Err(ValidationErrors::single(
                "lineItems",
                "An accepted quote cannot be changed",
            ));
        }
        Ok(())
    }

    fn before_write(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        self.recalculate_totals();
        let approved_now = self.data.status == QuoteStatus::Approved
            && previous.map_or(true, |p| p.data.status != QuoteStatus::Approved);
        if approved_now {
            self.data.approved_at = Some(now);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteDto {
    pub quote_number: String,
    pub account_id: Option<AccountId>,
    pub opportunity_id: Option<OpportunityId>,
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub tax_rate: Option<f64>,
    /// Totals are recomputed from the lines on every write
    pub subtotal: f64,
    pub discount_total: f64,
    pub tax_total: f64,
    pub total: f64,
    pub status: QuoteStatus,
    pub valid_until: Option<NaiveDate>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Default for QuoteDto {
    fn default() -> Self {
        Self {
            quote_number: String::new(),
            account_id: None,
            opportunity_id: None,
            currency: "USD".to_string(),
            line_items: Vec::new(),
            tax_rate: None,
            subtotal: 0.0,
            discount_total: 0.0,
            tax_total: 0.0,
            total: 0.0,
            status: QuoteStatus::default(),
            valid_until: None,
            approved_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_totals_are_replaced() {
        let quote = Quote::create_from_json(
            &json!({
                "quoteNumber": "Q-2025-001",
                "accountId": uuid::Uuid::new_v4().to_string(),
                "currency": "SAR",
                "taxRate": 15,
                "lineItems": [
                    {"description": "Discovery workshop", "quantity": 2, "unitPrice": 1500},
                    {"description": "MVP build", "quantity": 1, "unitPrice": 30000, "discount": 1000}
                ],
                "total": 1
            }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(quote.data.subtotal, 33000.0);
        assert_eq!(quote.data.discount_total, 1000.0);
        assert_eq!(quote.data.tax_total, 4800.0);
        assert_eq!(quote.data.total, 36800.0);
    }

    #[test]
    fn approval_is_stamped_once() {
        let t0 = Utc::now();
        let quote = Quote::create_from_json(
            &json!({
                "quoteNumber": "Q-7",
                "accountId": uuid::Uuid::new_v4().to_string(),
                "lineItems": [{"description": "Audit", "quantity": 1, "unitPrice": 900}]
            }),
            t0,
        )
        .unwrap();
        let t1 = t0 + chrono::Duration::hours(1);
        let approved = quote
            .patch_from_json(json!({"status": "approved"}).as_object().unwrap(), t1)
            .unwrap();
        assert_eq!(approved.data.approved_at, Some(t1));
        let sent = approved
            .patch_from_json(json!({"status": "sent"}).as_object().unwrap(), t1 + chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(sent.data.approved_at, Some(t1));
    }

    #[test]
    fn line_errors_are_reported_with_index() {
        let errors = Quote::create_from_json(
            &json!({
                "quoteNumber": "Q-8",
                "accountId": uuid::Uuid::new_v4().to_string(),
                "lineItems": [{"description": "", "quantity": 1, "unitPrice": 10}]
            }),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("lineItems.0.description"));
    }
}
