use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a006_opportunity::aggregate::OpportunityId;
use crate::domain::a008_quote::aggregate::QuoteId;
use crate::domain::common::{
    compute_totals, round_money, validate_line_items, BaseAggregate, CrmRecord, LineItem,
};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Invoice identifier
    InvoiceId
);

crate::crm_enum! {
    /// Payment lifecycle of an invoice
    InvoiceStatus default Draft {
        Draft => ("draft", "Draft"),
        Issued => ("issued", "Issued"),
        PartiallyPaid => ("partially_paid", "Partially paid"),
        Paid => ("paid", "Paid"),
        Overdue => ("overdue", "Overdue"),
        Void => ("void", "Void"),
    }
}

/// Bill issued to an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(flatten)]
    pub base: BaseAggregate<InvoiceId>,
    #[serde(flatten)]
    pub data: InvoiceDto,
}

impl Invoice {
    pub fn recalculate_totals(&mut self) {
        let totals = compute_totals(&self.data.line_items, self.data.tax_rate);
        self.data.subtotal = totals.subtotal;
        self.data.discount_total = totals.discount_total;
        self.data.tax_total = totals.tax_total;
        self.data.total = totals.total;
    }

    pub fn balance_due(&self) -> f64 {
        round_money((self.data.total - self.data.amount_paid).max(0.0))
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.balance_due() > 0.0
            && !matches!(self.data.status, InvoiceStatus::Draft | InvoiceStatus::Void)
            && self.data.due_date.is_some_and(|due| due < today)
    }

    /// Derive the payment status from the amount paid
    fn sync_payment_status(&mut self, now: DateTime<Utc>) {
        if matches!(self.data.status, InvoiceStatus::Draft | InvoiceStatus::Void) {
            return;
        }
        if self.data.total > 0.0 && self.balance_due() == 0.0 {
            self.data.status = InvoiceStatus::Paid;
            self.data.paid_at.get_or_insert(now);
            return;
        }
        self.data.paid_at = None;
        if self.data.amount_paid > 0.0 {
            self.data.status = InvoiceStatus::PartiallyPaid;
        } else if self.is_overdue(now.date_naive()) {
            self.data.status = InvoiceStatus::Overdue;
        } else if self.data.status != InvoiceStatus::Overdue {
            self.data.status = InvoiceStatus::Issued;
        }
    }
}

crate::impl_aggregate_root!(
    Invoice,
    InvoiceId,
    index = "a009",
    collection = "invoices",
    entity = "invoice",
    element = "Invoice",
    list = "Invoices"
);

impl CrmRecord for Invoice {
    crate::crm_record_parts!(InvoiceId, InvoiceDto);

    fn validate_dto(dto: &InvoiceDto) -> Result<(), ValidationErrors> {
        let total = compute_totals(&dto.line_items, dto.tax_rate).total;
        let mut v = Validator::new();
        v.text("invoiceNumber", &dto.invoice_number, &[Rule::Required, Rule::MaxLength(50)])
            .check("accountId", dto.account_id.is_some(), "This field is required")
            .text("currency", &dto.currency, &[Rule::Required, Rule::CurrencyCode])
            .optional_number("taxRate", dto.tax_rate, &[Rule::PERCENT])
            .nested("", validate_line_items(&dto.line_items))
            .number("total", total, &[Rule::MONEY])
            .number("amountPaid", dto.amount_paid, &[Rule::MONEY])
            .check(
                "amountPaid",
                dto.amount_paid <= total,
                "Payment exceeds the invoice total",
            )
            .check(
                "dueDate",
                match (dto.issue_date, dto.due_date) {
                    (Some(issued), Some(due)) => due >= issued,
                    _ => true,
                },
                "Due date is before the issue date",
            )
            .check(
                "lineItems",
                !dto.line_items.is_empty() || dto.status == InvoiceStatus::Draft,
                "An issued invoice needs at least one line",
            );
        v.finish()
    }

    fn before_write(&mut self, _previous: Option<&Self>, now: DateTime<Utc>) {
        self.recalculate_totals();
        if self.data.status != InvoiceStatus::Draft && self.data.issue_date.is_none() {
            self.data.issue_date = Some(now.date_naive());
        }
        self.sync_payment_status(now);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDto {
    pub invoice_number: String,
    pub account_id: Option<AccountId>,
    pub quote_id: Option<QuoteId>,
    pub opportunity_id: Option<OpportunityId>,
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub tax_rate: Option<f64>,
    pub subtotal: f64,
    pub discount_total: f64,
    pub tax_total: f64,
    pub total: f64,
    pub amount_paid: f64,
    pub status: InvoiceStatus,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Default for InvoiceDto {
    fn default() -> Self {
        Self {
            invoice_number: String::new(),
            account_id: None,
            quote_id: None,
            opportunity_id: None,
            currency: "USD".to_string(),
            line_items: Vec::new(),
            tax_rate: None,
            subtotal: 0.0,
            discount_total: 0.0,
            tax_total: 0.0,
            total: 0.0,
            amount_paid: 0.0,
            status: InvoiceStatus::default(),
            issue_date: None,
            due_date: None,
            paid_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issued(now: DateTime<Utc>) -> Invoice {
        Invoice::create_from_json(
            &json!({
                "invoiceNumber": "INV-100",
                "accountId": uuid::Uuid::new_v4().to_string(),
                "status": "issued",
                "lineItems": [{"description": "Retainer", "quantity": 1, "unitPrice": 5000}]
            }),
            now,
        )
        .unwrap()
    }

    #[test]
    fn payments_drive_status() {
        let now = Utc::now();
        let invoice = issued(now);
        assert_eq!(invoice.data.status, InvoiceStatus::Issued);
        assert_eq!(invoice.data.issue_date, Some(now.date_naive()));

        let partial = invoice
            .patch_from_json(json!({"amountPaid": 2000}).as_object().unwrap(), now)
            .unwrap();
        assert_eq!(partial.data.status, InvoiceStatus::PartiallyPaid);
        assert_eq!(partial.balance_due(), 3000.0);

        let paid = partial
            .patch_from_json(json!({"amountPaid": 5000}).as_object().unwrap(), now)
            .unwrap();
        assert_eq!(paid.data.status, InvoiceStatus::Paid);
        assert_eq!(paid.data.paid_at, Some(now));
    }

    #[test]
    fn overpayment_is_rejected() {
        let now = Utc::now();
        let errors = issued(now)
            .patch_from_json(json!({"amountPaid": 6000}).as_object().unwrap(), now)
            .unwrap_err();
        assert!(errors.has_field("amountPaid"));
    }

    #[test]
    fn overdue_when_due_date_passed() {
        let now = Utc::now();
        let yesterday = now.date_naive() - chrono::Duration::days(1);
        let issue_date = yesterday - chrono::Duration::days(30);
        let patch = json!({"issueDate": issue_date.to_string(), "dueDate": yesterday.to_string()});
        let invoice = issued(now)
            .patch_from_json(patch.as_object().unwrap(), now)
            .unwrap();
        assert_eq!(invoice.data.status, InvoiceStatus::Overdue);
        assert!(invoice.is_overdue(now.date_naive()));
    }
}
