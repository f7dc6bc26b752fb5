use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// One priced line of a quote or invoice
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// Absolute discount on the whole line
    pub discount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            discount: 0.0,
        }
    }

    pub fn gross(&self) -> f64 {
        round_money(self.quantity * self.unit_price)
    }

    /// quantity × unit price − discount
    pub fn line_total(&self) -> f64 {
        round_money(self.gross() - self.discount)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("description", &self.description, &[Rule::Required, Rule::MaxLength(500)])
            .check("quantity", self.quantity > 0.0, "Quantity must be greater than zero")
            .number("unitPrice", self.unit_price, &[Rule::MONEY])
            .number("discount", self.discount, &[Rule::MONEY])
            .check(
                "discount",
                self.discount <= self.gross(),
                "Discount cannot exceed the line amount",
            );
        v.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub discount_total: f64,
    pub tax_total: f64,
    pub total: f64,
}

/// Sum line items and apply a percentage tax on the discounted subtotal
pub fn compute_totals(items: &[LineItem], tax_rate: Option<f64>) -> DocumentTotals {
    let subtotal = round_money(items.iter().map(LineItem::gross).sum());
    let discount_total = round_money(items.iter().map(|i| i.discount).sum());
    let taxable = round_money(subtotal - discount_total);
    let tax_total = round_money(taxable * tax_rate.unwrap_or(0.0) / 100.0);
    DocumentTotals {
        subtotal,
        discount_total,
        tax_total,
        total: round_money(taxable + tax_total),
    }
}

/// Validate every line, reporting errors as `lineItems.<index>.<field>`
pub fn validate_line_items(items: &[LineItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (index, item) in items.iter().enumerate() {
        if let Err(inner) = item.validate() {
            errors.nest(&format!("lineItems.{index}"), inner);
        }
    }
    errors.into_result()
}

pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_apply_discount_before_tax() {
        let mut design = LineItem::new("UI design", 10.0, 120.0);
        design.discount = 200.0;
        let hosting = LineItem::new("Hosting", 12.0, 49.99);

        let totals = compute_totals(&[design, hosting], Some(15.0));
        assert_eq!(totals.subtotal, 1799.88);
        assert_eq!(totals.discount_total, 200.0);
        assert_eq!(totals.tax_total, 239.98);
        assert_eq!(totals.total, 1839.86);
    }

    #[test]
    fn line_errors_are_indexed() {
        let ok = LineItem::new("Support", 1.0, 10.0);
        let mut bad = LineItem::new("", 0.0, 10.0);
        bad.discount = 50.0;
        let errors = validate_line_items(&[ok, bad]).unwrap_err();
        assert!(errors.has_field("lineItems.1.description"));
        assert!(errors.has_field("lineItems.1.quantity"));
        assert!(errors.has_field("lineItems.1.discount"));
        assert!(!errors.has_field("lineItems.0.description"));
    }
}
