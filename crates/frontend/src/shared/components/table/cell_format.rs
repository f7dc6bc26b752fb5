//! Display values for grid cells
//!
//! Every column has a renderer `(value, row, locale) -> CellDisplay`; columns
//! without one fall back to [`default_display`]. Null and empty values always
//! render as [`PLACEHOLDER`].

use crate::shared::locale::Locale;
use chrono::{DateTime, NaiveDate};
use contracts::domain::a003_account::aggregate::AccountType;
use contracts::domain::a006_opportunity::aggregate::OpportunityStage;
use contracts::domain::a007_ticket::aggregate::{TicketPriority, TicketStatus};
use serde_json::Value;
use std::collections::HashMap;

pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq)]
pub enum CellDisplay {
    Text(String),
    /// `variant` is one of the `Badge` component variants
    Badge { label: String, variant: &'static str },
}

impl CellDisplay {
    fn placeholder() -> Self {
        CellDisplay::Text(PLACEHOLDER.to_string())
    }
}

pub type CellRenderer = fn(&Value, &Value, Locale) -> CellDisplay;

/// Column key -> renderer
#[derive(Clone, Default)]
pub struct CellRenderers {
    map: HashMap<String, CellRenderer>,
}

impl CellRenderers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, renderer: CellRenderer) -> Self {
        self.map.insert(key.to_string(), renderer);
        self
    }

    pub fn render(&self, key: &str, row: &Value, locale: Locale) -> CellDisplay {
        let value = row.get(key).unwrap_or(&Value::Null);
        match self.map.get(key) {
            Some(renderer) => renderer(value, row, locale),
            None => default_display(value, locale),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn plain_text(value: &Value, locale: Locale) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => locale.pick(if *b { "Yes" } else { "No" }, if *b { "نعم" } else { "لا" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !is_blank(v))
            .map(|v| plain_text(v, locale))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub fn default_display(value: &Value, locale: Locale) -> CellDisplay {
    if is_blank(value) {
        return CellDisplay::placeholder();
    }
    CellDisplay::Text(plain_text(value, locale))
}

// ============================================================================
// Numbers
// ============================================================================

/// Western digits to Arabic-Indic digits; other characters pass through
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

fn group_digits(integer: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (i, c) in integer.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// `1234.5` with 2 decimals: en `1,234.50`, ar `١٬٢٣٤٫٥٠`
pub fn format_decimal(value: f64, decimals: usize, locale: Locale) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (group, point) = match locale {
        Locale::En => (',', '.'),
        Locale::Ar => ('٬', '٫'),
    };
    let mut out = String::new();
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_digits(integer, group));
    if let Some(fraction) = fraction {
        out.push(point);
        out.push_str(fraction);
    }
    match locale {
        Locale::En => out,
        Locale::Ar => to_arabic_digits(&out),
    }
}

fn currency_symbol(code: &str, locale: Locale) -> Option<&'static str> {
    match (locale, code) {
        (Locale::En, "USD") => Some("$"),
        (Locale::En, "EUR") => Some("€"),
        (Locale::En, "GBP") => Some("£"),
        (Locale::Ar, "USD") => Some("US$"),
        (Locale::Ar, "EUR") => Some("€"),
        (Locale::Ar, "SAR") => Some("ر.س.\u{200f}"),
        (Locale::Ar, "AED") => Some("د.إ.\u{200f}"),
        (Locale::Ar, "EGP") => Some("ج.م.\u{200f}"),
        _ => None,
    }
}

/// en: `$1,234.50`, `SAR 1,234.50`; ar: `١٬٢٣٤٫٥٠ US$`
pub fn format_currency(amount: f64, currency: &str, locale: Locale) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let number = format_decimal(amount.abs(), 2, locale);
    let sign = if amount < 0.0 && amount.abs() >= 0.005 { "-" } else { "" };
    match (locale, currency_symbol(&code, locale)) {
        (Locale::En, Some(symbol)) => format!("{sign}{symbol}{number}"),
        (Locale::En, None) => format!("{sign}{code} {number}"),
        (Locale::Ar, Some(symbol)) => format!("{sign}{number} {symbol}"),
        (Locale::Ar, None) => format!("{sign}{number} {code}"),
    }
}

// ============================================================================
// Dates
// ============================================================================

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_utc().date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// en: `Jan 5, 2025`; ar: `٥/١/٢٠٢٥`. Unparseable text is returned as is.
pub fn format_date(raw: &str, locale: Locale) -> String {
    let Some(date) = parse_date(raw.trim()) else {
        return raw.to_string();
    };
    match locale {
        Locale::En => date.format("%b %-d, %Y").to_string(),
        Locale::Ar => to_arabic_digits(&date.format("%-d/%-m/%Y").to_string()),
    }
}

// ============================================================================
// Renderers
// ============================================================================

pub fn text_cell(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    default_display(value, locale)
}

/// Amount in the row's `currency`, USD when the row has none
pub fn currency_cell(value: &Value, row: &Value, locale: Locale) -> CellDisplay {
    match value.as_f64() {
        Some(amount) => {
            let currency = row.get("currency").and_then(Value::as_str).unwrap_or("USD");
            CellDisplay::Text(format_currency(amount, currency, locale))
        }
        None => default_display(value, locale),
    }
}

pub fn integer_cell(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    match value.as_f64() {
        Some(n) => CellDisplay::Text(format_decimal(n, 0, locale)),
        None => default_display(value, locale),
    }
}

pub fn percent_cell(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    match value.as_f64() {
        Some(n) => {
            let number = format_decimal(n, 0, locale);
            CellDisplay::Text(match locale {
                Locale::En => format!("{}%", number),
                Locale::Ar => format!("{}٪", number),
            })
        }
        None => default_display(value, locale),
    }
}

pub fn date_cell(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    match value.as_str() {
        Some(raw) if !raw.trim().is_empty() => CellDisplay::Text(format_date(raw, locale)),
        _ => default_display(value, locale),
    }
}

/// First phone of a phone list
pub fn phone_cell(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    match value {
        Value::Array(items) => match items.iter().find(|v| !is_blank(v)) {
            Some(first) => {
                let more = items.len().saturating_sub(1);
                let text = plain_text(first, locale);
                CellDisplay::Text(if more > 0 { format!("{} (+{})", text, more) } else { text })
            }
            None => CellDisplay::placeholder(),
        },
        other => default_display(other, locale),
    }
}

/// (code, variant, Arabic label)
type BadgeStyle = (&'static str, &'static str, &'static str);

const STAGE_BADGES: &[BadgeStyle] = &[
    ("prospecting", "neutral", "استكشاف"),
    ("qualification", "primary", "تأهيل"),
    ("needs_analysis", "primary", "تحليل الاحتياجات"),
    ("proposal", "warning", "عرض سعر"),
    ("negotiation", "warning", "تفاوض"),
    ("closed_won", "success", "مكسوبة"),
    ("closed_lost", "error", "خاسرة"),
];

const TICKET_STATUS_BADGES: &[BadgeStyle] = &[
    ("open", "primary", "مفتوحة"),
    ("in_progress", "warning", "قيد المعالجة"),
    ("pending", "neutral", "بانتظار العميل"),
    ("resolved", "success", "تم الحل"),
    ("closed", "neutral", "مغلقة"),
];

const PRIORITY_BADGES: &[BadgeStyle] = &[
    ("low", "neutral", "منخفضة"),
    ("medium", "primary", "متوسطة"),
    ("high", "warning", "عالية"),
    ("urgent", "error", "عاجلة"),
];

const ACCOUNT_TYPE_BADGES: &[BadgeStyle] = &[
    ("customer", "success", "عميل"),
    ("prospect", "primary", "عميل محتمل"),
    ("partner", "warning", "شريك"),
    ("vendor", "neutral", "مورّد"),
];

fn badge(
    value: &Value,
    locale: Locale,
    styles: &[BadgeStyle],
    english: impl Fn(&str) -> Option<&'static str>,
) -> CellDisplay {
    let Some(code) = value.as_str().filter(|c| !c.trim().is_empty()) else {
        return default_display(value, locale);
    };
    match styles.iter().find(|(c, _, _)| *c == code) {
        Some((_, variant, arabic)) => CellDisplay::Badge {
            label: locale.pick(english(code).unwrap_or(code), arabic).to_string(),
            variant,
        },
        None => CellDisplay::Text(code.to_string()),
    }
}

pub fn stage_badge(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    badge(value, locale, STAGE_BADGES, |code| {
        OpportunityStage::from_code(code).map(|s| s.display_name())
    })
}

pub fn ticket_status_badge(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    badge(value, locale, TICKET_STATUS_BADGES, |code| {
        TicketStatus::from_code(code).map(|s| s.display_name())
    })
}

pub fn priority_badge(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    badge(value, locale, PRIORITY_BADGES, |code| {
        TicketPriority::from_code(code).map(|s| s.display_name())
    })
}

pub fn account_type_badge(value: &Value, _row: &Value, locale: Locale) -> CellDisplay {
    badge(value, locale, ACCOUNT_TYPE_BADGES, |code| {
        AccountType::from_code(code).map(|s| s.display_name())
    })
}

/// Choice offered by a quick filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub code: String,
    pub en: String,
    pub ar: String,
}

fn options(
    styles: &[BadgeStyle],
    english: impl Fn(&str) -> Option<&'static str>,
) -> Vec<FilterOption> {
    styles
        .iter()
        .map(|(code, _, arabic)| FilterOption {
            code: code.to_string(),
            en: english(code).unwrap_or(code).to_string(),
            ar: arabic.to_string(),
        })
        .collect()
}

pub fn stage_options() -> Vec<FilterOption> {
    options(STAGE_BADGES, |code| {
        OpportunityStage::from_code(code).map(|s| s.display_name())
    })
}

pub fn ticket_status_options() -> Vec<FilterOption> {
    options(TICKET_STATUS_BADGES, |code| {
        TicketStatus::from_code(code).map(|s| s.display_name())
    })
}

pub fn priority_options() -> Vec<FilterOption> {
    options(PRIORITY_BADGES, |code| {
        TicketPriority::from_code(code).map(|s| s.display_name())
    })
}

pub fn account_type_options() -> Vec<FilterOption> {
    options(ACCOUNT_TYPE_BADGES, |code| {
        AccountType::from_code(code).map(|s| s.display_name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(display: CellDisplay) -> String {
        match display {
            CellDisplay::Text(t) => t,
            CellDisplay::Badge { label, .. } => label,
        }
    }

    #[test]
    fn blank_values_render_the_placeholder() {
        for value in [json!(null), json!(""), json!("   "), json!([])] {
            assert_eq!(text(default_display(&value, Locale::En)), PLACEHOLDER);
        }
        assert_eq!(text(default_display(&json!(0), Locale::En)), "0");
        assert_eq!(text(default_display(&json!(false), Locale::Ar)), "لا");
        assert_eq!(text(default_display(&json!(["a", "", "b"]), Locale::En)), "a, b");
    }

    #[test]
    fn currency_follows_the_locale() {
        assert_eq!(format_currency(1234.5, "USD", Locale::En), "$1,234.50");
        assert_eq!(format_currency(1234.5, "USD", Locale::Ar), "١٬٢٣٤٫٥٠ US$");
        assert_eq!(format_currency(1234.5, "sar", Locale::En), "SAR 1,234.50");
        assert_eq!(format_currency(-12.0, "USD", Locale::En), "-$12.00");
        assert_eq!(format_currency(1_000_000.0, "XYZ", Locale::Ar), "١٬٠٠٠٬٠٠٠٫٠٠ XYZ");
    }

    #[test]
    fn decimals_round_and_group() {
        assert_eq!(format_decimal(999.999, 2, Locale::En), "1,000.00");
        assert_eq!(format_decimal(-1234.0, 0, Locale::En), "-1,234");
        assert_eq!(format_decimal(-0.001, 2, Locale::En), "0.00");
        assert_eq!(format_decimal(45.0, 0, Locale::Ar), "٤٥");
    }

    #[test]
    fn dates_follow_the_locale() {
        assert_eq!(format_date("2025-01-05T09:30:00.000000Z", Locale::En), "Jan 5, 2025");
        assert_eq!(format_date("2025-01-05T09:30:00.000000Z", Locale::Ar), "٥/١/٢٠٢٥");
        assert_eq!(format_date("2025-12-31", Locale::En), "Dec 31, 2025");
        assert_eq!(format_date("next week", Locale::En), "next week");
    }

    #[test]
    fn currency_cell_reads_the_row_currency() {
        let row = json!({"value": 5000.0, "currency": "SAR"});
        assert_eq!(text(currency_cell(&row["value"], &row, Locale::En)), "SAR 5,000.00");
        let row = json!({"value": null});
        assert_eq!(text(currency_cell(&row["value"], &row, Locale::En)), PLACEHOLDER);
    }

    #[test]
    fn badges_map_codes_to_label_and_color() {
        let row = json!({});
        assert_eq!(
            stage_badge(&json!("closed_won"), &row, Locale::En),
            CellDisplay::Badge { label: "Closed won".into(), variant: "success" }
        );
        assert_eq!(
            priority_badge(&json!("urgent"), &row, Locale::Ar),
            CellDisplay::Badge { label: "عاجلة".into(), variant: "error" }
        );
        assert_eq!(
            ticket_status_badge(&json!("mystery"), &row, Locale::En),
            CellDisplay::Text("mystery".into())
        );
        assert_eq!(text(account_type_badge(&json!(null), &row, Locale::En)), PLACEHOLDER);
    }

    #[test]
    fn filter_options_cover_every_stage() {
        let stages = stage_options();
        assert_eq!(stages.len(), OpportunityStage::all().len());
        assert_eq!(stages[0].code, "prospecting");
        assert_eq!(stages[0].ar, "استكشاف");
    }

    #[test]
    fn renderers_fall_back_to_default() {
        let renderers = CellRenderers::new().with("probability", percent_cell);
        let row = json!({"probability": 40, "name": "Deal", "phones": ["+966501234567", "+966501234568"]});
        assert_eq!(text(renderers.render("probability", &row, Locale::En)), "40%");
        assert_eq!(text(renderers.render("probability", &row, Locale::Ar)), "٤٠٪");
        assert_eq!(text(renderers.render("name", &row, Locale::En)), "Deal");
        assert_eq!(text(renderers.render("missing", &row, Locale::En)), PLACEHOLDER);
        assert_eq!(
            text(phone_cell(&row["phones"], &row, Locale::En)),
            "+966501234567 (+1)"
        );
    }
}
