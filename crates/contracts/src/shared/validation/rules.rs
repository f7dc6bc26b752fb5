use super::ValidationErrors;
use once_cell::sync::Lazy;
use regex::Regex;

// Local part: dot-separated atoms, so "a..b", ".a" and "a." never match.
// Domain: dot-separated labels ending in an alphabetic TLD.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,24}$",
    )
    .expect("email regex")
});

// E.164: "+", country code without leading zero, 8..15 digits in total
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").expect("phone regex"));

static CURRENCY_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency regex"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url regex"));

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_RE.is_match(value)
}

/// Accepts common separators (`+966 50-123 4567`, `+1 (415) 555-0100`)
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    PHONE_RE.is_match(&compact)
}

/// A reusable, parameterized validation rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    /// Phone number with a leading `+country` code
    Phone,
    Url,
    /// ISO-4217 shaped code (`USD`, `SAR`)
    CurrencyCode,
    /// Inclusive numeric range
    Range { min: f64, max: f64 },
    /// Non-negative money amount up to `max` with at most two decimals
    Currency { max: f64 },
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Percentages, probabilities and lead scores
    pub const PERCENT: Rule = Rule::Range {
        min: 0.0,
        max: 100.0,
    };

    /// Satisfaction ratings
    pub const RATING: Rule = Rule::Range { min: 1.0, max: 5.0 };

    /// Deal values, quote and invoice amounts
    pub const MONEY: Rule = Rule::Currency {
        max: 1_000_000_000.0,
    };

    /// Check a text value. An empty value only fails `Required`.
    pub fn check_str(&self, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        match *self {
            Rule::Required => {
                if trimmed.is_empty() {
                    return Err("This field is required".into());
                }
            }
            _ if trimmed.is_empty() => {}
            Rule::MinLength(min) => {
                if trimmed.chars().count() < min {
                    return Err(format!("Must be at least {} characters", min));
                }
            }
            Rule::MaxLength(max) => {
                if value.chars().count() > max {
                    return Err(format!("Must not exceed {} characters", max));
                }
            }
            Rule::Email => {
                if !is_valid_email(trimmed) {
                    return Err("Invalid email address".into());
                }
            }
            Rule::Phone => {
                if !is_valid_phone(trimmed) {
                    return Err("Phone number must include a country code, e.g. +966501234567".into());
                }
            }
            Rule::Url => {
                if !URL_RE.is_match(trimmed) {
                    return Err("Invalid URL".into());
                }
            }
            Rule::CurrencyCode => {
                if !CURRENCY_CODE_RE.is_match(trimmed) {
                    return Err("Currency must be a three-letter ISO code".into());
                }
            }
            Rule::OneOf(allowed) => {
                if !allowed.contains(&trimmed) {
                    return Err(format!("Must be one of: {}", allowed.join(", ")));
                }
            }
            Rule::Range { .. } | Rule::Currency { .. } => {
                let number: f64 = trimmed
                    .parse()
                    .map_err(|_| "Must be a number".to_string())?;
                return self.check_number(number);
            }
        }
        Ok(())
    }

    /// Check a numeric value. Text rules do not apply to numbers.
    pub fn check_number(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("Must be a finite number".into());
        }
        match *self {
            Rule::Range { min, max } => {
                if value < min || value > max {
                    return Err(format!("Must be between {} and {}", min, max));
                }
            }
            Rule::Currency { max } => {
                if value < 0.0 {
                    return Err("Amount cannot be negative".into());
                }
                if value > max {
                    return Err(format!("Amount cannot exceed {}", max));
                }
                let cents = value * 100.0;
                if (cents - cents.round()).abs() > 1e-6 {
                    return Err("Amount cannot have more than two decimal places".into());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Collects field errors; the first failing rule of a field wins so each
/// field reports one message.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, field: &str, value: &str, rules: &[Rule]) -> &mut Self {
        if let Some(message) = rules.iter().find_map(|r| r.check_str(value).err()) {
            self.errors.add(field, message);
        }
        self
    }

    pub fn optional_text(&mut self, field: &str, value: Option<&str>, rules: &[Rule]) -> &mut Self {
        if let Some(v) = value {
            self.text(field, v, rules);
        }
        self
    }

    pub fn number(&mut self, field: &str, value: f64, rules: &[Rule]) -> &mut Self {
        if let Some(message) = rules.iter().find_map(|r| r.check_number(value).err()) {
            self.errors.add(field, message);
        }
        self
    }

    pub fn optional_number(&mut self, field: &str, value: Option<f64>, rules: &[Rule]) -> &mut Self {
        if let Some(v) = value {
            self.number(field, v, rules);
        }
        self
    }

    /// Record a rule that does not fit the table above (cross-field checks)
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    pub fn nested(&mut self, prefix: &str, result: Result<(), ValidationErrors>) -> &mut Self {
        if let Err(inner) = result {
            self.errors.nest(prefix, inner);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        std::mem::take(&mut self.errors).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rejects_consecutive_dots() {
        assert!(is_valid_email("a.b@x.com"));
        assert!(is_valid_email("first.last+crm@mail.example.sa"));
        assert!(!is_valid_email("a..b@x.com"));
        assert!(!is_valid_email(".ab@x.com"));
        assert!(!is_valid_email("ab.@x.com"));
        assert!(!is_valid_email("ab@x..com"));
        assert!(!is_valid_email("ab@x"));
        assert!(!is_valid_email("ab@@x.com"));
    }

    #[test]
    fn phone_requires_country_code() {
        assert!(is_valid_phone("+966501234567"));
        assert!(is_valid_phone("+1 (415) 555-0100"));
        assert!(!is_valid_phone("0501234567"));
        assert!(!is_valid_phone("+0123456789"));
        assert!(!is_valid_phone("+12345"));
    }

    #[test]
    fn percent_range_is_inclusive() {
        assert!(Rule::PERCENT.check_number(0.0).is_ok());
        assert!(Rule::PERCENT.check_number(100.0).is_ok());
        assert!(Rule::PERCENT.check_number(150.0).is_err());
        assert!(Rule::PERCENT.check_number(-1.0).is_err());
    }

    #[test]
    fn currency_rule_checks_sign_bound_and_precision() {
        let rule = Rule::Currency { max: 1000.0 };
        assert!(rule.check_number(999.99).is_ok());
        assert!(rule.check_number(-5.0).is_err());
        assert!(rule.check_number(1000.01).is_err());
        assert!(rule.check_number(10.005).is_err());
    }

    #[test]
    fn empty_optional_text_only_fails_required() {
        assert!(Rule::Email.check_str("").is_ok());
        assert!(Rule::Required.check_str("  ").is_err());
    }

    #[test]
    fn validator_reports_one_error_per_field() {
        let result = Validator::new()
            .text("name", "", &[Rule::Required, Rule::MinLength(2)])
            .text("email", "a..b@x.com", &[Rule::Email])
            .number("probability", 150.0, &[Rule::PERCENT])
            .finish();
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.for_field("name"), Some("This field is required"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("probability"));
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let err = Rule::OneOf(&["en", "ar"]).check_str("fr").unwrap_err();
        assert_eq!(err, "Must be one of: en, ar");
    }
}
