use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Postal address, stored as a JSON column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country: String,
}

impl Address {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("line1", &self.line1, &[Rule::Required, Rule::MaxLength(200)])
            .text("city", &self.city, &[Rule::Required, Rule::MaxLength(100)])
            .optional_text("postalCode", self.postal_code.as_deref(), &[Rule::MaxLength(20)])
            .check(
                "country",
                self.country.len() == 2 && self.country.chars().all(|c| c.is_ascii_uppercase()),
                "Use a two-letter country code",
            );
        v.finish()
    }

    /// Single-line rendering for grids and exports
    pub fn one_line(&self) -> String {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.city.as_str()),
            self.region.as_deref(),
            self.postal_code.as_deref(),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
