use super::query::{FilterSpec, SortSpec, PAGE_SIZES};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub const SAVED_VIEWS_ENDPOINT: &str = "/api/saved-views";

/// Named snapshot of columns, sorts, filters and page size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub columns: Vec<String>,
    pub sorts: Vec<SortSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    pub page_size: usize,
}

/// Body of `POST /api/saved-views`. Saving an existing name for the same
/// endpoint replaces that view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveViewRequest {
    pub name: String,
    pub columns: Vec<String>,
    pub sorts: Vec<SortSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    pub page_size: usize,
    pub endpoint: String,
}

impl SaveViewRequest {
    /// Errors are keyed by the wire field names: `name`, `endpoint`, `pageSize`
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let sizes = PAGE_SIZES
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Validator::new()
            .text("name", &self.name, &[Rule::Required, Rule::MaxLength(100)])
            .text("endpoint", &self.endpoint, &[Rule::Required])
            .check(
                "pageSize",
                PAGE_SIZES.contains(&self.page_size),
                &format!("Page size must be one of: {}", sizes),
            )
            .finish()
    }
}
