use super::query::{normalize_page_size, SortSpec, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Static description of one grid column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Initial visibility
    pub visible: bool,
    pub width: Option<u32>,
    /// Right-align numeric columns
    #[serde(default)]
    pub numeric: bool,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            visible: true,
            width: None,
            numeric: false,
        }
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn width(mut self, px: u32) -> Self {
        self.width = Some(px);
        self
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFeatures {
    pub enable_export: bool,
    pub enable_saved_views: bool,
    pub enable_column_toggle: bool,
}

impl Default for TableFeatures {
    fn default() -> Self {
        Self {
            enable_export: true,
            enable_saved_views: true,
            enable_column_toggle: true,
        }
    }
}

/// Construction inputs of a table: endpoint, cache identity, columns, defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub endpoint: String,
    pub query_key: Vec<String>,
    pub columns: Vec<ColumnDef>,
    pub default_page_size: usize,
    pub default_sort: Vec<SortSpec>,
    pub features: TableFeatures,
}

impl TableConfig {
    pub fn new(endpoint: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let endpoint = endpoint.into();
        Self {
            query_key: vec![endpoint.clone()],
            endpoint,
            columns,
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sort: Vec::new(),
            features: TableFeatures::default(),
        }
    }

    pub fn with_query_key(mut self, key: Vec<String>) -> Self {
        self.query_key = key;
        self
    }

    pub fn with_default_sort(mut self, sorts: Vec<SortSpec>) -> Self {
        self.default_sort = sorts;
        self
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.default_page_size = normalize_page_size(size);
        self
    }

    pub fn with_features(mut self, features: TableFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = TableConfig::new(
            "/api/contacts",
            vec![
                ColumnDef::new("name", "Name"),
                ColumnDef::new("notes", "Notes").not_sortable().hidden(),
            ],
        )
        .with_page_size(30);
        assert_eq!(config.query_key, vec!["/api/contacts".to_string()]);
        assert_eq!(config.default_page_size, 50);
        assert!(config.column("name").unwrap().sortable);
        assert!(!config.column("notes").unwrap().visible);
        assert!(config.features.enable_export);
    }
}
