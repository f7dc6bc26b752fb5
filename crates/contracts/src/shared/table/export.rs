use super::query::{encode_pairs, join_url, TableQuery};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

/// `{endpoint}/export?format=..` carrying the current search, sorts, filters
/// and visible columns but no paging
pub fn export_url(endpoint: &str, format: ExportFormat, query: &TableQuery) -> String {
    let mut pairs = vec![("format", format.as_str().to_string())];
    pairs.extend(query.filter_pairs());
    join_url(&format!("{}/export", endpoint.trim_end_matches('/')), &encode_pairs(&pairs))
}

/// `export-<timestamp>.<ext>`
pub fn export_filename(format: ExportFormat, timestamp: &str) -> String {
    format!("export-{}.{}", timestamp, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::table::query::SortSpec;

    #[test]
    fn export_url_drops_paging() {
        let query = TableQuery {
            page: 3,
            search: "acme".into(),
            sorts: vec![SortSpec::asc("name")],
            ..TableQuery::default()
        };
        let url = export_url("/api/contacts", ExportFormat::Csv, &query);
        assert!(url.starts_with("/api/contacts/export?format=csv&"));
        assert!(url.contains("search=acme"));
        assert!(!url.contains("page="));
        assert!(!url.contains("pageSize="));
    }

    #[test]
    fn filename_and_parse() {
        assert_eq!(
            export_filename(ExportFormat::Pdf, "20240101-120000"),
            "export-20240101-120000.pdf"
        );
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }
}
