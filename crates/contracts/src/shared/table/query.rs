use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page sizes offered by the pager
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Highest page number a list request may ask for
pub const MAX_PAGE: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Contains,
    Gt,
    Lt,
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Contains => "contains",
            FilterOperator::Gt => "gt",
            FilterOperator::Lt => "lt",
            FilterOperator::In => "in",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterSpec {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Snap an arbitrary size onto the allowed set: the smallest allowed size
/// that fits it, capped at the largest
pub fn normalize_page_size(size: usize) -> usize {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|&allowed| size <= allowed)
        .unwrap_or(PAGE_SIZES[PAGE_SIZES.len() - 1])
}

/// One list request: everything the server needs to produce a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub sorts: Vec<SortSpec>,
    pub filters: Vec<FilterSpec>,
    pub columns: Vec<String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sorts: Vec::new(),
            filters: Vec::new(),
            columns: Vec::new(),
        }
    }
}

impl TableQuery {
    /// Rows skipped before this page; saturates instead of overflowing
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Parameters shared by the list and export requests (no paging)
    pub fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("sorts", to_json(&self.sorts)),
            ("filters", to_json(&self.filters)),
            ("columns", to_json(&self.columns)),
        ]
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        pairs.extend(self.filter_pairs());
        pairs
    }

    /// `page=1&pageSize=25&search=&sorts=%5B...%5D&filters=%5B%5D&columns=%5B...%5D`
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.query_pairs())
    }

    pub fn url(&self, endpoint: &str) -> String {
        join_url(endpoint, &self.to_query_string())
    }

    /// Identity of the request; equal keys mean interchangeable responses
    pub fn cache_key(&self) -> String {
        self.to_query_string()
    }
}

pub(crate) fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn join_url(endpoint: &str, query: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}{}", endpoint, separator, query)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Error raised while decoding raw list parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamError {
    pub param: &'static str,
    pub message: String,
}

impl std::fmt::Display for QueryParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid '{}' parameter: {}", self.param, self.message)
    }
}

impl std::error::Error for QueryParamError {}

/// List parameters exactly as they arrive on the query string; the
/// structured ones are JSON encoded
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
    pub sorts: Option<String>,
    pub filters: Option<String>,
    pub columns: Option<String>,
}

impl ListParams {
    pub fn into_query(self, default_page_size: usize) -> Result<TableQuery, QueryParamError> {
        let page = self.page.unwrap_or(1).max(1);
        if page > MAX_PAGE {
            return Err(QueryParamError {
                param: "page",
                message: format!("must not exceed {}", MAX_PAGE),
            });
        }
        Ok(TableQuery {
            page,
            page_size: normalize_page_size(self.page_size.unwrap_or(default_page_size)),
            search: self.search.unwrap_or_default().trim().to_string(),
            sorts: parse_json_param("sorts", self.sorts.as_deref())?,
            filters: parse_json_param("filters", self.filters.as_deref())?,
            columns: parse_json_param("columns", self.columns.as_deref())?,
        })
    }
}

fn parse_json_param<T: serde::de::DeserializeOwned>(
    param: &'static str,
    raw: Option<&str>,
) -> Result<Vec<T>, QueryParamError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| QueryParamError {
            param,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_string_carries_json_params() {
        let query = TableQuery {
            page: 2,
            page_size: 25,
            search: "acme corp".into(),
            sorts: vec![SortSpec::desc("createdAt")],
            filters: vec![FilterSpec::new("status", FilterOperator::In, json!(["open", "pending"]))],
            columns: vec!["name".into(), "email".into()],
        };
        let qs = query.to_query_string();
        assert!(qs.starts_with("page=2&pageSize=25&search=acme%20corp&sorts="));
        let decoded = urlencoding::decode(&qs).unwrap();
        assert!(decoded.contains(r#"sorts=[{"field":"createdAt","direction":"desc"}]"#));
        assert!(decoded.contains(r#"filters=[{"field":"status","operator":"in","value":["open","pending"]}]"#));
        assert!(decoded.contains(r#"columns=["name","email"]"#));
    }

    #[test]
    fn url_appends_to_existing_query() {
        let query = TableQuery::default();
        assert!(query.url("/api/contacts").starts_with("/api/contacts?page=1"));
        assert!(query.url("/api/contacts?tenant=a").starts_with("/api/contacts?tenant=a&page=1"));
    }

    #[test]
    fn list_params_decode_into_query() {
        let params = ListParams {
            page: Some(0),
            page_size: Some(30),
            search: Some("  rami ".into()),
            sorts: Some(r#"[{"field":"name","direction":"asc"}]"#.into()),
            filters: Some(r#"[{"field":"score","operator":"gt","value":50}]"#.into()),
            columns: None,
        };
        let query = params.into_query(DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 50);
        assert_eq!(query.search, "rami");
        assert_eq!(query.sorts, vec![SortSpec::asc("name")]);
        assert_eq!(query.filters[0].operator, FilterOperator::Gt);
        assert!(query.columns.is_empty());
    }

    #[test]
    fn malformed_json_param_is_an_error() {
        let params = ListParams {
            sorts: Some("[{".into()),
            ..Default::default()
        };
        let err = params.into_query(DEFAULT_PAGE_SIZE).unwrap_err();
        assert_eq!(err.param, "sorts");
    }

    #[test]
    fn page_size_snaps_to_allowed_set() {
        assert_eq!(normalize_page_size(1), 10);
        assert_eq!(normalize_page_size(25), 25);
        assert_eq!(normalize_page_size(26), 50);
        assert_eq!(normalize_page_size(5000), 100);
    }

    #[test]
    fn offset_is_zero_based() {
        let query = TableQuery {
            page: 3,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn huge_page_is_rejected_and_offset_never_overflows() {
        let params = ListParams {
            page: Some(1_000_000_000_000_000_000),
            ..Default::default()
        };
        let err = params.into_query(DEFAULT_PAGE_SIZE).unwrap_err();
        assert_eq!(err.param, "page");

        let last = ListParams {
            page: Some(MAX_PAGE),
            page_size: Some(100),
            ..Default::default()
        };
        assert_eq!(last.into_query(DEFAULT_PAGE_SIZE).unwrap().offset(), 99_999_900);

        let query = TableQuery {
            page: usize::MAX,
            page_size: 100,
            ..Default::default()
        };
        assert_eq!(query.offset(), usize::MAX);
    }
}
