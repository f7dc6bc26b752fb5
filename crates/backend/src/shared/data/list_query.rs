use super::entity_table::{EntityTable, FieldDef, FieldType};
use super::row_codec::normalize_timestamp;
use contracts::shared::table::{FilterOperator, FilterSpec, TableQuery};
use serde_json::Value;

/// SQL text plus its bound parameters
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Integer(i64),
    Numeric(f64),
    Bool(bool),
}

impl From<QueryParam> for sea_orm::Value {
    fn from(param: QueryParam) -> Self {
        match param {
            QueryParam::Text(s) => s.into(),
            QueryParam::Integer(n) => n.into(),
            QueryParam::Numeric(f) => f.into(),
            QueryParam::Bool(b) => b.into(),
        }
    }
}

/// Builds the list, count and export statements for one table from a
/// [`TableQuery`]. Field keys are resolved through the table's field map;
/// anything not declared there is rejected.
pub struct ListQueryBuilder<'a> {
    table: &'a EntityTable,
    query: &'a TableQuery,
}

impl<'a> ListQueryBuilder<'a> {
    pub fn new(table: &'a EntityTable, query: &'a TableQuery) -> Self {
        Self { table, query }
    }

    /// `SELECT COUNT(*) AS count ...` over the same filter as the page
    pub fn build_count(&self) -> Result<QueryResult, String> {
        let (where_clause, params) = self.build_where_clause()?;
        Ok(QueryResult {
            sql: format!(
                "SELECT COUNT(*) AS count FROM {} WHERE {}",
                self.table.table, where_clause
            ),
            params,
        })
    }

    /// One page of rows
    pub fn build_page(&self) -> Result<QueryResult, String> {
        let limit = to_sql_int("pageSize", self.query.page_size)?;
        let offset = to_sql_int("page", self.query.offset())?;
        self.build_select(limit, offset)
    }

    /// Every matching row up to `limit`, ignoring paging
    pub fn build_export(&self, limit: usize) -> Result<QueryResult, String> {
        self.build_select(to_sql_int("limit", limit)?, 0)
    }

    fn build_select(&self, limit: i64, offset: i64) -> Result<QueryResult, String> {
        let (where_clause, mut params) = self.build_where_clause()?;
        let order_by = self.build_order_by_clause()?;
        params.push(QueryParam::Integer(limit));
        params.push(QueryParam::Integer(offset));
        Ok(QueryResult {
            sql: format!(
                "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
                self.table.column_list(),
                self.table.table,
                where_clause,
                order_by
            ),
            params,
        })
    }

    fn build_where_clause(&self) -> Result<(String, Vec<QueryParam>), String> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut params = Vec::new();

        let search = self.query.search.trim();
        if !search.is_empty() {
            let columns: Vec<&str> = self
                .table
                .all_fields()
                .filter(|f| f.searchable)
                .map(|f| f.column)
                .collect();
            if !columns.is_empty() {
                let pattern = format!("%{}%", escape_like(search));
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{} LIKE ? ESCAPE '\\'", c))
                    .collect();
                conditions.push(format!("({})", parts.join(" OR ")));
                params.extend(columns.iter().map(|_| QueryParam::Text(pattern.clone())));
            }
        }

        for filter in &self.query.filters {
            let (condition, filter_params) = self.build_filter(filter)?;
            conditions.push(condition);
            params.extend(filter_params);
        }

        Ok((conditions.join(" AND "), params))
    }

    fn build_filter(&self, filter: &FilterSpec) -> Result<(String, Vec<QueryParam>), String> {
        let field = self
            .table
            .field(&filter.field)
            .filter(|f| f.filterable)
            .ok_or_else(|| format!("Field '{}' cannot be filtered", filter.field))?;
        let column = field.column;

        match filter.operator {
            FilterOperator::Eq => {
                let param = filter_param(field, &filter.value)?;
                Ok((format!("{} = ?", column), vec![param]))
            }
            FilterOperator::Gt | FilterOperator::Lt => {
                if field.field_type == FieldType::Bool {
                    return Err(format!("Field '{}' cannot be compared", field.key));
                }
                let op = if filter.operator == FilterOperator::Gt { ">" } else { "<" };
                let param = filter_param(field, &filter.value)?;
                Ok((format!("{} {} ?", column, op), vec![param]))
            }
            FilterOperator::Contains => {
                if !field.field_type.is_textual() {
                    return Err(format!("Field '{}' does not support 'contains'", field.key));
                }
                let text = match &filter.value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok((
                    format!("{} LIKE ? ESCAPE '\\'", column),
                    vec![QueryParam::Text(format!("%{}%", escape_like(&text)))],
                ))
            }
            FilterOperator::In => {
                let values = filter
                    .value
                    .as_array()
                    .ok_or_else(|| format!("Filter 'in' on '{}' expects an array", field.key))?;
                if values.is_empty() {
                    return Ok(("0 = 1".to_string(), Vec::new()));
                }
                let params = values
                    .iter()
                    .map(|v| filter_param(field, v))
                    .collect::<Result<Vec<_>, _>>()?;
                let placeholders = vec!["?"; params.len()].join(", ");
                Ok((format!("{} IN ({})", column, placeholders), params))
            }
        }
    }

    fn build_order_by_clause(&self) -> Result<String, String> {
        let mut parts = Vec::new();
        for sort in &self.query.sorts {
            let field = self
                .table
                .field(&sort.field)
                .filter(|f| f.sortable)
                .ok_or_else(|| format!("Field '{}' cannot be sorted", sort.field))?;
            parts.push(format!("{} {}", field.column, sort.direction.to_sql()));
        }
        if parts.is_empty() {
            parts.push("created_at DESC".to_string());
        }
        // Stable paging for rows with equal sort keys
        parts.push("id ASC".to_string());
        Ok(parts.join(", "))
    }
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Convert a filter operand to the parameter type of the column
fn filter_param(field: &FieldDef, value: &Value) -> Result<QueryParam, String> {
    let invalid = || format!("Invalid value for '{}'", field.key);
    match field.field_type {
        FieldType::Id | FieldType::Text | FieldType::Date => match value {
            Value::String(s) => Ok(QueryParam::Text(s.clone())),
            Value::Number(n) => Ok(QueryParam::Text(n.to_string())),
            _ => Err(invalid()),
        },
        FieldType::Timestamp => value
            .as_str()
            .map(|s| QueryParam::Text(normalize_timestamp(s)))
            .ok_or_else(invalid),
        FieldType::Integer => value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .map(QueryParam::Integer)
            .ok_or_else(invalid),
        FieldType::Numeric => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .filter(|f| f.is_finite())
            .map(QueryParam::Numeric)
            .ok_or_else(invalid),
        FieldType::Bool => match value {
            Value::Bool(b) => Ok(QueryParam::Bool(*b)),
            Value::String(s) if s == "true" => Ok(QueryParam::Bool(true)),
            Value::String(s) if s == "false" => Ok(QueryParam::Bool(false)),
            _ => Err(invalid()),
        },
        FieldType::Json => Err(invalid()),
    }
}

fn to_sql_int(param: &str, value: usize) -> Result<i64, String> {
    i64::try_from(value).map_err(|_| format!("'{}' is out of range", param))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::table::SortSpec;
    use serde_json::json;

    static PEOPLE: EntityTable = EntityTable {
        table: "people",
        entity_type: "person",
        fields: &[
            FieldDef::text("firstName", "first_name").searchable(),
            FieldDef::text("email", "email").searchable(),
            FieldDef::text("status", "status"),
            FieldDef::integer("score", "score"),
            FieldDef::boolean("isPrimary", "is_primary"),
            FieldDef::json("phones", "phones"),
        ],
        unique: &[],
        polymorphic: false,
    };

    fn query() -> TableQuery {
        TableQuery {
            page: 2,
            page_size: 25,
            ..Default::default()
        }
    }

    #[test]
    fn test_offset_beyond_sql_range_is_rejected() {
        let q = TableQuery {
            page: usize::MAX,
            page_size: 100,
            ..Default::default()
        };
        let err = ListQueryBuilder::new(&PEOPLE, &q).build_page().unwrap_err();
        assert!(err.contains("page"));
    }

    #[test]
    fn test_page_query_excludes_soft_deleted_rows() {
        let q = query();
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_page().unwrap();
        assert!(result.sql.contains("FROM people WHERE deleted_at IS NULL"));
        assert!(result.sql.contains("ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?"));
        assert_eq!(
            result.params,
            vec![QueryParam::Integer(25), QueryParam::Integer(25)]
        );
    }

    #[test]
    fn test_search_spans_searchable_columns() {
        let mut q = query();
        q.search = "50%_off".into();
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_count().unwrap();
        assert!(result
            .sql
            .contains("(first_name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')"));
        assert_eq!(result.params.len(), 2);
        assert_eq!(result.params[0], QueryParam::Text("%50\\%\\_off%".into()));
    }

    #[test]
    fn test_sorts_keep_click_order() {
        let mut q = query();
        q.sorts = vec![SortSpec::asc("status"), SortSpec::desc("score")];
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_page().unwrap();
        assert!(result.sql.contains("ORDER BY status ASC, score DESC, id ASC"));
    }

    #[test]
    fn test_unknown_or_structured_fields_are_rejected() {
        let mut q = query();
        q.sorts = vec![SortSpec::asc("password")];
        assert!(ListQueryBuilder::new(&PEOPLE, &q).build_page().is_err());

        let mut q = query();
        q.filters = vec![FilterSpec::new("phones", FilterOperator::Eq, json!("x"))];
        assert!(ListQueryBuilder::new(&PEOPLE, &q).build_count().is_err());
    }

    #[test]
    fn test_filter_operators() {
        let mut q = query();
        q.filters = vec![
            FilterSpec::new("status", FilterOperator::In, json!(["new", "contacted"])),
            FilterSpec::new("score", FilterOperator::Gt, json!(50)),
            FilterSpec::new("email", FilterOperator::Contains, json!("acme")),
            FilterSpec::new("isPrimary", FilterOperator::Eq, json!(true)),
        ];
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_count().unwrap();
        assert!(result.sql.contains("status IN (?, ?)"));
        assert!(result.sql.contains("score > ?"));
        assert!(result.sql.contains("email LIKE ? ESCAPE '\\'"));
        assert!(result.sql.contains("is_primary = ?"));
        assert_eq!(
            result.params,
            vec![
                QueryParam::Text("new".into()),
                QueryParam::Text("contacted".into()),
                QueryParam::Integer(50),
                QueryParam::Text("%acme%".into()),
                QueryParam::Bool(true),
            ]
        );
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let mut q = query();
        q.filters = vec![FilterSpec::new("status", FilterOperator::In, json!([]))];
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_count().unwrap();
        assert!(result.sql.ends_with("AND 0 = 1"));
    }

    #[test]
    fn test_contains_requires_text_column() {
        let mut q = query();
        q.filters = vec![FilterSpec::new("score", FilterOperator::Contains, json!("5"))];
        assert!(ListQueryBuilder::new(&PEOPLE, &q).build_count().is_err());
    }

    #[test]
    fn test_export_ignores_paging() {
        let q = query();
        let result = ListQueryBuilder::new(&PEOPLE, &q).build_export(10_000).unwrap();
        assert_eq!(
            result.params,
            vec![QueryParam::Integer(10_000), QueryParam::Integer(0)]
        );
    }
}
