//! Row-level access to the CRM tables described by an [`EntityTable`]
//!
//! Records travel as camelCase JSON objects; the field map decides the
//! column and SQL type of every key. All functions accept any connection or
//! transaction.

use super::entity_table::{EntityTable, FieldDef};
use super::list_query::{ListQueryBuilder, QueryParam, QueryResult};
use super::row_codec::{insert_values, read_row, to_sql_value};
use contracts::shared::table::{PageResponse, TableQuery};
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

#[derive(Debug, FromQueryResult)]
struct CountResult {
    count: i64,
}

fn build_statement(query: QueryResult) -> Statement {
    let values: Vec<sea_orm::Value> = query.params.into_iter().map(Into::into).collect();
    Statement::from_sql_and_values(DatabaseBackend::Sqlite, query.sql, values)
}

async fn count<C: ConnectionTrait>(conn: &C, stmt: Statement) -> Result<u64, sea_orm::DbErr> {
    let result = CountResult::find_by_statement(stmt).one(conn).await?;
    Ok(result.map(|r| r.count.max(0) as u64).unwrap_or(0))
}

/// Fetch one row by id, soft-deleted or not
pub async fn find<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    id: &str,
) -> Result<Option<Record>, sea_orm::DbErr> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?",
        table.column_list(),
        table.table
    );
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            sql,
            vec![id.into()],
        ))
        .await?;
    Ok(row.map(|r| read_row(table, &r)))
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    record: &Record,
) -> Result<(), sea_orm::DbErr> {
    let placeholders = vec!["?"; table.all_fields().count()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.table,
        table.column_list(),
        placeholders
    );
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        sql,
        insert_values(table, record),
    ))
    .await?;
    Ok(())
}

/// Overwrite every column except `id` and `created_at`, only while the stored
/// version is still `expected_version`. Returns false when another write got
/// there first.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    record: &Record,
    expected_version: i64,
) -> Result<bool, sea_orm::DbErr> {
    let id = record.get("id").and_then(Value::as_str).unwrap_or_default();
    let fields: Vec<&FieldDef> = table
        .all_fields()
        .filter(|f| f.key != "id" && f.key != "createdAt")
        .collect();
    let assignments: Vec<String> = fields.iter().map(|f| format!("{} = ?", f.column)).collect();
    let mut values: Vec<sea_orm::Value> = fields
        .iter()
        .map(|f| to_sql_value(f, record.get(f.key)))
        .collect();
    values.push(id.into());
    values.push(expected_version.into());

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ? AND version = ?",
        table.table,
        assignments.join(", ")
    );
    let result = conn
        .execute(Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values))
        .await?;
    Ok(result.rows_affected() > 0)
}

/// One page of live rows plus pagination totals
pub async fn list_page<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    query: &TableQuery,
) -> Result<PageResponse<Value>, ListError> {
    let builder = ListQueryBuilder::new(table, query);
    let count_query = builder.build_count().map_err(ListError::Query)?;
    let page_query = builder.build_page().map_err(ListError::Query)?;

    let total = count(conn, build_statement(count_query)).await?;
    let rows = conn.query_all(build_statement(page_query)).await?;
    let data = rows
        .iter()
        .map(|r| Value::Object(read_row(table, r)))
        .collect();
    Ok(PageResponse::new(data, total as usize, query.page_size))
}

/// Every live row matching the query, up to `limit`
pub async fn export_rows<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    query: &TableQuery,
    limit: usize,
) -> Result<Vec<Record>, ListError> {
    let export_query = ListQueryBuilder::new(table, query)
        .build_export(limit)
        .map_err(ListError::Query)?;
    let rows = conn.query_all(build_statement(export_query)).await?;
    Ok(rows.iter().map(|r| read_row(table, r)).collect())
}

/// Whether a live row with this id exists
pub async fn exists<C: ConnectionTrait>(
    conn: &C,
    table_name: &str,
    id: &str,
) -> Result<bool, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        format!(
            "SELECT COUNT(*) AS count FROM {} WHERE id = ? AND deleted_at IS NULL",
            table_name
        ),
        vec![id.into()],
    );
    Ok(count(conn, stmt).await? > 0)
}

/// Live rows other than `record` sharing its values for `keys`
pub async fn count_duplicates<C: ConnectionTrait>(
    conn: &C,
    table: &EntityTable,
    record: &Record,
    keys: &[&str],
) -> Result<u64, sea_orm::DbErr> {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    for key in keys {
        let Some(field) = table.field(key) else {
            continue;
        };
        match record.get(field.key).filter(|v| !v.is_null()) {
            Some(value) => {
                conditions.push(format!("{} = ?", field.column));
                values.push(to_sql_value(field, Some(value)));
            }
            // NULL never collides
            None => return Ok(0),
        }
    }
    if conditions.is_empty() {
        return Ok(0);
    }
    let id = record.get("id").and_then(Value::as_str).unwrap_or_default();
    values.push(id.into());
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {} AND id <> ? AND deleted_at IS NULL",
            table.table,
            conditions.join(" AND ")
        ),
        values,
    );
    count(conn, stmt).await
}

/// Failure of a list or export query
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("{0}")]
    Query(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl From<ListError> for crate::shared::error::ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Query(message) => Self::BadRequest(message),
            ListError::Db(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a004_contact::repository::TABLE;
    use crate::shared::data::db::memory;
    use contracts::shared::table::{FilterOperator, FilterSpec, SortSpec};
    use serde_json::json;

    fn contact(id: &str, first: &str, created_at: &str) -> Record {
        json!({
            "id": id,
            "createdAt": created_at,
            "updatedAt": created_at,
            "deletedAt": null,
            "version": 1,
            "firstName": first,
            "lastName": "Haddad",
            "email": format!("{}@example.com", first.to_lowercase()),
            "phones": ["+971501234567"],
            "isPrimary": true,
            "emailOptIn": false,
            "smsOptIn": false,
            "whatsappOptIn": false,
            "preferredLanguage": "ar"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_find_normalizes_columns() {
        let conn = memory().await;
        let record = contact("c-1", "Lina", "2025-01-05T09:30:00Z");
        insert(&conn, &TABLE, &record).await.unwrap();

        let stored = find(&conn, &TABLE, "c-1").await.unwrap().unwrap();
        assert_eq!(stored["createdAt"], json!("2025-01-05T09:30:00.000000Z"));
        assert_eq!(stored["phones"], json!(["+971501234567"]));
        assert_eq!(stored["isPrimary"], json!(true));
        assert_eq!(stored["version"], json!(1));
        assert_eq!(stored["jobTitle"], Value::Null);
        assert!(find(&conn, &TABLE, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_checks_the_stored_version() {
        let conn = memory().await;
        let mut record = contact("c-1", "Lina", "2025-01-05T09:30:00Z");
        insert(&conn, &TABLE, &record).await.unwrap();

        record.insert("version".into(), json!(2));
        record.insert("jobTitle".into(), json!("CTO"));
        assert!(update(&conn, &TABLE, &record, 1).await.unwrap());
        assert!(!update(&conn, &TABLE, &record, 1).await.unwrap());

        let stored = find(&conn, &TABLE, "c-1").await.unwrap().unwrap();
        assert_eq!(stored["jobTitle"], json!("CTO"));
        assert_eq!(stored["version"], json!(2));
    }

    #[tokio::test]
    async fn list_page_filters_sorts_and_skips_deleted() {
        let conn = memory().await;
        insert(&conn, &TABLE, &contact("c-1", "Lina", "2025-01-01T00:00:00Z")).await.unwrap();
        insert(&conn, &TABLE, &contact("c-2", "Omar", "2025-01-02T00:00:00Z")).await.unwrap();
        let mut gone = contact("c-3", "Sami", "2025-01-03T00:00:00Z");
        gone.insert("deletedAt".into(), json!("2025-02-01T00:00:00Z"));
        insert(&conn, &TABLE, &gone).await.unwrap();

        let query = TableQuery::default();
        let page = list_page(&conn, &TABLE, &query).await.unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.data[0]["id"], json!("c-2"));

        let query = TableQuery {
            sorts: vec![SortSpec::asc("firstName")],
            filters: vec![FilterSpec::new("email", FilterOperator::Contains, json!("lina"))],
            ..Default::default()
        };
        let page = list_page(&conn, &TABLE, &query).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.data[0]["firstName"], json!("Lina"));
    }

    #[tokio::test]
    async fn unknown_sort_field_is_a_query_error() {
        let conn = memory().await;
        let query = TableQuery {
            sorts: vec![SortSpec::asc("password")],
            ..Default::default()
        };
        let err = list_page(&conn, &TABLE, &query).await.unwrap_err();
        assert!(matches!(err, ListError::Query(_)));
    }

    #[tokio::test]
    async fn duplicates_ignore_the_record_itself() {
        let conn = memory().await;
        let record = contact("c-1", "Lina", "2025-01-05T09:30:00Z");
        insert(&conn, &TABLE, &record).await.unwrap();
        assert_eq!(count_duplicates(&conn, &TABLE, &record, &["email"]).await.unwrap(), 0);

        let twin = contact("c-2", "Lina", "2025-01-06T09:30:00Z");
        assert_eq!(count_duplicates(&conn, &TABLE, &twin, &["email"]).await.unwrap(), 1);
        assert!(exists(&conn, "contacts", "c-1").await.unwrap());
        assert!(!exists(&conn, "contacts", "c-2").await.unwrap());
    }
}
