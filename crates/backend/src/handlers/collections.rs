use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use contracts::domain::a012_audit_log::aggregate::AuditEntry;
use contracts::shared::table::{export_filename, ExportFormat, ListParams, PageResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{a012_audit_log, find_collection};
use crate::shared::config;
use crate::shared::data::db::get_connection;
use crate::shared::data::record_store;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::export::{self, ExportTable};
use crate::shared::records::write_service::{self, DEFAULT_ACTOR};
use crate::shared::records::{Collection, Record};

pub const ACTOR_HEADER: &str = "x-actor";

fn collection(segment: &str) -> ApiResult<&'static Collection> {
    find_collection(segment).ok_or_else(|| ApiError::not_found(format!("collection '{}'", segment)))
}

/// Operator name from `X-Actor`, `system` when absent
pub fn actor(headers: &HeaderMap) -> String {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_ACTOR)
        .to_string()
}

fn object(body: Value) -> ApiResult<Record> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("request body must be a JSON object")),
    }
}

/// One page of live rows for a list request
pub async fn query_page(
    db: &DatabaseConnection,
    collection: &Collection,
    params: ListParams,
    default_page_size: usize,
) -> ApiResult<PageResponse<Value>> {
    let query = params.into_query(default_page_size)?;
    Ok(record_store::list_page(db, collection.table, &query).await?)
}

/// GET /api/:collection
pub async fn list(
    Path(segment): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<Value>>> {
    let collection = collection(&segment)?;
    let settings = config::table_settings();
    let page = query_page(get_connection(), collection, params, settings.default_page_size).await?;
    Ok(Json(page))
}

/// GET /api/:collection/:id
pub async fn get_by_id(Path((segment, id)): Path<(String, String)>) -> ApiResult<Json<Record>> {
    let collection = collection(&segment)?;
    let record = write_service::load_live(get_connection(), collection, &id).await?;
    Ok(Json(record))
}

/// POST /api/:collection
pub async fn create(
    Path(segment): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let collection = collection(&segment)?;
    let record = write_service::create(get_connection(), collection, &body, &actor(&headers)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/:collection/:id
///
/// A `version` key in the body is the version the client last read.
pub async fn patch(
    Path((segment, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<Record>> {
    let collection = collection(&segment)?;
    let mut patch = object(body)?;
    let expected_version = match patch.remove("version") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| ApiError::bad_request("version must be an integer"))?,
        ),
    };
    let record = write_service::update(
        get_connection(),
        collection,
        &id,
        &patch,
        expected_version,
        &actor(&headers),
    )
    .await?;
    Ok(Json(record))
}

/// DELETE /api/:collection/:id (soft delete)
pub async fn delete(
    Path((segment, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<Record>> {
    let collection = collection(&segment)?;
    let record = write_service::soft_delete(get_connection(), collection, &id, &actor(&headers)).await?;
    Ok(Json(record))
}

/// POST /api/:collection/:id/restore
pub async fn restore(
    Path((segment, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<Record>> {
    let collection = collection(&segment)?;
    let record = write_service::restore(get_connection(), collection, &id, &actor(&headers)).await?;
    Ok(Json(record))
}

/// GET /api/:collection/:id/audit
pub async fn audit(Path((segment, id)): Path<(String, String)>) -> ApiResult<Json<Vec<AuditEntry>>> {
    let collection = collection(&segment)?;
    let db = get_connection();
    write_service::load(db, collection, &id).await?;
    let history = a012_audit_log::repository::list_for_entity(db, collection.entity_type(), &id).await?;
    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// Rendered export file: bytes plus the suggested file name
#[derive(Debug)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub async fn build_export(
    db: &DatabaseConnection,
    collection: &Collection,
    params: ListParams,
    format: ExportFormat,
) -> ApiResult<ExportFile> {
    let settings = config::table_settings();
    let query = params.into_query(settings.default_page_size)?;
    let columns: Vec<String> = if query.columns.is_empty() {
        collection.table.default_export_keys()
    } else {
        query.columns.clone()
    };
    if let Some(unknown) = columns.iter().find(|c| collection.table.field(c).is_none()) {
        return Err(ApiError::bad_request(format!("unknown column '{}'", unknown)));
    }

    let rows = record_store::export_rows(db, collection.table, &query, settings.export_row_limit).await?;
    let table = ExportTable {
        title: collection.path,
        columns: &columns,
        rows: &rows,
    };
    let bytes = export::render(format, &table)?;
    tracing::info!(
        "Exported {} {} rows as {}",
        rows.len(),
        collection.path,
        format.as_str()
    );
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    Ok(ExportFile {
        format,
        filename: export_filename(format, &timestamp),
        bytes,
    })
}

/// GET /api/:collection/export?format=csv|pdf&search&sorts&filters&columns
pub async fn export(
    Path(segment): Path<String>,
    Query(params): Query<ListParams>,
    Query(export): Query<ExportParams>,
) -> ApiResult<Response> {
    let collection = collection(&segment)?;
    let raw_format = export.format.unwrap_or_else(|| "csv".to_string());
    let format = ExportFormat::parse(&raw_format)
        .ok_or_else(|| ApiError::bad_request(format!("unsupported export format '{}'", raw_format)))?;
    let file = build_export(get_connection(), collection, params, format).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.format.mime().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory;
    use serde_json::json;

    async fn seed_contacts(db: &DatabaseConnection, count: usize) {
        let contacts = find_collection("contacts").unwrap();
        for i in 0..count {
            let payload = json!({
                "firstName": format!("Contact{:02}", i),
                "lastName": "Haddad",
                "email": format!("contact{:02}@example.com", i),
            });
            write_service::create(db, contacts, &payload, DEFAULT_ACTOR)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn thirty_contacts_fill_two_pages() {
        let db = memory().await;
        seed_contacts(&db, 30).await;
        let contacts = find_collection("contacts").unwrap();

        let params = ListParams {
            sorts: Some(r#"[{"field":"createdAt","direction":"desc"}]"#.into()),
            ..Default::default()
        };
        let first = query_page(&db, contacts, params.clone(), 25).await.unwrap();
        assert_eq!(first.data.len(), 25);
        assert_eq!(first.pagination.total, 30);
        assert_eq!(first.pagination.total_pages, 2);

        let second = query_page(
            &db,
            contacts,
            ListParams {
                page: Some(2),
                ..params
            },
            25,
        )
        .await
        .unwrap();
        assert_eq!(second.data.len(), 5);

        let mut ids: Vec<&Value> = first.data.iter().chain(&second.data).map(|r| &r["id"]).collect();
        ids.sort_by_key(|v| v.as_str().unwrap_or_default().to_string());
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }

    #[tokio::test]
    async fn bad_sort_json_is_a_bad_request() {
        let db = memory().await;
        let contacts = find_collection("contacts").unwrap();
        let params = ListParams {
            sorts: Some("not json".into()),
            ..Default::default()
        };
        let err = query_page(&db, contacts, params, 25).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_page_is_a_bad_request() {
        let db = memory().await;
        seed_contacts(&db, 2).await;
        let contacts = find_collection("contacts").unwrap();
        let params = ListParams {
            page: Some(1_000_000_000_000_000_000),
            ..Default::default()
        };
        let err = query_page(&db, contacts, params, 25).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let params = ListParams {
            page: Some(contracts::shared::table::MAX_PAGE),
            ..Default::default()
        };
        let page = query_page(&db, contacts, params, 25).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn export_honours_search_and_columns() {
        let db = memory().await;
        seed_contacts(&db, 3).await;
        let contacts = find_collection("contacts").unwrap();
        let params = ListParams {
            search: Some("contact01".into()),
            columns: Some(r#"["firstName","email"]"#.into()),
            ..Default::default()
        };
        let file = build_export(&db, contacts, params, ExportFormat::Csv).await.unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines, vec!["firstName,email", "Contact01,contact01@example.com"]);
        assert!(file.filename.starts_with("export-"));
        assert!(file.filename.ends_with(".csv"));
    }

    #[tokio::test]
    async fn export_rejects_unknown_columns() {
        let db = memory().await;
        let contacts = find_collection("contacts").unwrap();
        let params = ListParams {
            columns: Some(r#"["password"]"#.into()),
            ..Default::default()
        };
        let err = build_export(&db, contacts, params, ExportFormat::Pdf).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn actor_falls_back_to_system() {
        let mut headers = HeaderMap::new();
        assert_eq!(actor(&headers), "system");
        headers.insert(ACTOR_HEADER, "sara".parse().unwrap());
        assert_eq!(actor(&headers), "sara");
    }
}
