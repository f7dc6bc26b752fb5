//! HTTP calls behind the data grid
use contracts::shared::table::{
    PageResponse, SaveViewRequest, SavedView, TableQuery, ABORTED, SAVED_VIEWS_ENDPOINT,
};
use gloo_net::http::{Request, Response};
use serde_json::Value;
use web_sys::AbortSignal;

use crate::shared::api_utils::api_url;

/// Best readable message of a failed response: the `error` field, the first
/// validation message, or the status line
async fn error_message(response: Response, action: &str) -> String {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();
    let detail = body.as_ref().and_then(|b| {
        b.get("error")
            .and_then(Value::as_str)
            .or_else(|| b.pointer("/errors/0/message").and_then(Value::as_str))
            .map(str::to_string)
    });
    match detail {
        Some(detail) => format!("{}: {}", action, detail),
        None => format!("{}: HTTP {}", action, status),
    }
}

/// One page of rows for `query`
pub async fn fetch_page(
    endpoint: &str,
    query: &TableQuery,
    signal: Option<&AbortSignal>,
) -> Result<PageResponse<Value>, String> {
    let response = Request::get(&api_url(&query.url(endpoint)))
        .header("Accept", "application/json")
        .abort_signal(signal)
        .send()
        .await
        .map_err(|e| {
            if signal.is_some_and(|s| s.aborted()) {
                ABORTED.to_string()
            } else {
                format!("Failed to send request: {}", e)
            }
        })?;

    if !response.ok() {
        return Err(error_message(response, "Failed to load rows").await);
    }

    response
        .json::<PageResponse<Value>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Raw bytes of an export; `url` is an `/api/.../export?...` path
pub async fn download_export(url: &str) -> Result<Vec<u8>, String> {
    let response = Request::get(&api_url(url))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Export failed").await);
    }

    response
        .binary()
        .await
        .map_err(|e| format!("Failed to read export: {}", e))
}

fn views_url(endpoint: &str) -> String {
    format!(
        "{}?endpoint={}",
        SAVED_VIEWS_ENDPOINT,
        String::from(js_sys::encode_uri_component(endpoint))
    )
}

pub async fn fetch_views(endpoint: &str) -> Result<Vec<SavedView>, String> {
    let response = Request::get(&api_url(&views_url(endpoint)))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Failed to load views").await);
    }

    response
        .json::<Vec<SavedView>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn save_view(request: &SaveViewRequest) -> Result<SavedView, String> {
    request.validate().map_err(|e| e.to_string())?;
    let response = Request::post(&api_url(SAVED_VIEWS_ENDPOINT))
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Failed to save view").await);
    }

    response
        .json::<SavedView>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn delete_view(id: &str) -> Result<(), String> {
    let url = format!("{}/{}", SAVED_VIEWS_ENDPOINT, id);
    let response = Request::delete(&api_url(&url))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Failed to delete view").await);
    }
    Ok(())
}

/// Counts returned by the demo data seeder
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub accounts: usize,
    pub contacts: usize,
    pub deals: usize,
    pub tickets: usize,
}

pub async fn seed_demo_data() -> Result<SeedSummary, String> {
    let response = Request::post(&api_url("/api/dev/seed"))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Failed to seed demo data").await);
    }

    response
        .json::<SeedSummary>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
