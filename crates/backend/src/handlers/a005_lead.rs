use axum::extract::Path;
use axum::http::HeaderMap;
use axum::Json;

use super::collections::actor;
use crate::domain::a005_lead::service::{self, ConversionResult, ConvertLeadRequest};
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiResult;

/// POST /api/leads/:id/convert
pub async fn convert(
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ConvertLeadRequest>,
) -> ApiResult<Json<ConversionResult>> {
    let result = service::convert(get_connection(), &id, &request, &actor(&headers)).await?;
    Ok(Json(result))
}
