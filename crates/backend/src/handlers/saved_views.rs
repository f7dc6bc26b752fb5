use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::shared::table::{SaveViewRequest, SavedView};
use serde::Deserialize;

use crate::shared::data::db::get_connection;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::saved_views;

#[derive(Debug, Deserialize)]
pub struct ViewsQuery {
    pub endpoint: String,
}

/// GET /api/saved-views?endpoint=/api/contacts
pub async fn list(Query(query): Query<ViewsQuery>) -> ApiResult<Json<Vec<SavedView>>> {
    let views = saved_views::list(get_connection(), &query.endpoint).await?;
    Ok(Json(views))
}

/// POST /api/saved-views
pub async fn save(Json(request): Json<SaveViewRequest>) -> ApiResult<(StatusCode, Json<SavedView>)> {
    request.validate()?;
    let view = saved_views::save(get_connection(), &request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// DELETE /api/saved-views/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<StatusCode> {
    if saved_views::delete(get_connection(), &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("saved view {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::table::SortSpec;

    #[tokio::test]
    async fn page_size_off_the_pager_is_a_field_error() {
        let request = SaveViewRequest {
            name: "Recent".into(),
            columns: vec!["name".into(), "email".into()],
            sorts: vec![SortSpec::desc("createdAt")],
            filters: vec![],
            page_size: 30,
            endpoint: "/api/contacts".into(),
        };
        let err = save(Json(request)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.has_field("pageSize"));
                assert!(!errors.has_field("endpoint"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
