//! Named table layouts, stored per list endpoint

use chrono::Utc;
use contracts::shared::table::{FilterSpec, SaveViewRequest, SavedView, SortSpec};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryOrder, Set};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::shared::data::row_codec::format_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "saved_views")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub endpoint: String,
    pub name: String,
    pub columns: String,
    pub sorts: String,
    pub filters: String,
    pub page_size: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_list<T: DeserializeOwned>(raw: &str, column: &str, id: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("saved view {} has unreadable {}: {}", id, column, e);
        Vec::new()
    })
}

impl From<Model> for SavedView {
    fn from(m: Model) -> Self {
        let columns: Vec<String> = parse_list(&m.columns, "columns", &m.id);
        let sorts: Vec<SortSpec> = parse_list(&m.sorts, "sorts", &m.id);
        let filters: Vec<FilterSpec> = parse_list(&m.filters, "filters", &m.id);
        SavedView {
            id: m.id,
            name: m.name,
            columns,
            sorts,
            filters,
            page_size: m.page_size.max(0) as usize,
        }
    }
}

/// Views of one endpoint, ordered by name
pub async fn list<C: ConnectionTrait>(conn: &C, endpoint: &str) -> Result<Vec<SavedView>, DbErr> {
    let items = Entity::find()
        .filter(Column::Endpoint.eq(endpoint))
        .order_by_asc(Column::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Insert a view, or replace the one with the same endpoint and name
pub async fn save<C: ConnectionTrait>(
    conn: &C,
    request: &SaveViewRequest,
) -> anyhow::Result<SavedView> {
    let name = request.name.trim().to_string();
    let now = format_timestamp(Utc::now());
    let columns = serde_json::to_string(&request.columns)?;
    let sorts = serde_json::to_string(&request.sorts)?;
    let filters = serde_json::to_string(&request.filters)?;
    let page_size = i64::try_from(request.page_size)?;

    let existing = Entity::find()
        .filter(Column::Endpoint.eq(request.endpoint.as_str()))
        .filter(Column::Name.eq(name.as_str()))
        .one(conn)
        .await?;

    let model = match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.columns = Set(columns);
            active.sorts = Set(sorts);
            active.filters = Set(filters);
            active.page_size = Set(page_size);
            active.updated_at = Set(now);
            active.update(conn).await?
        }
        None => {
            let active = ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                endpoint: Set(request.endpoint.clone()),
                name: Set(name),
                columns: Set(columns),
                sorts: Set(sorts),
                filters: Set(filters),
                page_size: Set(page_size),
                created_at: Set(now.clone()),
                updated_at: Set(now),
            };
            active.insert(conn).await?
        }
    };
    tracing::info!("Saved view '{}' for {}", model.name, model.endpoint);
    Ok(model.into())
}

/// Returns false when no view has this id
pub async fn delete<C: ConnectionTrait>(conn: &C, id: &str) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory;
    use contracts::shared::table::{FilterOperator, SortSpec};
    use serde_json::json;

    fn request(name: &str, page_size: usize) -> SaveViewRequest {
        SaveViewRequest {
            name: name.into(),
            columns: vec!["name".into(), "email".into()],
            sorts: vec![SortSpec::desc("createdAt")],
            filters: vec![FilterSpec::new("status", FilterOperator::Eq, json!("open"))],
            page_size,
            endpoint: "/api/contacts".into(),
        }
    }

    #[tokio::test]
    async fn saved_view_reads_back_unchanged() {
        let conn = memory().await;
        let saved = save(&conn, &request("Mine", 50)).await.unwrap();

        let views = list(&conn, "/api/contacts").await.unwrap();
        assert_eq!(views, vec![saved.clone()]);
        assert_eq!(saved.columns, vec!["name", "email"]);
        assert_eq!(saved.sorts, vec![SortSpec::desc("createdAt")]);
        assert_eq!(saved.page_size, 50);
        assert!(list(&conn, "/api/deals").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_name_replaces_the_view() {
        let conn = memory().await;
        let first = save(&conn, &request("Mine", 25)).await.unwrap();
        let second = save(&conn, &request("Mine", 100)).await.unwrap();
        save(&conn, &request("Another", 10)).await.unwrap();

        assert_eq!(first.id, second.id);
        let views = list(&conn, "/api/contacts").await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "Another");
        assert_eq!(views[1].page_size, 100);
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() {
        let conn = memory().await;
        let saved = save(&conn, &request("Mine", 25)).await.unwrap();
        assert!(delete(&conn, &saved.id).await.unwrap());
        assert!(!delete(&conn, &saved.id).await.unwrap());
    }
}
