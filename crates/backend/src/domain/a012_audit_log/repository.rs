use contracts::domain::a012_audit_log::aggregate::{AuditEntry, AuditEntryId, AuditOperation};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::data::row_codec::format_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub operation: String,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub actor: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_snapshot(raw: Option<String>) -> Option<Value> {
    raw.and_then(|text| serde_json::from_str(&text).ok())
}

impl From<Model> for AuditEntry {
    fn from(m: Model) -> Self {
        let created_at = chrono::DateTime::parse_from_rfc3339(&m.created_at)
            .map(|at| at.with_timezone(&chrono::Utc))
            .unwrap_or_default();
        AuditEntry {
            id: AuditEntryId(Uuid::parse_str(&m.id).unwrap_or_default()),
            entity_type: m.entity_type,
            entity_id: m.entity_id,
            operation: AuditOperation::from_code(&m.operation).unwrap_or_default(),
            old_values: parse_snapshot(m.old_values),
            new_values: parse_snapshot(m.new_values),
            actor: m.actor,
            created_at,
        }
    }
}

/// Append one entry; there is no update or delete counterpart
pub async fn append<C: ConnectionTrait>(conn: &C, entry: &AuditEntry) -> Result<(), DbErr> {
    let active = ActiveModel {
        id: Set(entry.id.value().to_string()),
        entity_type: Set(entry.entity_type.clone()),
        entity_id: Set(entry.entity_id.clone()),
        operation: Set(entry.operation.code().to_string()),
        old_values: Set(entry.old_values.as_ref().map(Value::to_string)),
        new_values: Set(entry.new_values.as_ref().map(Value::to_string)),
        actor: Set(entry.actor.clone()),
        created_at: Set(format_timestamp(entry.created_at)),
    };
    Entity::insert(active).exec_without_returning(conn).await?;
    Ok(())
}

/// History of one record, oldest first
pub async fn list_for_entity<C: ConnectionTrait>(
    conn: &C,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<AuditEntry>, DbErr> {
    let items = Entity::find()
        .filter(Column::EntityType.eq(entity_type))
        .filter(Column::EntityId.eq(entity_id))
        .order_by_asc(Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
