//! The only write path into the CRM tables
//!
//! Every create, update, soft delete and restore appends exactly one audit
//! entry inside the same transaction as the row change. Rows are never
//! physically deleted.

use chrono::{DateTime, Utc};
use contracts::domain::a012_audit_log::aggregate::{AuditEntry, AuditOperation};
use contracts::domain::common::EntityRef;
use contracts::shared::validation::ValidationErrors;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde_json::Value;

use super::{Collection, Record};
use crate::domain::{self, a012_audit_log, a014_custom_field};
use crate::shared::data::record_store;
use crate::shared::error::{ApiError, ApiResult};

pub const DEFAULT_ACTOR: &str = "system";

fn record_id(record: &Record) -> ApiResult<String> {
    record
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("record has no id")))
}

fn record_version(record: &Record) -> i64 {
    record.get("version").and_then(Value::as_i64).unwrap_or(0)
}

fn is_deleted(record: &Record) -> bool {
    record.get("deletedAt").is_some_and(|v| !v.is_null())
}

pub async fn create(
    db: &DatabaseConnection,
    collection: &Collection,
    payload: &Value,
    actor: &str,
) -> ApiResult<Record> {
    let txn = db.begin().await?;
    let stored = create_in(&txn, collection, payload, actor, Utc::now()).await?;
    txn.commit().await?;
    Ok(stored)
}

/// Insert inside a caller-owned transaction
pub async fn create_in<C: ConnectionTrait>(
    conn: &C,
    collection: &Collection,
    payload: &Value,
    actor: &str,
    now: DateTime<Utc>,
) -> ApiResult<Record> {
    let record = collection.codec.create(payload, now)?;
    check_write(conn, collection, None, &record).await?;
    record_store::insert(conn, collection.table, &record).await?;
    let id = record_id(&record)?;
    let stored = load(conn, collection, &id).await?;
    append_audit(conn, collection, &id, AuditOperation::Create, None, Some(&stored), actor, now).await?;
    tracing::info!("{} {} created by {}", collection.entity_type(), id, actor);
    Ok(stored)
}

/// Apply a partial update. With `expected_version` the write fails with
/// `Conflict` unless the stored row still has that version.
pub async fn update(
    db: &DatabaseConnection,
    collection: &Collection,
    id: &str,
    patch: &Record,
    expected_version: Option<i64>,
    actor: &str,
) -> ApiResult<Record> {
    let txn = db.begin().await?;
    let current = load_live(&txn, collection, id).await?;
    if let Some(expected) = expected_version {
        let stored = record_version(&current);
        if stored != expected {
            return Err(ApiError::Conflict(format!(
                "{} {} was modified by someone else (version {}, expected {})",
                collection.entity_type(),
                id,
                stored,
                expected
            )));
        }
    }
    let next = collection.codec.patch(&current, patch, Utc::now())?;
    let stored = persist_change(&txn, collection, &current, &next, AuditOperation::Update, actor).await?;
    txn.commit().await?;
    Ok(stored)
}

pub async fn soft_delete(
    db: &DatabaseConnection,
    collection: &Collection,
    id: &str,
    actor: &str,
) -> ApiResult<Record> {
    let txn = db.begin().await?;
    let current = load_live(&txn, collection, id).await?;
    let next = collection.codec.soft_delete(&current, Utc::now())?;
    let stored = persist_change(&txn, collection, &current, &next, AuditOperation::Delete, actor).await?;
    txn.commit().await?;
    Ok(stored)
}

pub async fn restore(
    db: &DatabaseConnection,
    collection: &Collection,
    id: &str,
    actor: &str,
) -> ApiResult<Record> {
    let txn = db.begin().await?;
    let current = load(&txn, collection, id).await?;
    if !is_deleted(&current) {
        return Err(ApiError::bad_request(format!(
            "{} {} is not deleted",
            collection.entity_type(),
            id
        )));
    }
    let next = collection.codec.restore(&current, Utc::now())?;
    let stored = persist_change(&txn, collection, &current, &next, AuditOperation::Restore, actor).await?;
    txn.commit().await?;
    Ok(stored)
}

/// Any row, deleted or not
pub async fn load<C: ConnectionTrait>(conn: &C, collection: &Collection, id: &str) -> ApiResult<Record> {
    record_store::find(conn, collection.table, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} {}", collection.entity_type(), id)))
}

/// A row that is not soft-deleted
pub async fn load_live<C: ConnectionTrait>(
    conn: &C,
    collection: &Collection,
    id: &str,
) -> ApiResult<Record> {
    let record = load(conn, collection, id).await?;
    if is_deleted(&record) {
        return Err(ApiError::not_found(format!("{} {}", collection.entity_type(), id)));
    }
    Ok(record)
}

/// Write `next` over `current` and record the change
pub async fn persist_change<C: ConnectionTrait>(
    conn: &C,
    collection: &Collection,
    current: &Record,
    next: &Record,
    operation: AuditOperation,
    actor: &str,
) -> ApiResult<Record> {
    check_write(conn, collection, Some(current), next).await?;
    let id = record_id(next)?;
    let written = record_store::update(conn, collection.table, next, record_version(current)).await?;
    if !written {
        return Err(ApiError::Conflict(format!(
            "{} {} was modified concurrently",
            collection.entity_type(),
            id
        )));
    }
    let stored = load(conn, collection, &id).await?;
    let now = Utc::now();
    append_audit(conn, collection, &id, operation, Some(current), Some(&stored), actor, now).await?;
    tracing::info!("{} {} {} by {}", collection.entity_type(), id, operation.code(), actor);
    Ok(stored)
}

#[allow(clippy::too_many_arguments)]
async fn append_audit<C: ConnectionTrait>(
    conn: &C,
    collection: &Collection,
    id: &str,
    operation: AuditOperation,
    old_values: Option<&Record>,
    new_values: Option<&Record>,
    actor: &str,
    now: DateTime<Utc>,
) -> ApiResult<()> {
    let entry = AuditEntry::record(
        EntityRef::new(collection.entity_type(), id),
        operation,
        old_values.map(|r| Value::Object(r.clone())),
        new_values.map(|r| Value::Object(r.clone())),
        actor,
        now,
    );
    a012_audit_log::repository::append(conn, &entry).await?;
    Ok(())
}

/// Checks that need the database: referenced rows exist, unique keys stay
/// unique, entity-specific rules. Deleting skips all of them.
async fn check_write<C: ConnectionTrait>(
    conn: &C,
    collection: &Collection,
    previous: Option<&Record>,
    next: &Record,
) -> ApiResult<()> {
    if is_deleted(next) {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    let changed = |key: &str| previous.map_or(true, |p| p.get(key) != next.get(key));

    for field in collection.table.fields {
        let Some(target) = field.references else {
            continue;
        };
        let Some(id) = next.get(field.key).and_then(Value::as_str) else {
            continue;
        };
        if changed(field.key) && !record_store::exists(conn, target, id).await? {
            errors.add(field.key, "Referenced record does not exist");
        }
    }

    if collection.table.polymorphic && (changed("entityType") || changed("entityId")) {
        let entity_type = next.get("entityType").and_then(Value::as_str).unwrap_or_default();
        let entity_id = next.get("entityId").and_then(Value::as_str).unwrap_or_default();
        match domain::collection_for_entity(entity_type) {
            Some(target) => {
                if !record_store::exists(conn, target.table.table, entity_id).await? {
                    errors.add("entityId", "Referenced record does not exist");
                }
            }
            None => errors.add("entityType", "Unknown entity type"),
        }
    }

    for keys in collection.table.unique {
        if record_store::count_duplicates(conn, collection.table, next, keys).await? > 0 {
            let field = keys.last().copied().unwrap_or("id");
            errors.add(field, "Already exists");
        }
    }
    errors.into_result()?;

    if collection.entity_type() == a014_custom_field::repository::VALUE_TABLE.entity_type {
        a014_custom_field::service::check_value_type(conn, next).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a012_audit_log::repository::list_for_entity;
    use crate::domain::find_collection;
    use crate::shared::data::db::memory;
    use serde_json::json;

    fn contacts() -> &'static Collection {
        find_collection("contacts").unwrap()
    }

    fn patch(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn every_write_appends_one_audit_entry() {
        let db = memory().await;
        let created = create(&db, contacts(), &json!({"firstName": "Lina", "lastName": "Haddad"}), "sara")
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        update(&db, contacts(), &id, &patch(json!({"jobTitle": "CTO"})), None, "omar")
            .await
            .unwrap();
        soft_delete(&db, contacts(), &id, "omar").await.unwrap();
        let restored = restore(&db, contacts(), &id, "sara").await.unwrap();
        assert!(restored["deletedAt"].is_null());
        assert_eq!(restored["version"], json!(4));

        let history = list_for_entity(&db, "contact", &id).await.unwrap();
        let operations: Vec<AuditOperation> = history.iter().map(|e| e.operation).collect();
        assert_eq!(
            operations,
            vec![
                AuditOperation::Create,
                AuditOperation::Update,
                AuditOperation::Delete,
                AuditOperation::Restore
            ]
        );
        assert_eq!(history[1].actor, "omar");
        assert!(history[1].changed_fields().contains(&"jobTitle".to_string()));
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_hidden_but_kept() {
        let db = memory().await;
        let created = create(&db, contacts(), &json!({"firstName": "Omar"}), DEFAULT_ACTOR)
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        soft_delete(&db, contacts(), &id, DEFAULT_ACTOR).await.unwrap();

        let err = update(&db, contacts(), &id, &patch(json!({"jobTitle": "CEO"})), None, DEFAULT_ACTOR)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(load(&db, contacts(), &id).await.is_ok());

        let err = soft_delete(&db, contacts(), &id, DEFAULT_ACTOR).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let db = memory().await;
        let created = create(&db, contacts(), &json!({"firstName": "Rami"}), DEFAULT_ACTOR)
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        update(&db, contacts(), &id, &patch(json!({"jobTitle": "Lead"})), Some(1), "a")
            .await
            .unwrap();
        let err = update(&db, contacts(), &id, &patch(json!({"jobTitle": "Head"})), Some(1), "b")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let history = list_for_entity(&db, "contact", &id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let db = memory().await;
        let leads = find_collection("leads").unwrap();
        let err = create(&db, leads, &json!({"firstName": "Huda", "probability": 150}), DEFAULT_ACTOR)
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("probability")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn references_must_point_at_live_rows() {
        let db = memory().await;
        let missing = uuid::Uuid::new_v4().to_string();
        let err = create(
            &db,
            contacts(),
            &json!({"firstName": "Lina", "accountId": missing}),
            DEFAULT_ACTOR,
        )
        .await
        .unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("accountId")),
            other => panic!("unexpected error: {other:?}"),
        }

        let accounts = find_collection("accounts").unwrap();
        let account = create(&db, accounts, &json!({"name": "Acme"}), DEFAULT_ACTOR)
            .await
            .unwrap();
        let contact = create(
            &db,
            contacts(),
            &json!({"firstName": "Lina", "accountId": account["id"]}),
            DEFAULT_ACTOR,
        )
        .await
        .unwrap();
        assert_eq!(contact["accountId"], account["id"]);
    }

    #[tokio::test]
    async fn unique_keys_are_enforced_among_live_rows() {
        let db = memory().await;
        let tags = find_collection("tags").unwrap();
        let first = create(&db, tags, &json!({"name": "vip"}), DEFAULT_ACTOR).await.unwrap();
        let err = create(&db, tags, &json!({"name": "vip"}), DEFAULT_ACTOR).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let id = first["id"].as_str().unwrap().to_string();
        soft_delete(&db, tags, &id, DEFAULT_ACTOR).await.unwrap();
        create(&db, tags, &json!({"name": "vip"}), DEFAULT_ACTOR).await.unwrap();

        let err = restore(&db, tags, &id, DEFAULT_ACTOR).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn restore_requires_a_deleted_row() {
        let db = memory().await;
        let created = create(&db, contacts(), &json!({"firstName": "Lina"}), DEFAULT_ACTOR)
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        let err = restore(&db, contacts(), &id, DEFAULT_ACTOR).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
