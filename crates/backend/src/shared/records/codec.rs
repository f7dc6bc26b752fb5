use crate::shared::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use contracts::domain::common::{AggregateRoot, CrmRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

pub type Record = Map<String, Value>;

/// Typed write rules of one aggregate, applied to untyped JSON records
///
/// Stored rows come in as JSON objects, are decoded into the aggregate, run
/// through its validation and lifecycle hooks, and go back out as JSON.
pub trait RecordCodec: Send + Sync {
    fn entity_type(&self) -> &'static str;

    fn collection_name(&self) -> &'static str;

    fn create(&self, payload: &Value, now: DateTime<Utc>) -> ApiResult<Record>;

    fn patch(&self, current: &Record, patch: &Record, now: DateTime<Utc>) -> ApiResult<Record>;

    fn soft_delete(&self, current: &Record, now: DateTime<Utc>) -> ApiResult<Record>;

    fn restore(&self, current: &Record, now: DateTime<Utc>) -> ApiResult<Record>;
}

pub struct TypedCodec<T>(PhantomData<fn() -> T>);

impl<T> TypedCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// Decode a stored row into its aggregate
pub fn decode<T: DeserializeOwned>(record: &Record) -> ApiResult<T> {
    serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
        ApiError::Internal(anyhow::anyhow!("stored row does not decode: {}", e))
    })
}

pub fn encode<T: Serialize>(aggregate: &T) -> ApiResult<Record> {
    match serde_json::to_value(aggregate)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::Internal(anyhow::anyhow!(
            "aggregate did not serialize to an object"
        ))),
    }
}

impl<T> RecordCodec for TypedCodec<T>
where
    T: CrmRecord + 'static,
{
    fn entity_type(&self) -> &'static str {
        T::entity_type()
    }

    fn collection_name(&self) -> &'static str {
        T::collection_name()
    }

    fn create(&self, payload: &Value, now: DateTime<Utc>) -> ApiResult<Record> {
        let record = T::create_from_json(payload, now)?;
        encode(&record)
    }

    fn patch(&self, current: &Record, patch: &Record, now: DateTime<Utc>) -> ApiResult<Record> {
        let current: T = decode(current)?;
        let next = current.patch_from_json(patch, now)?;
        encode(&next)
    }

    fn soft_delete(&self, current: &Record, now: DateTime<Utc>) -> ApiResult<Record> {
        let mut record: T = decode(current)?;
        record.metadata_mut().soft_delete(now);
        encode(&record)
    }

    fn restore(&self, current: &Record, now: DateTime<Utc>) -> ApiResult<Record> {
        let mut record: T = decode(current)?;
        record.metadata_mut().restore(now);
        encode(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_lead::aggregate::Lead;
    use serde_json::json;

    static LEADS: TypedCodec<Lead> = TypedCodec::new();

    #[test]
    fn create_reports_field_errors() {
        let err = LEADS
            .create(&json!({"firstName": "Huda", "probability": 150}), Utc::now())
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("probability")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn patch_bumps_version_and_keeps_identity() {
        let now = Utc::now();
        let created = LEADS.create(&json!({"firstName": "Huda"}), now).unwrap();
        let patch = json!({"company": "Acme"}).as_object().cloned().unwrap();
        let next = LEADS.patch(&created, &patch, now).unwrap();
        assert_eq!(next["id"], created["id"]);
        assert_eq!(next["company"], json!("Acme"));
        assert_eq!(next["version"], json!(2));
    }

    #[test]
    fn soft_delete_then_restore() {
        let now = Utc::now();
        let created = LEADS.create(&json!({"firstName": "Huda"}), now).unwrap();
        let deleted = LEADS.soft_delete(&created, now).unwrap();
        assert!(!deleted["deletedAt"].is_null());
        let restored = LEADS.restore(&deleted, now).unwrap();
        assert!(restored["deletedAt"].is_null());
        assert_eq!(restored["version"], json!(3));
    }

    #[test]
    fn names_come_from_the_aggregate() {
        assert_eq!(LEADS.entity_type(), "lead");
        assert_eq!(LEADS.collection_name(), "leads");
    }
}
