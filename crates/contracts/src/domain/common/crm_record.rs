use super::{AggregateRoot, BaseAggregate};
use crate::shared::validation::{merge_patch, parse_payload, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// An aggregate split into identity (`BaseAggregate`) and an editable payload
/// (`Dto`). Inserts and partial updates both go through the DTO so every write
/// path runs the same validation.
pub trait CrmRecord: AggregateRoot + Serialize + DeserializeOwned + Clone {
    type Dto: Serialize + DeserializeOwned + Default + Clone;

    fn new_id() -> Self::Id;

    fn from_parts(base: BaseAggregate<Self::Id>, dto: Self::Dto) -> Self;

    fn dto(&self) -> &Self::Dto;

    fn dto_mut(&mut self) -> &mut Self::Dto;

    /// Field-scoped validation of an insert/update payload
    fn validate_dto(dto: &Self::Dto) -> Result<(), ValidationErrors>;

    /// Checks that need the whole record or its previous state (identity,
    /// status transitions). Runs after `validate_dto`.
    fn validate_record(&self, _previous: Option<&Self>) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Clear derived values that a patch did not mention so they are
    /// recomputed by `before_write` instead of being checked against stale data.
    fn reset_derived(_dto: &mut Self::Dto, _patch: &Map<String, Value>) {}

    /// Hook run after validation and before the record is written.
    /// `previous` is `None` on insert.
    fn before_write(&mut self, _previous: Option<&Self>, _now: DateTime<Utc>) {}

    fn create(dto: Self::Dto, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        Self::validate_dto(&dto)?;
        let mut record = Self::from_parts(BaseAggregate::new_at(Self::new_id(), now), dto);
        record.validate_record(None)?;
        record.before_write(None, now);
        Ok(record)
    }

    fn updated(&self, dto: Self::Dto, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        Self::validate_dto(&dto)?;
        let mut next = self.clone();
        *next.dto_mut() = dto;
        next.validate_record(Some(self))?;
        next.before_write(Some(self), now);
        next.metadata_mut().touch(now);
        Ok(next)
    }

    fn create_from_json(payload: &Value, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let dto = parse_payload::<Self::Dto>(payload)?;
        Self::create(dto, now)
    }

    fn patch_from_json(
        &self,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let mut dto = merge_patch(self.dto(), patch)?;
        Self::reset_derived(&mut dto, patch);
        self.updated(dto, now)
    }
}

/// Implements the boilerplate half of [`CrmRecord`] for an aggregate shaped
/// `{ base: BaseAggregate<Id>, data: Dto }`.
#[macro_export]
macro_rules! crm_record_parts {
    ($id:ty, $dto:ty) => {
        type Dto = $dto;

        fn new_id() -> $id {
            <$id>::new_v4()
        }

        fn from_parts(base: $crate::domain::common::BaseAggregate<$id>, dto: $dto) -> Self {
            Self { base, data: dto }
        }

        fn dto(&self) -> &$dto {
            &self.data
        }

        fn dto_mut(&mut self) -> &mut $dto {
            &mut self.data
        }
    };
}
