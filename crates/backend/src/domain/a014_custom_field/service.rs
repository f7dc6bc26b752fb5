use contracts::domain::a014_custom_field::aggregate::{CustomField, CustomValue};
use contracts::shared::validation::ValidationErrors;
use sea_orm::ConnectionTrait;
use serde_json::Value;

use super::repository::FIELD_TABLE;
use crate::shared::data::record_store;
use crate::shared::error::ApiResult;
use crate::shared::records::{decode, Record};

/// A custom value must match the type declared by its (live) field
pub async fn check_value_type<C: ConnectionTrait>(conn: &C, record: &Record) -> ApiResult<()> {
    let value: CustomValue = decode(record)?;
    let Some(field_id) = value.data.custom_field_id else {
        return Err(ValidationErrors::single("customFieldId", "This field is required").into());
    };
    let field_row = record_store::find(conn, &FIELD_TABLE, &field_id.value().to_string())
        .await?
        .filter(|row| row.get("deletedAt").map_or(true, Value::is_null));
    let Some(field_row) = field_row else {
        return Err(
            ValidationErrors::single("customFieldId", "Referenced record does not exist").into(),
        );
    };
    let field: CustomField = decode(&field_row)?;
    value.validate_against(&field)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::find_collection;
    use crate::shared::data::db::memory;
    use crate::shared::error::ApiError;
    use crate::shared::records::write_service::{create, DEFAULT_ACTOR};
    use serde_json::json;

    #[tokio::test]
    async fn values_follow_the_declared_type() {
        let db = memory().await;
        let fields = find_collection("custom-fields").unwrap();
        let values = find_collection("custom-values").unwrap();
        let contacts = find_collection("contacts").unwrap();

        let field = create(
            &db,
            fields,
            &json!({"entityType": "contact", "key": "shoe_size", "label": "Shoe size", "fieldType": "number"}),
            DEFAULT_ACTOR,
        )
        .await
        .unwrap();
        let contact = create(&db, contacts, &json!({"firstName": "Lina"}), DEFAULT_ACTOR)
            .await
            .unwrap();

        let ok = create(
            &db,
            values,
            &json!({"customFieldId": field["id"], "entityType": "contact", "entityId": contact["id"], "value": 42}),
            DEFAULT_ACTOR,
        )
        .await;
        assert!(ok.is_ok());

        let other = create(&db, contacts, &json!({"firstName": "Omar"}), DEFAULT_ACTOR)
            .await
            .unwrap();
        let err = create(
            &db,
            values,
            &json!({"customFieldId": field["id"], "entityType": "contact", "entityId": other["id"], "value": "big"}),
            DEFAULT_ACTOR,
        )
        .await
        .unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.has_field("value")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
