use super::entity_table::{EntityTable, FieldDef, FieldType};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::QueryResult;
use serde_json::{Map, Number, Value};

/// Fixed-width UTC form: `2025-01-05T09:30:00.000000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Bring any RFC 3339 text onto the stored form; other text is kept as-is
pub fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| format_timestamp(at.with_timezone(&Utc)))
        .unwrap_or_else(|_| raw.to_string())
}

/// Convert one JSON value into the SQL value bound for `field`
pub fn to_sql_value(field: &FieldDef, value: Option<&Value>) -> sea_orm::Value {
    let value = value.filter(|v| !v.is_null());
    match field.field_type {
        FieldType::Id | FieldType::Text | FieldType::Date => value.map(value_as_text).into(),
        FieldType::Timestamp => value
            .map(|v| normalize_timestamp(&value_as_text(v)))
            .into(),
        FieldType::Integer => value.and_then(Value::as_i64).into(),
        FieldType::Numeric => value.and_then(Value::as_f64).into(),
        FieldType::Bool => value.and_then(Value::as_bool).into(),
        FieldType::Json => value.map(Value::to_string).into(),
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read one stored column back into JSON
pub fn read_column(row: &QueryResult, field: &FieldDef) -> Value {
    let col = field.column;
    match field.field_type {
        FieldType::Id | FieldType::Text | FieldType::Date | FieldType::Timestamp => row
            .try_get::<Option<String>>("", col)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
        FieldType::Integer => read_integer(row, col),
        FieldType::Numeric => read_numeric(row, col),
        FieldType::Bool => match row.try_get::<Option<bool>>("", col) {
            Ok(v) => v.map(Value::Bool).unwrap_or(Value::Null),
            Err(_) => row
                .try_get::<Option<i64>>("", col)
                .ok()
                .flatten()
                .map(|n| Value::Bool(n != 0))
                .unwrap_or(Value::Null),
        },
        FieldType::Json => row
            .try_get::<Option<String>>("", col)
            .ok()
            .flatten()
            .map(|text| parse_json_column(field, &text))
            .unwrap_or(Value::Null),
    }
}

fn read_integer(row: &QueryResult, col: &str) -> Value {
    match row.try_get::<Option<i64>>("", col) {
        Ok(v) => v.map(Value::from).unwrap_or(Value::Null),
        Err(_) => row
            .try_get::<Option<f64>>("", col)
            .ok()
            .flatten()
            .map(|f| Value::from(f.round() as i64))
            .unwrap_or(Value::Null),
    }
}

fn read_numeric(row: &QueryResult, col: &str) -> Value {
    match row.try_get::<Option<f64>>("", col) {
        Ok(v) => v
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Err(_) => row
            .try_get::<Option<i64>>("", col)
            .ok()
            .flatten()
            .map(|n| Value::from(n as f64))
            .unwrap_or(Value::Null),
    }
}

fn parse_json_column(field: &FieldDef, text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Column {} holds invalid JSON: {}", field.column, e);
            Value::Null
        }
    }
}

/// Read a full row of `table` into a camelCase JSON object
pub fn read_row(table: &EntityTable, row: &QueryResult) -> Map<String, Value> {
    table
        .all_fields()
        .map(|field| (field.key.to_string(), read_column(row, field)))
        .collect()
}

/// Values bound for `INSERT`, in `all_fields` order
pub fn insert_values(table: &EntityTable, record: &Map<String, Value>) -> Vec<sea_orm::Value> {
    table
        .all_fields()
        .map(|field| to_sql_value(field, record.get(field.key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamps_are_stored_with_fixed_width() {
        assert_eq!(
            normalize_timestamp("2025-01-05T09:30:00Z"),
            "2025-01-05T09:30:00.000000Z"
        );
        assert_eq!(
            normalize_timestamp("2025-01-05T12:30:00.5+03:00"),
            "2025-01-05T09:30:00.500000Z"
        );
        assert_eq!(normalize_timestamp("not a date"), "not a date");
    }

    #[test]
    fn json_fields_are_serialized_to_text() {
        let field = FieldDef::json("phones", "phones");
        let value = to_sql_value(&field, Some(&json!(["+971501234567"])));
        assert_eq!(
            value,
            sea_orm::Value::String(Some(Box::new(r#"["+971501234567"]"#.to_string())))
        );
    }

    #[test]
    fn null_and_missing_become_sql_null() {
        let field = FieldDef::numeric("budget", "budget");
        assert_eq!(to_sql_value(&field, None), sea_orm::Value::Double(None));
        assert_eq!(to_sql_value(&field, Some(&Value::Null)), sea_orm::Value::Double(None));
    }

    #[test]
    fn booleans_bind_as_bool() {
        let field = FieldDef::boolean("isPrimary", "is_primary");
        assert_eq!(
            to_sql_value(&field, Some(&json!(true))),
            sea_orm::Value::Bool(Some(true))
        );
    }
}
