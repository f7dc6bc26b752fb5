use super::ValidationErrors;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the storage layer; clients may send them back but they are
/// never applied to the payload
const SYSTEM_KEYS: &[&str] = &["id", "createdAt", "updatedAt", "deletedAt", "version"];

/// Deserialize an insert payload, attributing type errors (wrong JSON type,
/// unknown enum value) to the field that caused them
pub fn parse_payload<T>(payload: &Value) -> Result<T, ValidationErrors>
where
    T: Serialize + DeserializeOwned + Default,
{
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationErrors::single("_payload", "Expected a JSON object"))?;
    overlay(&T::default(), object)
}

/// Apply a partial update on top of `current`, attributing failures per field
pub fn merge_patch<T>(current: &T, patch: &Map<String, Value>) -> Result<T, ValidationErrors>
where
    T: Serialize + DeserializeOwned,
{
    overlay(current, patch)
}

fn overlay<T>(base: &T, changes: &Map<String, Value>) -> Result<T, ValidationErrors>
where
    T: Serialize + DeserializeOwned,
{
    let base = match serde_json::to_value(base) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            return Err(ValidationErrors::single("_payload", "Unsupported payload shape"));
        }
    };

    let mut errors = ValidationErrors::new();
    let mut merged = base.clone();
    for (key, value) in changes {
        if SYSTEM_KEYS.contains(&key.as_str()) {
            continue;
        }
        if !base.contains_key(key) {
            errors.add(key.clone(), "Unknown field");
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    match serde_json::from_value::<T>(Value::Object(merged)) {
        Ok(value) => Ok(value),
        Err(whole_error) => {
            // Retry key by key against the untouched base to find the culprits
            for (key, value) in changes {
                if SYSTEM_KEYS.contains(&key.as_str()) {
                    continue;
                }
                let mut candidate = base.clone();
                candidate.insert(key.clone(), value.clone());
                if let Err(e) = serde_json::from_value::<T>(Value::Object(candidate)) {
                    errors.add(key.clone(), clean_serde_message(&e.to_string()));
                }
            }
            if errors.is_empty() {
                errors.add("_payload", clean_serde_message(&whole_error.to_string()));
            }
            Err(errors)
        }
    }
}

/// serde_json appends "at line X column Y", which means nothing for a
/// `Value`-sourced error
fn clean_serde_message(message: &str) -> String {
    match message.find(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Level {
        #[default]
        Low,
        High,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Sample {
        name: String,
        score: f64,
        level: Level,
        owner_id: Option<String>,
    }

    #[test]
    fn parses_valid_payload_with_defaults() {
        let parsed: Sample = parse_payload(&json!({ "name": "Acme", "level": "high" })).unwrap();
        assert_eq!(parsed.name, "Acme");
        assert_eq!(parsed.level, Level::High);
        assert_eq!(parsed.score, 0.0);
    }

    #[test]
    fn attributes_type_errors_to_fields() {
        let err = parse_payload::<Sample>(&json!({
            "name": "Acme",
            "score": "high",
            "level": "extreme"
        }))
        .unwrap_err();
        assert!(err.has_field("score"));
        assert!(err.has_field("level"));
        assert!(!err.has_field("name"));
        assert!(!err.for_field("level").unwrap().contains("line"));
    }

    #[test]
    fn unknown_fields_are_reported() {
        let err = parse_payload::<Sample>(&json!({ "nmae": "typo" })).unwrap_err();
        assert_eq!(err.for_field("nmae"), Some("Unknown field"));
    }

    #[test]
    fn merge_patch_keeps_untouched_fields_and_ignores_system_keys() {
        let current = Sample {
            name: "Acme".into(),
            score: 40.0,
            level: Level::Low,
            owner_id: Some("u1".into()),
        };
        let patch = json!({ "score": 55.0, "id": "ignored", "version": 3 });
        let merged = merge_patch(&current, patch.as_object().unwrap()).unwrap();
        assert_eq!(merged.name, "Acme");
        assert_eq!(merged.score, 55.0);
        assert_eq!(merged.owner_id.as_deref(), Some("u1"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = parse_payload::<Sample>(&json!([1, 2])).unwrap_err();
        assert!(err.has_field("_payload"));
    }
}
