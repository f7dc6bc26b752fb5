use serde::{Deserialize, Serialize};

/// A single validation failure bound to a field path (e.g. `"probability"`,
/// `"phones[1].number"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered collection of field errors; serializes as `{ "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Re-roots nested errors under `prefix` (`"line1"` -> `"billingAddress.line1"`).
    /// An empty prefix keeps the fields as they are.
    pub fn nest(&mut self, prefix: &str, other: ValidationErrors) {
        for e in other.errors {
            if prefix.is_empty() {
                self.add(e.field, e.message);
            } else {
                self.add(format!("{}.{}", prefix, e.field), e.message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// First message reported for `field`
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_errors_array() {
        let errors = ValidationErrors::single("email", "Invalid email address");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "errors": [ { "field": "email", "message": "Invalid email address" } ] })
        );
    }

    #[test]
    fn nest_prefixes_field_paths() {
        let mut outer = ValidationErrors::new();
        outer.nest("billingAddress", ValidationErrors::single("city", "bad"));
        outer.nest("", ValidationErrors::single("lineItems.0.quantity", "zero"));
        assert_eq!(outer.for_field("billingAddress.city"), Some("bad"));
        assert_eq!(outer.for_field("lineItems.0.quantity"), Some("zero"));
    }
}
