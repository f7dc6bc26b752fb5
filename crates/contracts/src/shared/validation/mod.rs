//! Field-scoped validation for insert and update payloads
//!
//! Every failure is attached to the offending field path so forms can
//! highlight the specific control. Rules are reusable and parameterized
//! ([`Rule`]) instead of ad hoc per-field checks.

mod errors;
mod payload;
mod rules;

pub use errors::{FieldError, ValidationErrors};
pub use payload::{merge_patch, parse_payload};
pub use rules::{is_valid_email, is_valid_phone, Rule, Validator};
