use crate::domain::a002_team::aggregate::TeamId;
use crate::domain::common::CrmRecord;
use crate::enums::Language;
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Identifier of a CRM operator
    UserId
);

crate::crm_enum! {
    /// Access role of an operator
    UserRole default Rep {
        Admin => ("admin", "Administrator"),
        Manager => ("manager", "Sales manager"),
        Rep => ("rep", "Sales rep"),
        Support => ("support", "Support agent"),
        Marketing => ("marketing", "Marketing"),
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Operator of the CRM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: crate::domain::common::BaseAggregate<UserId>,
    #[serde(flatten)]
    pub data: UserDto,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.data.role == UserRole::Admin
    }
}

crate::impl_aggregate_root!(
    User,
    UserId,
    index = "a001",
    collection = "users",
    entity = "user",
    element = "User",
    list = "Users"
);

impl CrmRecord for User {
    crate::crm_record_parts!(UserId, UserDto);

    fn validate_dto(dto: &UserDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("name", &dto.name, &[Rule::Required, Rule::MaxLength(200)])
            .text("email", &dto.email, &[Rule::Required, Rule::Email]);
        v.finish()
    }
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDto {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<TeamId>,
    pub preferred_language: Language,
    pub is_active: bool,
}

impl Default for UserDto {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: UserRole::default(),
            team_id: None,
            preferred_language: Language::default(),
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::AggregateRoot;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn create_from_payload() {
        let user = User::create_from_json(
            &json!({"name": "Sara Ali", "email": "sara@agency.sa", "role": "manager"}),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(user.data.role, UserRole::Manager);
        assert!(user.data.is_active);
        assert_eq!(user.metadata().version, 1);
        assert_eq!(User::full_name(), "a001_users");
    }

    #[test]
    fn unknown_role_is_field_error() {
        let errors = User::create_from_json(
            &json!({"name": "Sara", "email": "sara@agency.sa", "role": "owner"}),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("role"));
    }
}
