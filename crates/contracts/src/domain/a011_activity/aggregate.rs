use crate::domain::a001_user::aggregate::UserId;
use crate::domain::common::{BaseAggregate, CrmRecord, EntityRef};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Activity identifier
    ActivityId
);

crate::crm_enum! {
    ActivityKind default Note {
        Call => ("call", "Call"),
        Meeting => ("meeting", "Meeting"),
        Task => ("task", "Task"),
        Note => ("note", "Note"),
        Email => ("email", "Email"),
    }
}

/// Interaction logged against any record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(flatten)]
    pub base: BaseAggregate<ActivityId>,
    #[serde(flatten)]
    pub data: ActivityDto,
}

impl Activity {
    pub fn is_open_task(&self) -> bool {
        self.data.kind == ActivityKind::Task && self.data.completed_at.is_none()
    }
}

crate::impl_aggregate_root!(
    Activity,
    ActivityId,
    index = "a011",
    collection = "activities",
    entity = "activity",
    element = "Activity",
    list = "Activities"
);

impl CrmRecord for Activity {
    crate::crm_record_parts!(ActivityId, ActivityDto);

    fn validate_dto(dto: &ActivityDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("subject", &dto.subject, &[Rule::Required, Rule::MaxLength(300)])
            .nested("", dto.target.validate())
            .check(
                "durationMinutes",
                dto.duration_minutes.map_or(true, |m| m >= 0),
                "Must not be negative",
            )
            .check(
                "dueAt",
                dto.due_at.is_none() || dto.kind == ActivityKind::Task,
                "Only tasks have a due time",
            );
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityDto {
    pub kind: ActivityKind,
    pub subject: String,
    pub body: Option<String>,
    /// Record the activity belongs to (`entityType` + `entityId`)
    #[serde(flatten)]
    pub target: EntityRef,
    pub owner_user_id: Option<UserId>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn target_is_flattened_and_checked() {
        let contact_id = uuid::Uuid::new_v4().to_string();
        let activity = Activity::create_from_json(
            &json!({
                "kind": "call",
                "subject": "Kick-off call",
                "entityType": "contact",
                "entityId": contact_id,
                "durationMinutes": 30
            }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(activity.data.target, EntityRef::new("contact", contact_id));

        let errors = Activity::create_from_json(
            &json!({"subject": "Note", "entityType": "galaxy", "entityId": "1"}),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("entityType"));
        assert!(errors.has_field("entityId"));
    }
}
