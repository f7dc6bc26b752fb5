use crate::domain::a001_user::aggregate::UserId;
use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a004_contact::aggregate::ContactId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Support ticket identifier
    TicketId
);

crate::crm_enum! {
    TicketPriority default Medium {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Urgent => ("urgent", "Urgent"),
    }
}

impl TicketPriority {
    /// Resolution target counted from ticket creation
    pub fn sla_window(&self) -> Duration {
        match self {
            TicketPriority::Urgent => Duration::hours(4),
            TicketPriority::High => Duration::hours(24),
            TicketPriority::Medium => Duration::hours(72),
            TicketPriority::Low => Duration::days(7),
        }
    }
}

crate::crm_enum! {
    TicketCategory default General {
        General => ("general", "General"),
        Billing => ("billing", "Billing"),
        Technical => ("technical", "Technical"),
        Bug => ("bug", "Bug"),
        FeatureRequest => ("feature_request", "Feature request"),
    }
}

crate::crm_enum! {
    TicketStatus default Open {
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In progress"),
        Pending => ("pending", "Waiting on customer"),
        Resolved => ("resolved", "Resolved"),
        Closed => ("closed", "Closed"),
    }
}

impl TicketStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

/// Support case raised by a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(flatten)]
    pub base: BaseAggregate<TicketId>,
    #[serde(flatten)]
    pub data: TicketDto,
}

impl Ticket {
    /// Past the SLA target without being resolved in time
    pub fn is_sla_breached(&self, now: DateTime<Utc>) -> bool {
        match self.data.sla_due_at {
            Some(due) => self.data.resolved_at.unwrap_or(now) > due,
            None => false,
        }
    }
}

crate::impl_aggregate_root!(
    Ticket,
    TicketId,
    index = "a007",
    collection = "tickets",
    entity = "ticket",
    element = "Ticket",
    list = "Tickets"
);

impl CrmRecord for Ticket {
    crate::crm_record_parts!(TicketId, TicketDto);

    fn validate_dto(dto: &TicketDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("subject", &dto.subject, &[Rule::Required, Rule::MaxLength(300)])
            .optional_text("description", dto.description.as_deref(), &[Rule::MaxLength(10_000)])
            .check(
                "contactId",
                dto.contact_id.is_some() || dto.account_id.is_some(),
                "A ticket needs a contact or an account",
            )
            .optional_number(
                "satisfactionRating",
                dto.satisfaction_rating.map(f64::from),
                &[Rule::RATING],
            )
            .check(
                "satisfactionRating",
                dto.satisfaction_rating.is_none() || dto.status.is_done(),
                "Only resolved or closed tickets can be rated",
            );
        v.finish()
    }

    fn before_write(&mut self, _previous: Option<&Self>, now: DateTime<Utc>) {
        if self.data.sla_due_at.is_none() {
            self.data.sla_due_at = Some(self.base.metadata.created_at + self.data.priority.sla_window());
        }
        match self.data.status {
            TicketStatus::Resolved => {
                self.data.resolved_at.get_or_insert(now);
                self.data.closed_at = None;
            }
            TicketStatus::Closed => {
                self.data.resolved_at.get_or_insert(now);
                self.data.closed_at.get_or_insert(now);
            }
            _ => {
                self.data.resolved_at = None;
                self.data.closed_at = None;
            }
        }
        self.data.sla_breached = self.is_sla_breached(now);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketDto {
    pub subject: String,
    pub description: Option<String>,
    pub contact_id: Option<ContactId>,
    pub account_id: Option<AccountId>,
    pub assignee_id: Option<UserId>,
    pub priority: TicketPriority,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub sla_due_at: Option<DateTime<Utc>>,
    /// Recomputed on every write
    pub sla_breached: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub satisfaction_rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(now: DateTime<Utc>, priority: &str) -> Ticket {
        Ticket::create_from_json(
            &json!({
                "subject": "Login fails on Android",
                "contactId": uuid::Uuid::new_v4().to_string(),
                "priority": priority,
                "category": "bug"
            }),
            now,
        )
        .unwrap()
    }

    #[test]
    fn sla_target_comes_from_priority() {
        let t0 = Utc::now();
        let ticket = ticket(t0, "urgent");
        assert_eq!(ticket.data.sla_due_at, Some(t0 + Duration::hours(4)));
        assert!(!ticket.data.sla_breached);
        assert!(ticket.is_sla_breached(t0 + Duration::hours(5)));
    }

    #[test]
    fn resolution_timestamps_follow_status() {
        let t0 = Utc::now();
        let ticket = ticket(t0, "high");
        let t1 = t0 + Duration::hours(30);
        let resolved = ticket
            .patch_from_json(json!({"status": "resolved"}).as_object().unwrap(), t1)
            .unwrap();
        assert_eq!(resolved.data.resolved_at, Some(t1));
        assert!(resolved.data.sla_breached);

        let t2 = t1 + Duration::hours(1);
        let closed = resolved
            .patch_from_json(
                json!({"status": "closed", "satisfactionRating": 4}).as_object().unwrap(),
                t2,
            )
            .unwrap();
        assert_eq!(closed.data.resolved_at, Some(t1));
        assert_eq!(closed.data.closed_at, Some(t2));

        let reopened = closed
            .patch_from_json(
                json!({"status": "open", "satisfactionRating": null}).as_object().unwrap(),
                t2,
            )
            .unwrap();
        assert_eq!(reopened.data.resolved_at, None);
        assert_eq!(reopened.data.closed_at, None);
    }

    #[test]
    fn rating_is_one_to_five() {
        let errors = Ticket::create_from_json(
            &json!({
                "subject": "Invoice copy",
                "accountId": uuid::Uuid::new_v4().to_string(),
                "status": "closed",
                "satisfactionRating": 6
            }),
            Utc::now(),
        )
        .unwrap_err();
        assert!(errors.has_field("satisfactionRating"));
    }
}
