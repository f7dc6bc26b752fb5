use crate::domain::a001_user::aggregate::UserId;
use crate::domain::a003_account::aggregate::AccountId;
use crate::domain::a004_contact::aggregate::ContactId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Opportunity (deal) identifier
    OpportunityId
);

crate::crm_enum! {
    /// Pipeline stage
    OpportunityStage default Prospecting {
        Prospecting => ("prospecting", "Prospecting"),
        Qualification => ("qualification", "Qualification"),
        NeedsAnalysis => ("needs_analysis", "Needs analysis"),
        Proposal => ("proposal", "Proposal"),
        Negotiation => ("negotiation", "Negotiation"),
        ClosedWon => ("closed_won", "Closed won"),
        ClosedLost => ("closed_lost", "Closed lost"),
    }
}

impl OpportunityStage {
    pub fn is_closed(&self) -> bool {
        matches!(self, OpportunityStage::ClosedWon | OpportunityStage::ClosedLost)
    }

    pub fn is_won(&self) -> bool {
        *self == OpportunityStage::ClosedWon
    }
}

crate::crm_enum! {
    ForecastCategory default Pipeline {
        Pipeline => ("pipeline", "Pipeline"),
        BestCase => ("best_case", "Best case"),
        Commit => ("commit", "Commit"),
        Closed => ("closed", "Closed"),
        Omitted => ("omitted", "Omitted"),
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Sales pursuit, shown as "Deals" in the admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(flatten)]
    pub base: BaseAggregate<OpportunityId>,
    #[serde(flatten)]
    pub data: OpportunityDto,
}

impl Opportunity {
    /// Force `isClosed` / `isWon` to agree with the stage
    pub fn sync_stage_flags(&mut self) {
        let stage = self.data.stage;
        self.data.is_closed = Some(stage.is_closed());
        self.data.is_won = Some(stage.is_won());
        match stage {
            OpportunityStage::ClosedWon => {
                self.data.probability = Some(100);
                self.data.forecast_category = ForecastCategory::Closed;
            }
            OpportunityStage::ClosedLost => {
                self.data.probability = Some(0);
                self.data.forecast_category = ForecastCategory::Omitted;
            }
            _ => {}
        }
    }

    /// Whole days spent in the current stage
    pub fn stage_age_days(&self, now: DateTime<Utc>) -> i64 {
        let since = self
            .data
            .stage_changed_at
            .unwrap_or(self.base.metadata.created_at);
        (now - since).num_days().max(0)
    }

    /// Value weighted by win probability
    pub fn weighted_value(&self) -> f64 {
        let probability = self.data.probability.unwrap_or(0) as f64;
        crate::domain::common::round_money(self.data.value * probability / 100.0)
    }
}

crate::impl_aggregate_root!(
    Opportunity,
    OpportunityId,
    index = "a006",
    collection = "opportunities",
    entity = "opportunity",
    element = "Deal",
    list = "Deals"
);

impl CrmRecord for Opportunity {
    crate::crm_record_parts!(OpportunityId, OpportunityDto);

    fn validate_dto(dto: &OpportunityDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("name", &dto.name, &[Rule::Required, Rule::MaxLength(200)])
            .check("accountId", dto.account_id.is_some(), "This field is required")
            .number("value", dto.value, &[Rule::MONEY])
            .text("currency", &dto.currency, &[Rule::Required, Rule::CurrencyCode])
            .optional_number("probability", dto.probability.map(f64::from), &[Rule::PERCENT])
            .check(
                "isClosed",
                dto.is_closed.map_or(true, |c| c == dto.stage.is_closed()),
                "Does not match the stage",
            )
            .check(
                "isWon",
                dto.is_won.map_or(true, |w| w == dto.stage.is_won()),
                "Does not match the stage",
            )
            .check(
                "lossReason",
                dto.loss_reason.is_none() || dto.stage == OpportunityStage::ClosedLost,
                "Only allowed on lost deals",
            );
        v.finish()
    }

    fn reset_derived(dto: &mut OpportunityDto, patch: &Map<String, Value>) {
        if !patch.contains_key("isClosed") {
            dto.is_closed = None;
        }
        if !patch.contains_key("isWon") {
            dto.is_won = None;
        }
    }

    fn before_write(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        let stage_changed = previous.map_or(true, |p| p.data.stage != self.data.stage);
        if stage_changed {
            self.data.stage_changed_at = Some(now);
        }
        self.sync_stage_flags();
    }
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityDto {
    pub name: String,
    pub account_id: Option<AccountId>,
    pub contact_id: Option<ContactId>,
    pub owner_user_id: Option<UserId>,
    pub stage: OpportunityStage,
    pub value: f64,
    pub currency: String,
    pub probability: Option<i32>,
    pub forecast_category: ForecastCategory,
    pub expected_close_date: Option<NaiveDate>,
    /// Derived from `stage`
    pub is_closed: Option<bool>,
    /// Derived from `stage`
    pub is_won: Option<bool>,
    pub stage_changed_at: Option<DateTime<Utc>>,
    pub loss_reason: Option<String>,
}

impl Default for OpportunityDto {
    fn default() -> Self {
        Self {
            name: String::new(),
            account_id: None,
            contact_id: None,
            owner_user_id: None,
            stage: OpportunityStage::default(),
            value: 0.0,
            currency: "USD".to_string(),
            probability: None,
            forecast_category: ForecastCategory::default(),
            expected_close_date: None,
            is_closed: None,
            is_won: None,
            stage_changed_at: None,
            loss_reason: None,
        }
    }
}
