use crate::domain::a001_user::aggregate::UserId;
use crate::domain::common::{BaseAggregate, CrmRecord};
use crate::shared::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Team identifier
    TeamId
);

/// Group of operators sharing a manager and a sales region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(flatten)]
    pub base: BaseAggregate<TeamId>,
    #[serde(flatten)]
    pub data: TeamDto,
}

crate::impl_aggregate_root!(
    Team,
    TeamId,
    index = "a002",
    collection = "teams",
    entity = "team",
    element = "Team",
    list = "Teams"
);

impl CrmRecord for Team {
    crate::crm_record_parts!(TeamId, TeamDto);

    fn validate_dto(dto: &TeamDto) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.text("name", &dto.name, &[Rule::Required, Rule::MaxLength(100)])
            .optional_text("region", dto.region.as_deref(), &[Rule::MaxLength(100)]);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamDto {
    pub name: String,
    pub manager_id: Option<UserId>,
    pub region: Option<String>,
}
