//! The per-stage payload of a lead as one tagged union.
//!
//! A lead carries at most one detail row. The row's `kind` decides which
//! column group is meaningful; everything outside that group is written as
//! NULL so a row can never describe two stages at once.

use chrono::NaiveDate;
use entity::{
    lead::Stage,
    lead_detail::{self, Kind, SalesStage},
};
use sea_orm::{prelude::DateTimeWithTimeZone, DbErr, Set};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankLine {
    pub tank_type: String,
    pub capacity: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientClass {
    pub main: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementDetails {
    pub client: ClientClass,
    pub tank_application: String,
    pub tank_location: Option<String>,
    pub tanks: Vec<TankLine>,
    pub assigned_salesperson: String,
    pub expected_delivery_date: Option<NaiveDate>,
    pub followup_date: Option<NaiveDate>,
    pub sales_stage: SalesStage,
    pub current_remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegretOffer {
    pub client: ClientClass,
    /// Competitor product the prospect went with.
    pub tank_type: String,
    pub tank_type_other: Option<String>,
    pub followup_date: NaiveDate,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureRequirement {
    pub client: ClientClass,
    pub followup_date: NaiveDate,
    pub expected_timeline: Option<String>,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageDetail {
    Requirement(RequirementDetails),
    Regret(RegretOffer),
    Future(FutureRequirement),
}

impl StageDetail {
    pub fn kind(&self) -> Kind {
        match self {
            StageDetail::Requirement(_) => Kind::Requirement,
            StageDetail::Regret(_) => Kind::Regret,
            StageDetail::Future(_) => Kind::Future,
        }
    }

    /// Lead stage this detail belongs to.
    pub fn stage(&self) -> Stage {
        stage_for(self.kind())
    }

    pub fn client(&self) -> &ClientClass {
        match self {
            StageDetail::Requirement(d) => &d.client,
            StageDetail::Regret(d) => &d.client,
            StageDetail::Future(d) => &d.client,
        }
    }

    pub fn followup_date(&self) -> Option<NaiveDate> {
        match self {
            StageDetail::Requirement(d) => d.followup_date,
            StageDetail::Regret(d) => Some(d.followup_date),
            StageDetail::Future(d) => Some(d.followup_date),
        }
    }

    pub fn as_requirement(&self) -> Option<&RequirementDetails> {
        match self {
            StageDetail::Requirement(d) => Some(d),
            _ => None,
        }
    }

    /// Keeps commercial progress when a confirmed requirement is re-entered.
    pub(crate) fn carry_progress(&mut self, existing: &lead_detail::Model) {
        if let StageDetail::Requirement(req) = self {
            if let Some(stage) = existing.sales_stage {
                req.sales_stage = stage;
            }
            if req.followup_date.is_none() {
                req.followup_date = existing.followup_date;
            }
        }
    }

    /// Writes every payload column, nulling the ones other kinds own.
    pub(crate) fn write_columns(&self, active: &mut lead_detail::ActiveModel) -> Result<(), DbErr> {
        let client = self.client();
        active.kind = Set(self.kind());
        active.client_type_main = Set(client.main.clone());
        active.client_type_detail = Set(client.detail.clone());
        active.followup_date = Set(self.followup_date());

        active.tank_application = Set(None);
        active.tank_location = Set(None);
        active.tanks_json = Set(None);
        active.assigned_salesperson = Set(None);
        active.expected_delivery_date = Set(None);
        active.sales_stage = Set(None);
        active.tank_type = Set(None);
        active.tank_type_other = Set(None);
        active.expected_timeline = Set(None);

        match self {
            StageDetail::Requirement(d) => {
                let tanks =
                    serde_json::to_value(&d.tanks).map_err(|e| DbErr::Json(e.to_string()))?;
                active.remark = Set(d.current_remark.clone());
                active.tank_application = Set(Some(d.tank_application.clone()));
                active.tank_location = Set(d.tank_location.clone());
                active.tanks_json = Set(Some(tanks));
                active.assigned_salesperson = Set(Some(d.assigned_salesperson.clone()));
                active.expected_delivery_date = Set(d.expected_delivery_date);
                active.sales_stage = Set(Some(d.sales_stage));
            }
            StageDetail::Regret(d) => {
                active.remark = Set(Some(d.remark.clone()));
                active.tank_type = Set(Some(d.tank_type.clone()));
                active.tank_type_other = Set(d.tank_type_other.clone());
            }
            StageDetail::Future(d) => {
                active.remark = Set(Some(d.remark.clone()));
                active.expected_timeline = Set(d.expected_timeline.clone());
            }
        }
        Ok(())
    }
}

pub fn stage_for(kind: Kind) -> Stage {
    match kind {
        Kind::Requirement => Stage::RequirementYes,
        Kind::Regret => Stage::Regret,
        Kind::Future => Stage::Future,
    }
}

/// A persisted detail row decoded into its typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub id: i32,
    pub lead_id: i32,
    pub detail: StageDetail,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl DetailRecord {
    pub fn sales_stage(&self) -> Option<SalesStage> {
        self.detail.as_requirement().map(|r| r.sales_stage)
    }
}

fn corrupt(id: i32, column: &str) -> PipelineError {
    PipelineError::Db(DbErr::Custom(format!(
        "lead_detail {id} is missing required column {column}"
    )))
}

impl TryFrom<lead_detail::Model> for DetailRecord {
    type Error = PipelineError;

    fn try_from(model: lead_detail::Model) -> Result<Self, Self::Error> {
        let client = ClientClass {
            main: model.client_type_main,
            detail: model.client_type_detail,
        };
        let detail = match model.kind {
            Kind::Requirement => {
                let tanks = match model.tanks_json {
                    Some(value) => serde_json::from_value(value)
                        .map_err(|e| PipelineError::Db(DbErr::Json(e.to_string())))?,
                    None => Vec::new(),
                };
                StageDetail::Requirement(RequirementDetails {
                    client,
                    tank_application: model.tank_application.unwrap_or_default(),
                    tank_location: model.tank_location,
                    tanks,
                    assigned_salesperson: model.assigned_salesperson.unwrap_or_default(),
                    expected_delivery_date: model.expected_delivery_date,
                    followup_date: model.followup_date,
                    sales_stage: model.sales_stage.unwrap_or(SalesStage::CostingCreated),
                    current_remark: model.remark,
                })
            }
            Kind::Regret => StageDetail::Regret(RegretOffer {
                client,
                tank_type: model.tank_type.unwrap_or_default(),
                tank_type_other: model.tank_type_other,
                followup_date: model
                    .followup_date
                    .ok_or_else(|| corrupt(model.id, "followup_date"))?,
                remark: model.remark.unwrap_or_default(),
            }),
            Kind::Future => StageDetail::Future(FutureRequirement {
                client,
                followup_date: model
                    .followup_date
                    .ok_or_else(|| corrupt(model.id, "followup_date"))?,
                expected_timeline: model.expected_timeline,
                remark: model.remark.unwrap_or_default(),
            }),
        };
        Ok(DetailRecord {
            id: model.id,
            lead_id: model.lead_id,
            detail,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
