//! Raw caller input for stage-changing operations and its validation.
//!
//! Everything arrives as optional fields; `validate` turns a form into the
//! typed detail or reports the first missing field.

use chrono::NaiveDate;
use entity::{call_history::Outcome, lead::Stage, lead_detail::SalesStage};
use serde::Deserialize;

use crate::detail::{
    ClientClass, FutureRequirement, RegretOffer, RequirementDetails, StageDetail, TankLine,
};
use crate::error::{PipelineError, PipelineResult};

/// Trimmed, non-blank copy of an optional text field.
pub(crate) fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

pub(crate) fn required(field: &'static str, value: &Option<String>) -> PipelineResult<String> {
    clean(value).ok_or_else(|| PipelineError::missing(field))
}

pub(crate) fn required_text(field: &'static str, value: &str) -> PipelineResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(PipelineError::missing(field))
    } else {
        Ok(value.to_owned())
    }
}

pub(crate) fn required_date(
    field: &'static str,
    value: Option<NaiveDate>,
) -> PipelineResult<NaiveDate> {
    value.ok_or_else(|| PipelineError::missing(field))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TankLineInput {
    pub tank_type: Option<String>,
    pub capacity: Option<String>,
    pub quantity: Option<u32>,
}

/// Keeps only complete rows, in order.
pub fn normalize_tanks(lines: &[TankLineInput]) -> Vec<TankLine> {
    lines
        .iter()
        .filter_map(|line| {
            Some(TankLine {
                tank_type: clean(&line.tank_type)?,
                capacity: clean(&line.capacity)?,
                quantity: line.quantity?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementForm {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub tank_application: Option<String>,
    pub tank_location: Option<String>,
    pub assigned_salesperson: Option<String>,
    pub expected_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub tanks: Vec<TankLineInput>,
    pub remark: Option<String>,
}

impl RequirementForm {
    pub fn validate(&self) -> PipelineResult<RequirementDetails> {
        let main = required("client_type_main", &self.client_type_main)?;
        let tank_application = required("tank_application", &self.tank_application)?;
        let assigned_salesperson = required("assigned_salesperson", &self.assigned_salesperson)?;
        let tanks = normalize_tanks(&self.tanks);
        if tanks.is_empty() {
            return Err(PipelineError::validation(
                "tanks",
                "needs at least one line with type, capacity and quantity",
            ));
        }
        Ok(RequirementDetails {
            client: ClientClass {
                main,
                detail: clean(&self.client_type_detail),
            },
            tank_application,
            tank_location: clean(&self.tank_location),
            tanks,
            assigned_salesperson,
            expected_delivery_date: self.expected_delivery_date,
            followup_date: None,
            sales_stage: SalesStage::CostingCreated,
            current_remark: clean(&self.remark),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegretForm {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub tank_type: Option<String>,
    pub tank_type_other: Option<String>,
    pub remark: Option<String>,
}

impl RegretForm {
    pub fn validate(&self) -> PipelineResult<RegretOffer> {
        Ok(RegretOffer {
            client: ClientClass {
                main: required("client_type_main", &self.client_type_main)?,
                detail: clean(&self.client_type_detail),
            },
            followup_date: required_date("followup_date", self.followup_date)?,
            tank_type: required("tank_type", &self.tank_type)?,
            tank_type_other: clean(&self.tank_type_other),
            remark: required("remark", &self.remark)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FutureForm {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub expected_timeline: Option<String>,
    pub remark: Option<String>,
}

impl FutureForm {
    pub fn validate(&self) -> PipelineResult<FutureRequirement> {
        Ok(FutureRequirement {
            client: ClientClass {
                main: required("client_type_main", &self.client_type_main)?,
                detail: clean(&self.client_type_detail),
            },
            followup_date: required_date("followup_date", self.followup_date)?,
            expected_timeline: clean(&self.expected_timeline),
            remark: required("remark", &self.remark)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconnectForm {
    pub followup_date: Option<NaiveDate>,
    pub remark: Option<String>,
}

/// The call itself, independent of its outcome.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CallLog {
    pub actual_call_date: Option<NaiveDate>,
    pub expected_call_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub enum CallOutcome {
    Yes(RequirementForm),
    Regret(RegretForm),
    Future(FutureForm),
    Reconnect(ReconnectForm),
}

impl CallOutcome {
    pub fn outcome(&self) -> Outcome {
        match self {
            CallOutcome::Yes(_) => Outcome::Yes,
            CallOutcome::Regret(_) => Outcome::Regret,
            CallOutcome::Future(_) => Outcome::Future,
            CallOutcome::Reconnect(_) => Outcome::Reconnect,
        }
    }

    pub fn target_stage(&self) -> Stage {
        match self {
            CallOutcome::Yes(_) => Stage::RequirementYes,
            CallOutcome::Regret(_) => Stage::Regret,
            CallOutcome::Future(_) => Stage::Future,
            CallOutcome::Reconnect(_) => Stage::Prospect,
        }
    }

    pub(crate) fn validate(&self) -> PipelineResult<CallPlan> {
        match self {
            CallOutcome::Yes(form) => {
                let details = form.validate()?;
                let remark = details.current_remark.clone().unwrap_or_default();
                Ok(CallPlan::Detail {
                    detail: StageDetail::Requirement(details),
                    remark,
                })
            }
            CallOutcome::Regret(form) => {
                let offer = form.validate()?;
                let remark = offer.remark.clone();
                Ok(CallPlan::Detail {
                    detail: StageDetail::Regret(offer),
                    remark,
                })
            }
            CallOutcome::Future(form) => {
                let future = form.validate()?;
                let remark = future.remark.clone();
                Ok(CallPlan::Detail {
                    detail: StageDetail::Future(future),
                    remark,
                })
            }
            CallOutcome::Reconnect(form) => Ok(CallPlan::Reconnect {
                followup_date: required_date("followup_date", form.followup_date)?,
                remark: required("remark", &form.remark)?,
            }),
        }
    }
}

/// Validated outcome, ready to be applied inside a transaction.
#[derive(Debug, Clone)]
pub(crate) enum CallPlan {
    Detail { detail: StageDetail, remark: String },
    Reconnect { followup_date: NaiveDate, remark: String },
}

/// Target of a full reclassification.
#[derive(Debug, Clone)]
pub enum Reclassification {
    Prospect,
    Requirement(RequirementForm),
    Regret(RegretForm),
    Future(FutureForm),
}

impl Reclassification {
    pub(crate) fn validate(&self) -> PipelineResult<Option<StageDetail>> {
        Ok(match self {
            Reclassification::Prospect => None,
            Reclassification::Requirement(form) => Some(StageDetail::Requirement(form.validate()?)),
            Reclassification::Regret(form) => Some(StageDetail::Regret(form.validate()?)),
            Reclassification::Future(form) => Some(StageDetail::Future(form.validate()?)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(t: Option<&str>, c: Option<&str>, q: Option<u32>) -> TankLineInput {
        TankLineInput {
            tank_type: t.map(Into::into),
            capacity: c.map(Into::into),
            quantity: q,
        }
    }

    fn requirement() -> RequirementForm {
        RequirementForm {
            client_type_main: Some("Industrial".into()),
            tank_application: Some("Water".into()),
            assigned_salesperson: Some("Meera".into()),
            tanks: vec![line(Some("FRP"), Some("1000L"), Some(1))],
            ..Default::default()
        }
    }

    #[test]
    fn partial_tank_rows_are_dropped() {
        let tanks = normalize_tanks(&[
            line(Some("FRP"), Some("1000L"), Some(2)),
            line(Some("Steel"), None, Some(1)),
            line(Some("  "), Some("500L"), Some(1)),
            line(Some("HDPE"), Some("200L"), None),
            line(Some(" PVC "), Some("50L"), Some(4)),
        ]);
        assert_eq!(tanks.len(), 2);
        assert_eq!(tanks[0].tank_type, "FRP");
        assert_eq!(tanks[1].tank_type, "PVC");
    }

    #[test]
    fn requirement_without_complete_tanks_fails_on_tanks() {
        let mut form = requirement();
        form.tanks = vec![line(Some("FRP"), None, Some(1))];
        let err = form.validate().unwrap_err();
        assert_eq!(err.field(), Some("tanks"));
    }

    #[test]
    fn requirement_checks_fields_in_order() {
        let mut form = requirement();
        form.client_type_main = Some("   ".into());
        form.tank_application = None;
        assert_eq!(form.validate().unwrap_err().field(), Some("client_type_main"));
    }

    #[test]
    fn new_requirement_starts_at_costing() {
        let details = requirement().validate().unwrap();
        assert_eq!(details.sales_stage, SalesStage::CostingCreated);
        assert!(details.current_remark.is_none());
    }

    #[test]
    fn regret_requires_competitor() {
        let form = RegretForm {
            client_type_main: Some("Retail".into()),
            followup_date: NaiveDate::from_ymd_opt(2026, 1, 5),
            remark: Some("price".into()),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err().field(), Some("tank_type"));
    }

    #[test]
    fn reconnect_requires_followup_date() {
        let outcome = CallOutcome::Reconnect(ReconnectForm {
            followup_date: None,
            remark: Some("call back".into()),
        });
        let err = outcome.validate().unwrap_err();
        assert_eq!(err.field(), Some("followup_date"));
        assert_eq!(outcome.target_stage(), Stage::Prospect);
    }
}
