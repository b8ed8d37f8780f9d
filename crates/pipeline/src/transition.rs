//! Lead-level state machine: prospect calls and the moves between the
//! requirement, future and regret buckets.

use chrono::NaiveDate;
use entity::{
    call_history::{self, Outcome},
    lead::{self, Stage},
    lead_detail,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};

use crate::actor::{Actor, Role};
use crate::detail::{DetailRecord, StageDetail};
use crate::error::{PipelineError, PipelineResult};
use crate::payload::{
    clean, required_date, CallLog, CallOutcome, CallPlan, Reclassification, RequirementForm,
};
use crate::store::{self, CallEntry};

#[derive(Debug, Clone)]
pub struct TransitionResult {
    pub lead: lead::Model,
    pub call: call_history::Model,
    pub detail: Option<DetailRecord>,
    pub previous_stage: Stage,
}

impl TransitionResult {
    pub fn stage_changed(&self) -> bool {
        self.previous_stage != self.lead.stage
    }
}

#[derive(Debug, Clone)]
pub struct StageChange {
    pub lead: lead::Model,
    pub detail: Option<DetailRecord>,
}

fn stage_note(detail: &StageDetail) -> String {
    match detail {
        StageDetail::Requirement(_) => "Converted to Requirement Yes".to_owned(),
        StageDetail::Regret(offer) => {
            format!("Moved to Regret Offer. Competitor: {}", offer.tank_type)
        }
        StageDetail::Future(_) => "Moved to Future Requirement".to_owned(),
    }
}

/// Records a call on a prospect and applies its outcome.
///
/// A lead outside `prospect` only accepts the outcome that targets its
/// current stage, which updates the existing detail in place.
pub async fn transition(
    db: &DatabaseConnection,
    lead_id: i32,
    call: CallLog,
    outcome: CallOutcome,
    actor: &Actor,
) -> PipelineResult<TransitionResult> {
    actor.require(Role::Marketing, "log prospect calls")?;
    let actual_call_date = required_date("actual_call_date", call.actual_call_date)?;
    let plan = outcome.validate()?;
    let target = outcome.target_stage();
    let kind = outcome.outcome();

    let span = info_span!("leads.transition", lead_id, outcome = kind.as_str());
    async move {
        let txn = db.begin().await?;
        let lead = store::lock_lead(&txn, lead_id).await?;
        let previous_stage = lead.stage;
        if previous_stage != Stage::Prospect && previous_stage != target {
            return Err(PipelineError::guard(
                lead_id,
                format!("{} or {}", Stage::Prospect.as_str(), target.as_str()),
                previous_stage.as_str(),
            ));
        }

        let (lead, call, detail) = match plan {
            CallPlan::Detail { detail, remark } => {
                let call = store::append_call(
                    &txn,
                    lead_id,
                    CallEntry {
                        expected_call_date: call.expected_call_date,
                        actual_call_date,
                        outcome: kind,
                        remark,
                    },
                    actor,
                )
                .await?;
                let note = stage_note(&detail);
                let (row, _) = store::upsert_detail(&txn, lead_id, detail.clone()).await?;
                let lead = store::apply_stage(&txn, lead, target, Some(&detail)).await?;
                if previous_stage != target {
                    store::append_stage_history(
                        &txn,
                        lead_id,
                        previous_stage.as_str(),
                        target.as_str(),
                        actor,
                        Some(note),
                    )
                    .await?;
                }
                (lead, call, Some(DetailRecord::try_from(row)?))
            }
            CallPlan::Reconnect {
                followup_date,
                remark,
            } => {
                let call = store::append_call(
                    &txn,
                    lead_id,
                    CallEntry {
                        expected_call_date: Some(followup_date),
                        actual_call_date,
                        outcome: Outcome::Reconnect,
                        remark: remark.clone(),
                    },
                    actor,
                )
                .await?;
                let mut active: lead::ActiveModel = lead.into();
                active.last_call_date = Set(Some(actual_call_date));
                active.last_remark = Set(Some(remark));
                active.updated_at = Set(store::now());
                (active.update(&txn).await?, call, None)
            }
        };

        txn.commit().await?;
        info!(
            from = previous_stage.as_str(),
            to = lead.stage.as_str(),
            call_id = call.id,
            "call recorded"
        );
        Ok(TransitionResult {
            lead,
            call,
            detail,
            previous_stage,
        })
    }
    .instrument(span)
    .await
}

/// Deletes whatever detail the lead has and moves it to the target stage.
/// Prospects may only be reclassified by marketing.
pub async fn reclassify(
    db: &DatabaseConnection,
    lead_id: i32,
    target: Reclassification,
    actor: &Actor,
    notes: Option<String>,
) -> PipelineResult<StageChange> {
    let detail = target.validate()?;
    let stage = detail.as_ref().map(StageDetail::stage).unwrap_or(Stage::Prospect);
    let notes = clean(&notes);

    let span = info_span!("leads.reclassify", lead_id, to = stage.as_str());
    async move {
        let txn = db.begin().await?;
        let lead = store::lock_lead(&txn, lead_id).await?;
        let from = lead.stage;
        if from == Stage::Prospect {
            actor.require(Role::Marketing, "reclassify prospects")?;
        }
        store::clear_details(&txn, lead_id).await?;
        let row = match &detail {
            Some(detail) => Some(store::insert_detail(&txn, lead_id, detail).await?),
            None => None,
        };
        let lead = store::apply_stage(&txn, lead, stage, detail.as_ref()).await?;
        store::append_stage_history(&txn, lead_id, from.as_str(), stage.as_str(), actor, notes)
            .await?;
        txn.commit().await?;
        info!(from = from.as_str(), "lead reclassified");
        Ok(StageChange {
            lead,
            detail: row.map(DetailRecord::try_from).transpose()?,
        })
    }
    .instrument(span)
    .await
}

/// Promotes a future requirement. The requirement is always created fresh.
pub async fn convert_future_to_requirement(
    db: &DatabaseConnection,
    lead_id: i32,
    form: RequirementForm,
    actor: &Actor,
) -> PipelineResult<StageChange> {
    let detail = StageDetail::Requirement(form.validate()?);
    let span = info_span!("leads.convert_future", lead_id);
    async move {
        let txn = db.begin().await?;
        let lead = store::lock_lead(&txn, lead_id).await?;
        store::ensure_stage(&lead, Stage::Future)?;
        store::clear_details(&txn, lead_id).await?;
        let row = store::insert_detail(&txn, lead_id, &detail).await?;
        let lead = store::apply_stage(&txn, lead, Stage::RequirementYes, Some(&detail)).await?;
        store::append_stage_history(
            &txn,
            lead_id,
            Stage::Future.as_str(),
            Stage::RequirementYes.as_str(),
            actor,
            Some("Converted from Future Requirement to Requirement Yes".to_owned()),
        )
        .await?;
        txn.commit().await?;
        info!("future requirement converted");
        Ok(StageChange {
            lead,
            detail: Some(DetailRecord::try_from(row)?),
        })
    }
    .instrument(span)
    .await
}

/// Sends a regret offer back to the prospect pool.
pub async fn reengage_regret(
    db: &DatabaseConnection,
    lead_id: i32,
    actor: &Actor,
) -> PipelineResult<lead::Model> {
    let span = info_span!("leads.reengage_regret", lead_id);
    async move {
        let txn = db.begin().await?;
        let lead = store::lock_lead(&txn, lead_id).await?;
        store::ensure_stage(&lead, Stage::Regret)?;
        store::clear_details(&txn, lead_id).await?;
        let lead = store::apply_stage(&txn, lead, Stage::Prospect, None).await?;
        store::append_stage_history(
            &txn,
            lead_id,
            Stage::Regret.as_str(),
            Stage::Prospect.as_str(),
            actor,
            Some("Re-engaged from Regret Offer".to_owned()),
        )
        .await?;
        txn.commit().await?;
        info!("regret offer re-engaged");
        Ok(lead)
    }
    .instrument(span)
    .await
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowupUpdate {
    pub followup_date: Option<NaiveDate>,
    pub remark: Option<String>,
    pub actual_call_date: Option<NaiveDate>,
}

async fn locked_detail<C: sea_orm::ConnectionTrait>(
    conn: &C,
    lead_id: i32,
    stage: Stage,
) -> PipelineResult<lead_detail::Model> {
    let lead = store::lock_lead(conn, lead_id).await?;
    store::ensure_stage(&lead, stage)?;
    store::find_detail(conn, lead_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("lead_detail", lead_id))
}

fn apply_followup(row: lead_detail::Model, update: &FollowupUpdate) -> lead_detail::ActiveModel {
    let remark = clean(&update.remark);
    let mut active: lead_detail::ActiveModel = row.into();
    if let Some(date) = update.followup_date {
        active.followup_date = Set(Some(date));
    }
    if remark.is_some() {
        active.remark = Set(remark);
    }
    active.updated_at = Set(store::now());
    active
}

/// Records a follow-up call on a future requirement.
pub async fn update_future_followup(
    db: &DatabaseConnection,
    lead_id: i32,
    update: FollowupUpdate,
    actor: &Actor,
) -> PipelineResult<DetailRecord> {
    let actual_call_date = required_date("actual_call_date", update.actual_call_date)?;
    let span = info_span!("leads.update_future_followup", lead_id);
    async move {
        let txn = db.begin().await?;
        let row = locked_detail(&txn, lead_id, Stage::Future).await?;
        let remark = clean(&update.remark)
            .or_else(|| row.remark.clone())
            .unwrap_or_default();
        let row = apply_followup(row, &update).update(&txn).await?;
        store::append_call(
            &txn,
            lead_id,
            CallEntry {
                expected_call_date: row.followup_date,
                actual_call_date,
                outcome: Outcome::Future,
                remark,
            },
            actor,
        )
        .await?;
        txn.commit().await?;
        info!("future follow-up updated");
        DetailRecord::try_from(row)
    }
    .instrument(span)
    .await
}

pub async fn update_regret_followup(
    db: &DatabaseConnection,
    lead_id: i32,
    update: FollowupUpdate,
) -> PipelineResult<DetailRecord> {
    let span = info_span!("leads.update_regret_followup", lead_id);
    async move {
        let txn = db.begin().await?;
        let row = locked_detail(&txn, lead_id, Stage::Regret).await?;
        let row = apply_followup(row, &update).update(&txn).await?;
        txn.commit().await?;
        DetailRecord::try_from(row)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::{ClientClass, RegretOffer};

    #[test]
    fn regret_note_names_competitor() {
        let detail = StageDetail::Regret(RegretOffer {
            client: ClientClass {
                main: "Retail".into(),
                detail: None,
            },
            tank_type: "Sintex".into(),
            tank_type_other: None,
            followup_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            remark: "price".into(),
        });
        assert_eq!(stage_note(&detail), "Moved to Regret Offer. Competitor: Sintex");
    }
}
