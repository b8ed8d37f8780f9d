//! Commercial stage machine for confirmed requirements, plus the meetings
//! and quotations hanging off them.

use chrono::{Duration, NaiveDate};
use entity::{
    lead::Stage,
    lead_detail::{self, SalesStage},
    meeting, quotation,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};

use crate::actor::Actor;
use crate::detail::{ClientClass, DetailRecord, RegretOffer, StageDetail};
use crate::error::{PipelineError, PipelineResult};
use crate::payload::{clean, required_date, required_text};
use crate::store;

pub const REGRET_FOLLOWUP_DAYS: i64 = 30;
pub const UNKNOWN_COMPETITOR: &str = "Not specified";

/// Moves a requirement to another sales stage. Always logged, even when the
/// stage does not change.
pub async fn update_sales_stage(
    db: &DatabaseConnection,
    requirement_id: i32,
    new_stage: SalesStage,
    remark: &str,
    followup_date: Option<NaiveDate>,
    actor: &Actor,
) -> PipelineResult<DetailRecord> {
    let remark = required_text("remark", remark)?;
    let span = info_span!("leads.update_sales_stage", requirement_id, to = new_stage.as_str());
    async move {
        let txn = db.begin().await?;
        let (_, row) = store::lock_requirement(&txn, requirement_id).await?;
        let old_stage = row.sales_stage.unwrap_or(SalesStage::CostingCreated);
        let lead_id = row.lead_id;

        let mut active: lead_detail::ActiveModel = row.into();
        active.sales_stage = Set(Some(new_stage));
        active.remark = Set(Some(remark.clone()));
        if let Some(date) = followup_date {
            active.followup_date = Set(Some(date));
        }
        active.updated_at = Set(store::now());
        let row = active.update(&txn).await?;

        store::append_stage_history(
            &txn,
            lead_id,
            old_stage.as_str(),
            new_stage.as_str(),
            actor,
            Some(remark),
        )
        .await?;
        txn.commit().await?;
        info!(from = old_stage.as_str(), "sales stage updated");
        DetailRecord::try_from(row)
    }
    .instrument(span)
    .await
}

/// Gives up on a requirement and parks the lead as a regret offer to be
/// followed up in a month.
pub async fn mark_regret(
    db: &DatabaseConnection,
    requirement_id: i32,
    final_remark: &str,
    actor: &Actor,
    today: NaiveDate,
) -> PipelineResult<DetailRecord> {
    let remark = required_text("remark", final_remark)?;
    let span = info_span!("leads.mark_regret", requirement_id);
    async move {
        let txn = db.begin().await?;
        let (lead, row) = store::lock_requirement(&txn, requirement_id).await?;
        let lead_id = lead.id;
        let offer = StageDetail::Regret(RegretOffer {
            client: ClientClass {
                main: row.client_type_main.clone(),
                detail: row.client_type_detail.clone(),
            },
            tank_type: UNKNOWN_COMPETITOR.to_owned(),
            tank_type_other: None,
            followup_date: today + Duration::days(REGRET_FOLLOWUP_DAYS),
            remark: remark.clone(),
        });
        store::retire_detail(&txn, row).await?;
        let (row, _) = store::upsert_detail(&txn, lead_id, offer.clone()).await?;
        store::apply_stage(&txn, lead, Stage::Regret, Some(&offer)).await?;
        store::append_stage_history(
            &txn,
            lead_id,
            Stage::RequirementYes.as_str(),
            Stage::Regret.as_str(),
            actor,
            Some(remark),
        )
        .await?;
        txn.commit().await?;
        info!(lead_id, "requirement moved to regret");
        DetailRecord::try_from(row)
    }
    .instrument(span)
    .await
}

async fn close_requirement(
    db: &DatabaseConnection,
    requirement_id: i32,
    outcome: SalesStage,
    final_remark: &str,
    actor: &Actor,
) -> PipelineResult<DetailRecord> {
    let remark = required_text("remark", final_remark)?;
    let span = info_span!("leads.close_requirement", requirement_id, outcome = outcome.as_str());
    async move {
        let txn = db.begin().await?;
        let (_, row) = store::lock_requirement(&txn, requirement_id).await?;
        let mut active: lead_detail::ActiveModel = row.into();
        active.sales_stage = Set(Some(outcome));
        active.remark = Set(Some(remark.clone()));
        active.updated_at = Set(store::now());
        let row = active.update(&txn).await?;

        // Logged after the write, so from and to carry the same value.
        let logged = row.sales_stage.unwrap_or(outcome).as_str();
        store::append_stage_history(&txn, row.lead_id, logged, logged, actor, Some(remark))
            .await?;
        txn.commit().await?;
        info!(lead_id = row.lead_id, "requirement closed");
        DetailRecord::try_from(row)
    }
    .instrument(span)
    .await
}

pub async fn mark_lost(
    db: &DatabaseConnection,
    requirement_id: i32,
    final_remark: &str,
    actor: &Actor,
) -> PipelineResult<DetailRecord> {
    close_requirement(db, requirement_id, SalesStage::OrderLost, final_remark, actor).await
}

pub async fn mark_customer(
    db: &DatabaseConnection,
    requirement_id: i32,
    final_remark: &str,
    actor: &Actor,
) -> PipelineResult<DetailRecord> {
    close_requirement(db, requirement_id, SalesStage::OrderCompleted, final_remark, actor).await
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingForm {
    pub meeting_date: Option<NaiveDate>,
    pub meeting_type: Option<meeting::MeetingType>,
    pub attendees: Option<String>,
    pub notes: Option<String>,
}

pub async fn schedule_meeting(
    db: &DatabaseConnection,
    requirement_id: i32,
    form: MeetingForm,
    actor: &Actor,
) -> PipelineResult<meeting::Model> {
    let meeting_date = required_date("meeting_date", form.meeting_date)?;
    let meeting_type = form
        .meeting_type
        .ok_or_else(|| PipelineError::missing("meeting_type"))?;
    let txn = db.begin().await?;
    store::lock_requirement(&txn, requirement_id).await?;
    let model = meeting::ActiveModel {
        requirement_id: Set(requirement_id),
        meeting_date: Set(meeting_date),
        meeting_type: Set(meeting_type),
        attendees: Set(clean(&form.attendees)),
        notes: Set(clean(&form.notes)),
        created_by: Set(actor.stamp()),
        created_at: Set(store::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(requirement_id, meeting_id = model.id, "meeting scheduled");
    Ok(model)
}

pub async fn record_meeting_outcome(
    db: &DatabaseConnection,
    meeting_id: i32,
    outcome: &str,
) -> PipelineResult<meeting::Model> {
    let outcome = required_text("outcome", outcome)?;
    let row = meeting::Entity::find_by_id(meeting_id)
        .one(db)
        .await?
        .ok_or_else(|| PipelineError::not_found("meeting", meeting_id))?;
    let mut active: meeting::ActiveModel = row.into();
    active.outcome = Set(Some(outcome));
    Ok(active.update(db).await?)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationForm {
    pub expected_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub quotation_number: Option<String>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuotationUpsert {
    pub quotation: quotation::Model,
    pub created: bool,
}

/// Each requirement tracks one quotation; repeated calls revise it. A
/// missing amount keeps the stored one.
pub async fn upsert_quotation(
    db: &DatabaseConnection,
    requirement_id: i32,
    form: QuotationForm,
    actor: &Actor,
) -> PipelineResult<QuotationUpsert> {
    let expected_date = required_date("expected_date", form.expected_date)?;
    if form.amount_cents.is_some_and(|amount| amount < 0) {
        return Err(PipelineError::validation("amount_cents", "must not be negative"));
    }
    let txn = db.begin().await?;
    store::lock_requirement(&txn, requirement_id).await?;
    let existing = quotation::Entity::find()
        .filter(quotation::Column::RequirementId.eq(requirement_id))
        .order_by_asc(quotation::Column::Id)
        .one(&txn)
        .await?;

    let (quotation, created) = match existing {
        Some(row) => {
            let mut active: quotation::ActiveModel = row.into();
            active.expected_date = Set(expected_date);
            active.actual_date = Set(form.actual_date);
            active.quotation_number = Set(clean(&form.quotation_number));
            active.notes = Set(clean(&form.notes));
            if let Some(amount) = form.amount_cents {
                active.amount_cents = Set(Some(amount));
            }
            (active.update(&txn).await?, false)
        }
        None => {
            let row = quotation::ActiveModel {
                requirement_id: Set(requirement_id),
                expected_date: Set(expected_date),
                actual_date: Set(form.actual_date),
                quotation_number: Set(clean(&form.quotation_number)),
                amount_cents: Set(form.amount_cents),
                notes: Set(clean(&form.notes)),
                created_by: Set(actor.stamp()),
                created_at: Set(store::now()),
                ..Default::default()
            };
            (row.insert(&txn).await?, true)
        }
    };
    txn.commit().await?;
    info!(requirement_id, created, "quotation saved");
    Ok(QuotationUpsert { quotation, created })
}
