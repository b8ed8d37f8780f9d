//! Row-level helpers shared by the engine. All of them take a generic
//! connection so they run inside the caller's transaction.

use chrono::{NaiveDate, Utc};
use entity::{call_history, lead, lead_detail, meeting, quotation, stage_history};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    ModelTrait, QueryFilter, QuerySelect, Set,
};

use crate::actor::Actor;
use crate::detail::StageDetail;
use crate::error::{PipelineError, PipelineResult};

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub(crate) async fn find_lead<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
) -> PipelineResult<lead::Model> {
    lead::Entity::find_by_id(lead_id)
        .one(conn)
        .await?
        .ok_or_else(|| PipelineError::not_found("lead", lead_id))
}

/// Reads the lead with `FOR UPDATE` where the backend supports row locks.
pub(crate) async fn lock_lead<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
) -> PipelineResult<lead::Model> {
    lead::Entity::find_by_id(lead_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| PipelineError::not_found("lead", lead_id))
}

pub(crate) fn ensure_stage(lead: &lead::Model, expected: lead::Stage) -> PipelineResult<()> {
    if lead.stage == expected {
        Ok(())
    } else {
        Err(PipelineError::guard(lead.id, expected.as_str(), lead.stage.as_str()))
    }
}

pub(crate) async fn find_detail<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
) -> PipelineResult<Option<lead_detail::Model>> {
    Ok(lead_detail::Entity::find()
        .filter(lead_detail::Column::LeadId.eq(lead_id))
        .one(conn)
        .await?)
}

/// Loads a requirement row and locks its lead, which must still be in
/// `requirement_yes`.
pub(crate) async fn lock_requirement<C: ConnectionTrait>(
    conn: &C,
    requirement_id: i32,
) -> PipelineResult<(lead::Model, lead_detail::Model)> {
    let detail = lead_detail::Entity::find_by_id(requirement_id)
        .one(conn)
        .await?
        .filter(|d| d.kind == lead_detail::Kind::Requirement)
        .ok_or_else(|| PipelineError::not_found("requirement", requirement_id))?;
    let lead = lock_lead(conn, detail.lead_id).await?;
    ensure_stage(&lead, lead::Stage::RequirementYes)?;
    Ok((lead, detail))
}

/// Deletes a detail row together with the meetings and quotations it owns.
pub(crate) async fn retire_detail<C: ConnectionTrait>(
    conn: &C,
    detail: lead_detail::Model,
) -> PipelineResult<()> {
    meeting::Entity::delete_many()
        .filter(meeting::Column::RequirementId.eq(detail.id))
        .exec(conn)
        .await?;
    quotation::Entity::delete_many()
        .filter(quotation::Column::RequirementId.eq(detail.id))
        .exec(conn)
        .await?;
    detail.delete(conn).await?;
    Ok(())
}

pub(crate) async fn clear_details<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
) -> PipelineResult<()> {
    if let Some(existing) = find_detail(conn, lead_id).await? {
        retire_detail(conn, existing).await?;
    }
    Ok(())
}

pub(crate) async fn insert_detail<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
    detail: &StageDetail,
) -> PipelineResult<lead_detail::Model> {
    let ts = now();
    let mut active = lead_detail::ActiveModel {
        lead_id: Set(lead_id),
        created_at: Set(ts),
        updated_at: Set(ts),
        ..Default::default()
    };
    detail.write_columns(&mut active)?;
    Ok(active.insert(conn).await?)
}

pub(crate) async fn update_detail<C: ConnectionTrait>(
    conn: &C,
    existing: lead_detail::Model,
    detail: &StageDetail,
) -> PipelineResult<lead_detail::Model> {
    let mut active: lead_detail::ActiveModel = existing.into();
    detail.write_columns(&mut active)?;
    active.updated_at = Set(now());
    Ok(active.update(conn).await?)
}

/// Updates a detail of the same kind in place, otherwise retires whatever is
/// there and inserts a new row. Returns the row and whether it was created.
pub(crate) async fn upsert_detail<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
    mut detail: StageDetail,
) -> PipelineResult<(lead_detail::Model, bool)> {
    match find_detail(conn, lead_id).await? {
        Some(existing) if existing.kind == detail.kind() => {
            detail.carry_progress(&existing);
            Ok((update_detail(conn, existing, &detail).await?, false))
        }
        Some(existing) => {
            retire_detail(conn, existing).await?;
            Ok((insert_detail(conn, lead_id, &detail).await?, true))
        }
        None => Ok((insert_detail(conn, lead_id, &detail).await?, true)),
    }
}

pub(crate) struct CallEntry {
    pub expected_call_date: Option<NaiveDate>,
    pub actual_call_date: NaiveDate,
    pub outcome: call_history::Outcome,
    pub remark: String,
}

pub(crate) async fn append_call<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
    entry: CallEntry,
    actor: &Actor,
) -> PipelineResult<call_history::Model> {
    let row = call_history::ActiveModel {
        lead_id: Set(lead_id),
        expected_call_date: Set(entry.expected_call_date),
        actual_call_date: Set(entry.actual_call_date),
        outcome: Set(entry.outcome),
        remark: Set(entry.remark),
        created_by: Set(actor.stamp()),
        created_at: Set(now()),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

pub(crate) async fn append_stage_history<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
    from: &str,
    to: &str,
    actor: &Actor,
    notes: Option<String>,
) -> PipelineResult<stage_history::Model> {
    let row = stage_history::ActiveModel {
        lead_id: Set(lead_id),
        from_stage: Set(from.to_owned()),
        to_stage: Set(to.to_owned()),
        changed_by: Set(actor.stamp()),
        changed_at: Set(now()),
        notes: Set(notes),
        ..Default::default()
    };
    Ok(row.insert(conn).await?)
}

/// Moves the lead to the detail's stage and mirrors its classification.
pub(crate) async fn apply_stage<C: ConnectionTrait>(
    conn: &C,
    lead: lead::Model,
    stage: lead::Stage,
    detail: Option<&StageDetail>,
) -> PipelineResult<lead::Model> {
    let mut active: lead::ActiveModel = lead.into();
    active.stage = Set(stage);
    if let Some(detail) = detail {
        let client = detail.client();
        active.client_type_main = Set(Some(client.main.clone()));
        active.client_type_detail = Set(client.detail.clone());
    }
    active.updated_at = Set(now());
    Ok(active.update(conn).await?)
}
