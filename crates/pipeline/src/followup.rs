//! Automated follow-up cadence for prospects waiting on a reconnect.
//!
//! A cycle starts at the most recent reconnect call logged by a person. Each
//! automated follow-up is itself a reconnect row whose remark carries
//! [`FOLLOWUP_MARKER`]; at most [`MAX_FOLLOWUPS`] are sent per cycle.

use chrono::NaiveDate;
use entity::{
    call_history::{self, Outcome},
    lead::{self, Stage},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::actor::Actor;
use crate::error::{PipelineError, PipelineResult};
use crate::store::{self, CallEntry};

pub const FOLLOWUP_MARKER: &str = "Followup Sent";
pub const MAX_FOLLOWUPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowupStatus {
    pub count: usize,
    pub can_send: bool,
    pub cycle_start_date: Option<NaiveDate>,
    pub in_cycle: bool,
}

fn is_automated(row: &call_history::Model) -> bool {
    row.outcome == Outcome::Reconnect && row.remark.starts_with(FOLLOWUP_MARKER)
}

/// Computes the cadence from call history ordered newest first.
pub fn cadence(history: &[call_history::Model]) -> FollowupStatus {
    let cycle_start = history
        .iter()
        .find(|row| !is_automated(row))
        .filter(|row| row.outcome == Outcome::Reconnect)
        .map(|row| row.actual_call_date);

    let count = match cycle_start {
        Some(start) => history
            .iter()
            .filter(|row| is_automated(row) && row.actual_call_date >= start)
            .count(),
        None => 0,
    };

    FollowupStatus {
        count,
        can_send: count < MAX_FOLLOWUPS,
        cycle_start_date: cycle_start,
        in_cycle: cycle_start.is_some(),
    }
}

async fn history_newest_first<C: ConnectionTrait>(
    conn: &C,
    lead_id: i32,
) -> PipelineResult<Vec<call_history::Model>> {
    Ok(call_history::Entity::find()
        .filter(call_history::Column::LeadId.eq(lead_id))
        .order_by_desc(call_history::Column::ActualCallDate)
        .order_by_desc(call_history::Column::Id)
        .all(conn)
        .await?)
}

pub async fn followup_status(
    db: &DatabaseConnection,
    lead_id: i32,
) -> PipelineResult<FollowupStatus> {
    store::find_lead(db, lead_id).await?;
    Ok(cadence(&history_newest_first(db, lead_id).await?))
}

#[derive(Debug, Clone)]
pub struct FollowupSent {
    pub call: call_history::Model,
    pub status: FollowupStatus,
}

/// Logs the next automated follow-up for a prospect. Sends require a cycle
/// opened by a manual reconnect call. The cap is checked under the lead lock
/// so concurrent sends cannot overshoot it.
pub async fn send_followup(
    db: &DatabaseConnection,
    lead_id: i32,
    actor: &Actor,
    today: NaiveDate,
) -> PipelineResult<FollowupSent> {
    let span = info_span!("leads.send_followup", lead_id);
    async move {
        let txn = db.begin().await?;
        let lead = store::lock_lead(&txn, lead_id).await?;
        store::ensure_stage(&lead, Stage::Prospect)?;
        let before = cadence(&history_newest_first(&txn, lead_id).await?);
        if !before.in_cycle {
            return Err(PipelineError::guard(
                lead_id,
                "an open reconnect cycle",
                "prospect with no reconnect cycle",
            ));
        }
        if !before.can_send {
            return Err(PipelineError::Capacity {
                lead_id,
                limit: MAX_FOLLOWUPS,
            });
        }

        let sequence = before.count + 1;
        let remark = format!("{FOLLOWUP_MARKER} {sequence}");
        let call = store::append_call(
            &txn,
            lead_id,
            CallEntry {
                expected_call_date: None,
                actual_call_date: today,
                outcome: Outcome::Reconnect,
                remark: remark.clone(),
            },
            actor,
        )
        .await?;
        let mut active: lead::ActiveModel = lead.into();
        active.last_call_date = Set(Some(today));
        active.last_remark = Set(Some(remark));
        active.updated_at = Set(store::now());
        let lead = active.update(&txn).await?;

        let status = cadence(&history_newest_first(&txn, lead_id).await?);
        txn.commit().await?;
        info!(
            sequence,
            email = lead.contact_email.as_deref().unwrap_or_default(),
            "follow-up email queued (delivery disabled)"
        );
        Ok(FollowupSent { call, status })
    }
    .instrument(span)
    .await
}
