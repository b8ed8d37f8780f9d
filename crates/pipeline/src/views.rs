//! Read-only projections of the pipeline: bucket lists, the follow-up queue,
//! stage-guarded detail readers and the per-lead timeline.

use chrono::{Duration, NaiveDate};
use entity::{
    additional_contact, call_history,
    lead::{self, Stage},
    lead_detail::{self, Kind, SalesStage},
    meeting, quotation, stage_history,
};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select,
};

use crate::actor::{Actor, Role};
use crate::detail::DetailRecord;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::UPCOMING_WINDOW_DAYS;
use crate::store;

#[derive(Debug, Clone)]
pub struct LeadWithDetail {
    pub lead: lead::Model,
    pub detail: DetailRecord,
}

#[derive(Debug, Clone)]
pub struct FollowupItem {
    pub lead: lead::Model,
    pub detail: DetailRecord,
    pub due: NaiveDate,
    pub overdue: bool,
}

#[derive(Debug, Clone)]
pub struct LeadTimeline {
    pub lead: lead::Model,
    pub detail: Option<DetailRecord>,
    pub calls: Vec<call_history::Model>,
    pub stage_history: Vec<stage_history::Model>,
    pub meetings: Vec<meeting::Model>,
    pub quotations: Vec<quotation::Model>,
    pub contacts: Vec<additional_contact::Model>,
}

/// Timeline of a closed requirement plus when it was closed.
#[derive(Debug, Clone)]
pub struct Journey {
    pub timeline: LeadTimeline,
    pub closed_at: Option<DateTimeWithTimeZone>,
}

async fn with_leads(
    db: &DatabaseConnection,
    query: Select<lead_detail::Entity>,
) -> PipelineResult<Vec<LeadWithDetail>> {
    let rows = query.find_also_related(lead::Entity).all(db).await?;
    rows.into_iter()
        .filter_map(|(detail, lead)| lead.map(|lead| (detail, lead)))
        .map(|(detail, lead)| {
            Ok(LeadWithDetail {
                lead,
                detail: DetailRecord::try_from(detail)?,
            })
        })
        .collect()
}

fn requirements() -> Select<lead_detail::Entity> {
    lead_detail::Entity::find().filter(lead_detail::Column::Kind.eq(Kind::Requirement))
}

/// Marketing works the prospect pool, sales works confirmed requirements.
pub async fn lead_list(
    db: &DatabaseConnection,
    actor: &Actor,
) -> PipelineResult<Vec<lead::Model>> {
    let stage = match actor.role {
        Role::Marketing => Stage::Prospect,
        Role::Sales => Stage::RequirementYes,
    };
    Ok(lead::Entity::find()
        .filter(lead::Column::Stage.eq(stage))
        .order_by_desc(lead::Column::CreatedAt)
        .order_by_desc(lead::Column::Id)
        .all(db)
        .await?)
}

pub async fn active_requirements(
    db: &DatabaseConnection,
) -> PipelineResult<Vec<LeadWithDetail>> {
    let query = requirements()
        .filter(
            Condition::any()
                .add(lead_detail::Column::SalesStage.is_null())
                .add(
                    lead_detail::Column::SalesStage
                        .is_not_in([SalesStage::OrderCompleted, SalesStage::OrderLost]),
                ),
        )
        .order_by_desc(lead_detail::Column::UpdatedAt)
        .order_by_desc(lead_detail::Column::Id);
    with_leads(db, query).await
}

async fn closed_with(
    db: &DatabaseConnection,
    stage: SalesStage,
) -> PipelineResult<Vec<LeadWithDetail>> {
    let query = requirements()
        .filter(lead_detail::Column::SalesStage.eq(stage))
        .order_by_desc(lead_detail::Column::UpdatedAt)
        .order_by_desc(lead_detail::Column::Id);
    with_leads(db, query).await
}

pub async fn customers(db: &DatabaseConnection) -> PipelineResult<Vec<LeadWithDetail>> {
    closed_with(db, SalesStage::OrderCompleted).await
}

pub async fn lost_orders(db: &DatabaseConnection) -> PipelineResult<Vec<LeadWithDetail>> {
    closed_with(db, SalesStage::OrderLost).await
}

async fn by_followup(db: &DatabaseConnection, kind: Kind) -> PipelineResult<Vec<LeadWithDetail>> {
    let query = lead_detail::Entity::find()
        .filter(lead_detail::Column::Kind.eq(kind))
        .order_by_desc(lead_detail::Column::FollowupDate)
        .order_by_desc(lead_detail::Column::Id);
    with_leads(db, query).await
}

pub async fn future_requirements(db: &DatabaseConnection) -> PipelineResult<Vec<LeadWithDetail>> {
    by_followup(db, Kind::Future).await
}

pub async fn regret_offers(db: &DatabaseConnection) -> PipelineResult<Vec<LeadWithDetail>> {
    by_followup(db, Kind::Regret).await
}

/// Future and regret leads due within the upcoming window, soonest first.
/// Overdue entries stay in the queue until they are followed up.
pub async fn followup_queue(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> PipelineResult<Vec<FollowupItem>> {
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
    let query = lead_detail::Entity::find()
        .filter(lead_detail::Column::Kind.is_in([Kind::Future, Kind::Regret]))
        .filter(lead_detail::Column::FollowupDate.lte(horizon))
        .order_by_asc(lead_detail::Column::FollowupDate)
        .order_by_asc(lead_detail::Column::Id);
    Ok(with_leads(db, query)
        .await?
        .into_iter()
        .filter_map(|item| {
            let due = item.detail.detail.followup_date()?;
            Some(FollowupItem {
                lead: item.lead,
                detail: item.detail,
                due,
                overdue: due < today,
            })
        })
        .collect())
}

async fn detail_for_stage(
    db: &DatabaseConnection,
    lead_id: i32,
    stage: Stage,
) -> PipelineResult<LeadWithDetail> {
    let lead = store::find_lead(db, lead_id).await?;
    store::ensure_stage(&lead, stage)?;
    let row = store::find_detail(db, lead_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("lead_detail", lead_id))?;
    Ok(LeadWithDetail {
        lead,
        detail: DetailRecord::try_from(row)?,
    })
}

pub async fn requirement_for_lead(
    db: &DatabaseConnection,
    lead_id: i32,
) -> PipelineResult<LeadWithDetail> {
    detail_for_stage(db, lead_id, Stage::RequirementYes).await
}

pub async fn regret_for_lead(
    db: &DatabaseConnection,
    lead_id: i32,
) -> PipelineResult<LeadWithDetail> {
    detail_for_stage(db, lead_id, Stage::Regret).await
}

pub async fn future_for_lead(
    db: &DatabaseConnection,
    lead_id: i32,
) -> PipelineResult<LeadWithDetail> {
    detail_for_stage(db, lead_id, Stage::Future).await
}

async fn journey(
    db: &DatabaseConnection,
    lead_id: i32,
    closed: SalesStage,
) -> PipelineResult<Journey> {
    let current = requirement_for_lead(db, lead_id).await?;
    let actual = current.detail.sales_stage().unwrap_or(SalesStage::CostingCreated);
    if actual != closed {
        return Err(PipelineError::guard(lead_id, closed.as_str(), actual.as_str()));
    }
    let timeline = lead_timeline(db, lead_id).await?;
    let closed_at = timeline
        .stage_history
        .iter()
        .find(|h| h.to_stage == closed.as_str())
        .map(|h| h.changed_at);
    Ok(Journey { timeline, closed_at })
}

pub async fn customer_journey(db: &DatabaseConnection, lead_id: i32) -> PipelineResult<Journey> {
    journey(db, lead_id, SalesStage::OrderCompleted).await
}

pub async fn lost_order_journey(db: &DatabaseConnection, lead_id: i32) -> PipelineResult<Journey> {
    journey(db, lead_id, SalesStage::OrderLost).await
}

pub async fn lead_timeline(db: &DatabaseConnection, lead_id: i32) -> PipelineResult<LeadTimeline> {
    let lead = store::find_lead(db, lead_id).await?;
    let detail = store::find_detail(db, lead_id).await?;

    let calls = call_history::Entity::find()
        .filter(call_history::Column::LeadId.eq(lead_id))
        .order_by_desc(call_history::Column::ActualCallDate)
        .order_by_desc(call_history::Column::Id)
        .all(db)
        .await?;
    let stage_history = stage_history::Entity::find()
        .filter(stage_history::Column::LeadId.eq(lead_id))
        .order_by_desc(stage_history::Column::ChangedAt)
        .order_by_desc(stage_history::Column::Id)
        .all(db)
        .await?;
    let contacts = additional_contact::Entity::find()
        .filter(additional_contact::Column::LeadId.eq(lead_id))
        .order_by_asc(additional_contact::Column::Id)
        .all(db)
        .await?;

    let (meetings, quotations) = match &detail {
        Some(row) if row.kind == Kind::Requirement => (
            meeting::Entity::find()
                .filter(meeting::Column::RequirementId.eq(row.id))
                .order_by_desc(meeting::Column::MeetingDate)
                .order_by_desc(meeting::Column::Id)
                .all(db)
                .await?,
            quotation::Entity::find()
                .filter(quotation::Column::RequirementId.eq(row.id))
                .order_by_asc(quotation::Column::Id)
                .all(db)
                .await?,
        ),
        _ => (Vec::new(), Vec::new()),
    };

    Ok(LeadTimeline {
        lead,
        detail: detail.map(DetailRecord::try_from).transpose()?,
        calls,
        stage_history,
        meetings,
        quotations,
        contacts,
    })
}
