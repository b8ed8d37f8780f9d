use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Schema, ID};
use chrono::{NaiveDate, Utc};
use pipeline::{Actor, CallLog, DuplicateQuery};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::{gql, ApiError};
use crate::types::*;

pub struct AppSchema(pub Schema<QueryRoot, MutationRoot, EmptySubscription>);

pub fn build_schema(db: Arc<DatabaseConnection>) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    async fn leads(&self) -> LeadsQuery {
        LeadsQuery
    }
}

#[Object]
impl MutationRoot {
    async fn leads(&self) -> LeadsMutation {
        LeadsMutation
    }
}

#[derive(Default)]
pub struct LeadsQuery;

#[derive(Default)]
pub struct LeadsMutation;

type GqlResult<T> = async_graphql::Result<T>;

#[Object]
impl LeadsQuery {
    /// Work list for the caller's role.
    async fn list(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadNode>> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let leads = pipeline::lead_list(db.as_ref(), &actor)
            .await
            .map_err(gql)?;
        Ok(leads.into_iter().map(Into::into).collect())
    }

    async fn lead(&self, ctx: &Context<'_>, id: ID) -> GqlResult<LeadNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let lead = pipeline::get_lead(db.as_ref(), parse_id(&id)?)
            .await
            .map_err(gql)?;
        Ok(lead.into())
    }

    async fn timeline(&self, ctx: &Context<'_>, lead_id: ID) -> GqlResult<TimelineNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let timeline = pipeline::lead_timeline(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(timeline.into())
    }

    async fn active_requirements(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadWithDetailNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::active_requirements(db.as_ref())
            .await
            .map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn customers(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadWithDetailNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::customers(db.as_ref()).await.map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn lost_orders(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadWithDetailNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::lost_orders(db.as_ref()).await.map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn future_requirements(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadWithDetailNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::future_requirements(db.as_ref())
            .await
            .map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn regret_offers(&self, ctx: &Context<'_>) -> GqlResult<Vec<LeadWithDetailNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::regret_offers(db.as_ref()).await.map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Future and regret leads whose follow-up falls within the upcoming window.
    async fn followup_queue(
        &self,
        ctx: &Context<'_>,
        today: Option<NaiveDate>,
    ) -> GqlResult<Vec<FollowupItemNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = pipeline::followup_queue(db.as_ref(), today_or_now(today))
            .await
            .map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn requirement_for_lead(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
    ) -> GqlResult<LeadWithDetailNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let row = pipeline::requirement_for_lead(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(row.into())
    }

    async fn regret_for_lead(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
    ) -> GqlResult<LeadWithDetailNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let row = pipeline::regret_for_lead(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(row.into())
    }

    async fn future_for_lead(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
    ) -> GqlResult<LeadWithDetailNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let row = pipeline::future_for_lead(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(row.into())
    }

    async fn customer_journey(&self, ctx: &Context<'_>, lead_id: ID) -> GqlResult<JourneyNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let journey = pipeline::customer_journey(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(journey.into())
    }

    async fn lost_order_journey(&self, ctx: &Context<'_>, lead_id: ID) -> GqlResult<JourneyNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let journey = pipeline::lost_order_journey(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(journey.into())
    }

    async fn followup_status(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
    ) -> GqlResult<FollowupStatusNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let status = pipeline::followup_status(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(status.into())
    }

    async fn duplicates(
        &self,
        ctx: &Context<'_>,
        input: DuplicateCheckInput,
    ) -> GqlResult<Vec<DuplicateNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let query = DuplicateQuery {
            company_name: input.company_name,
            email: input.email,
            phone: input.phone,
        };
        let matches = pipeline::find_duplicates(db.as_ref(), &query)
            .await
            .map_err(gql)?;
        Ok(matches.into_iter().map(Into::into).collect())
    }

    async fn search(&self, ctx: &Context<'_>, q: String) -> GqlResult<Vec<LeadNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let leads = pipeline::universal_search(db.as_ref(), &q)
            .await
            .map_err(gql)?;
        Ok(leads.into_iter().map(Into::into).collect())
    }

    async fn dashboard(
        &self,
        ctx: &Context<'_>,
        today: Option<NaiveDate>,
    ) -> GqlResult<DashboardNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let metrics = pipeline::dashboard_metrics(db.as_ref(), today_or_now(today))
            .await
            .map_err(gql)?;
        Ok(metrics.into())
    }

    async fn additional_contacts(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
    ) -> GqlResult<Vec<ContactNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let contacts = pipeline::additional_contacts(db.as_ref(), parse_id(&lead_id)?)
            .await
            .map_err(gql)?;
        Ok(contacts.into_iter().map(Into::into).collect())
    }
}

#[Object]
impl LeadsMutation {
    async fn create_lead(&self, ctx: &Context<'_>, input: NewLeadInput) -> GqlResult<LeadNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let lead = pipeline::create_lead(db.as_ref(), input.into(), &actor)
            .await
            .map_err(gql)?;
        Ok(lead.into())
    }

    /// Logs a call against a lead and applies its outcome.
    async fn log_call(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        input: CallInput,
    ) -> GqlResult<TransitionPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let call = CallLog {
            actual_call_date: input.actual_call_date,
            expected_call_date: input.expected_call_date,
        };
        let result = pipeline::transition(
            db.as_ref(),
            parse_id(&lead_id)?,
            call,
            input.into_outcome(),
            &actor,
        )
        .await
        .map_err(gql)?;
        let stage_changed = result.stage_changed();
        Ok(TransitionPayload {
            lead: result.lead.into(),
            call: result.call.into(),
            detail: result.detail.map(Into::into),
            previous_stage: result.previous_stage.into(),
            stage_changed,
        })
    }

    async fn reclassify(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        input: ReclassifyInput,
    ) -> GqlResult<StageChangePayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let (target, notes) = input.into_parts();
        let change = pipeline::reclassify(db.as_ref(), parse_id(&lead_id)?, target, &actor, notes)
            .await
            .map_err(gql)?;
        Ok(StageChangePayload {
            lead: change.lead.into(),
            detail: change.detail.map(Into::into),
        })
    }

    async fn convert_future(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        input: RequirementInput,
    ) -> GqlResult<StageChangePayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let change = pipeline::convert_future_to_requirement(
            db.as_ref(),
            parse_id(&lead_id)?,
            input.into(),
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(StageChangePayload {
            lead: change.lead.into(),
            detail: change.detail.map(Into::into),
        })
    }

    async fn reengage_regret(&self, ctx: &Context<'_>, lead_id: ID) -> GqlResult<LeadNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let lead = pipeline::reengage_regret(db.as_ref(), parse_id(&lead_id)?, &actor)
            .await
            .map_err(gql)?;
        Ok(lead.into())
    }

    async fn update_future_followup(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        input: FollowupUpdateInput,
    ) -> GqlResult<DetailNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::update_future_followup(
            db.as_ref(),
            parse_id(&lead_id)?,
            input.into(),
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(detail.into())
    }

    async fn update_regret_followup(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        input: FollowupUpdateInput,
    ) -> GqlResult<DetailNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::update_regret_followup(
            db.as_ref(),
            parse_id(&lead_id)?,
            input.into(),
        )
        .await
        .map_err(gql)?;
        Ok(detail.into())
    }

    async fn update_sales_stage(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        stage: SalesStage,
        remark: String,
        followup_date: Option<NaiveDate>,
    ) -> GqlResult<DetailNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::update_sales_stage(
            db.as_ref(),
            parse_id(&requirement_id)?,
            stage.into(),
            &remark,
            followup_date,
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(detail.into())
    }

    async fn mark_regret(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        remark: String,
        today: Option<NaiveDate>,
    ) -> GqlResult<DetailNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::mark_regret(
            db.as_ref(),
            parse_id(&requirement_id)?,
            &remark,
            &actor,
            today_or_now(today),
        )
        .await
        .map_err(gql)?;
        Ok(detail.into())
    }

    async fn mark_lost(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        remark: String,
    ) -> GqlResult<DetailNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::mark_lost(db.as_ref(), parse_id(&requirement_id)?, &remark, &actor)
            .await
            .map_err(gql)?;
        Ok(detail.into())
    }

    async fn mark_customer(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        remark: String,
    ) -> GqlResult<DetailNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let detail = pipeline::mark_customer(
            db.as_ref(),
            parse_id(&requirement_id)?,
            &remark,
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(detail.into())
    }

    async fn schedule_meeting(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        input: MeetingInput,
    ) -> GqlResult<MeetingNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let meeting = pipeline::schedule_meeting(
            db.as_ref(),
            parse_id(&requirement_id)?,
            input.into(),
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(meeting.into())
    }

    async fn record_meeting_outcome(
        &self,
        ctx: &Context<'_>,
        meeting_id: ID,
        outcome: String,
    ) -> GqlResult<MeetingNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let meeting = pipeline::record_meeting_outcome(
            db.as_ref(),
            parse_id(&meeting_id)?,
            &outcome,
        )
        .await
        .map_err(gql)?;
        Ok(meeting.into())
    }

    async fn upsert_quotation(
        &self,
        ctx: &Context<'_>,
        requirement_id: ID,
        input: QuotationInput,
    ) -> GqlResult<QuotationPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let upsert = pipeline::upsert_quotation(
            db.as_ref(),
            parse_id(&requirement_id)?,
            input.into(),
            &actor,
        )
        .await
        .map_err(gql)?;
        Ok(QuotationPayload {
            quotation: upsert.quotation.into(),
            created: upsert.created,
        })
    }

    async fn send_followup(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        today: Option<NaiveDate>,
    ) -> GqlResult<FollowupSentPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let sent = pipeline::send_followup(
            db.as_ref(),
            parse_id(&lead_id)?,
            &actor,
            today_or_now(today),
        )
        .await
        .map_err(gql)?;
        Ok(FollowupSentPayload {
            call: sent.call.into(),
            status: sent.status.into(),
        })
    }

    async fn add_contact(
        &self,
        ctx: &Context<'_>,
        lead_id: ID,
        contact_type: ContactKind,
        value: String,
        #[graphql(default)] is_primary: bool,
    ) -> GqlResult<ContactNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let contact = pipeline::add_additional_contact(
            db.as_ref(),
            parse_id(&lead_id)?,
            contact_type.into(),
            &value,
            is_primary,
        )
        .await
        .map_err(gql)?;
        info!(contact_id = contact.id, lead_id = contact.lead_id, "additional contact added");
        Ok(contact.into())
    }
}

fn database(ctx: &Context<'_>) -> GqlResult<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| gql(ApiError::Internal("missing database connection")))
}

fn current_actor(ctx: &Context<'_>) -> GqlResult<Actor> {
    ctx.data::<Actor>()
        .cloned()
        .map_err(|_| gql(ApiError::Unauthenticated))
}

fn parse_id(id: &ID) -> GqlResult<i32> {
    id.parse::<i32>().map_err(|_| gql(ApiError::BadRequest("id")))
}

fn today_or_now(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}
