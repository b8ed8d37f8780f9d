//! GraphQL object, input and enum types mirroring the pipeline core.

use async_graphql::{Enum, InputObject, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{
    additional_contact, call_history, lead, lead_detail, meeting, quotation, stage_history,
};
use pipeline::{
    metrics::{FollowupCounts, MonthToDate, SalesStageCount, StageCounts},
    CallOutcome, DashboardMetrics, DetailRecord, DuplicateMatch, FollowupItem, FollowupStatus,
    FollowupUpdate, FutureForm, Journey, LeadTimeline, LeadWithDetail, MatchType, MeetingForm,
    NewLead, QuotationForm, Reclassification, ReconnectForm, RegretForm, RequirementForm,
    StageDetail, TankLineInput,
};

fn id(value: i32) -> ID {
    ID::from(value.to_string())
}

fn count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum LeadStage {
    Prospect,
    RequirementYes,
    Future,
    Regret,
}

impl From<lead::Stage> for LeadStage {
    fn from(value: lead::Stage) -> Self {
        match value {
            lead::Stage::Prospect => LeadStage::Prospect,
            lead::Stage::RequirementYes => LeadStage::RequirementYes,
            lead::Stage::Future => LeadStage::Future,
            lead::Stage::Regret => LeadStage::Regret,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SalesStage {
    CostingCreated,
    QuotationCreated,
    QuotationSent,
    QuotationRevision,
    QuotationAccepted,
    PoReceived,
    OaCreated,
    OaSent,
    OaRevision,
    OaAccepted,
    OrderCompleted,
    OrderLost,
}

impl From<lead_detail::SalesStage> for SalesStage {
    fn from(value: lead_detail::SalesStage) -> Self {
        use lead_detail::SalesStage as S;
        match value {
            S::CostingCreated => SalesStage::CostingCreated,
            S::QuotationCreated => SalesStage::QuotationCreated,
            S::QuotationSent => SalesStage::QuotationSent,
            S::QuotationRevision => SalesStage::QuotationRevision,
            S::QuotationAccepted => SalesStage::QuotationAccepted,
            S::PoReceived => SalesStage::PoReceived,
            S::OaCreated => SalesStage::OaCreated,
            S::OaSent => SalesStage::OaSent,
            S::OaRevision => SalesStage::OaRevision,
            S::OaAccepted => SalesStage::OaAccepted,
            S::OrderCompleted => SalesStage::OrderCompleted,
            S::OrderLost => SalesStage::OrderLost,
        }
    }
}

impl From<SalesStage> for lead_detail::SalesStage {
    fn from(value: SalesStage) -> Self {
        use lead_detail::SalesStage as S;
        match value {
            SalesStage::CostingCreated => S::CostingCreated,
            SalesStage::QuotationCreated => S::QuotationCreated,
            SalesStage::QuotationSent => S::QuotationSent,
            SalesStage::QuotationRevision => S::QuotationRevision,
            SalesStage::QuotationAccepted => S::QuotationAccepted,
            SalesStage::PoReceived => S::PoReceived,
            SalesStage::OaCreated => S::OaCreated,
            SalesStage::OaSent => S::OaSent,
            SalesStage::OaRevision => S::OaRevision,
            SalesStage::OaAccepted => S::OaAccepted,
            SalesStage::OrderCompleted => S::OrderCompleted,
            SalesStage::OrderLost => S::OrderLost,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CallOutcomeKind {
    Yes,
    Future,
    Reconnect,
    Regret,
}

impl From<call_history::Outcome> for CallOutcomeKind {
    fn from(value: call_history::Outcome) -> Self {
        match value {
            call_history::Outcome::Yes => CallOutcomeKind::Yes,
            call_history::Outcome::Future => CallOutcomeKind::Future,
            call_history::Outcome::Reconnect => CallOutcomeKind::Reconnect,
            call_history::Outcome::Regret => CallOutcomeKind::Regret,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum DetailKind {
    Requirement,
    Regret,
    Future,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum MeetingKind {
    Online,
    Onsite,
    Phone,
}

impl From<meeting::MeetingType> for MeetingKind {
    fn from(value: meeting::MeetingType) -> Self {
        match value {
            meeting::MeetingType::Online => MeetingKind::Online,
            meeting::MeetingType::Onsite => MeetingKind::Onsite,
            meeting::MeetingType::Phone => MeetingKind::Phone,
        }
    }
}

impl From<MeetingKind> for meeting::MeetingType {
    fn from(value: MeetingKind) -> Self {
        match value {
            MeetingKind::Online => meeting::MeetingType::Online,
            MeetingKind::Onsite => meeting::MeetingType::Onsite,
            MeetingKind::Phone => meeting::MeetingType::Phone,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ContactKind {
    Phone,
    Email,
}

impl From<additional_contact::ContactType> for ContactKind {
    fn from(value: additional_contact::ContactType) -> Self {
        match value {
            additional_contact::ContactType::Phone => ContactKind::Phone,
            additional_contact::ContactType::Email => ContactKind::Email,
        }
    }
}

impl From<ContactKind> for additional_contact::ContactType {
    fn from(value: ContactKind) -> Self {
        match value {
            ContactKind::Phone => additional_contact::ContactType::Phone,
            ContactKind::Email => additional_contact::ContactType::Email,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum MatchKind {
    Email,
    Phone,
    CompanyName,
}

impl From<MatchType> for MatchKind {
    fn from(value: MatchType) -> Self {
        match value {
            MatchType::Email => MatchKind::Email,
            MatchType::Phone => MatchKind::Phone,
            MatchType::CompanyName => MatchKind::CompanyName,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Lead")]
pub struct LeadNode {
    pub id: ID,
    pub lead_code: String,
    pub company_name: String,
    pub city: String,
    pub state: String,
    pub sector: Option<String>,
    pub source: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub department: Option<String>,
    pub stage: LeadStage,
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub last_call_date: Option<NaiveDate>,
    pub last_remark: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<lead::Model> for LeadNode {
    fn from(model: lead::Model) -> Self {
        Self {
            id: id(model.id),
            lead_code: model.lead_code,
            company_name: model.company_name,
            city: model.city,
            state: model.state,
            sector: model.sector,
            source: model.source,
            contact_name: model.contact_name,
            contact_email: model.contact_email,
            contact_phone: model.contact_phone,
            department: model.department,
            stage: model.stage.into(),
            client_type_main: model.client_type_main,
            client_type_detail: model.client_type_detail,
            last_call_date: model.last_call_date,
            last_remark: model.last_remark,
            created_by: model.created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "CallHistory")]
pub struct CallNode {
    pub id: ID,
    pub lead_id: ID,
    pub expected_call_date: Option<NaiveDate>,
    pub actual_call_date: NaiveDate,
    pub outcome: CallOutcomeKind,
    pub remark: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<call_history::Model> for CallNode {
    fn from(model: call_history::Model) -> Self {
        Self {
            id: id(model.id),
            lead_id: id(model.lead_id),
            expected_call_date: model.expected_call_date,
            actual_call_date: model.actual_call_date,
            outcome: model.outcome.into(),
            remark: model.remark,
            created_by: model.created_by,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StageHistory")]
pub struct StageHistoryNode {
    pub id: ID,
    pub lead_id: ID,
    pub from_stage: String,
    pub to_stage: String,
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<stage_history::Model> for StageHistoryNode {
    fn from(model: stage_history::Model) -> Self {
        Self {
            id: id(model.id),
            lead_id: id(model.lead_id),
            from_stage: model.from_stage,
            to_stage: model.to_stage,
            changed_by: model.changed_by,
            changed_at: model.changed_at.into(),
            notes: model.notes,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "TankLine")]
pub struct TankLineNode {
    pub tank_type: String,
    pub capacity: String,
    pub quantity: u32,
}

/// Flattened stage detail; fields outside `kind` are null.
#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StageDetail")]
pub struct DetailNode {
    pub id: ID,
    pub lead_id: ID,
    pub kind: DetailKind,
    pub client_type_main: String,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub remark: Option<String>,
    pub tank_application: Option<String>,
    pub tank_location: Option<String>,
    pub tanks: Vec<TankLineNode>,
    pub assigned_salesperson: Option<String>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub sales_stage: Option<SalesStage>,
    pub tank_type: Option<String>,
    pub tank_type_other: Option<String>,
    pub expected_timeline: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DetailRecord> for DetailNode {
    fn from(record: DetailRecord) -> Self {
        let client = record.detail.client().clone();
        let mut node = Self {
            id: id(record.id),
            lead_id: id(record.lead_id),
            kind: DetailKind::Requirement,
            client_type_main: client.main,
            client_type_detail: client.detail,
            followup_date: record.detail.followup_date(),
            remark: None,
            tank_application: None,
            tank_location: None,
            tanks: Vec::new(),
            assigned_salesperson: None,
            expected_delivery_date: None,
            sales_stage: None,
            tank_type: None,
            tank_type_other: None,
            expected_timeline: None,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        };
        match record.detail {
            StageDetail::Requirement(req) => {
                node.remark = req.current_remark;
                node.tank_application = Some(req.tank_application);
                node.tank_location = req.tank_location;
                node.tanks = req
                    .tanks
                    .into_iter()
                    .map(|t| TankLineNode {
                        tank_type: t.tank_type,
                        capacity: t.capacity,
                        quantity: t.quantity,
                    })
                    .collect();
                node.assigned_salesperson = Some(req.assigned_salesperson);
                node.expected_delivery_date = req.expected_delivery_date;
                node.sales_stage = Some(req.sales_stage.into());
            }
            StageDetail::Regret(offer) => {
                node.kind = DetailKind::Regret;
                node.remark = Some(offer.remark);
                node.tank_type = Some(offer.tank_type);
                node.tank_type_other = offer.tank_type_other;
            }
            StageDetail::Future(future) => {
                node.kind = DetailKind::Future;
                node.remark = Some(future.remark);
                node.expected_timeline = future.expected_timeline;
            }
        }
        node
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Meeting")]
pub struct MeetingNode {
    pub id: ID,
    pub requirement_id: ID,
    pub meeting_date: NaiveDate,
    pub meeting_type: MeetingKind,
    pub attendees: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<meeting::Model> for MeetingNode {
    fn from(model: meeting::Model) -> Self {
        Self {
            id: id(model.id),
            requirement_id: id(model.requirement_id),
            meeting_date: model.meeting_date,
            meeting_type: model.meeting_type.into(),
            attendees: model.attendees,
            notes: model.notes,
            outcome: model.outcome,
            created_by: model.created_by,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Quotation")]
pub struct QuotationNode {
    pub id: ID,
    pub requirement_id: ID,
    pub expected_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub quotation_number: Option<String>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<quotation::Model> for QuotationNode {
    fn from(model: quotation::Model) -> Self {
        Self {
            id: id(model.id),
            requirement_id: id(model.requirement_id),
            expected_date: model.expected_date,
            actual_date: model.actual_date,
            quotation_number: model.quotation_number,
            amount_cents: model.amount_cents,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "AdditionalContact")]
pub struct ContactNode {
    pub id: ID,
    pub lead_id: ID,
    pub contact_type: ContactKind,
    pub contact_value: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl From<additional_contact::Model> for ContactNode {
    fn from(model: additional_contact::Model) -> Self {
        Self {
            id: id(model.id),
            lead_id: id(model.lead_id),
            contact_type: model.contact_type.into(),
            contact_value: model.contact_value,
            is_primary: model.is_primary,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LeadWithDetailNode {
    pub lead: LeadNode,
    pub detail: DetailNode,
}

impl From<LeadWithDetail> for LeadWithDetailNode {
    fn from(value: LeadWithDetail) -> Self {
        Self {
            lead: value.lead.into(),
            detail: value.detail.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct FollowupItemNode {
    pub lead: LeadNode,
    pub detail: DetailNode,
    pub due: NaiveDate,
    pub overdue: bool,
}

impl From<FollowupItem> for FollowupItemNode {
    fn from(item: FollowupItem) -> Self {
        Self {
            lead: item.lead.into(),
            detail: item.detail.into(),
            due: item.due,
            overdue: item.overdue,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "LeadTimeline")]
pub struct TimelineNode {
    pub lead: LeadNode,
    pub detail: Option<DetailNode>,
    pub calls: Vec<CallNode>,
    pub stage_history: Vec<StageHistoryNode>,
    pub meetings: Vec<MeetingNode>,
    pub quotations: Vec<QuotationNode>,
    pub contacts: Vec<ContactNode>,
}

impl From<LeadTimeline> for TimelineNode {
    fn from(t: LeadTimeline) -> Self {
        Self {
            lead: t.lead.into(),
            detail: t.detail.map(Into::into),
            calls: t.calls.into_iter().map(Into::into).collect(),
            stage_history: t.stage_history.into_iter().map(Into::into).collect(),
            meetings: t.meetings.into_iter().map(Into::into).collect(),
            quotations: t.quotations.into_iter().map(Into::into).collect(),
            contacts: t.contacts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct JourneyNode {
    pub timeline: TimelineNode,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<Journey> for JourneyNode {
    fn from(j: Journey) -> Self {
        Self {
            timeline: j.timeline.into(),
            closed_at: j.closed_at.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DuplicateNode {
    pub lead: LeadNode,
    pub match_type: MatchKind,
    pub score: i32,
}

impl From<DuplicateMatch> for DuplicateNode {
    fn from(m: DuplicateMatch) -> Self {
        Self {
            lead: m.lead.into(),
            match_type: m.match_type.into(),
            score: i32::from(m.score),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct FollowupStatusNode {
    pub count: i32,
    pub can_send: bool,
    pub cycle_start_date: Option<NaiveDate>,
    pub in_cycle: bool,
}

impl From<FollowupStatus> for FollowupStatusNode {
    fn from(s: FollowupStatus) -> Self {
        Self {
            count: i32::try_from(s.count).unwrap_or(i32::MAX),
            can_send: s.can_send,
            cycle_start_date: s.cycle_start_date,
            in_cycle: s.in_cycle,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageCountsNode {
    pub prospect: i64,
    pub requirement_yes: i64,
    pub future: i64,
    pub regret: i64,
    pub total: i64,
}

impl From<StageCounts> for StageCountsNode {
    fn from(c: StageCounts) -> Self {
        Self {
            prospect: count(c.prospect),
            requirement_yes: count(c.requirement_yes),
            future: count(c.future),
            regret: count(c.regret),
            total: count(c.total),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct SalesStageCountNode {
    pub stage: SalesStage,
    pub count: i64,
}

impl From<SalesStageCount> for SalesStageCountNode {
    fn from(c: SalesStageCount) -> Self {
        Self {
            stage: c.stage.into(),
            count: count(c.count),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct FollowupCountsNode {
    pub overdue: i64,
    pub due_today: i64,
    pub upcoming: i64,
}

impl From<FollowupCounts> for FollowupCountsNode {
    fn from(c: FollowupCounts) -> Self {
        Self {
            overdue: count(c.overdue),
            due_today: count(c.due_today),
            upcoming: count(c.upcoming),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct MonthToDateNode {
    pub since: NaiveDate,
    pub new_leads: i64,
    pub conversions: i64,
    pub orders_completed: i64,
    pub orders_lost: i64,
}

impl From<MonthToDate> for MonthToDateNode {
    fn from(m: MonthToDate) -> Self {
        Self {
            since: m.since,
            new_leads: count(m.new_leads),
            conversions: count(m.conversions),
            orders_completed: count(m.orders_completed),
            orders_lost: count(m.orders_lost),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Dashboard")]
pub struct DashboardNode {
    pub stages: StageCountsNode,
    pub sales_stages: Vec<SalesStageCountNode>,
    pub active_requirements: i64,
    pub customers: i64,
    pub lost_orders: i64,
    pub followups: FollowupCountsNode,
    pub conversion_rate: f64,
    pub month_to_date: MonthToDateNode,
}

impl From<DashboardMetrics> for DashboardNode {
    fn from(m: DashboardMetrics) -> Self {
        Self {
            stages: m.stages.into(),
            sales_stages: m.sales_stages.into_iter().map(Into::into).collect(),
            active_requirements: count(m.active_requirements),
            customers: count(m.customers),
            lost_orders: count(m.lost_orders),
            followups: m.followups.into(),
            conversion_rate: m.conversion_rate,
            month_to_date: m.month_to_date.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TransitionPayload {
    pub lead: LeadNode,
    pub call: CallNode,
    pub detail: Option<DetailNode>,
    pub previous_stage: LeadStage,
    pub stage_changed: bool,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageChangePayload {
    pub lead: LeadNode,
    pub detail: Option<DetailNode>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct QuotationPayload {
    pub quotation: QuotationNode,
    pub created: bool,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct FollowupSentPayload {
    pub call: CallNode,
    pub status: FollowupStatusNode,
}

#[derive(InputObject, Clone, Default)]
pub struct NewLeadInput {
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub sector: Option<String>,
    pub source: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub department: Option<String>,
}

impl From<NewLeadInput> for NewLead {
    fn from(i: NewLeadInput) -> Self {
        NewLead {
            company_name: i.company_name,
            city: i.city,
            state: i.state,
            sector: i.sector,
            source: i.source,
            contact_name: i.contact_name,
            contact_email: i.contact_email,
            contact_phone: i.contact_phone,
            department: i.department,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct TankLineEntry {
    pub tank_type: Option<String>,
    pub capacity: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(InputObject, Clone, Default)]
pub struct RequirementInput {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub tank_application: Option<String>,
    pub tank_location: Option<String>,
    pub assigned_salesperson: Option<String>,
    pub expected_delivery_date: Option<NaiveDate>,
    #[graphql(default)]
    pub tanks: Vec<TankLineEntry>,
    pub remark: Option<String>,
}

impl From<RequirementInput> for RequirementForm {
    fn from(i: RequirementInput) -> Self {
        RequirementForm {
            client_type_main: i.client_type_main,
            client_type_detail: i.client_type_detail,
            tank_application: i.tank_application,
            tank_location: i.tank_location,
            assigned_salesperson: i.assigned_salesperson,
            expected_delivery_date: i.expected_delivery_date,
            tanks: i
                .tanks
                .into_iter()
                .map(|t| TankLineInput {
                    tank_type: t.tank_type,
                    capacity: t.capacity,
                    quantity: t.quantity,
                })
                .collect(),
            remark: i.remark,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct RegretInput {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub tank_type: Option<String>,
    pub tank_type_other: Option<String>,
    pub remark: Option<String>,
}

impl From<RegretInput> for RegretForm {
    fn from(i: RegretInput) -> Self {
        RegretForm {
            client_type_main: i.client_type_main,
            client_type_detail: i.client_type_detail,
            followup_date: i.followup_date,
            tank_type: i.tank_type,
            tank_type_other: i.tank_type_other,
            remark: i.remark,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct FutureInput {
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub expected_timeline: Option<String>,
    pub remark: Option<String>,
}

impl From<FutureInput> for FutureForm {
    fn from(i: FutureInput) -> Self {
        FutureForm {
            client_type_main: i.client_type_main,
            client_type_detail: i.client_type_detail,
            followup_date: i.followup_date,
            expected_timeline: i.expected_timeline,
            remark: i.remark,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct ReconnectInput {
    pub followup_date: Option<NaiveDate>,
    pub remark: Option<String>,
}

/// A logged call. The payload matching `outcome` is read; the others are
/// ignored.
#[derive(InputObject, Clone)]
pub struct CallInput {
    pub outcome: CallOutcomeKind,
    pub actual_call_date: Option<NaiveDate>,
    pub expected_call_date: Option<NaiveDate>,
    pub requirement: Option<RequirementInput>,
    pub regret: Option<RegretInput>,
    pub future: Option<FutureInput>,
    pub reconnect: Option<ReconnectInput>,
}

impl CallInput {
    pub fn into_outcome(self) -> CallOutcome {
        match self.outcome {
            CallOutcomeKind::Yes => CallOutcome::Yes(self.requirement.unwrap_or_default().into()),
            CallOutcomeKind::Regret => CallOutcome::Regret(self.regret.unwrap_or_default().into()),
            CallOutcomeKind::Future => CallOutcome::Future(self.future.unwrap_or_default().into()),
            CallOutcomeKind::Reconnect => {
                let r = self.reconnect.unwrap_or_default();
                CallOutcome::Reconnect(ReconnectForm {
                    followup_date: r.followup_date,
                    remark: r.remark,
                })
            }
        }
    }
}

#[derive(InputObject, Clone)]
pub struct ReclassifyInput {
    pub target: LeadStage,
    pub requirement: Option<RequirementInput>,
    pub regret: Option<RegretInput>,
    pub future: Option<FutureInput>,
    pub notes: Option<String>,
}

impl ReclassifyInput {
    pub fn into_parts(self) -> (Reclassification, Option<String>) {
        let target = match self.target {
            LeadStage::Prospect => Reclassification::Prospect,
            LeadStage::RequirementYes => {
                Reclassification::Requirement(self.requirement.unwrap_or_default().into())
            }
            LeadStage::Regret => Reclassification::Regret(self.regret.unwrap_or_default().into()),
            LeadStage::Future => Reclassification::Future(self.future.unwrap_or_default().into()),
        };
        (target, self.notes)
    }
}

#[derive(InputObject, Clone, Default)]
pub struct FollowupUpdateInput {
    pub followup_date: Option<NaiveDate>,
    pub remark: Option<String>,
    pub actual_call_date: Option<NaiveDate>,
}

impl From<FollowupUpdateInput> for FollowupUpdate {
    fn from(i: FollowupUpdateInput) -> Self {
        FollowupUpdate {
            followup_date: i.followup_date,
            remark: i.remark,
            actual_call_date: i.actual_call_date,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct MeetingInput {
    pub meeting_date: Option<NaiveDate>,
    pub meeting_type: Option<MeetingKind>,
    pub attendees: Option<String>,
    pub notes: Option<String>,
}

impl From<MeetingInput> for MeetingForm {
    fn from(i: MeetingInput) -> Self {
        MeetingForm {
            meeting_date: i.meeting_date,
            meeting_type: i.meeting_type.map(Into::into),
            attendees: i.attendees,
            notes: i.notes,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct QuotationInput {
    pub expected_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub quotation_number: Option<String>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
}

impl From<QuotationInput> for QuotationForm {
    fn from(i: QuotationInput) -> Self {
        QuotationForm {
            expected_date: i.expected_date,
            actual_date: i.actual_date,
            quotation_number: i.quotation_number,
            amount_cents: i.amount_cents,
            notes: i.notes,
        }
    }
}

#[derive(InputObject, Clone, Default)]
pub struct DuplicateCheckInput {
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
