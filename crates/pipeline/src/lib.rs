//! Lead pipeline core: the stage transition engine, follow-up cadence,
//! duplicate matching and reporting over the `entity` store.
//!
//! Every operation takes the database handle, the acting user and, where the
//! outcome depends on it, the current date explicitly.

pub mod actor;
pub mod detail;
pub mod error;
pub mod followup;
pub mod leads;
pub mod maintenance;
pub mod matcher;
pub mod metrics;
pub mod payload;
pub mod sales;
pub mod similarity;
mod store;
pub mod transition;
pub mod views;

pub use actor::{Actor, Role};
pub use detail::{
    ClientClass, DetailRecord, FutureRequirement, RegretOffer, RequirementDetails, StageDetail,
    TankLine,
};
pub use error::{PipelineError, PipelineResult};
pub use followup::{followup_status, send_followup, FollowupSent, FollowupStatus};
pub use leads::{add_additional_contact, additional_contacts, create_lead, get_lead, NewLead};
pub use maintenance::{purge_placeholder_history, PurgeReport};
pub use matcher::{find_duplicates, universal_search, DuplicateMatch, DuplicateQuery, MatchType};
pub use metrics::{dashboard_metrics, DashboardMetrics};
pub use payload::{
    CallLog, CallOutcome, FutureForm, Reclassification, ReconnectForm, RegretForm,
    RequirementForm, TankLineInput,
};
pub use sales::{
    mark_customer, mark_lost, mark_regret, record_meeting_outcome, schedule_meeting,
    update_sales_stage, upsert_quotation, MeetingForm, QuotationForm, QuotationUpsert,
};
pub use transition::{
    convert_future_to_requirement, reclassify, reengage_regret, transition,
    update_future_followup, update_regret_followup, FollowupUpdate, StageChange,
    TransitionResult,
};
pub use views::{
    active_requirements, customer_journey, customers, followup_queue, future_for_lead,
    future_requirements, lead_list, lead_timeline, lost_order_journey, lost_orders,
    regret_for_lead, regret_offers, requirement_for_lead, FollowupItem, Journey, LeadTimeline,
    LeadWithDetail,
};
