pub mod additional_contact;
pub mod call_history;
pub mod lead;
pub mod lead_detail;
pub mod meeting;
pub mod quotation;
pub mod stage_history;
