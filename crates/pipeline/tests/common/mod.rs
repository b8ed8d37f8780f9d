#![allow(dead_code)]

use chrono::NaiveDate;
use entity::{call_history, lead, lead_detail, stage_history};
use migration::{Migrator, MigratorTrait};
use pipeline::{
    create_lead, transition, Actor, CallLog, CallOutcome, DetailRecord, FutureForm, NewLead,
    RegretForm, RequirementForm, TankLineInput,
};
use sea_orm::{
    ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn marketing() -> Actor {
    Actor::marketing(Uuid::new_v4())
}

pub fn sales() -> Actor {
    Actor::sales(Uuid::new_v4())
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_lead(company: &str, email: &str, phone: &str) -> NewLead {
    NewLead {
        company_name: Some(company.into()),
        city: Some("Pune".into()),
        state: Some("Maharashtra".into()),
        sector: Some("Chemicals".into()),
        source: Some("Trade fair".into()),
        contact_name: Some("Asha Rao".into()),
        contact_email: Some(email.into()),
        contact_phone: Some(phone.into()),
        department: None,
    }
}

pub async fn prospect(db: &DatabaseConnection, company: &str) -> lead::Model {
    let slug: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    create_lead(
        db,
        new_lead(company, &format!("info@{slug}.test"), &format!("+91-{slug}")),
        &marketing(),
    )
    .await
    .unwrap()
}

pub fn tank(kind: &str, capacity: &str, quantity: u32) -> TankLineInput {
    TankLineInput {
        tank_type: Some(kind.into()),
        capacity: Some(capacity.into()),
        quantity: Some(quantity),
    }
}

pub fn requirement_form() -> RequirementForm {
    RequirementForm {
        client_type_main: Some("Industrial".into()),
        client_type_detail: Some("Pharma".into()),
        tank_application: Some("Effluent storage".into()),
        tank_location: Some("Plant 2".into()),
        assigned_salesperson: Some("Vikram".into()),
        expected_delivery_date: Some(day(2026, 12, 1)),
        tanks: vec![tank("FRP", "10000L", 2)],
        remark: Some("Needs quote by Friday".into()),
    }
}

pub fn regret_form() -> RegretForm {
    RegretForm {
        client_type_main: Some("Industrial".into()),
        client_type_detail: None,
        followup_date: Some(day(2026, 11, 20)),
        tank_type: Some("Sintex".into()),
        tank_type_other: None,
        remark: Some("Went with cheaper vendor".into()),
    }
}

pub fn future_form(followup: NaiveDate) -> FutureForm {
    FutureForm {
        client_type_main: Some("Commercial".into()),
        client_type_detail: None,
        followup_date: Some(followup),
        expected_timeline: Some("Q2".into()),
        remark: Some("Budget next year".into()),
    }
}

pub fn call_on(date: NaiveDate) -> CallLog {
    CallLog {
        actual_call_date: Some(date),
        expected_call_date: None,
    }
}

/// Creates a prospect and confirms its requirement.
pub async fn confirmed(db: &DatabaseConnection, company: &str) -> (lead::Model, DetailRecord) {
    let lead = prospect(db, company).await;
    let result = transition(
        db,
        lead.id,
        call_on(day(2026, 10, 1)),
        CallOutcome::Yes(requirement_form()),
        &marketing(),
    )
    .await
    .unwrap();
    (result.lead, result.detail.unwrap())
}

pub async fn call_count(db: &DatabaseConnection, lead_id: i32) -> u64 {
    call_history::Entity::find()
        .filter(call_history::Column::LeadId.eq(lead_id))
        .count(db)
        .await
        .unwrap()
}

pub async fn history(db: &DatabaseConnection, lead_id: i32) -> Vec<stage_history::Model> {
    stage_history::Entity::find()
        .filter(stage_history::Column::LeadId.eq(lead_id))
        .order_by_asc(stage_history::Column::Id)
        .all(db)
        .await
        .unwrap()
}

pub async fn detail_rows(db: &DatabaseConnection, lead_id: i32) -> Vec<lead_detail::Model> {
    lead_detail::Entity::find()
        .filter(lead_detail::Column::LeadId.eq(lead_id))
        .all(db)
        .await
        .unwrap()
}
