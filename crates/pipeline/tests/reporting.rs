mod common;

use chrono::{Duration, Utc};
use common::*;
use entity::{
    additional_contact::ContactType,
    call_history::{self, Outcome},
    lead_detail::SalesStage,
    stage_history,
};
use pipeline::{
    active_requirements, add_additional_contact, additional_contacts, create_lead,
    customer_journey, customers, dashboard_metrics, followup_queue, future_requirements,
    lead_list, lead_timeline, lost_order_journey, lost_orders, mark_customer, mark_lost,
    purge_placeholder_history, regret_for_lead, requirement_for_lead, transition, CallOutcome,
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

#[tokio::test]
async fn empty_store_has_zero_conversion() {
    let db = setup().await;

    let metrics = dashboard_metrics(&db, day(2026, 10, 19)).await.unwrap();

    assert_eq!(metrics.conversion_rate, 0.0);
    assert_eq!(metrics.stages.total, 0);
    assert_eq!(metrics.sales_stages.len(), 12);
    assert!(metrics.sales_stages.iter().all(|s| s.count == 0));
}

#[tokio::test]
async fn dashboard_counts_pipeline() {
    let db = setup().await;
    let today = Utc::now().date_naive();
    prospect(&db, "Prospect One").await;
    prospect(&db, "Prospect Two").await;
    let (_, won) = confirmed(&db, "Won Ltd").await;
    confirmed(&db, "Open Ltd").await;
    mark_customer(&db, won.id, "Delivered", &sales()).await.unwrap();

    let future = prospect(&db, "Later Inc").await;
    transition(
        &db,
        future.id,
        call_on(today),
        CallOutcome::Future(future_form(today + Duration::days(3))),
        &marketing(),
    )
    .await
    .unwrap();
    let late = prospect(&db, "Overdue Inc").await;
    let mut regret = regret_form();
    regret.followup_date = Some(today - Duration::days(2));
    transition(&db, late.id, call_on(today), CallOutcome::Regret(regret), &marketing())
        .await
        .unwrap();

    let metrics = dashboard_metrics(&db, today).await.unwrap();

    assert_eq!(metrics.stages.prospect, 2);
    assert_eq!(metrics.stages.requirement_yes, 2);
    assert_eq!(metrics.stages.future, 1);
    assert_eq!(metrics.stages.regret, 1);
    assert_eq!(metrics.stages.total, 6);
    assert_eq!(metrics.conversion_rate, 50.0);
    assert_eq!(metrics.customers, 1);
    assert_eq!(metrics.active_requirements, 1);
    assert_eq!(metrics.lost_orders, 0);
    assert_eq!(metrics.followups.overdue, 1);
    assert_eq!(metrics.followups.due_today, 0);
    assert_eq!(metrics.followups.upcoming, 1);
    assert_eq!(metrics.month_to_date.new_leads, 6);
    assert_eq!(metrics.month_to_date.conversions, 2);
    assert_eq!(metrics.month_to_date.orders_completed, 1);
    assert_eq!(metrics.month_to_date.orders_lost, 0);
}

#[tokio::test]
async fn bucket_lists_follow_sales_stage() {
    let db = setup().await;
    let (_, won) = confirmed(&db, "Won Ltd").await;
    let (_, lost) = confirmed(&db, "Lost Ltd").await;
    let (open, _) = confirmed(&db, "Open Ltd").await;
    mark_customer(&db, won.id, "Delivered", &sales()).await.unwrap();
    mark_lost(&db, lost.id, "Budget cut", &sales()).await.unwrap();

    let active = active_requirements(&db).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].lead.id, open.id);
    assert_eq!(customers(&db).await.unwrap()[0].detail.id, won.id);
    assert_eq!(lost_orders(&db).await.unwrap()[0].detail.id, lost.id);

    let journey = customer_journey(&db, won.lead_id).await.unwrap();
    assert!(journey.closed_at.is_some());
    assert_eq!(journey.timeline.calls.len(), 1);

    let err = lost_order_journey(&db, won.lead_id).await.unwrap_err();
    assert_eq!(err.code(), "GUARD");
    assert!(lost_order_journey(&db, lost.lead_id).await.is_ok());
}

#[tokio::test]
async fn readers_are_stage_guarded() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;

    let err = requirement_for_lead(&db, lead.id).await.unwrap_err();
    assert_eq!(err.code(), "GUARD");
    assert_eq!(regret_for_lead(&db, lead.id).await.unwrap_err().code(), "GUARD");

    let (confirmed_lead, req) = confirmed(&db, "Bright Ltd").await;
    let view = requirement_for_lead(&db, confirmed_lead.id).await.unwrap();
    assert_eq!(view.detail.id, req.id);
}

#[tokio::test]
async fn lists_split_by_role() {
    let db = setup().await;
    prospect(&db, "Acme Corp").await;
    confirmed(&db, "Bright Ltd").await;

    let mine = lead_list(&db, &marketing()).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].company_name, "Acme Corp");
    let theirs = lead_list(&db, &sales()).await.unwrap();
    assert_eq!(theirs[0].company_name, "Bright Ltd");
}

#[tokio::test]
async fn followup_queue_is_soonest_first() {
    let db = setup().await;
    let today = day(2026, 10, 19);
    for (name, offset) in [("Far Co", 20), ("Soon Co", 5), ("Late Co", -1)] {
        let lead = prospect(&db, name).await;
        transition(
            &db,
            lead.id,
            call_on(today),
            CallOutcome::Future(future_form(today + Duration::days(offset))),
            &marketing(),
        )
        .await
        .unwrap();
    }

    let queue = followup_queue(&db, today).await.unwrap();

    let names: Vec<&str> = queue.iter().map(|i| i.lead.company_name.as_str()).collect();
    assert_eq!(names, vec!["Late Co", "Soon Co"]);
    assert!(queue[0].overdue);
    assert!(!queue[1].overdue);

    let all = future_requirements(&db).await.unwrap();
    assert_eq!(all[0].lead.company_name, "Far Co");
}

#[tokio::test]
async fn timeline_collects_history() {
    let db = setup().await;
    let (lead, _) = confirmed(&db, "Acme Corp").await;
    add_additional_contact(&db, lead.id, ContactType::Email, "ceo@acme.test", false)
        .await
        .unwrap();

    let timeline = lead_timeline(&db, lead.id).await.unwrap();

    assert_eq!(timeline.lead.lead_code, lead.lead_code);
    assert!(timeline.detail.is_some());
    assert_eq!(timeline.calls.len(), 1);
    assert_eq!(timeline.stage_history.len(), 1);
    assert_eq!(timeline.contacts.len(), 1);
    assert!(timeline.meetings.is_empty());
}

#[tokio::test]
async fn primary_contact_is_unique_per_type() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;
    add_additional_contact(&db, lead.id, ContactType::Phone, "111", true).await.unwrap();
    add_additional_contact(&db, lead.id, ContactType::Email, "a@acme.test", true)
        .await
        .unwrap();
    let second = add_additional_contact(&db, lead.id, ContactType::Phone, "222", true)
        .await
        .unwrap();

    let contacts = additional_contacts(&db, lead.id).await.unwrap();

    let primaries: Vec<&str> = contacts
        .iter()
        .filter(|c| c.is_primary)
        .map(|c| c.contact_value.as_str())
        .collect();
    assert_eq!(primaries.len(), 2);
    assert!(primaries.contains(&"222"));
    assert!(primaries.contains(&"a@acme.test"));
    assert!(second.is_primary);

    let err = add_additional_contact(&db, lead.id, ContactType::Phone, " ", false)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("contact_value"));
}

#[tokio::test]
async fn lead_codes_follow_row_ids() {
    let db = setup().await;
    let first = prospect(&db, "Acme Corp").await;
    let second = prospect(&db, "Bright Ltd").await;

    assert_eq!(first.lead_code, format!("EP{:05}", first.id));
    assert_eq!(second.lead_code, format!("EP{:05}", second.id));

    let mut bad = new_lead("Nope", "nope.test", "1");
    bad.sector = None;
    let err = create_lead(&db, bad, &marketing()).await.unwrap_err();
    assert_eq!(err.field(), Some("sector"));
}

#[tokio::test]
async fn purge_removes_only_placeholders() {
    let db = setup().await;
    let (lead, _) = confirmed(&db, "Acme Corp").await;
    let now = Utc::now().into();
    stage_history::ActiveModel {
        lead_id: Set(lead.id),
        from_stage: Set(SalesStage::CostingCreated.as_str().into()),
        to_stage: Set(SalesStage::QuotationSent.as_str().into()),
        changed_by: Set(None),
        changed_at: Set(now),
        notes: Set(Some("Sales stage updated".into())),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    call_history::ActiveModel {
        lead_id: Set(lead.id),
        expected_call_date: Set(None),
        actual_call_date: Set(day(2026, 10, 2)),
        outcome: Set(Outcome::Yes),
        remark: Set("Sales stage updated".into()),
        created_by: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let report = purge_placeholder_history(&db).await.unwrap();

    assert_eq!(report.stage_history, 1);
    assert_eq!(report.call_history, 1);
    assert_eq!(stage_history::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(call_history::Entity::find().count(&db).await.unwrap(), 1);
}
