mod common;

use common::*;
use entity::{
    lead::Stage,
    lead_detail::{Kind, SalesStage},
    meeting::{self, MeetingType},
    quotation,
};
use pipeline::{
    mark_customer, mark_lost, mark_regret, schedule_meeting, update_sales_stage,
    upsert_quotation, MeetingForm, QuotationForm, StageDetail,
};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn same_stage_update_still_logs() {
    let db = setup().await;
    let (lead, req) = confirmed(&db, "Acme Corp").await;

    let record = update_sales_stage(
        &db,
        req.id,
        SalesStage::CostingCreated,
        "Costing revised",
        None,
        &sales(),
    )
    .await
    .unwrap();

    assert_eq!(record.sales_stage(), Some(SalesStage::CostingCreated));
    let log = history(&db, lead.id).await;
    let last = log.last().unwrap();
    assert_eq!(last.from_stage, "costing_created");
    assert_eq!(last.to_stage, "costing_created");
    assert_eq!(last.notes.as_deref(), Some("Costing revised"));
}

#[tokio::test]
async fn sales_stage_needs_remark() {
    let db = setup().await;
    let (lead, req) = confirmed(&db, "Acme Corp").await;

    let err = update_sales_stage(&db, req.id, SalesStage::QuotationSent, "  ", None, &sales())
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("remark"));
    assert_eq!(history(&db, lead.id).await.len(), 1);
}

#[tokio::test]
async fn stage_update_sets_followup() {
    let db = setup().await;
    let (_, req) = confirmed(&db, "Acme Corp").await;

    let record = update_sales_stage(
        &db,
        req.id,
        SalesStage::QuotationSent,
        "Sent v1",
        Some(day(2026, 10, 20)),
        &sales(),
    )
    .await
    .unwrap();

    let details = record.detail.as_requirement().unwrap();
    assert_eq!(details.sales_stage, SalesStage::QuotationSent);
    assert_eq!(details.followup_date, Some(day(2026, 10, 20)));
    assert_eq!(details.current_remark.as_deref(), Some("Sent v1"));
}

#[tokio::test]
async fn lost_logs_same_stage_on_both_sides() {
    let db = setup().await;
    let (lead, req) = confirmed(&db, "Acme Corp").await;
    update_sales_stage(&db, req.id, SalesStage::QuotationSent, "Sent", None, &sales())
        .await
        .unwrap();

    let record = mark_lost(&db, req.id, "Lost on price", &sales()).await.unwrap();

    assert_eq!(record.sales_stage(), Some(SalesStage::OrderLost));
    let last = history(&db, lead.id).await.pop().unwrap();
    assert_eq!(last.from_stage, "order_lost");
    assert_eq!(last.to_stage, "order_lost");
}

#[tokio::test]
async fn customer_closes_requirement() {
    let db = setup().await;
    let (lead, req) = confirmed(&db, "Acme Corp").await;

    let record = mark_customer(&db, req.id, "PO executed", &sales()).await.unwrap();

    assert_eq!(record.sales_stage(), Some(SalesStage::OrderCompleted));
    let last = history(&db, lead.id).await.pop().unwrap();
    assert_eq!(last.to_stage, "order_completed");
    assert_eq!(last.notes.as_deref(), Some("PO executed"));
}

#[tokio::test]
async fn regret_retires_requirement_and_children() {
    let db = setup().await;
    let (lead, req) = confirmed(&db, "Acme Corp").await;
    schedule_meeting(
        &db,
        req.id,
        MeetingForm {
            meeting_date: Some(day(2026, 10, 10)),
            meeting_type: Some(MeetingType::Onsite),
            attendees: Some("Plant head".into()),
            notes: None,
        },
        &sales(),
    )
    .await
    .unwrap();
    upsert_quotation(
        &db,
        req.id,
        QuotationForm {
            expected_date: Some(day(2026, 10, 12)),
            ..Default::default()
        },
        &sales(),
    )
    .await
    .unwrap();

    let record = mark_regret(&db, req.id, "Project shelved", &sales(), day(2026, 10, 19))
        .await
        .unwrap();

    match &record.detail {
        StageDetail::Regret(offer) => {
            assert_eq!(offer.tank_type, "Not specified");
            assert_eq!(offer.followup_date, day(2026, 11, 18));
            assert_eq!(offer.remark, "Project shelved");
            assert_eq!(offer.client.main, "Industrial");
        }
        other => panic!("expected regret offer, got {other:?}"),
    }
    let rows = detail_rows(&db, lead.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, Kind::Regret);
    assert_eq!(meeting::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(quotation::Entity::find().count(&db).await.unwrap(), 0);

    let lead = pipeline::get_lead(&db, lead.id).await.unwrap();
    assert_eq!(lead.stage, Stage::Regret);
    let last = history(&db, lead.id).await.pop().unwrap();
    assert_eq!((last.from_stage.as_str(), last.to_stage.as_str()), ("requirement_yes", "regret"));
}

#[tokio::test]
async fn closed_requirement_id_is_rejected_after_regret() {
    let db = setup().await;
    let (_, req) = confirmed(&db, "Acme Corp").await;
    mark_regret(&db, req.id, "Shelved", &sales(), day(2026, 10, 19))
        .await
        .unwrap();

    let err = update_sales_stage(&db, req.id, SalesStage::QuotationSent, "x", None, &sales())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn meeting_requires_type() {
    let db = setup().await;
    let (_, req) = confirmed(&db, "Acme Corp").await;

    let err = schedule_meeting(
        &db,
        req.id,
        MeetingForm {
            meeting_date: Some(day(2026, 10, 10)),
            ..Default::default()
        },
        &sales(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.field(), Some("meeting_type"));
}

#[tokio::test]
async fn quotation_is_revised_not_duplicated() {
    let db = setup().await;
    let (_, req) = confirmed(&db, "Acme Corp").await;

    let first = upsert_quotation(
        &db,
        req.id,
        QuotationForm {
            expected_date: Some(day(2026, 10, 12)),
            quotation_number: Some("Q-101".into()),
            amount_cents: Some(1_250_000),
            ..Default::default()
        },
        &sales(),
    )
    .await
    .unwrap();
    assert!(first.created);

    let second = upsert_quotation(
        &db,
        req.id,
        QuotationForm {
            expected_date: Some(day(2026, 10, 14)),
            actual_date: Some(day(2026, 10, 14)),
            quotation_number: Some("Q-101-R1".into()),
            ..Default::default()
        },
        &sales(),
    )
    .await
    .unwrap();

    assert!(!second.created);
    assert_eq!(second.quotation.id, first.quotation.id);
    assert_eq!(second.quotation.amount_cents, Some(1_250_000));
    assert_eq!(second.quotation.quotation_number.as_deref(), Some("Q-101-R1"));
    assert_eq!(quotation::Entity::find().count(&db).await.unwrap(), 1);
}
