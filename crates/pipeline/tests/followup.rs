mod common;

use common::*;
use pipeline::{followup_status, send_followup, transition, CallOutcome, ReconnectForm};

async fn reconnect(db: &sea_orm::DatabaseConnection, lead_id: i32) {
    transition(
        db,
        lead_id,
        call_on(day(2026, 10, 1)),
        CallOutcome::Reconnect(ReconnectForm {
            followup_date: Some(day(2026, 10, 8)),
            remark: Some("real remark".into()),
        }),
        &marketing(),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn cadence_caps_at_three() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;
    reconnect(&db, lead.id).await;

    let first = send_followup(&db, lead.id, &marketing(), day(2026, 10, 2)).await.unwrap();
    assert_eq!(first.call.remark, "Followup Sent 1");
    send_followup(&db, lead.id, &marketing(), day(2026, 10, 3)).await.unwrap();

    let status = followup_status(&db, lead.id).await.unwrap();
    assert_eq!(status.count, 2);
    assert!(status.can_send);
    assert!(status.in_cycle);
    assert_eq!(status.cycle_start_date, Some(day(2026, 10, 1)));

    let third = send_followup(&db, lead.id, &marketing(), day(2026, 10, 4)).await.unwrap();
    assert_eq!(third.call.remark, "Followup Sent 3");
    assert!(!third.status.can_send);

    let err = send_followup(&db, lead.id, &marketing(), day(2026, 10, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CAPACITY");
    assert_eq!(call_count(&db, lead.id).await, 4);

    let lead = pipeline::get_lead(&db, lead.id).await.unwrap();
    assert_eq!(lead.last_remark.as_deref(), Some("Followup Sent 3"));
    assert_eq!(lead.last_call_date, Some(day(2026, 10, 4)));
}

#[tokio::test]
async fn new_reconnect_starts_a_new_cycle() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;
    reconnect(&db, lead.id).await;
    for d in 2..=4 {
        send_followup(&db, lead.id, &marketing(), day(2026, 10, d)).await.unwrap();
    }

    transition(
        &db,
        lead.id,
        call_on(day(2026, 10, 6)),
        CallOutcome::Reconnect(ReconnectForm {
            followup_date: Some(day(2026, 10, 13)),
            remark: Some("Spoke to purchase head".into()),
        }),
        &marketing(),
    )
    .await
    .unwrap();

    let status = followup_status(&db, lead.id).await.unwrap();
    assert_eq!(status.count, 0);
    assert!(status.can_send);
    assert_eq!(status.cycle_start_date, Some(day(2026, 10, 6)));
}

#[tokio::test]
async fn fresh_lead_is_not_in_cycle() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;

    let status = followup_status(&db, lead.id).await.unwrap();

    assert!(!status.in_cycle);
    assert_eq!(status.count, 0);
    assert!(status.can_send);
}

#[tokio::test]
async fn sends_require_an_open_cycle() {
    let db = setup().await;
    let lead = prospect(&db, "Acme Corp").await;

    let err = send_followup(&db, lead.id, &marketing(), day(2026, 10, 1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "GUARD");
    assert_eq!(call_count(&db, lead.id).await, 0);
    let status = followup_status(&db, lead.id).await.unwrap();
    assert_eq!(status.count, 0);
    assert!(!status.in_cycle);

    reconnect(&db, lead.id).await;
    for d in 2..=4 {
        send_followup(&db, lead.id, &marketing(), day(2026, 10, d)).await.unwrap();
    }
    let err = send_followup(&db, lead.id, &marketing(), day(2026, 10, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CAPACITY");
    assert_eq!(call_count(&db, lead.id).await, 4);
}

#[tokio::test]
async fn confirmed_leads_get_no_followups() {
    let db = setup().await;
    let (lead, _) = confirmed(&db, "Acme Corp").await;

    let err = send_followup(&db, lead.id, &marketing(), day(2026, 10, 2))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "GUARD");
    assert_eq!(call_count(&db, lead.id).await, 1);
}

#[tokio::test]
async fn unknown_lead_is_not_found() {
    let db = setup().await;
    let err = followup_status(&db, 404).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
