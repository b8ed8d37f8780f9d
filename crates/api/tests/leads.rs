mod common;

use api::seed::seed_demo;
use chrono::NaiveDate;
use common::*;
use serde_json::json;

const LOG_CALL: &str = r#"
    mutation Log($leadId: ID!, $input: CallInput!) {
        leads {
            logCall(leadId: $leadId, input: $input) {
                previousStage
                stageChanged
                lead { stage lastCallDate clientTypeMain }
                call { outcome actualCallDate }
                detail { id kind salesStage tanks { tankType capacity quantity } }
            }
        }
    }
"#;

fn yes_call(tanks: serde_json::Value) -> serde_json::Value {
    json!({
        "outcome": "YES",
        "actualCallDate": "2026-10-01",
        "requirement": {
            "clientTypeMain": "Industrial",
            "tankApplication": "Water storage",
            "assignedSalesperson": "Priya",
            "tanks": tanks,
        }
    })
}

#[tokio::test]
async fn create_lead_assigns_code() {
    let ctx = TestContext::new().await;
    let data = ctx
        .ok(
            &marketing(),
            CREATE_LEAD,
            lead_input("Acme Corp", "info@acme.test", "+91-100"),
        )
        .await;
    let lead = &data["leads"]["createLead"];
    assert_eq!(lead["leadCode"], "EP00001");
    assert_eq!(lead["stage"], "PROSPECT");
}

#[tokio::test]
async fn create_lead_reports_invalid_field() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .run(
            Some(&marketing()),
            CREATE_LEAD,
            lead_input("Acme Corp", "not-an-email", "+91-100"),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("VALIDATION"));
    assert_eq!(error_field(&resp).as_deref(), Some("contact_email"));
}

#[tokio::test]
async fn requests_without_actor_are_rejected() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .run(None, CREATE_LEAD, lead_input("Acme Corp", "info@acme.test", "+91-100"))
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn log_call_yes_creates_requirement() {
    let ctx = TestContext::new().await;
    let lead_id = create_lead(&ctx, "Acme Corp", "info@acme.test", "+91-100").await;
    let data = ctx
        .ok(
            &marketing(),
            LOG_CALL,
            json!({
                "leadId": lead_id,
                "input": yes_call(json!([
                    { "tankType": "FRP", "capacity": "10 KL", "quantity": 2 }
                ])),
            }),
        )
        .await;
    let payload = &data["leads"]["logCall"];
    assert_eq!(payload["previousStage"], "PROSPECT");
    assert_eq!(payload["stageChanged"], true);
    assert_eq!(payload["lead"]["stage"], "REQUIREMENT_YES");
    assert!(payload["lead"]["lastCallDate"].is_null());
    assert_eq!(payload["lead"]["clientTypeMain"], "Industrial");
    assert_eq!(payload["call"]["outcome"], "YES");
    assert_eq!(payload["detail"]["kind"], "REQUIREMENT");
    assert_eq!(payload["detail"]["salesStage"], "COSTING_CREATED");
    assert_eq!(payload["detail"]["tanks"][0]["quantity"], 2);
}

#[tokio::test]
async fn log_call_without_tanks_is_rejected() {
    let ctx = TestContext::new().await;
    let lead_id = create_lead(&ctx, "Acme Corp", "info@acme.test", "+91-100").await;
    let resp = ctx
        .run(
            Some(&marketing()),
            LOG_CALL,
            json!({ "leadId": lead_id, "input": yes_call(json!([])) }),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("VALIDATION"));
    assert_eq!(error_field(&resp).as_deref(), Some("tanks"));

    let data = ctx
        .ok(
            &marketing(),
            r#"query Lead($id: ID!) { leads { lead(id: $id) { stage } } }"#,
            json!({ "id": lead_id }),
        )
        .await;
    assert_eq!(data["leads"]["lead"]["stage"], "PROSPECT");
}

#[tokio::test]
async fn sales_users_cannot_log_prospect_calls() {
    let ctx = TestContext::new().await;
    let lead_id = create_lead(&ctx, "Acme Corp", "info@acme.test", "+91-100").await;
    let resp = ctx
        .run(
            Some(&sales()),
            LOG_CALL,
            json!({
                "leadId": lead_id,
                "input": yes_call(json!([
                    { "tankType": "FRP", "capacity": "10 KL", "quantity": 1 }
                ])),
            }),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("FORBIDDEN"));
}

#[tokio::test]
async fn sales_stage_update_reaches_timeline() {
    let ctx = TestContext::new().await;
    let lead_id = create_lead(&ctx, "Acme Corp", "info@acme.test", "+91-100").await;
    let data = ctx
        .ok(
            &marketing(),
            LOG_CALL,
            json!({
                "leadId": lead_id,
                "input": yes_call(json!([
                    { "tankType": "FRP", "capacity": "10 KL", "quantity": 1 }
                ])),
            }),
        )
        .await;
    let requirement_id = data["leads"]["logCall"]["detail"]["id"].clone();

    let data = ctx
        .ok(
            &sales(),
            r#"
            mutation Stage($id: ID!) {
                leads {
                    updateSalesStage(
                        requirementId: $id
                        stage: QUOTATION_SENT
                        remark: "sent by mail"
                    ) {
                        salesStage remark
                    }
                }
            }
            "#,
            json!({ "id": requirement_id }),
        )
        .await;
    assert_eq!(data["leads"]["updateSalesStage"]["salesStage"], "QUOTATION_SENT");

    let data = ctx
        .ok(
            &sales(),
            r#"
            query Timeline($id: ID!) {
                leads {
                    timeline(leadId: $id) {
                        calls { outcome }
                        stageHistory { fromStage toStage notes }
                    }
                }
            }
            "#,
            json!({ "id": lead_id }),
        )
        .await;
    let timeline = &data["leads"]["timeline"];
    assert_eq!(timeline["calls"].as_array().unwrap().len(), 1);
    let history = timeline["stageHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .any(|h| h["fromStage"] == "costing_created" && h["toStage"] == "quotation_sent"));
}

#[tokio::test]
async fn unknown_requirement_is_not_found() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .run(
            Some(&sales()),
            r#"mutation { leads { markLost(requirementId: "999", remark: "gone") { id } } }"#,
            json!({}),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .run(
            Some(&marketing()),
            r#"query { leads { lead(id: "abc") { id } } }"#,
            json!({}),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("BAD_REQUEST"));
}

#[tokio::test]
async fn followups_are_capped() {
    let ctx = TestContext::new().await;
    let lead_id = create_lead(&ctx, "Acme Corp", "info@acme.test", "+91-100").await;
    let send = r#"
        mutation Send($id: ID!) {
            leads { sendFollowup(leadId: $id, today: "2026-10-01") { status { count canSend } } }
        }
    "#;
    let actor = marketing();
    let resp = ctx.run(Some(&actor), send, json!({ "id": lead_id })).await;
    assert_eq!(error_code(&resp).as_deref(), Some("GUARD"));

    let data = ctx.ok(
        &actor,
        LOG_CALL,
        json!({
            "leadId": lead_id,
            "input": {
                "outcome": "RECONNECT",
                "actualCallDate": "2026-09-30",
                "reconnect": { "followupDate": "2026-10-05", "remark": "call back next week" },
            },
        }),
    )
    .await;
    assert_eq!(data["leads"]["logCall"]["lead"]["lastCallDate"], "2026-09-30");
    for expected in 1..=3 {
        let data = ctx.ok(&actor, send, json!({ "id": lead_id })).await;
        assert_eq!(data["leads"]["sendFollowup"]["status"]["count"], expected);
    }
    let resp = ctx.run(Some(&actor), send, json!({ "id": lead_id })).await;
    assert_eq!(error_code(&resp).as_deref(), Some("CAPACITY"));
}

#[tokio::test]
async fn duplicates_and_search() {
    let ctx = TestContext::new().await;
    create_lead(&ctx, "Acme Corporation", "info@acme.test", "+91-100").await;
    create_lead(&ctx, "Zenith Tanks", "hello@zenith.test", "+91-200").await;

    let data = ctx
        .ok(
            &marketing(),
            r#"
            query Dupes($input: DuplicateCheckInput!) {
                leads { duplicates(input: $input) { matchType score lead { companyName } } }
            }
            "#,
            json!({ "input": { "email": "INFO@acme.test", "companyName": "acme corp" } }),
        )
        .await;
    let matches = data["leads"]["duplicates"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["matchType"], "EMAIL");
    assert_eq!(matches[0]["score"], 100);

    let data = ctx
        .ok(
            &marketing(),
            r#"query { leads { search(q: "zen") { companyName } } }"#,
            json!({}),
        )
        .await;
    let hits = data["leads"]["search"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["companyName"], "Zenith Tanks");
}

#[tokio::test]
async fn dashboard_over_seeded_pipeline() {
    let ctx = TestContext::new().await;
    let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let seeded = seed_demo(ctx.db.as_ref(), today).await.unwrap();
    assert_eq!(seeded.leads.len(), 5);
    assert!(seeded.company("Coastal Infra").is_some());

    let data = ctx
        .ok(
            &seeded.sales,
            r#"
            query {
                leads {
                    dashboard(today: "2026-10-15") {
                        stages { prospect requirementYes future regret total }
                        activeRequirements
                        customers
                        followups { overdue dueToday upcoming }
                    }
                }
            }
            "#,
            json!({}),
        )
        .await;
    let dash = &data["leads"]["dashboard"];
    assert_eq!(dash["stages"]["prospect"], 1);
    assert_eq!(dash["stages"]["requirementYes"], 2);
    assert_eq!(dash["stages"]["future"], 1);
    assert_eq!(dash["stages"]["regret"], 1);
    assert_eq!(dash["stages"]["total"], 5);
    assert_eq!(dash["activeRequirements"], 1);
    assert_eq!(dash["customers"], 1);
    assert_eq!(dash["followups"]["overdue"], 1);
    assert_eq!(dash["followups"]["upcoming"], 1);

    let data = ctx
        .ok(
            &seeded.sales,
            r#"query { leads { list { companyName stage } } }"#,
            json!({}),
        )
        .await;
    assert_eq!(data["leads"]["list"].as_array().unwrap().len(), 2);
}
