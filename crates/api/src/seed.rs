//! Demo data for local development, written through the pipeline operations.

use chrono::{Duration, NaiveDate};
use entity::{lead, lead_detail::SalesStage};
use pipeline::{
    Actor, CallLog, CallOutcome, FutureForm, NewLead, PipelineResult, ReconnectForm,
    RegretForm, RequirementForm, TankLineInput,
};
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SeededLeads {
    pub marketing: Actor,
    pub sales: Actor,
    pub leads: Vec<lead::Model>,
}

impl SeededLeads {
    pub fn company(&self, name: &str) -> Option<&lead::Model> {
        self.leads.iter().find(|l| l.company_name == name)
    }
}

struct DemoLead {
    company: &'static str,
    city: &'static str,
    state: &'static str,
    contact: &'static str,
    email: &'static str,
    phone: &'static str,
}

const DEMO_LEADS: [DemoLead; 5] = [
    DemoLead {
        company: "Acme Water Works",
        city: "Pune",
        state: "Maharashtra",
        contact: "Asha Kulkarni",
        email: "asha@acmewater.test",
        phone: "+91-20-5550100",
    },
    DemoLead {
        company: "Delta Agro Foods",
        city: "Nashik",
        state: "Maharashtra",
        contact: "Ravi Patil",
        email: "ravi@deltaagro.test",
        phone: "+91-253-5550200",
    },
    DemoLead {
        company: "Sunrise Chemicals",
        city: "Vadodara",
        state: "Gujarat",
        contact: "Meera Shah",
        email: "meera@sunrisechem.test",
        phone: "+91-265-5550300",
    },
    DemoLead {
        company: "Northern Dairy Co",
        city: "Ludhiana",
        state: "Punjab",
        contact: "Harpreet Singh",
        email: "harpreet@northerndairy.test",
        phone: "+91-161-5550400",
    },
    DemoLead {
        company: "Coastal Infra",
        city: "Kochi",
        state: "Kerala",
        contact: "Anil Menon",
        email: "anil@coastalinfra.test",
        phone: "+91-484-5550500",
    },
];

/// Seeds one lead per stage plus a customer, all dated relative to `today`.
pub async fn seed_demo(db: &DatabaseConnection, today: NaiveDate) -> PipelineResult<SeededLeads> {
    let marketing = Actor::marketing(Uuid::new_v4());
    let sales = Actor::sales(Uuid::new_v4());

    let mut created = Vec::with_capacity(DEMO_LEADS.len());
    for demo in &DEMO_LEADS {
        let input = NewLead {
            company_name: Some(demo.company.into()),
            city: Some(demo.city.into()),
            state: Some(demo.state.into()),
            sector: Some("Manufacturing".into()),
            source: Some("Trade show".into()),
            contact_name: Some(demo.contact.into()),
            contact_email: Some(demo.email.into()),
            contact_phone: Some(demo.phone.into()),
            department: None,
        };
        created.push(pipeline::create_lead(db, input, &marketing).await?);
    }

    let call = CallLog {
        actual_call_date: Some(today - Duration::days(2)),
        expected_call_date: None,
    };

    let requirement = |salesperson: &str| RequirementForm {
        client_type_main: Some("Industrial".into()),
        client_type_detail: Some("Process water".into()),
        tank_application: Some("Water storage".into()),
        tank_location: Some("Plant yard".into()),
        assigned_salesperson: Some(salesperson.into()),
        expected_delivery_date: Some(today + Duration::days(45)),
        tanks: vec![TankLineInput {
            tank_type: Some("Vertical".into()),
            capacity: Some("10 KL".into()),
            quantity: Some(2),
        }],
        remark: Some("Needs costing this week".into()),
    };

    let acme = pipeline::transition(
        db,
        created[0].id,
        call,
        CallOutcome::Yes(requirement("Priya")),
        &marketing,
    )
    .await?;
    if let Some(detail) = acme.detail {
        pipeline::update_sales_stage(
            db,
            detail.id,
            SalesStage::QuotationSent,
            "Quotation shared over email",
            Some(today + Duration::days(3)),
            &sales,
        )
        .await?;
    }

    pipeline::transition(
        db,
        created[1].id,
        call,
        CallOutcome::Future(FutureForm {
            client_type_main: Some("Food processing".into()),
            client_type_detail: None,
            followup_date: Some(today + Duration::days(5)),
            expected_timeline: Some("Next quarter".into()),
            remark: Some("Budget approval pending".into()),
        }),
        &marketing,
    )
    .await?;

    pipeline::transition(
        db,
        created[2].id,
        call,
        CallOutcome::Regret(RegretForm {
            client_type_main: Some("Chemical".into()),
            client_type_detail: None,
            followup_date: Some(today - Duration::days(1)),
            tank_type: Some("Horizontal".into()),
            tank_type_other: None,
            remark: Some("Went with an incumbent supplier".into()),
        }),
        &marketing,
    )
    .await?;

    let dairy = pipeline::transition(
        db,
        created[3].id,
        call,
        CallOutcome::Yes(requirement("Karan")),
        &marketing,
    )
    .await?;
    if let Some(detail) = dairy.detail {
        pipeline::mark_customer(db, detail.id, "PO received and delivered", &sales).await?;
    }

    // Coastal Infra stays a prospect with one follow-up already out.
    pipeline::transition(
        db,
        created[4].id,
        call,
        CallOutcome::Reconnect(ReconnectForm {
            followup_date: Some(today + Duration::days(7)),
            remark: Some("Asked to call back after site visit".into()),
        }),
        &marketing,
    )
    .await?;
    pipeline::send_followup(db, created[4].id, &marketing, today).await?;

    let mut leads = Vec::with_capacity(created.len());
    for lead in &created {
        leads.push(pipeline::get_lead(db, lead.id).await?);
    }
    info!(leads = leads.len(), "seeded demo pipeline");
    Ok(SeededLeads {
        marketing,
        sales,
        leads,
    })
}
