#![allow(dead_code)]

use std::sync::Arc;

use api::schema::{build_schema, AppSchema, MutationRoot, QueryRoot};
use async_graphql::{EmptySubscription, Request, Response, Schema, Variables};
use migration::{Migrator, MigratorTrait};
use pipeline::Actor;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use uuid::Uuid;

pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub schema: Schema<QueryRoot, MutationRoot, EmptySubscription>,
}

impl TestContext {
    pub async fn new() -> Self {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        let db = Arc::new(conn);
        let AppSchema(schema) = build_schema(db.clone());
        Self { db, schema }
    }

    pub async fn run(&self, actor: Option<&Actor>, query: &str, vars: Value) -> Response {
        let mut request = Request::new(query).variables(Variables::from_json(vars));
        if let Some(actor) = actor {
            request = request.data(actor.clone());
        }
        self.schema.execute(request).await
    }

    /// Runs a request that must succeed and returns its data as JSON.
    pub async fn ok(&self, actor: &Actor, query: &str, vars: Value) -> Value {
        let resp = self.run(Some(actor), query, vars).await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        resp.data.into_json().unwrap()
    }
}

pub fn marketing() -> Actor {
    Actor::marketing(Uuid::new_v4())
}

pub fn sales() -> Actor {
    Actor::sales(Uuid::new_v4())
}

pub fn error_code(resp: &Response) -> Option<String> {
    let err = resp.errors.first()?;
    match err.extensions.as_ref()?.get("code")? {
        async_graphql::Value::String(code) => Some(code.clone()),
        _ => None,
    }
}

pub fn error_field(resp: &Response) -> Option<String> {
    let err = resp.errors.first()?;
    match err.extensions.as_ref()?.get("field")? {
        async_graphql::Value::String(field) => Some(field.clone()),
        _ => None,
    }
}

pub const CREATE_LEAD: &str = r#"
    mutation Create($input: NewLeadInput!) {
        leads {
            createLead(input: $input) { id leadCode companyName stage }
        }
    }
"#;

pub fn lead_input(company: &str, email: &str, phone: &str) -> Value {
    serde_json::json!({
        "input": {
            "companyName": company,
            "city": "Pune",
            "state": "Maharashtra",
            "sector": "Chemicals",
            "source": "Referral",
            "contactName": "Asha Rao",
            "contactEmail": email,
            "contactPhone": phone,
        }
    })
}

pub async fn create_lead(ctx: &TestContext, company: &str, email: &str, phone: &str) -> String {
    let data = ctx
        .ok(&marketing(), CREATE_LEAD, lead_input(company, email, phone))
        .await;
    data["leads"]["createLead"]["id"].as_str().unwrap().to_string()
}
