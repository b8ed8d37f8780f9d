use entity::{additional_contact, lead};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::actor::Actor;
use crate::error::{PipelineError, PipelineResult};
use crate::payload::{clean, required};
use crate::store;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
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

struct ValidLead {
    company_name: String,
    city: String,
    state: String,
    sector: String,
    source: String,
    contact_name: String,
    contact_email: String,
    contact_phone: String,
    department: Option<String>,
}

impl NewLead {
    fn validate(&self) -> PipelineResult<ValidLead> {
        let lead = ValidLead {
            company_name: required("company_name", &self.company_name)?,
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            sector: required("sector", &self.sector)?,
            source: required("source", &self.source)?,
            contact_name: required("contact_name", &self.contact_name)?,
            contact_email: required("contact_email", &self.contact_email)?,
            contact_phone: required("contact_phone", &self.contact_phone)?,
            department: clean(&self.department),
        };
        if !lead.contact_email.contains('@') {
            return Err(PipelineError::validation(
                "contact_email",
                "must be a valid email address",
            ));
        }
        Ok(lead)
    }
}

pub fn lead_code(id: i32) -> String {
    format!("EP{id:05}")
}

/// Creates a prospect. The code is derived from the row id, so the row is
/// written with a unique placeholder first and renamed in the same
/// transaction.
pub async fn create_lead(
    db: &DatabaseConnection,
    input: NewLead,
    actor: &Actor,
) -> PipelineResult<lead::Model> {
    let fields = input.validate()?;
    let span = info_span!("leads.create", company = %fields.company_name);
    async move {
        let ts = store::now();
        let txn = db.begin().await?;
        let created = lead::ActiveModel {
            lead_code: Set(format!("PENDING-{}", Uuid::new_v4().simple())),
            company_name: Set(fields.company_name),
            city: Set(fields.city),
            state: Set(fields.state),
            sector: Set(Some(fields.sector)),
            source: Set(Some(fields.source)),
            contact_name: Set(Some(fields.contact_name)),
            contact_email: Set(Some(fields.contact_email)),
            contact_phone: Set(Some(fields.contact_phone)),
            department: Set(fields.department),
            stage: Set(lead::Stage::Prospect),
            created_by: Set(actor.stamp()),
            created_at: Set(ts),
            updated_at: Set(ts),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let code = lead_code(created.id);
        let mut active: lead::ActiveModel = created.into();
        active.lead_code = Set(code);
        let model = active.update(&txn).await?;
        txn.commit().await?;
        info!(lead_id = model.id, lead_code = %model.lead_code, "lead created");
        Ok(model)
    }
    .instrument(span)
    .await
}

pub async fn get_lead(db: &DatabaseConnection, lead_id: i32) -> PipelineResult<lead::Model> {
    store::find_lead(db, lead_id).await
}

/// Adds a phone or email beyond the lead's main contact. A primary entry
/// demotes the lead's other primaries of the same type.
pub async fn add_additional_contact(
    db: &DatabaseConnection,
    lead_id: i32,
    contact_type: additional_contact::ContactType,
    value: &str,
    is_primary: bool,
) -> PipelineResult<additional_contact::Model> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PipelineError::missing("contact_value"));
    }
    let txn = db.begin().await?;
    store::lock_lead(&txn, lead_id).await?;
    if is_primary {
        additional_contact::Entity::update_many()
            .col_expr(additional_contact::Column::IsPrimary, Expr::value(false))
            .filter(additional_contact::Column::LeadId.eq(lead_id))
            .filter(additional_contact::Column::ContactType.eq(contact_type))
            .exec(&txn)
            .await?;
    }
    let model = additional_contact::ActiveModel {
        lead_id: Set(lead_id),
        contact_type: Set(contact_type),
        contact_value: Set(value.to_owned()),
        is_primary: Set(is_primary),
        created_at: Set(store::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(model)
}

pub async fn additional_contacts(
    db: &DatabaseConnection,
    lead_id: i32,
) -> PipelineResult<Vec<additional_contact::Model>> {
    store::find_lead(db, lead_id).await?;
    Ok(additional_contact::Entity::find()
        .filter(additional_contact::Column::LeadId.eq(lead_id))
        .order_by_desc(additional_contact::Column::IsPrimary)
        .order_by_asc(additional_contact::Column::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewLead {
        NewLead {
            company_name: Some("Acme".into()),
            city: Some("Pune".into()),
            state: Some("MH".into()),
            sector: Some("Chemicals".into()),
            source: Some("Expo".into()),
            contact_name: Some("Asha".into()),
            contact_email: Some("asha@acme.test".into()),
            contact_phone: Some("9000000001".into()),
            department: None,
        }
    }

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(lead_code(7), "EP00007");
        assert_eq!(lead_code(123456), "EP123456");
    }

    #[test]
    fn email_needs_at_sign() {
        let mut input = complete();
        input.contact_email = Some("asha.acme.test".into());
        let err = input.validate().err().unwrap();
        assert_eq!(err.field(), Some("contact_email"));
    }

    #[test]
    fn blank_city_is_missing() {
        let mut input = complete();
        input.city = Some(" ".into());
        assert_eq!(input.validate().err().unwrap().field(), Some("city"));
        assert!(complete().validate().is_ok());
    }
}
