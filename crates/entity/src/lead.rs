use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "lead")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub lead_code: String,
    #[sea_orm(indexed)]
    pub company_name: String,
    pub city: String,
    pub state: String,
    pub sector: Option<String>,
    pub source: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub department: Option<String>,
    #[sea_orm(indexed)]
    pub stage: Stage,
    pub client_type_main: Option<String>,
    pub client_type_detail: Option<String>,
    pub last_call_date: Option<Date>,
    pub last_remark: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CallHistory,
    StageHistory,
    Detail,
    AdditionalContact,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::CallHistory => Entity::has_many(super::call_history::Entity).into(),
            Self::StageHistory => Entity::has_many(super::stage_history::Entity).into(),
            Self::Detail => Entity::has_one(super::lead_detail::Entity).into(),
            Self::AdditionalContact => Entity::has_many(super::additional_contact::Entity).into(),
        }
    }
}

impl Related<super::call_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CallHistory.def()
    }
}

impl Related<super::stage_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StageHistory.def()
    }
}

impl Related<super::lead_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detail.def()
    }
}

impl Related<super::additional_contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalContact.def()
    }
}

/// Top-level lifecycle bucket of a lead.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(30))")]
pub enum Stage {
    #[sea_orm(string_value = "prospect")]
    Prospect,
    #[sea_orm(string_value = "requirement_yes")]
    RequirementYes,
    #[sea_orm(string_value = "future")]
    Future,
    #[sea_orm(string_value = "regret")]
    Regret,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prospect => "prospect",
            Stage::RequirementYes => "requirement_yes",
            Stage::Future => "future",
            Stage::Regret => "regret",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Prospect => "Prospect",
            Stage::RequirementYes => "Requirement Yes",
            Stage::Future => "Future Requirement",
            Stage::Regret => "Regret Offer",
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
