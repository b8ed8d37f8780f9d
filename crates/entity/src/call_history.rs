use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "call_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub lead_id: i32,
    pub expected_call_date: Option<Date>,
    pub actual_call_date: Date,
    pub outcome: Outcome,
    pub remark: String,
    pub created_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lead::Entity",
        from = "Column::LeadId",
        to = "super::lead::Column::Id"
    )]
    Lead,
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum Outcome {
    #[sea_orm(string_value = "yes")]
    Yes,
    #[sea_orm(string_value = "future")]
    Future,
    #[sea_orm(string_value = "reconnect")]
    Reconnect,
    #[sea_orm(string_value = "regret")]
    Regret,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Yes => "yes",
            Outcome::Future => "future",
            Outcome::Reconnect => "reconnect",
            Outcome::Regret => "regret",
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
