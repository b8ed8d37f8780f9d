use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "quotation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub requirement_id: i32,
    pub expected_date: Date,
    pub actual_date: Option<Date>,
    pub quotation_number: Option<String>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lead_detail::Entity",
        from = "Column::RequirementId",
        to = "super::lead_detail::Column::Id"
    )]
    Requirement,
}

impl Related<super::lead_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
