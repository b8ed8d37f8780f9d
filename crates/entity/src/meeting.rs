use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "meeting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub requirement_id: i32,
    pub meeting_date: Date,
    pub meeting_type: MeetingType,
    pub attendees: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
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

#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "onsite")]
    Onsite,
    #[sea_orm(string_value = "phone")]
    Phone,
}

impl ActiveModelBehavior for ActiveModel {}
