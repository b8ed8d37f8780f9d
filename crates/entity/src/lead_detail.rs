use sea_orm::entity::prelude::*;

/// Stage payload of a lead. One row per lead at most (`lead_id` is unique);
/// `kind` selects which of the optional column groups is meaningful.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "lead_detail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub lead_id: i32,
    pub kind: Kind,
    pub client_type_main: String,
    pub client_type_detail: Option<String>,
    pub followup_date: Option<Date>,
    pub remark: Option<String>,
    // requirement
    pub tank_application: Option<String>,
    pub tank_location: Option<String>,
    pub tanks_json: Option<Json>,
    pub assigned_salesperson: Option<String>,
    pub expected_delivery_date: Option<Date>,
    #[sea_orm(indexed)]
    pub sales_stage: Option<SalesStage>,
    // regret
    pub tank_type: Option<String>,
    pub tank_type_other: Option<String>,
    // future
    pub expected_timeline: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Lead,
    Meeting,
    Quotation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Lead => Entity::belongs_to(super::lead::Entity)
                .from(Column::LeadId)
                .to(super::lead::Column::Id)
                .into(),
            Self::Meeting => Entity::has_many(super::meeting::Entity).into(),
            Self::Quotation => Entity::has_many(super::quotation::Entity).into(),
        }
    }
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum Kind {
    #[sea_orm(string_value = "requirement")]
    Requirement,
    #[sea_orm(string_value = "regret")]
    Regret,
    #[sea_orm(string_value = "future")]
    Future,
}

/// Commercial progress of a confirmed requirement, in pipeline order.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(50))")]
pub enum SalesStage {
    #[sea_orm(string_value = "costing_created")]
    CostingCreated,
    #[sea_orm(string_value = "quotation_created")]
    QuotationCreated,
    #[sea_orm(string_value = "quotation_sent")]
    QuotationSent,
    #[sea_orm(string_value = "quotation_revision")]
    QuotationRevision,
    #[sea_orm(string_value = "quotation_accepted")]
    QuotationAccepted,
    #[sea_orm(string_value = "po_received")]
    PoReceived,
    #[sea_orm(string_value = "oa_created")]
    OaCreated,
    #[sea_orm(string_value = "oa_sent")]
    OaSent,
    #[sea_orm(string_value = "oa_revision")]
    OaRevision,
    #[sea_orm(string_value = "oa_accepted")]
    OaAccepted,
    #[sea_orm(string_value = "order_completed")]
    OrderCompleted,
    #[sea_orm(string_value = "order_lost")]
    OrderLost,
}

impl SalesStage {
    pub fn as_str(self) -> &'static str {
        match self {
            SalesStage::CostingCreated => "costing_created",
            SalesStage::QuotationCreated => "quotation_created",
            SalesStage::QuotationSent => "quotation_sent",
            SalesStage::QuotationRevision => "quotation_revision",
            SalesStage::QuotationAccepted => "quotation_accepted",
            SalesStage::PoReceived => "po_received",
            SalesStage::OaCreated => "oa_created",
            SalesStage::OaSent => "oa_sent",
            SalesStage::OaRevision => "oa_revision",
            SalesStage::OaAccepted => "oa_accepted",
            SalesStage::OrderCompleted => "order_completed",
            SalesStage::OrderLost => "order_lost",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SalesStage::CostingCreated => "Costing Created",
            SalesStage::QuotationCreated => "Quotation Created",
            SalesStage::QuotationSent => "Quotation Sent",
            SalesStage::QuotationRevision => "Quotation Revision",
            SalesStage::QuotationAccepted => "Quotation Accepted",
            SalesStage::PoReceived => "PO Received",
            SalesStage::OaCreated => "OA Created",
            SalesStage::OaSent => "OA Sent",
            SalesStage::OaRevision => "OA Revision",
            SalesStage::OaAccepted => "OA Accepted",
            SalesStage::OrderCompleted => "Order Completed",
            SalesStage::OrderLost => "Order Lost",
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, SalesStage::OrderCompleted | SalesStage::OrderLost)
    }
}

impl ActiveModelBehavior for ActiveModel {}
