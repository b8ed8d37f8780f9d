use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Lead {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum LeadDetail {
    Table,
    Id,
    LeadId,
    Kind,
    ClientTypeMain,
    ClientTypeDetail,
    FollowupDate,
    Remark,
    TankApplication,
    TankLocation,
    TanksJson,
    AssignedSalesperson,
    ExpectedDeliveryDate,
    SalesStage,
    TankType,
    TankTypeOther,
    ExpectedTimeline,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Meeting {
    Table,
    Id,
    RequirementId,
    MeetingDate,
    MeetingType,
    Attendees,
    Notes,
    Outcome,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Quotation {
    Table,
    Id,
    RequirementId,
    ExpectedDate,
    ActualDate,
    QuotationNumber,
    AmountCents,
    Notes,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeadDetail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadDetail::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One stage payload per lead, whatever its kind.
                    .col(
                        ColumnDef::new(LeadDetail::LeadId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LeadDetail::Kind).string_len(20).not_null())
                    .col(
                        ColumnDef::new(LeadDetail::ClientTypeMain)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeadDetail::ClientTypeDetail).string_len(100))
                    .col(ColumnDef::new(LeadDetail::FollowupDate).date())
                    .col(ColumnDef::new(LeadDetail::Remark).text())
                    .col(ColumnDef::new(LeadDetail::TankApplication).string_len(255))
                    .col(ColumnDef::new(LeadDetail::TankLocation).string_len(255))
                    .col(ColumnDef::new(LeadDetail::TanksJson).json())
                    .col(ColumnDef::new(LeadDetail::AssignedSalesperson).string_len(100))
                    .col(ColumnDef::new(LeadDetail::ExpectedDeliveryDate).date())
                    .col(ColumnDef::new(LeadDetail::SalesStage).string_len(50))
                    .col(ColumnDef::new(LeadDetail::TankType).string_len(100))
                    .col(ColumnDef::new(LeadDetail::TankTypeOther).string_len(100))
                    .col(ColumnDef::new(LeadDetail::ExpectedTimeline).string_len(100))
                    .col(
                        ColumnDef::new(LeadDetail::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeadDetail::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_detail_lead")
                            .from(LeadDetail::Table, LeadDetail::LeadId)
                            .to(Lead::Table, Lead::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lead_detail_kind_stage")
                    .table(LeadDetail::Table)
                    .col(LeadDetail::Kind)
                    .col(LeadDetail::SalesStage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lead_detail_followup")
                    .table(LeadDetail::Table)
                    .col(LeadDetail::FollowupDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meeting::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meeting::RequirementId).integer().not_null())
                    .col(ColumnDef::new(Meeting::MeetingDate).date().not_null())
                    .col(
                        ColumnDef::new(Meeting::MeetingType)
                            .string_len(20)
                            .not_null()
                            .default("online"),
                    )
                    .col(ColumnDef::new(Meeting::Attendees).string_len(255))
                    .col(ColumnDef::new(Meeting::Notes).text())
                    .col(ColumnDef::new(Meeting::Outcome).text())
                    .col(ColumnDef::new(Meeting::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(Meeting::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_requirement")
                            .from(Meeting::Table, Meeting::RequirementId)
                            .to(LeadDetail::Table, LeadDetail::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meeting_requirement")
                    .table(Meeting::Table)
                    .col(Meeting::RequirementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quotation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quotation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quotation::RequirementId).integer().not_null())
                    .col(ColumnDef::new(Quotation::ExpectedDate).date().not_null())
                    .col(ColumnDef::new(Quotation::ActualDate).date())
                    .col(ColumnDef::new(Quotation::QuotationNumber).string_len(50))
                    .col(ColumnDef::new(Quotation::AmountCents).big_integer())
                    .col(ColumnDef::new(Quotation::Notes).text())
                    .col(ColumnDef::new(Quotation::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(Quotation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotation_requirement")
                            .from(Quotation::Table, Quotation::RequirementId)
                            .to(LeadDetail::Table, LeadDetail::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quotation_requirement")
                    .table(Quotation::Table)
                    .col(Quotation::RequirementId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meeting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadDetail::Table).to_owned())
            .await
    }
}
