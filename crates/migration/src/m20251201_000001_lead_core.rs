use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Lead {
    Table,
    Id,
    LeadCode,
    CompanyName,
    City,
    State,
    Sector,
    Source,
    ContactName,
    ContactEmail,
    ContactPhone,
    Department,
    Stage,
    ClientTypeMain,
    ClientTypeDetail,
    LastCallDate,
    LastRemark,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CallHistory {
    Table,
    Id,
    LeadId,
    ExpectedCallDate,
    ActualCallDate,
    Outcome,
    Remark,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StageHistory {
    Table,
    Id,
    LeadId,
    FromStage,
    ToStage,
    ChangedBy,
    ChangedAt,
    Notes,
}

#[derive(DeriveIden)]
enum AdditionalContact {
    Table,
    Id,
    LeadId,
    ContactType,
    ContactValue,
    IsPrimary,
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
                    .table(Lead::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lead::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Lead::LeadCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Lead::CompanyName).string_len(255).not_null())
                    .col(ColumnDef::new(Lead::City).string_len(100).not_null())
                    .col(ColumnDef::new(Lead::State).string_len(100).not_null())
                    .col(ColumnDef::new(Lead::Sector).string_len(100))
                    .col(ColumnDef::new(Lead::Source).string_len(100))
                    .col(ColumnDef::new(Lead::ContactName).string_len(150))
                    .col(ColumnDef::new(Lead::ContactEmail).string_len(254))
                    .col(ColumnDef::new(Lead::ContactPhone).string_len(32))
                    .col(ColumnDef::new(Lead::Department).string_len(100))
                    .col(
                        ColumnDef::new(Lead::Stage)
                            .string_len(30)
                            .not_null()
                            .default("prospect"),
                    )
                    .col(ColumnDef::new(Lead::ClientTypeMain).string_len(50))
                    .col(ColumnDef::new(Lead::ClientTypeDetail).string_len(100))
                    .col(ColumnDef::new(Lead::LastCallDate).date())
                    .col(ColumnDef::new(Lead::LastRemark).text())
                    .col(ColumnDef::new(Lead::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(Lead::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lead::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lead_stage")
                    .table(Lead::Table)
                    .col(Lead::Stage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lead_company_name")
                    .table(Lead::Table)
                    .col(Lead::CompanyName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lead_contact_phone")
                    .table(Lead::Table)
                    .col(Lead::ContactPhone)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CallHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CallHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CallHistory::LeadId).integer().not_null())
                    .col(ColumnDef::new(CallHistory::ExpectedCallDate).date())
                    .col(ColumnDef::new(CallHistory::ActualCallDate).date().not_null())
                    .col(ColumnDef::new(CallHistory::Outcome).string_len(20).not_null())
                    .col(ColumnDef::new(CallHistory::Remark).text().not_null())
                    .col(ColumnDef::new(CallHistory::CreatedBy).string_len(64))
                    .col(
                        ColumnDef::new(CallHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_call_history_lead")
                            .from(CallHistory::Table, CallHistory::LeadId)
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
                    .name("idx_call_history_lead_date")
                    .table(CallHistory::Table)
                    .col(CallHistory::LeadId)
                    .col(CallHistory::ActualCallDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StageHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StageHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StageHistory::LeadId).integer().not_null())
                    .col(ColumnDef::new(StageHistory::FromStage).string_len(50).not_null())
                    .col(ColumnDef::new(StageHistory::ToStage).string_len(50).not_null())
                    .col(ColumnDef::new(StageHistory::ChangedBy).string_len(64))
                    .col(
                        ColumnDef::new(StageHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StageHistory::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stage_history_lead")
                            .from(StageHistory::Table, StageHistory::LeadId)
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
                    .name("idx_stage_history_lead")
                    .table(StageHistory::Table)
                    .col(StageHistory::LeadId)
                    .col(StageHistory::ChangedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdditionalContact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdditionalContact::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdditionalContact::LeadId).integer().not_null())
                    .col(
                        ColumnDef::new(AdditionalContact::ContactType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdditionalContact::ContactValue)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdditionalContact::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdditionalContact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_additional_contact_lead")
                            .from(AdditionalContact::Table, AdditionalContact::LeadId)
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
                    .name("idx_additional_contact_lead")
                    .table(AdditionalContact::Table)
                    .col(AdditionalContact::LeadId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdditionalContact::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StageHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CallHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lead::Table).to_owned())
            .await
    }
}
