use entity::{call_history, stage_history};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use crate::error::PipelineResult;

/// Auto-generated note older releases wrote on every sales stage change.
pub const PLACEHOLDER_NOTE: &str = "Sales stage updated";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub stage_history: u64,
    pub call_history: u64,
}

/// Removes placeholder rows from both history logs in one transaction.
pub async fn purge_placeholder_history(db: &DatabaseConnection) -> PipelineResult<PurgeReport> {
    let txn = db.begin().await?;
    let stages = stage_history::Entity::delete_many()
        .filter(stage_history::Column::Notes.eq(PLACEHOLDER_NOTE))
        .exec(&txn)
        .await?;
    let calls = call_history::Entity::delete_many()
        .filter(call_history::Column::Remark.eq(PLACEHOLDER_NOTE))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    let report = PurgeReport {
        stage_history: stages.rows_affected,
        call_history: calls.rows_affected,
    };
    info!(
        stage_history = report.stage_history,
        call_history = report.call_history,
        "placeholder history purged"
    );
    Ok(report)
}
