use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use entity::{
    lead::{self, Stage},
    lead_detail::{self, Kind, SalesStage},
    stage_history,
};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    EntityTrait, Iterable, PaginatorTrait, QueryFilter, QuerySelect,
};
use serde::Serialize;
use tracing::{info_span, Instrument};

use crate::error::PipelineResult;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub prospect: u64,
    pub requirement_yes: u64,
    pub future: u64,
    pub regret: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesStageCount {
    pub stage: SalesStage,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowupCounts {
    pub overdue: u64,
    pub due_today: u64,
    pub upcoming: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthToDate {
    pub since: NaiveDate,
    pub new_leads: u64,
    pub conversions: u64,
    pub orders_completed: u64,
    pub orders_lost: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub stages: StageCounts,
    pub sales_stages: Vec<SalesStageCount>,
    pub active_requirements: u64,
    pub customers: u64,
    pub lost_orders: u64,
    pub followups: FollowupCounts,
    pub conversion_rate: f64,
    pub month_to_date: MonthToDate,
}

/// Share of confirmed requirements among prospects and confirmed
/// requirements, as a percentage with one decimal.
pub fn conversion_rate(prospects: u64, converted: u64) -> f64 {
    let pool = prospects + converted;
    if pool == 0 {
        return 0.0;
    }
    (converted as f64 * 1000.0 / pool as f64).round() / 10.0
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn start_of_day(date: NaiveDate) -> DateTimeWithTimeZone {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).into()
}

async fn count_stage<C: ConnectionTrait>(conn: &C, stage: Stage) -> PipelineResult<u64> {
    Ok(lead::Entity::find()
        .filter(lead::Column::Stage.eq(stage))
        .count(conn)
        .await?)
}

async fn count_followups<C: ConnectionTrait>(
    conn: &C,
    date_filter: Condition,
) -> PipelineResult<u64> {
    Ok(lead_detail::Entity::find()
        .filter(lead_detail::Column::Kind.is_in([Kind::Future, Kind::Regret]))
        .filter(date_filter)
        .count(conn)
        .await?)
}

/// Distinct leads with a history entry into `to_stage` since `since`.
async fn entered_since<C: ConnectionTrait>(
    conn: &C,
    to_stage: &str,
    since: DateTimeWithTimeZone,
) -> PipelineResult<u64> {
    let leads: Vec<i32> = stage_history::Entity::find()
        .select_only()
        .column(stage_history::Column::LeadId)
        .distinct()
        .filter(stage_history::Column::ToStage.eq(to_stage))
        .filter(stage_history::Column::ChangedAt.gte(since))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(leads.len() as u64)
}

pub async fn dashboard_metrics(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> PipelineResult<DashboardMetrics> {
    let span = info_span!("leads.dashboard", %today);
    async move {
        let stages = StageCounts {
            prospect: count_stage(db, Stage::Prospect).await?,
            requirement_yes: count_stage(db, Stage::RequirementYes).await?,
            future: count_stage(db, Stage::Future).await?,
            regret: count_stage(db, Stage::Regret).await?,
            total: lead::Entity::find().count(db).await?,
        };

        let mut sales_stages = Vec::new();
        for stage in SalesStage::iter() {
            let count = lead_detail::Entity::find()
                .filter(lead_detail::Column::Kind.eq(Kind::Requirement))
                .filter(lead_detail::Column::SalesStage.eq(stage))
                .count(db)
                .await?;
            sales_stages.push(SalesStageCount { stage, count });
        }
        let bucket = |wanted: SalesStage| {
            sales_stages
                .iter()
                .find(|s| s.stage == wanted)
                .map(|s| s.count)
                .unwrap_or(0)
        };
        let customers = bucket(SalesStage::OrderCompleted);
        let lost_orders = bucket(SalesStage::OrderLost);
        let active_requirements = sales_stages
            .iter()
            .filter(|s| !s.stage.is_closed())
            .map(|s| s.count)
            .sum();

        let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
        let date = lead_detail::Column::FollowupDate;
        let followups = FollowupCounts {
            overdue: count_followups(db, Condition::all().add(date.lt(today))).await?,
            due_today: count_followups(db, Condition::all().add(date.eq(today))).await?,
            upcoming: count_followups(
                db,
                Condition::all()
                    .add(date.gt(today))
                    .add(date.lte(horizon)),
            )
            .await?,
        };

        let since = month_start(today);
        let since_ts = start_of_day(since);
        let month_to_date = MonthToDate {
            since,
            new_leads: lead::Entity::find()
                .filter(lead::Column::CreatedAt.gte(since_ts))
                .count(db)
                .await?,
            conversions: entered_since(db, Stage::RequirementYes.as_str(), since_ts).await?,
            orders_completed: entered_since(db, SalesStage::OrderCompleted.as_str(), since_ts)
                .await?,
            orders_lost: entered_since(db, SalesStage::OrderLost.as_str(), since_ts).await?,
        };

        Ok(DashboardMetrics {
            conversion_rate: conversion_rate(stages.prospect, stages.requirement_yes),
            stages,
            sales_stages,
            active_requirements,
            customers,
            lost_orders,
            followups,
            month_to_date,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_converts_nothing() {
        assert_eq!(conversion_rate(0, 0), 0.0);
    }

    #[test]
    fn rate_is_rounded_to_one_decimal() {
        assert_eq!(conversion_rate(2, 1), 33.3);
        assert_eq!(conversion_rate(1, 2), 66.7);
        assert_eq!(conversion_rate(0, 4), 100.0);
    }

    #[test]
    fn month_start_is_first_day() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(month_start(today), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert_eq!(
            start_of_day(month_start(today)).to_rfc3339(),
            "2026-10-01T00:00:00+00:00"
        );
    }
}
