use entity::lead;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};

use crate::error::PipelineResult;
use crate::payload::clean;
use crate::similarity::ratio;

pub const MAX_DUPLICATES: usize = 5;
pub const MIN_FUZZY_QUERY_CHARS: usize = 3;
pub const FUZZY_THRESHOLD: f64 = 0.70;
pub const MIN_SEARCH_CHARS: usize = 2;
pub const MAX_SEARCH_RESULTS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Email,
    Phone,
    CompanyName,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Email => "email",
            MatchType::Phone => "phone",
            MatchType::CompanyName => "company_name",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateQuery {
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    pub lead: lead::Model,
    pub match_type: MatchType,
    pub score: u8,
}

/// Fuzzy candidates for a company name, scored 0..=100 and above the
/// threshold. Comparison is case-insensitive.
pub fn score_company_names<'a>(
    query: &str,
    leads: impl IntoIterator<Item = &'a lead::Model>,
) -> Vec<(&'a lead::Model, u8)> {
    let needle = query.to_lowercase();
    leads
        .into_iter()
        .filter_map(|lead| {
            let r = ratio(&needle, &lead.company_name.to_lowercase());
            (r > FUZZY_THRESHOLD).then(|| (lead, (r * 100.0).round() as u8))
        })
        .collect()
}

/// Looks for existing leads that an incoming lead may duplicate: exact email,
/// then exact phone, then similar company names.
pub async fn find_duplicates(
    db: &DatabaseConnection,
    query: &DuplicateQuery,
) -> PipelineResult<Vec<DuplicateMatch>> {
    let span = info_span!("leads.find_duplicates");
    async move {
        let mut matches: Vec<DuplicateMatch> = Vec::new();
        let seen = |matches: &[DuplicateMatch], id: i32| matches.iter().any(|m| m.lead.id == id);

        if let Some(email) = clean(&query.email) {
            let rows = lead::Entity::find()
                .filter(
                    Expr::expr(Func::lower(Expr::col(lead::Column::ContactEmail)))
                        .eq(fold_case(&email)),
                )
                .order_by_asc(lead::Column::Id)
                .all(db)
                .await?;
            matches.extend(rows.into_iter().map(|lead| DuplicateMatch {
                lead,
                match_type: MatchType::Email,
                score: 100,
            }));
        }

        if let Some(phone) = clean(&query.phone) {
            let rows = lead::Entity::find()
                .filter(lead::Column::ContactPhone.eq(phone))
                .order_by_asc(lead::Column::Id)
                .all(db)
                .await?;
            for lead in rows {
                if !seen(&matches, lead.id) {
                    matches.push(DuplicateMatch {
                        lead,
                        match_type: MatchType::Phone,
                        score: 100,
                    });
                }
            }
        }

        if let Some(name) = clean(&query.company_name) {
            if name.chars().count() >= MIN_FUZZY_QUERY_CHARS {
                let all = lead::Entity::find()
                    .order_by_asc(lead::Column::Id)
                    .all(db)
                    .await?;
                for (lead, score) in score_company_names(&name, &all) {
                    if !seen(&matches, lead.id) {
                        matches.push(DuplicateMatch {
                            lead: lead.clone(),
                            match_type: MatchType::CompanyName,
                            score,
                        });
                    }
                }
            }
        }

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(MAX_DUPLICATES);
        debug!(found = matches.len(), "duplicate check finished");
        Ok(matches)
    }
    .instrument(span)
    .await
}

/// Case folding applied to queries compared against SQL `LOWER(column)`.
/// SQLite's `LOWER` only folds ASCII, so non-ASCII letters are compared as
/// stored on both sides.
fn fold_case(value: &str) -> String {
    value.to_ascii_lowercase()
}

/// Escapes `LIKE` wildcards so the query matches literally under
/// `ESCAPE '\'`.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive literal substring search over the lead's identifying
/// fields.
pub async fn universal_search(
    db: &DatabaseConnection,
    query: &str,
) -> PipelineResult<Vec<lead::Model>> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", escape_like(&fold_case(query)));
    let lowered = |col: lead::Column| {
        Expr::expr(Func::lower(Expr::col(col)))
            .like(LikeExpr::new(pattern.as_str()).escape('\\'))
    };
    let condition = Condition::any()
        .add(lowered(lead::Column::CompanyName))
        .add(lowered(lead::Column::ContactName))
        .add(lowered(lead::Column::ContactEmail))
        .add(lowered(lead::Column::ContactPhone))
        .add(lowered(lead::Column::LeadCode));
    Ok(lead::Entity::find()
        .filter(condition)
        .order_by_desc(lead::Column::CreatedAt)
        .order_by_desc(lead::Column::Id)
        .limit(MAX_SEARCH_RESULTS)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead(id: i32, name: &str) -> lead::Model {
        let now = Utc::now().into();
        lead::Model {
            id,
            lead_code: format!("EP{id:05}"),
            company_name: name.into(),
            city: "Pune".into(),
            state: "MH".into(),
            sector: None,
            source: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            department: None,
            stage: lead::Stage::Prospect,
            client_type_main: None,
            client_type_detail: None,
            last_call_date: None,
            last_remark: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn company_scores_are_rounded_percentages() {
        let leads = vec![
            lead(1, "Acme Corporation"),
            lead(2, "Zenith Tanks"),
            lead(3, "ACME CORP"),
        ];
        let scored = score_company_names("Acme Corp", &leads);
        let ids: Vec<(i32, u8)> = scored.iter().map(|(l, s)| (l.id, *s)).collect();
        assert_eq!(ids, vec![(1, 72), (3, 100)]);
    }

    #[test]
    fn threshold_is_exclusive() {
        // "abcdefg" vs "abcdefgxyz0": 14 / 18 = 0.777..., above.
        // "abcdefg" vs "abcdefgxyzuvw": 14 / 20 = 0.70, not above.
        let leads = vec![lead(1, "abcdefgxyz0"), lead(2, "abcdefgxyzuvw")];
        let scored = score_company_names("abcdefg", &leads);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].1, 78);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn case_folding_is_ascii_only() {
        assert_eq!(fold_case("ACME Élan"), "acme Élan");
    }
}
