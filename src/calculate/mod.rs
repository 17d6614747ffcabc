//! Derived answers computed from the stored records:
//! - LP recommendation cooldown (`eligibility`)
//! - Ranking summaries and the LP check items
//! - Lottery statistics (`lottery`)

pub mod eligibility;
pub mod lottery;

pub use eligibility::*;
pub use lottery::*;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::models::{RankingRecord, TOP_RANKING};
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CalculateError {
    #[error("Record store unavailable: {0}")]
    Store(#[from] StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CalculateError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CalculateError::Store(e) => e.is_retryable(),
            CalculateError::InvalidInput(_) => false,
        }
    }
}

/// How often an author reached the upper parts of the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RankSummary {
    pub top10: u32,
    pub top30: u32,
    pub top50: u32,
    pub total: u32,
}

pub fn summarize_rankings(records: &[RankingRecord]) -> RankSummary {
    let mut summary = RankSummary::default();

    for record in records {
        if record.ranking <= 10 {
            summary.top10 += 1;
        }
        if record.ranking <= 30 {
            summary.top30 += 1;
        }
        if record.ranking <= 50 {
            summary.top50 += 1;
        }
        summary.total += 1;
    }

    summary
}

/// Appearances at or above `max_ranking` strictly after `today - days`.
pub fn count_recent(records: &[RankingRecord], today: NaiveDate, days: i64, max_ranking: u32) -> u32 {
    let since = today - Duration::days(days);
    records
        .iter()
        .filter(|r| r.date > since && r.ranking <= max_ranking)
        .count() as u32
}

/// Value compared by a check item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckValue {
    Count(u32),
    Date(NaiveDate),
}

/// One rule of the LP recommendation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub passed: bool,
    pub limit: CheckValue,
    pub operator: String,
    pub actual: Option<CheckValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LpCheck {
    pub passed: bool,
    pub items: Vec<CheckItem>,
}

/// Evaluate the LP recommendation rules for an author.
///
/// `records` are all of the author's ranking records; `next_date` is the
/// result of the cooldown walk.
pub fn lp_check(records: &[RankingRecord], next_date: Option<NaiveDate>, today: NaiveDate) -> LpCheck {
    let last_10d_top30 = count_recent(records, today, 10, TOP_RANKING);
    let last_1m_top30 = count_recent(records, today, 30, TOP_RANKING);
    let last_7d_any = count_recent(records, today, 7, u32::MAX);

    let items = vec![
        CheckItem {
            name: "作者过去 10 天前 30 名次数".to_string(),
            passed: last_10d_top30 == 0,
            limit: CheckValue::Count(0),
            operator: "=".to_string(),
            actual: Some(CheckValue::Count(last_10d_top30)),
        },
        CheckItem {
            name: "作者过去 1 个月前 30 名次数".to_string(),
            passed: last_1m_top30 <= 2,
            limit: CheckValue::Count(2),
            operator: "<=".to_string(),
            actual: Some(CheckValue::Count(last_1m_top30)),
        },
        CheckItem {
            name: "作者下次可推荐日期".to_string(),
            passed: next_date.map_or(true, |d| d <= today),
            limit: CheckValue::Date(today),
            operator: "<=".to_string(),
            actual: next_date.map(CheckValue::Date),
        },
        // Rankings below the qualifying cut never enter the cooldown walk
        CheckItem {
            name: "作者过去 7 天上榜次数".to_string(),
            passed: last_7d_any == 0,
            limit: CheckValue::Count(0),
            operator: "=".to_string(),
            actual: Some(CheckValue::Count(last_7d_any)),
        },
    ];

    LpCheck {
        passed: items.iter().all(|i| i.passed),
        items,
    }
}
