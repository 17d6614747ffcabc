//! Lottery statistics.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;

use super::CalculateError;
use crate::models::{LotteryWinRecord, TimeRange, AWARD_NAMES, BASELINE_AWARD};

/// Statistics of one award over a time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeStats {
    pub award_name: String,
    pub wins_count: u32,
    pub winners_count: u32,
    pub average_wins_per_winner: f64,
    pub winning_rate: f64,
    pub rarity: f64,
}

/// One bucket of the wins trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub time: String,
    pub count: u32,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Per-award statistics for the known awards, in display order.
///
/// Wins of awards outside [`AWARD_NAMES`] are ignored.
pub fn per_prize_stats(records: &[LotteryWinRecord]) -> Vec<PrizeStats> {
    let mut wins: HashMap<&str, u32> = HashMap::new();
    let mut winners: HashMap<&str, HashSet<&str>> = HashMap::new();
    for record in records {
        if let Some(award) = AWARD_NAMES.iter().find(|a| **a == record.award_name) {
            *wins.entry(*award).or_insert(0) += 1;
            winners.entry(*award).or_default().insert(record.user.slug.as_str());
        }
    }

    let total_wins: u32 = wins.values().sum();
    let rate_of = |award: &str| -> f64 {
        let count = wins.get(award).copied().unwrap_or(0);
        if total_wins == 0 {
            0.0
        } else {
            round_to(count as f64 / total_wins as f64, 5)
        }
    };
    let inverse = |rate: f64| if rate == 0.0 { 0.0 } else { 1.0 / rate };

    // Express rarity relative to the baseline award when it has been won
    let baseline = inverse(rate_of(BASELINE_AWARD));
    let scale = if baseline == 0.0 { 1.0 } else { 1.0 / baseline };

    AWARD_NAMES
        .iter()
        .map(|award| {
            let award: &str = award;
            let wins_count = wins.get(award).copied().unwrap_or(0);
            let winners_count = winners.get(award).map_or(0, |w| w.len() as u32);
            let average_wins_per_winner = if wins_count == 0 {
                0.0
            } else {
                round_to(wins_count as f64 / winners_count as f64, 3)
            };
            let winning_rate = rate_of(award);

            PrizeStats {
                award_name: award.to_string(),
                wins_count,
                winners_count,
                average_wins_per_winner,
                winning_rate,
                rarity: round_to(inverse(winning_rate) * scale, 3),
            }
        })
        .collect()
}

/// Wins per hour (ranges up to one day) or per day, oldest bucket first.
///
/// `all` has no start and is rejected.
pub fn wins_trend(
    records: &[LotteryWinRecord],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Result<Vec<TrendPoint>, CalculateError> {
    let (start, span) = match (range.start(now), range.duration()) {
        (Some(start), Some(span)) => (start, span),
        _ => {
            return Err(CalculateError::InvalidInput(format!(
                "wins trend needs a bounded time range, got {}",
                range
            )))
        }
    };

    let (unit, format) = if span <= Duration::days(1) {
        (Duration::hours(1), "%m-%d %H:00")
    } else {
        (Duration::days(1), "%m-%d")
    };

    let mut buckets: BTreeMap<DateTime<Utc>, u32> = BTreeMap::new();
    for record in records.iter().filter(|r| r.time > start && r.time <= now) {
        let bucket = record
            .time
            .duration_trunc(unit)
            .map_err(|e| CalculateError::InvalidInput(e.to_string()))?;
        *buckets.entry(bucket).or_insert(0) += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(time, count)| TrendPoint {
            time: time.format(format).to_string(),
            count,
        })
        .collect())
}
