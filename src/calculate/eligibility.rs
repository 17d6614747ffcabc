//! Next LP recommendation eligibility date.
//!
//! After an author's article appears on the earnings leaderboard, the LP
//! council waits before recommending that author again: 10 days for a top-30
//! position, 7 days otherwise. Qualifying appearances of *different* articles
//! that are packed closely together stack their waits. Walking the author's
//! history backwards from the most recent appearance, each predecessor within
//! the cursor's own cooldown window adds its cooldown; the first wider gap
//! ends the chain.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::CalculateError;
use crate::models::{RankingRecord, QUALIFYING_RANKING, TOP_RANKING};
use crate::storage::RankingRecordStore;

/// Cooldown after a top-30 appearance.
pub const TOP_COOLDOWN_DAYS: i64 = 10;

/// Cooldown after any other qualifying appearance.
pub const REGULAR_COOLDOWN_DAYS: i64 = 7;

/// Cooldown contributed by an appearance at `ranking`. Also the widest gap
/// to the previous appearance that still keeps the chain going.
pub fn cooldown_days(ranking: u32) -> i64 {
    if ranking <= TOP_RANKING {
        TOP_COOLDOWN_DAYS
    } else {
        REGULAR_COOLDOWN_DAYS
    }
}

/// Outcome of the backward walk for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cooldown {
    /// Date of the most recent qualifying appearance
    pub anchor_date: NaiveDate,
    /// Accumulated wait, counted from `anchor_date`
    pub interval_days: i64,
    /// Distinct articles that contributed to the wait
    pub counted_articles: usize,
    /// First day the author may be recommended again
    pub eligible_from: NaiveDate,
}

/// Run the walk over qualifying records ordered most recent first.
///
/// Returns `None` for an empty history. Only consumes the iterator up to the
/// record that breaks the chain.
pub fn compute_cooldown<I>(history: I) -> Option<Cooldown>
where
    I: IntoIterator<Item = RankingRecord>,
{
    let mut history = history.into_iter();
    let latest = history.next()?;

    let anchor_date = latest.date;
    let mut interval_days = cooldown_days(latest.ranking);
    let mut counted: HashSet<String> = HashSet::new();
    counted.insert(latest.article.slug.clone());
    let mut cursor = latest;

    for previous in history {
        if counted.contains(&previous.article.slug) {
            // Re-appearance of an article already counted
            cursor = previous;
            continue;
        }

        let gap = (cursor.date - previous.date).num_days();
        if gap > cooldown_days(cursor.ranking) {
            break;
        }

        counted.insert(previous.article.slug.clone());
        interval_days += cooldown_days(previous.ranking);
        cursor = previous;
    }

    Some(Cooldown {
        anchor_date,
        interval_days,
        counted_articles: counted.len(),
        eligible_from: anchor_date + Duration::days(interval_days),
    })
}

/// Computes eligibility from a ranking record store.
pub struct EligibilityCalculator<'a, S: ?Sized> {
    store: &'a S,
    max_ranking: u32,
}

impl<'a, S> EligibilityCalculator<'a, S>
where
    S: RankingRecordStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_ranking: QUALIFYING_RANKING,
        }
    }

    /// Cooldown state for the author, `None` when they never qualified.
    pub async fn cooldown(&self, author_slug: &str) -> Result<Option<Cooldown>, CalculateError> {
        let history = self
            .store
            .qualifying_history(author_slug, self.max_ranking)
            .await?;
        let cooldown = compute_cooldown(history);
        debug!(author = author_slug, ?cooldown, "Computed LP cooldown");
        Ok(cooldown)
    }

    /// First day the author may be recommended again; `None` means no
    /// cooldown applies.
    pub async fn next_recommend_date(
        &self,
        author_slug: &str,
    ) -> Result<Option<NaiveDate>, CalculateError> {
        Ok(self.cooldown(author_slug).await?.map(|c| c.eligible_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleRef, AuthorRef, Earning};
    use crate::storage::StorageError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(day: &str, ranking: u32, article: &str) -> RankingRecord {
        RankingRecord::new(
            date(day),
            ranking,
            ArticleRef {
                slug: article.to_string(),
                title: None,
            },
            AuthorRef {
                slug: "alice".to_string(),
                name: Some("alice".to_string()),
            },
            Earning::default(),
        )
    }

    /// Store that only offers the single-step queries.
    struct VecStore(Vec<RankingRecord>);

    impl VecStore {
        fn new(records: Vec<RankingRecord>) -> Self {
            let records = records
                .into_iter()
                .enumerate()
                .map(|(i, mut r)| {
                    r.seq = i as u64;
                    r
                })
                .collect();
            Self(records)
        }

        fn qualifying<'a>(
            &'a self,
            author: &'a str,
            max_ranking: u32,
        ) -> impl Iterator<Item = &'a RankingRecord> + 'a {
            self.0
                .iter()
                .filter(move |r| r.author.slug == author && r.ranking <= max_ranking)
        }
    }

    #[async_trait]
    impl RankingRecordStore for VecStore {
        async fn latest_qualifying(
            &self,
            author_slug: &str,
            max_ranking: u32,
        ) -> Result<Option<RankingRecord>, StorageError> {
            Ok(self
                .qualifying(author_slug, max_ranking)
                .max_by_key(|r| r.order_key())
                .cloned())
        }

        async fn previous_qualifying(
            &self,
            base: &RankingRecord,
            max_ranking: u32,
        ) -> Result<Option<RankingRecord>, StorageError> {
            Ok(self
                .qualifying(&base.author.slug, max_ranking)
                .filter(|r| r.order_key() < base.order_key())
                .max_by_key(|r| r.order_key())
                .cloned())
        }
    }

    struct DownStore;

    #[async_trait]
    impl RankingRecordStore for DownStore {
        async fn latest_qualifying(
            &self,
            _author_slug: &str,
            _max_ranking: u32,
        ) -> Result<Option<RankingRecord>, StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "store offline",
            )))
        }

        async fn previous_qualifying(
            &self,
            _base: &RankingRecord,
            _max_ranking: u32,
        ) -> Result<Option<RankingRecord>, StorageError> {
            Ok(None)
        }
    }

    async fn next_date(records: Vec<RankingRecord>) -> Option<NaiveDate> {
        let store = VecStore::new(records);
        EligibilityCalculator::new(&store)
            .next_recommend_date("alice")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_qualifying_records() {
        assert_eq!(next_date(vec![]).await, None);
        assert_eq!(next_date(vec![record("2024-01-01", 86, "a1")]).await, None);
    }

    #[tokio::test]
    async fn test_single_top_record() {
        let result = next_date(vec![record("2024-01-01", 20, "a1")]).await;
        assert_eq!(result, Some(date("2024-01-11")));
    }

    #[tokio::test]
    async fn test_single_regular_record() {
        let result = next_date(vec![record("2024-01-01", 50, "a1")]).await;
        assert_eq!(result, Some(date("2024-01-08")));
    }

    #[tokio::test]
    async fn test_close_predecessor_compounds() {
        let result = next_date(vec![
            record("2024-01-05", 40, "p"),
            record("2024-01-10", 25, "r0"),
        ])
        .await;
        assert_eq!(result, Some(date("2024-01-27")));
    }

    #[tokio::test]
    async fn test_wide_gap_breaks_chain() {
        let result = next_date(vec![
            record("2023-12-21", 10, "p"),
            record("2024-01-10", 25, "r0"),
        ])
        .await;
        assert_eq!(result, Some(date("2024-01-20")));
    }

    #[tokio::test]
    async fn test_repeated_article_moves_cursor_without_adding() {
        // The repeat of r0 moves the cursor to 03-15 with a 7-day window,
        // so q at 03-08 (gap 7) still compounds.
        let result = next_date(vec![
            record("2024-03-08", 60, "q"),
            record("2024-03-15", 50, "r0"),
            record("2024-03-20", 20, "r0"),
        ])
        .await;
        assert_eq!(result, Some(date("2024-04-06")));
    }

    #[tokio::test]
    async fn test_gap_boundaries_are_inclusive() {
        // Top-30 cursor: a 10-day gap keeps the chain
        let top = next_date(vec![
            record("2024-01-01", 50, "p"),
            record("2024-01-11", 5, "r0"),
        ])
        .await;
        assert_eq!(top, Some(date("2024-01-28")));

        // Other cursor: 7 days keeps it, 8 days breaks it
        let seven = next_date(vec![
            record("2024-01-04", 5, "p"),
            record("2024-01-11", 50, "r0"),
        ])
        .await;
        assert_eq!(seven, Some(date("2024-01-28")));

        let eight = next_date(vec![
            record("2024-01-03", 5, "p"),
            record("2024-01-11", 50, "r0"),
        ])
        .await;
        assert_eq!(eight, Some(date("2024-01-18")));
    }

    #[tokio::test]
    async fn test_end_to_end_alice() {
        let records = vec![
            record("2024-01-20", 15, "A1"),
            record("2024-01-12", 28, "A2"),
            record("2023-12-01", 5, "A3"),
        ];
        let store = VecStore::new(records);
        let calculator = EligibilityCalculator::new(&store);

        let cooldown = calculator.cooldown("alice").await.unwrap().unwrap();
        assert_eq!(
            cooldown,
            Cooldown {
                anchor_date: date("2024-01-20"),
                interval_days: 20,
                counted_articles: 2,
                eligible_from: date("2024-02-09"),
            }
        );

        // Idempotent over an unchanged store
        let again = calculator.next_recommend_date("alice").await.unwrap();
        assert_eq!(again, Some(date("2024-02-09")));
    }

    #[tokio::test]
    async fn test_low_rankings_are_invisible_to_the_walk() {
        // The rank-90 entry neither counts nor moves the cursor
        let result = next_date(vec![
            record("2024-01-01", 30, "p"),
            record("2024-01-05", 90, "x"),
            record("2024-01-10", 30, "r0"),
        ])
        .await;
        assert_eq!(result, Some(date("2024-01-30")));
    }

    #[tokio::test]
    async fn test_store_failure_is_retryable() {
        let err = EligibilityCalculator::new(&DownStore)
            .next_recommend_date("alice")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_compute_cooldown_stops_at_break() {
        let history = vec![
            record("2024-02-01", 1, "a"),
            record("2023-01-01", 1, "b"),
        ];
        let mut consumed = 0;
        let cooldown = compute_cooldown(history.into_iter().chain(std::iter::from_fn(|| {
            consumed += 1;
            None
        })));
        assert_eq!(cooldown.unwrap().interval_days, 10);
        assert_eq!(consumed, 0);
    }
}
