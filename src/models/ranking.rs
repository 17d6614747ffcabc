//! Article earning ranking record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Leaderboard positions up to this value count for the LP cooldown rule.
pub const QUALIFYING_RANKING: u32 = 85;

/// Positions up to this value earn the longer cooldown.
pub const TOP_RANKING: u32 = 30;

/// The article that earned a leaderboard position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub slug: String,
    pub title: Option<String>,
}

/// The author of a ranked article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub slug: String,
    /// Display name at the time of the snapshot; authors may rename.
    pub name: Option<String>,
}

/// FP (简书钻) paid out for one leaderboard appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Earning {
    pub to_author: f64,
    pub to_voter: f64,
}

/// One appearance of an article on a daily earnings leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    /// Derived from date + ranking + article slug
    pub id: RecordId,

    /// Day of the leaderboard snapshot
    pub date: NaiveDate,

    /// Position on that day's leaderboard (1 = highest)
    pub ranking: u32,

    pub article: ArticleRef,

    pub author: AuthorRef,

    pub earning: Earning,

    /// Position in the backing file, assigned on load. Final tie-break of
    /// the record order; never persisted.
    #[serde(skip)]
    pub seq: u64,
}

impl RankingRecord {
    /// Create a new record with a generated ID.
    pub fn new(
        date: NaiveDate,
        ranking: u32,
        article: ArticleRef,
        author: AuthorRef,
        earning: Earning,
    ) -> Self {
        let id = RecordId::generate(&[&date.to_string(), &ranking.to_string(), &article.slug]);
        Self {
            id,
            date,
            ranking,
            article,
            author,
            earning,
            seq: 0,
        }
    }

    /// Total order of records belonging to one author.
    pub fn order_key(&self) -> (NaiveDate, u32, u64) {
        (self.date, self.ranking, self.seq)
    }

    pub fn is_qualifying(&self, max_ranking: u32) -> bool {
        self.ranking <= max_ranking
    }
}
