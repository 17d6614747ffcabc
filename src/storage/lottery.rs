//! Lottery win record store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{dedup_by_id, EntityType, JsonlReader, StorageConfig, StorageError};
use crate::models::{LotteryWinRecord, TimeRange};

#[derive(Debug, Clone)]
pub struct JsonlLotteryStore {
    config: Arc<StorageConfig>,
}

impl JsonlLotteryStore {
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self { config }
    }

    pub fn load(&self) -> Result<Vec<LotteryWinRecord>, StorageError> {
        let records = JsonlReader::<LotteryWinRecord>::for_entity(
            &self.config,
            EntityType::LotteryWinRecord,
        )
        .read_all()?;
        Ok(dedup_by_id(records, |r| r.id))
    }

    /// Wins inside `range`, in file order.
    pub fn in_range(
        &self,
        range: TimeRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<LotteryWinRecord>, StorageError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| range.contains(r.time, now))
            .collect())
    }

    /// One user's wins of the given awards, newest first.
    pub fn wins_of_user(
        &self,
        user_slug: &str,
        awards: &[String],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<LotteryWinRecord>, StorageError> {
        let mut records: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|r| r.user.slug == user_slug && awards.contains(&r.award_name))
            .collect();
        records.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id)));
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.load()?.len())
    }

    pub fn latest_time(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self.load()?.into_iter().map(|r| r.time).max())
    }
}
