//! Ranking record store.
//!
//! Records for one author are totally ordered by
//! [`RankingRecord::order_key`]: date, then ranking, then file position.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::{dedup_by_id, EntityType, JsonlReader, StorageConfig, StorageError};
use crate::models::RankingRecord;

/// Read contract the eligibility calculator depends on.
#[async_trait]
pub trait RankingRecordStore: Send + Sync {
    /// The author's greatest record with `ranking <= max_ranking`.
    async fn latest_qualifying(
        &self,
        author_slug: &str,
        max_ranking: u32,
    ) -> Result<Option<RankingRecord>, StorageError>;

    /// The same author's greatest qualifying record strictly before `base`.
    async fn previous_qualifying(
        &self,
        base: &RankingRecord,
        max_ranking: u32,
    ) -> Result<Option<RankingRecord>, StorageError>;

    /// All qualifying records of the author, most recent first.
    ///
    /// Stores that can read an author's history in one go should override
    /// this; the default walks the two single-step queries.
    async fn qualifying_history(
        &self,
        author_slug: &str,
        max_ranking: u32,
    ) -> Result<Vec<RankingRecord>, StorageError> {
        let mut history = Vec::new();
        let mut cursor = self.latest_qualifying(author_slug, max_ranking).await?;
        while let Some(record) = cursor {
            cursor = self.previous_qualifying(&record, max_ranking).await?;
            history.push(record);
        }
        Ok(history)
    }
}

/// Which author a ranking query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFilter {
    Slug(String),
    /// Matches the name recorded at snapshot time, so renamed authors are
    /// only found under the names they ranked with.
    Name(String),
}

impl AuthorFilter {
    pub fn matches(&self, record: &RankingRecord) -> bool {
        match self {
            AuthorFilter::Slug(slug) => record.author.slug == *slug,
            AuthorFilter::Name(name) => record.author.name.as_deref() == Some(name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    Date,
    Ranking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

/// Ranking store backed by the fetcher's JSONL file.
///
/// Every query re-reads the file so new fetcher output is picked up
/// without a restart.
#[derive(Debug, Clone)]
pub struct JsonlRankingStore {
    config: Arc<StorageConfig>,
}

impl JsonlRankingStore {
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self { config }
    }

    /// All records, deduplicated, with `seq` set to their file position.
    pub fn load(&self) -> Result<Vec<RankingRecord>, StorageError> {
        let records = JsonlReader::<RankingRecord>::for_entity(&self.config, EntityType::RankingRecord)
            .read_all()?;
        let mut records = dedup_by_id(records, |r| r.id.clone());
        for (seq, record) in records.iter_mut().enumerate() {
            record.seq = seq as u64;
        }
        Ok(records)
    }

    /// Qualifying records of one author, most recent first.
    fn author_history(
        &self,
        author_slug: &str,
        max_ranking: u32,
    ) -> Result<Vec<RankingRecord>, StorageError> {
        let mut records: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|r| r.author.slug == author_slug && r.is_qualifying(max_ranking))
            .collect();
        records.sort_by(|a, b| b.order_key().cmp(&a.order_key()));
        Ok(records)
    }

    /// Records of one author, sorted and paged.
    pub fn records(
        &self,
        filter: &AuthorFilter,
        order_by: OrderBy,
        direction: OrderDirection,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RankingRecord>, StorageError> {
        let mut records = self.records_for(filter)?;
        match order_by {
            OrderBy::Date => records.sort_by_key(|r| r.order_key()),
            OrderBy::Ranking => records.sort_by_key(|r| (r.ranking, r.date, r.seq)),
        }
        if direction == OrderDirection::Desc {
            records.reverse();
        }
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    /// Every record of one author, in file order.
    pub fn records_for(&self, filter: &AuthorFilter) -> Result<Vec<RankingRecord>, StorageError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    /// Slug of the author who most recently ranked under `name`.
    pub fn author_slug_by_name(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .records_for(&AuthorFilter::Name(name.to_string()))?
            .into_iter()
            .max_by_key(|r| r.order_key())
            .map(|r| r.author.slug))
    }

    /// Distinct author names starting with `prefix`, sorted.
    pub fn names_with_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self
            .load()?
            .into_iter()
            .filter_map(|r| r.author.name)
            .filter(|n| n.starts_with(prefix))
            .collect();
        names.sort();
        names.dedup();
        names.truncate(limit);
        Ok(names)
    }

    /// Number of records per name the author has ranked under.
    pub fn name_counts(&self, author_slug: &str) -> Result<BTreeMap<String, u32>, StorageError> {
        let mut counts = BTreeMap::new();
        for record in self.records_for(&AuthorFilter::Slug(author_slug.to_string()))? {
            if let Some(name) = record.author.name {
                *counts.entry(name).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Most recent record of an article, if it ever ranked.
    pub fn latest_for_article(&self, article_slug: &str) -> Result<Option<RankingRecord>, StorageError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.article.slug == article_slug)
            .max_by_key(|r| r.order_key()))
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.load()?.len())
    }

    pub fn latest_date(&self) -> Result<Option<NaiveDate>, StorageError> {
        Ok(self.load()?.into_iter().map(|r| r.date).max())
    }
}

#[async_trait]
impl RankingRecordStore for JsonlRankingStore {
    async fn latest_qualifying(
        &self,
        author_slug: &str,
        max_ranking: u32,
    ) -> Result<Option<RankingRecord>, StorageError> {
        Ok(self.author_history(author_slug, max_ranking)?.into_iter().next())
    }

    async fn previous_qualifying(
        &self,
        base: &RankingRecord,
        max_ranking: u32,
    ) -> Result<Option<RankingRecord>, StorageError> {
        let base_key = base.order_key();
        Ok(self
            .author_history(&base.author.slug, max_ranking)?
            .into_iter()
            .find(|r| r.order_key() < base_key))
    }

    async fn qualifying_history(
        &self,
        author_slug: &str,
        max_ranking: u32,
    ) -> Result<Vec<RankingRecord>, StorageError> {
        let history = self.author_history(author_slug, max_ranking)?;
        debug!(author = author_slug, records = history.len(), "Loaded qualifying history");
        Ok(history)
    }
}
