//! Filesystem data lake operations.
//!
//! The external fetcher appends records to JSONL files under
//! `<data_dir>/normalized/`. This module only reads them:
//! - `jsonl`: generic line-oriented reader/writer
//! - `ranking`: the ranking record store and its query contract
//! - `lottery`: the lottery win record store

pub mod jsonl;
pub mod lottery;
pub mod ranking;

pub use jsonl::*;
pub use lottery::*;
pub use ranking::*;

use std::collections::HashSet;
use std::hash::Hash;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether retrying the same read may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Io(_))
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.normalized_dir().join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Keep the first item for every key, preserving order.
pub fn dedup_by_id<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}
