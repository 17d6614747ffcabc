use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::AppConfig;
use crate::storage::{JsonlLotteryStore, JsonlRankingStore, StorageConfig};

/// Source of "now" for time-relative answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(time) => *time,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<StorageConfig>,
    pub rankings: JsonlRankingStore,
    pub lottery: JsonlLotteryStore,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, storage: Arc<StorageConfig>) -> Self {
        Self {
            rankings: JsonlRankingStore::new(storage.clone()),
            lottery: JsonlLotteryStore::new(storage.clone()),
            config,
            storage,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}
