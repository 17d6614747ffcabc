//! Lottery win record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Award names the lottery currently hands out, in display order.
pub const AWARD_NAMES: [&str; 4] = ["收益加成卡100", "收益加成卡1万", "四叶草徽章", "锦鲤头像框1年"];

/// Award used as the rarity baseline (rarity 1.0).
pub const BASELINE_AWARD: &str = "收益加成卡100";

/// The user who won a lottery draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryUser {
    pub slug: String,
    pub name: Option<String>,
}

/// One lottery win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryWinRecord {
    /// ID assigned by the fetcher
    pub id: u64,

    pub time: DateTime<Utc>,

    pub user: LotteryUser,

    pub award_name: String,
}
