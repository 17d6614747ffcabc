//! Static registry of the tools this service offers.

use serde::{Deserialize, Serialize};

/// Operational status of a tool, set by the operator in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    #[default]
    Normal,
    Downgraded,
    Unavailable,
}

/// Record collection a tool reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    RankingRecords,
    LotteryWinRecords,
}

/// One entry of the registry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub dataset: Option<Dataset>,
}

pub const TOOLS: &[ToolEntry] = &[
    ToolEntry {
        slug: "LP-recommend-checker",
        name: "LP 理事会推文检测",
        description: "检测作者下次可被 LP 理事会推荐的日期。",
        dataset: Some(Dataset::RankingRecords),
    },
    ToolEntry {
        slug: "on-rank-article-viewer",
        name: "上榜文章查询",
        description: "查询作者的文章收益排行榜上榜记录。",
        dataset: Some(Dataset::RankingRecords),
    },
    ToolEntry {
        slug: "lottery-analyzer",
        name: "大转盘抽奖分析",
        description: "统计各奖项的中奖次数、中奖率与稀有度。",
        dataset: Some(Dataset::LotteryWinRecords),
    },
    ToolEntry {
        slug: "lottery-reward-record-viewer",
        name: "中奖记录查询",
        description: "查询用户的大转盘中奖记录。",
        dataset: Some(Dataset::LotteryWinRecords),
    },
    ToolEntry {
        slug: "URL-scheme-convertor",
        name: "URL Scheme 转换",
        description: "将简书网页端链接转换为 App 端 URL Scheme。",
        dataset: None,
    },
];

/// Look up a registry entry by slug, ignoring ASCII case.
pub fn find_tool(slug: &str) -> Option<&'static ToolEntry> {
    TOOLS.iter().find(|t| t.slug.eq_ignore_ascii_case(slug))
}
