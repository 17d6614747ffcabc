use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{
    author_filter, validate_name, validate_slug, ApiError, Pagination, MAX_NAME_LEN,
};
use crate::calculate::{summarize_rankings, Cooldown, EligibilityCalculator, RankSummary};
use crate::models::AWARD_NAMES;
use crate::storage::{OrderBy, OrderDirection};

#[derive(Debug, Serialize)]
pub struct NextRecommendDateResponse {
    pub user_slug: String,
    /// `None` when the author never ranked high enough to be in cooldown
    pub next_recommend_date: Option<NaiveDate>,
    pub cooldown: Option<Cooldown>,
}

pub async fn next_recommend_date(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NextRecommendDateResponse>, ApiError> {
    validate_slug(&slug)?;

    let cooldown = EligibilityCalculator::new(&state.rankings)
        .cooldown(&slug)
        .await?;

    Ok(Json(NextRecommendDateResponse {
        next_recommend_date: cooldown.as_ref().map(|c| c.eligible_from),
        user_slug: slug,
        cooldown,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AuthorParams {
    pub user_slug: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OnRankRecordsParams {
    pub user_slug: Option<String>,
    pub user_name: Option<String>,
    #[serde(default)]
    pub order_by: OrderBy,
    #[serde(default)]
    pub order_direction: OrderDirection,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct OnRankRecordItem {
    pub date: NaiveDate,
    pub ranking: u32,
    pub article_slug: String,
    pub article_title: Option<String>,
    /// FP earned by the author from this appearance
    pub fp_reward: f64,
}

#[derive(Debug, Serialize)]
pub struct OnRankRecordsResponse {
    pub records: Vec<OnRankRecordItem>,
}

pub async fn on_article_rank_records(
    State(state): State<AppState>,
    Query(params): Query<OnRankRecordsParams>,
) -> Result<Json<OnRankRecordsResponse>, ApiError> {
    let filter = author_filter(params.user_slug, params.user_name)?;
    let page = Pagination::new(params.offset, params.limit)?;

    let records = state
        .rankings
        .records(
            &filter,
            params.order_by,
            params.order_direction,
            page.offset,
            page.limit,
        )?
        .into_iter()
        .map(|r| OnRankRecordItem {
            date: r.date,
            ranking: r.ranking,
            article_slug: r.article.slug,
            article_title: r.article.title,
            fp_reward: r.earning.to_author,
        })
        .collect();

    Ok(Json(OnRankRecordsResponse { records }))
}

pub async fn on_article_rank_summary(
    State(state): State<AppState>,
    Query(params): Query<AuthorParams>,
) -> Result<Json<RankSummary>, ApiError> {
    let filter = author_filter(params.user_slug, params.user_name)?;
    let records = state.rankings.records_for(&filter)?;
    Ok(Json(summarize_rankings(&records)))
}

#[derive(Debug, Deserialize)]
pub struct NameAutocompleteParams {
    pub name_part: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NameAutocompleteResponse {
    pub possible_names: Vec<String>,
}

pub async fn name_autocomplete(
    State(state): State<AppState>,
    Query(params): Query<NameAutocompleteParams>,
) -> Result<Json<NameAutocompleteResponse>, ApiError> {
    let len = params.name_part.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "name_part must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    let limit = params.limit.unwrap_or(5);
    if limit == 0 || limit > 100 {
        return Err(ApiError::BadRequest("limit must be between 1 and 100".to_string()));
    }

    let possible_names = state.rankings.names_with_prefix(&params.name_part, limit)?;
    Ok(Json(NameAutocompleteResponse { possible_names }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryNamesParams {
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryNamesResponse {
    pub user_slug: Option<String>,
    /// Record count per earlier name of the same author
    pub history_names_on_rank_summary: BTreeMap<String, u32>,
}

pub async fn history_names_summary(
    State(state): State<AppState>,
    Query(params): Query<HistoryNamesParams>,
) -> Result<Json<HistoryNamesResponse>, ApiError> {
    validate_name(&params.user_name)?;

    let Some(user_slug) = state.rankings.author_slug_by_name(&params.user_name)? else {
        return Ok(Json(HistoryNamesResponse {
            user_slug: None,
            history_names_on_rank_summary: BTreeMap::new(),
        }));
    };

    let mut counts = state.rankings.name_counts(&user_slug)?;
    counts.remove(&params.user_name);

    Ok(Json(HistoryNamesResponse {
        user_slug: Some(user_slug),
        history_names_on_rank_summary: counts,
    }))
}

pub const MAX_TARGET_REWARDS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct LotteryWinRecordsParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    /// Comma separated award names
    pub target_rewards: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LotteryWinItem {
    pub time: DateTime<Utc>,
    pub award_name: String,
}

#[derive(Debug, Serialize)]
pub struct LotteryWinRecordsResponse {
    pub records: Vec<LotteryWinItem>,
}

pub async fn lottery_win_records(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LotteryWinRecordsParams>,
) -> Result<Json<LotteryWinRecordsResponse>, ApiError> {
    validate_slug(&slug)?;
    let page = Pagination::new(params.offset, params.limit)?;

    let mut awards: Vec<String> = params
        .target_rewards
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    if awards.len() > MAX_TARGET_REWARDS {
        return Err(ApiError::BadRequest(format!(
            "at most {} target rewards are allowed",
            MAX_TARGET_REWARDS
        )));
    }
    if awards.is_empty() {
        awards = AWARD_NAMES.iter().map(|a| a.to_string()).collect();
    }

    let records = state
        .lottery
        .wins_of_user(&slug, &awards, page.offset, page.limit)?
        .into_iter()
        .map(|r| LotteryWinItem {
            time: r.time,
            award_name: r.award_name,
        })
        .collect();

    Ok(Json(LotteryWinRecordsResponse { records }))
}
