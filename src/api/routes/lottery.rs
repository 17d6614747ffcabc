use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{per_prize_stats, wins_trend, PrizeStats, TrendPoint};
use crate::models::{TimeRange, AWARD_NAMES};

#[derive(Debug, Serialize)]
pub struct RewardsResponse {
    pub rewards: Vec<&'static str>,
}

pub async fn rewards() -> Json<RewardsResponse> {
    Json(RewardsResponse {
        rewards: AWARD_NAMES.to_vec(),
    })
}

#[derive(Debug, Deserialize)]
pub struct TimeRangeParams {
    pub time_range: TimeRange,
}

#[derive(Debug, Serialize)]
pub struct PerPrizeDataResponse {
    pub rewards: Vec<PrizeStats>,
}

pub async fn per_prize_data(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<PerPrizeDataResponse>, ApiError> {
    let records = state.lottery.in_range(params.time_range, state.clock.now())?;
    Ok(Json(PerPrizeDataResponse {
        rewards: per_prize_stats(&records),
    }))
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub trend_data: Vec<TrendPoint>,
}

pub async fn reward_wins_trend_data(
    State(state): State<AppState>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<TrendResponse>, ApiError> {
    let now = state.clock.now();
    let records = state.lottery.in_range(params.time_range, now)?;
    let trend_data = wins_trend(&records, params.time_range, now)?;
    Ok(Json(TrendResponse { trend_data }))
}
