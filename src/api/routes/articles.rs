use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{validate_slug, ApiError};
use crate::calculate::{lp_check, EligibilityCalculator, LpCheck};
use crate::storage::AuthorFilter;

#[derive(Debug, Serialize)]
pub struct LpRecommendCheckResponse {
    pub article_title: Option<String>,
    pub author_slug: String,
    /// FP the author earned from the article's latest leaderboard appearance,
    /// not the article's lifetime total
    pub latest_fp_reward: f64,
    pub next_recommend_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub check: LpCheck,
}

/// Whether the author of an article may be recommended by the LP council today.
///
/// The author is resolved from the article's leaderboard history, so an
/// article that never ranked is a 404.
pub async fn lp_recommend_check(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LpRecommendCheckResponse>, ApiError> {
    validate_slug(&slug)?;

    let latest = state
        .rankings
        .latest_for_article(&slug)?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} has no ranking records", slug)))?;
    let author_slug = latest.author.slug;

    let next_recommend_date = EligibilityCalculator::new(&state.rankings)
        .next_recommend_date(&author_slug)
        .await?;
    let history = state
        .rankings
        .records_for(&AuthorFilter::Slug(author_slug.clone()))?;
    let check = lp_check(&history, next_recommend_date, state.clock.today());

    tracing::debug!(
        article = %slug,
        author = %author_slug,
        passed = check.passed,
        "LP recommend check"
    );

    Ok(Json(LpRecommendCheckResponse {
        article_title: latest.article.title,
        author_slug,
        latest_fp_reward: latest.earning.to_author,
        next_recommend_date,
        check,
    }))
}
