//! REST API endpoints.
//!
//! Axum-based HTTP API. Handlers translate query parameters and errors;
//! the answers themselves come from `storage` and `calculate`.

pub mod routes;
pub mod state;

use std::sync::OnceLock;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::CalculateError;
use crate::storage::{AuthorFilter, StorageError};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The record store could not be read; the request may be retried.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        if e.is_retryable() {
            ApiError::Unavailable(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<CalculateError> for ApiError {
    fn from(e: CalculateError) -> Self {
        match e {
            CalculateError::Store(e) => e.into(),
            CalculateError::InvalidInput(msg) => ApiError::BadRequest(msg),
        }
    }
}

/// Offset/limit paging as the tools accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

impl Pagination {
    pub const MAX_LIMIT: usize = 99;

    /// `limit` must lie in `1..=99`; both default when absent.
    pub fn new(offset: Option<usize>, limit: Option<usize>) -> Result<Self, ApiError> {
        let limit = limit.unwrap_or(20);
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self {
            offset: offset.unwrap_or(0),
            limit,
        })
    }
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-z]{6,12}$").expect("static regex is valid"))
}

/// Reject anything that cannot be a Jianshu user or article slug.
pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if slug_pattern().is_match(slug) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("invalid slug: {}", slug)))
    }
}

pub const MAX_NAME_LEN: usize = 50;

/// Names are 1 to [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "user name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Exactly one of slug and name must be given.
pub fn author_filter(
    user_slug: Option<String>,
    user_name: Option<String>,
) -> Result<AuthorFilter, ApiError> {
    match (user_slug, user_name) {
        (Some(slug), None) => {
            validate_slug(&slug)?;
            Ok(AuthorFilter::Slug(slug))
        }
        (None, Some(name)) => {
            validate_name(&name)?;
            Ok(AuthorFilter::Name(name))
        }
        (None, None) => Err(ApiError::BadRequest(
            "either user_slug or user_name is required".to_string(),
        )),
        (Some(_), Some(_)) => Err(ApiError::BadRequest(
            "user_slug and user_name are mutually exclusive".to_string(),
        )),
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}; allowing any", origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(allow_origin)
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    use routes::{articles, lottery, scheme, tools, users};

    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/status", get(tools::status))
        .route("/api/tools", get(tools::list_tools))
        .route("/api/tools/:slug", get(tools::tool_info))
        .route(
            "/api/articles/:slug/lp-recommend-check",
            get(articles::lp_recommend_check),
        )
        .route(
            "/api/users/:slug/next-recommend-date",
            get(users::next_recommend_date),
        )
        .route(
            "/api/users/:slug/lottery-win-records",
            get(users::lottery_win_records),
        )
        .route(
            "/api/users/on-article-rank-records",
            get(users::on_article_rank_records),
        )
        .route(
            "/api/users/on-article-rank-summary",
            get(users::on_article_rank_summary),
        )
        .route("/api/users/name-autocomplete", get(users::name_autocomplete))
        .route(
            "/api/users/history-names-on-article-rank-summary",
            get(users::history_names_summary),
        )
        .route("/api/lottery/rewards", get(lottery::rewards))
        .route("/api/lottery/per-prize-data", get(lottery::per_prize_data))
        .route(
            "/api/lottery/reward-wins-trend-data",
            get(lottery::reward_wins_trend_data),
        )
        .route("/api/url-scheme", get(scheme::convert_url))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
