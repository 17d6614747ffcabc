use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{find_tool, Dataset, ToolStatus, TOOLS};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub downgraded_tools: Vec<&'static str>,
    pub unavailable_tools: Vec<&'static str>,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        downgraded_tools: state.config.tools_with_status(ToolStatus::Downgraded),
        unavailable_tools: state.config.tools_with_status(ToolStatus::Unavailable),
    })
}

#[derive(Debug, Serialize)]
pub struct ToolSummary {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub status: ToolStatus,
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolSummary>,
}

pub async fn list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = TOOLS
        .iter()
        .map(|t| ToolSummary {
            slug: t.slug,
            name: t.name,
            description: t.description,
            status: state.config.tool(t.slug).status,
        })
        .collect();

    Json(ToolListResponse { tools })
}

#[derive(Debug, Serialize)]
pub struct ToolInfoResponse {
    pub slug: &'static str,
    pub name: &'static str,
    pub status: ToolStatus,
    pub reason: Option<String>,
    pub data_update_freq: Option<String>,
    pub data_source: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_update_time: Option<String>,
}

pub async fn tool_info(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ToolInfoResponse>, ApiError> {
    let tool =
        find_tool(&slug).ok_or_else(|| ApiError::NotFound(format!("Tool {} not found", slug)))?;
    let config = state.config.tool(tool.slug);

    let (data_count, data_update_time) = match tool.dataset {
        Some(Dataset::RankingRecords) => (
            Some(state.rankings.count()?),
            state.rankings.latest_date()?.map(|d| d.to_string()),
        ),
        Some(Dataset::LotteryWinRecords) => (
            Some(state.lottery.count()?),
            state
                .lottery
                .latest_time()?
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        None => (None, None),
    };

    Ok(Json(ToolInfoResponse {
        slug: tool.slug,
        name: tool.name,
        status: config.status,
        reason: config.reason,
        data_update_freq: config.data_update_freq,
        data_source: config.data_source,
        data_count,
        data_update_time,
    }))
}
