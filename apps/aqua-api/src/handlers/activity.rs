//! 活动日志 handlers
//!
//! - GET /tanks/{id}/activity
//! - POST /tanks/{id}/activity

use crate::AppState;
use crate::handlers::TankPath;
use crate::middleware::require_tank;
use crate::utils::response::{activity_to_dto, bad_request_error, storage_error};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{ActivityDto, ApiResponse, CreateActivityRequest, HistoryQuery};
use aqua_storage::ActivityLogRecord;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 50;
pub(crate) const MAX_HISTORY_LIMIT: usize = 500;

pub(crate) fn history_limit(limit: Option<usize>) -> Result<usize, Response> {
    match limit {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Ok(limit),
        Some(_) => Err(bad_request_error("limit out of range")),
    }
}

pub async fn list_activity(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    Query(query): Query<HistoryQuery>,
    headers: HeaderMap,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    let limit = match history_limit(query.limit) {
        Ok(limit) => limit,
        Err(response) => return response,
    };
    match state
        .stores
        .activity
        .list_activity(&ctx, &path.tank_id, limit)
        .await
    {
        Ok(items) => {
            let data: Vec<ActivityDto> = items.into_iter().map(activity_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 记录维护活动；`water_change` / `filter` 类事件会抑制对应的维护任务
pub async fn create_activity(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<CreateActivityRequest>,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    let event_type = match normalize_required(req.event_type, "eventType") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let description = match normalize_optional(req.description, "description") {
        Ok(value) => value.unwrap_or_else(|| event_type.clone()),
        Err(response) => return response,
    };
    let record = ActivityLogRecord {
        activity_id: Uuid::new_v4().to_string(),
        tank_id: path.tank_id.clone(),
        ts_ms: req.ts_ms.unwrap_or_else(|| state.advisor.now_ms()),
        description,
        event_type,
    };
    match state
        .stores
        .activity
        .append_activity(&ctx, record.clone())
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(activity_to_dto(record))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}
