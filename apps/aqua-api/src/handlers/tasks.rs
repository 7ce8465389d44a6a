//! 维护任务 handlers
//!
//! - GET /tanks/{id}/tasks
//! - POST /tanks/{id}/tasks/{task_id}/close

use crate::AppState;
use crate::handlers::TankPath;
use crate::middleware::require_tank;
use crate::utils::response::{not_found_error, storage_error, task_to_dto};
use api_contract::{ApiResponse, TaskDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

#[derive(serde::Deserialize)]
pub struct TaskPath {
    pub(crate) tank_id: String,
    pub(crate) task_id: String,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    match state.stores.tasks.list_tasks(&ctx, &path.tank_id).await {
        Ok(items) => {
            let data: Vec<TaskDto> = items.into_iter().map(task_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 关闭任务后，下一次任务生成可再次创建同名任务
pub async fn close_task(
    State(state): State<AppState>,
    Path(path): Path<TaskPath>,
    headers: HeaderMap,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    match state
        .stores
        .tasks
        .close_task(&ctx, &path.tank_id, &path.task_id)
        .await
    {
        Ok(Some(task)) => {
            info!(target: "aqua.api", tank_id = %path.tank_id, task_id = %path.task_id, "task_closed");
            (StatusCode::OK, Json(ApiResponse::success(task_to_dto(task)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
