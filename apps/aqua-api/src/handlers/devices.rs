//! 智能设备 handlers
//!
//! - POST /devices
//! - PUT /devices/{id}/attach

use crate::AppState;
use crate::middleware::require_owner;
use crate::utils::response::{bad_request_error, device_to_dto, not_found_error, storage_error};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{ApiResponse, AttachDeviceRequest, CreateDeviceRequest};
use aqua_storage::DeviceRecord;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::OwnerContext;
use tracing::info;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    pub(crate) device_id: String,
}

/// 目标水族箱必须属于当前用户
async fn ensure_tank_owned(
    state: &AppState,
    ctx: &OwnerContext,
    tank_id: Option<&str>,
) -> Result<(), Response> {
    let Some(tank_id) = tank_id else {
        return Ok(());
    };
    match state.stores.tanks.find_tank(ctx, tank_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(not_found_error()),
        Err(err) => Err(storage_error(err)),
    }
}

/// 注册设备（设备密钥唯一，重复返回 409）
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateDeviceRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let api_key = match normalize_required(req.api_key, "apiKey") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Some(watts) = req.power_watts {
        if !watts.is_finite() || watts < 0.0 {
            return bad_request_error("powerWatts must not be negative");
        }
    }
    let tank_id = match normalize_optional(req.tank_id, "tankId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(response) = ensure_tank_owned(&state, &ctx, tank_id.as_deref()).await {
        return response;
    }
    let record = DeviceRecord {
        device_id: Uuid::new_v4().to_string(),
        owner_id: ctx.user_id.clone(),
        tank_id,
        api_key,
        name,
        power_watts: req.power_watts,
        config: serde_json::json!({}),
    };
    match state.stores.devices.create_device(&ctx, record).await {
        Ok(device) => {
            info!(target: "aqua.api", device_id = %device.device_id, "device_registered");
            (StatusCode::OK, Json(ApiResponse::success(device_to_dto(device)))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 绑定到水族箱；`tankId` 为空时解绑
pub async fn attach_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
    Json(req): Json<AttachDeviceRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let tank_id = match normalize_optional(req.tank_id, "tankId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(response) = ensure_tank_owned(&state, &ctx, tank_id.as_deref()).await {
        return response;
    }
    match state
        .stores
        .devices
        .attach_device(&ctx, &path.device_id, tank_id)
        .await
    {
        Ok(Some(device)) => {
            (StatusCode::OK, Json(ApiResponse::success(device_to_dto(device)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
