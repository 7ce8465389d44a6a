//! 水族箱 CRUD handlers
//!
//! - GET /tanks
//! - POST /tanks
//! - GET /tanks/{id}
//! - PUT /tanks/{id}
//! - DELETE /tanks/{id}

use crate::AppState;
use crate::middleware::{require_owner, require_tank};
use crate::utils::response::{not_found_error, storage_error, tank_to_dto};
use crate::utils::{
    normalize_optional, parse_water_type, validate_dimension, validate_tank_name, validate_volume,
};
use api_contract::{ApiResponse, CreateTankRequest, TankDto, UpdateTankRequest};
use aqua_storage::{TankRecord, TankTargets, TankUpdate};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::WaterType;
use tracing::info;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct TankPath {
    pub(crate) tank_id: String,
}

/// 列出当前用户的水族箱
pub async fn list_tanks(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.stores.tanks.list_tanks(&ctx).await {
        Ok(items) => {
            let data: Vec<TankDto> = items.into_iter().map(tank_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建水族箱（新水族箱默认自动推导目标范围）
pub async fn create_tank(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTankRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let record = match build_tank(&ctx.user_id, req) {
        Ok(record) => record,
        Err(response) => return response,
    };
    match state.stores.tanks.create_tank(&ctx, record).await {
        Ok(tank) => {
            info!(target: "aqua.api", tank_id = %tank.tank_id, "tank_created");
            (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(tank)))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

fn build_tank(owner_id: &str, req: CreateTankRequest) -> Result<TankRecord, Response> {
    let water_type = match req.water_type.as_deref() {
        Some(value) => parse_water_type(value)?,
        None => WaterType::Freshwater,
    };
    Ok(TankRecord {
        tank_id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: validate_tank_name(req.name)?,
        volume_l: validate_volume(req.volume_l)?,
        length_cm: validate_dimension(req.length_cm, "lengthCm")?,
        width_cm: validate_dimension(req.width_cm, "widthCm")?,
        height_cm: validate_dimension(req.height_cm, "heightCm")?,
        water_type,
        start_date_ms: req.start_date_ms,
        description: normalize_optional(req.description, "description")?,
        has_plants: req.has_plants.unwrap_or(false),
        auto_targets: true,
        targets: TankTargets::default(),
    })
}

/// 获取水族箱详情
pub async fn get_tank(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    match require_tank(&state, &headers, &path.tank_id).await {
        Ok((_, tank)) => {
            (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(tank)))).into_response()
        }
        Err(response) => response,
    }
}

/// 更新水族箱基本信息
pub async fn update_tank(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateTankRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let update = match build_update(req) {
        Ok(update) => update,
        Err(response) => return response,
    };
    match state
        .stores
        .tanks
        .update_tank(&ctx, &path.tank_id, update)
        .await
    {
        Ok(Some(tank)) => {
            (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(tank)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

fn build_update(req: UpdateTankRequest) -> Result<TankUpdate, Response> {
    Ok(TankUpdate {
        name: req.name.map(validate_tank_name).transpose()?,
        volume_l: req.volume_l.map(validate_volume).transpose()?,
        length_cm: validate_dimension(req.length_cm, "lengthCm")?,
        width_cm: validate_dimension(req.width_cm, "widthCm")?,
        height_cm: validate_dimension(req.height_cm, "heightCm")?,
        water_type: req
            .water_type
            .as_deref()
            .map(parse_water_type)
            .transpose()?,
        start_date_ms: req.start_date_ms,
        description: normalize_optional(req.description, "description")?,
        has_plants: req.has_plants,
    })
}

/// 删除水族箱及其附属数据
pub async fn delete_tank(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.stores.delete_tank_cascade(&ctx, &path.tank_id).await {
        Ok(true) => {
            info!(target: "aqua.api", tank_id = %path.tank_id, "tank_deleted");
            (StatusCode::OK, Json(ApiResponse::success(true))).into_response()
        }
        Ok(false) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
