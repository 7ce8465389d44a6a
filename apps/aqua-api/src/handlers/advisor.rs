//! 建议引擎 handlers
//!
//! - GET /tanks/{id}/diagnostics
//! - GET /tanks/{id}/stocking
//! - POST /tanks/{id}/targets/recalculate
//! - PUT /tanks/{id}/targets
//! - POST /tanks/{id}/targets/auto
//! - POST /tanks/{id}/device-config
//! - GET /tanks/{id}/cycle
//! - GET /tanks/{id}/trend?parameter=&window=
//! - POST /tanks/{id}/tasks/generate

use crate::AppState;
use crate::handlers::TankPath;
use crate::middleware::require_owner;
use crate::utils::response::{
    advisor_error, bad_request_error, cycle_to_dto, recalculation_to_dto, stocking_to_dto,
    tank_to_dto, trend_to_dto,
};
use api_contract::{
    ApiResponse, AutoTargetsResponse, DeviceConfigResponse, DiagnosticsDto,
    GenerateTasksResponse, TankTargetsDto, TargetsRecalculationResponse, TrendQuery,
};
use aqua_storage::TankTargetsUpdate;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::SensorParameter;

pub async fn get_diagnostics(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.run_diagnostics(&ctx, &path.tank_id).await {
        Ok(report) => {
            let data = DiagnosticsDto {
                warnings: report.warnings,
                stocking: stocking_to_dto(report.stocking),
                targets: report.targets.map(recalculation_to_dto),
                device_config: report.device_config,
                cycle: cycle_to_dto(report.cycle),
                ph_trend: trend_to_dto(SensorParameter::Ph, report.ph_trend),
                temperature_trend: trend_to_dto(
                    SensorParameter::Temperature,
                    report.temperature_trend,
                ),
            };
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => advisor_error(err),
    }
}

pub async fn get_stocking(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.stocking_estimate(&ctx, &path.tank_id).await {
        Ok(estimate) => (
            StatusCode::OK,
            Json(ApiResponse::success(stocking_to_dto(estimate))),
        )
            .into_response(),
        Err(err) => advisor_error(err),
    }
}

/// 从当前放养重新推导温度与 pH 区间
pub async fn recalculate_targets(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.recalculate_targets(&ctx, &path.tank_id).await {
        Ok(targets) => {
            let data = TargetsRecalculationResponse {
                targets: targets.map(recalculation_to_dto),
            };
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => advisor_error(err),
    }
}

/// 手动设置目标范围，同时关闭自动推导
pub async fn set_targets(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<TankTargetsDto>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let update = TankTargetsUpdate {
        auto_targets: false,
        temp_min: req.temp_min,
        temp_max: req.temp_max,
        ph_min: req.ph_min,
        ph_max: req.ph_max,
        tds_min: req.tds_min,
        tds_max: req.tds_max,
        gh_min: req.gh_min,
        gh_max: req.gh_max,
        kh_min: req.kh_min,
        kh_max: req.kh_max,
        ammonia_max: req.ammonia_max,
        nitrite_max: req.nitrite_max,
        nitrate_max: req.nitrate_max,
        phosphate_max: req.phosphate_max,
    };
    match state
        .advisor
        .set_manual_targets(&ctx, &path.tank_id, update)
        .await
    {
        Ok(tank) => (StatusCode::OK, Json(ApiResponse::success(tank_to_dto(tank)))).into_response(),
        Err(err) => advisor_error(err),
    }
}

/// 重新打开自动推导并立即重算
pub async fn enable_auto_targets(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.enable_auto_targets(&ctx, &path.tank_id).await {
        Ok((tank, targets)) => {
            let data = AutoTargetsResponse {
                tank: tank_to_dto(tank),
                targets: targets.map(recalculation_to_dto),
            };
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => advisor_error(err),
    }
}

pub async fn refresh_device_config(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.refresh_device_config(&ctx, &path.tank_id).await {
        Ok(device_config) => (
            StatusCode::OK,
            Json(ApiResponse::success(DeviceConfigResponse { device_config })),
        )
            .into_response(),
        Err(err) => advisor_error(err),
    }
}

pub async fn get_cycle(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.cycle_status(&ctx, &path.tank_id).await {
        Ok(report) => {
            (StatusCode::OK, Json(ApiResponse::success(cycle_to_dto(report)))).into_response()
        }
        Err(err) => advisor_error(err),
    }
}

/// 趋势分析，`parameter` 缺省为 pH
pub async fn get_trend(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    Query(query): Query<TrendQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let parameter = match query.parameter.as_deref() {
        None => SensorParameter::Ph,
        Some(value) => match SensorParameter::parse(value) {
            Some(parameter) => parameter,
            None => return bad_request_error("parameter must be temperature|ph|tds|turbidity"),
        },
    };
    match state
        .advisor
        .analyze_trend(&ctx, &path.tank_id, parameter, query.window)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(trend_to_dto(parameter, report))),
        )
            .into_response(),
        Err(err) => advisor_error(err),
    }
}

pub async fn generate_tasks(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.advisor.generate_tasks(&ctx, &path.tank_id).await {
        Ok(tasks_created) => (
            StatusCode::OK,
            Json(ApiResponse::success(GenerateTasksResponse { tasks_created })),
        )
            .into_response(),
        Err(err) => advisor_error(err),
    }
}
