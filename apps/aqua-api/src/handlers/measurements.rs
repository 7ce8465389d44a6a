//! 测量 handlers
//!
//! - GET /tanks/{id}/measurements/manual
//! - POST /tanks/{id}/measurements/manual
//! - GET /tanks/{id}/measurements/sensor
//! - POST /measurements/sensor（设备密钥上报，无用户身份）

use crate::AppState;
use crate::handlers::TankPath;
use crate::handlers::activity::history_limit;
use crate::middleware::require_tank;
use crate::utils::normalize_required;
use crate::utils::response::{
    bad_request_error, manual_to_dto, not_found_error, sensor_to_dto, storage_error,
};
use api_contract::{
    ApiResponse, HistoryQuery, ManualMeasurementDto, ManualMeasurementRequest,
    SensorIngestRequest, SensorMeasurementDto,
};
use aqua_storage::{ManualMeasurementRecord, SensorMeasurementRecord};
use aqua_telemetry::{record_manual_reading, record_sensor_reading};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;
use uuid::Uuid;

pub async fn list_manual_measurements(
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
        .measurements
        .recent_manual(&ctx, &path.tank_id, limit)
        .await
    {
        Ok(items) => {
            let data: Vec<ManualMeasurementDto> = items.into_iter().map(manual_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 记录一次手动水质测试（水族箱必须属于当前用户），时间戳取服务端时钟
pub async fn create_manual_measurement(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<ManualMeasurementRequest>,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    let values = [
        req.ammonia,
        req.nitrite,
        req.nitrate,
        req.gh,
        req.kh,
        req.phosphate,
    ];
    if values.iter().all(Option::is_none) {
        return bad_request_error("at least one reading required");
    }
    if values.iter().flatten().any(|value| !value.is_finite() || *value < 0.0) {
        return bad_request_error("readings must be non-negative numbers");
    }
    let record = ManualMeasurementRecord {
        measurement_id: Uuid::new_v4().to_string(),
        tank_id: path.tank_id.clone(),
        ts_ms: state.advisor.now_ms(),
        ammonia: req.ammonia,
        nitrite: req.nitrite,
        nitrate: req.nitrate,
        gh: req.gh,
        kh: req.kh,
        phosphate: req.phosphate,
    };
    match state
        .stores
        .measurements
        .append_manual(&ctx, record.clone())
        .await
    {
        Ok(()) => {
            record_manual_reading();
            (
                StatusCode::OK,
                Json(ApiResponse::success(manual_to_dto(record))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 水族箱上所有设备的最近读数，按时间倒序合并；`deviceId` 可限定单个设备
pub async fn list_sensor_measurements(
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
    let devices = match state.stores.devices.list_by_tank(&ctx, &path.tank_id).await {
        Ok(devices) => devices,
        Err(err) => return storage_error(err),
    };
    let mut merged: Vec<SensorMeasurementRecord> = Vec::new();
    for device in devices {
        if let Some(device_id) = query.device_id.as_deref() {
            if device.device_id != device_id {
                continue;
            }
        }
        match state
            .stores
            .measurements
            .recent_sensor(&ctx, &device.device_id, None, limit)
            .await
        {
            Ok(items) => merged.extend(items),
            Err(err) => return storage_error(err),
        }
    }
    merged.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
    merged.truncate(limit);
    let data: Vec<SensorMeasurementDto> = merged.into_iter().map(sensor_to_dto).collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 设备上报读数
pub async fn ingest_sensor_measurement(
    State(state): State<AppState>,
    Json(req): Json<SensorIngestRequest>,
) -> Response {
    let api_key = match normalize_required(req.api_key, "api_key") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let values = req.measurements;
    let readings = [values.temperature, values.ph, values.tds, values.turbidity];
    if readings.iter().all(Option::is_none) {
        return bad_request_error("at least one measurement required");
    }
    if readings.iter().flatten().any(|value| !value.is_finite()) {
        return bad_request_error("measurements must be numbers");
    }
    let device = match state.stores.devices.find_by_api_key(&api_key).await {
        Ok(Some(device)) => device,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };
    let record = SensorMeasurementRecord {
        measurement_id: Uuid::new_v4().to_string(),
        device_id: device.device_id.clone(),
        ts_ms: state.advisor.now_ms(),
        temperature: values.temperature,
        ph: values.ph,
        tds: values.tds,
        turbidity: values.turbidity,
    };
    match state.stores.measurements.append_sensor(record.clone()).await {
        Ok(()) => {
            record_sensor_reading();
            info!(target: "aqua.api", device_id = %device.device_id, "sensor_reading_ingested");
            (
                StatusCode::OK,
                Json(ApiResponse::success(sensor_to_dto(record))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}
