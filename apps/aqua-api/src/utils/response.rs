//! HTTP 响应辅助函数和 DTO 转换
//!
//! 错误响应：auth_error, bad_request_error, not_found_error, conflict_error,
//! forbidden_error, storage_error, advisor_error。
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码一一对应。

use api_contract::{
    ActivityDto, ApiResponse, CycleStatusDto, DeviceDto, ManualMeasurementDto,
    SensorMeasurementDto, SpeciesDto, StockingDto, TankDto, TankTargetsDto, TargetsResultDto,
    TaskDto, TrendDto,
};
use aqua_advisor::{AdvisorError, CycleReport, StockingEstimate, TargetRecalculation, TrendReport};
use aqua_storage::{
    ActivityLogRecord, DeviceRecord, ManualMeasurementRecord, SensorMeasurementRecord,
    SpeciesRecord, StorageError, StorageErrorKind, TankRecord, TankTargets, TaskRecord,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::SensorParameter;
use tracing::error;

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", "forbidden")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 唯一性冲突响应
pub fn conflict_error(message: impl Into<String>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error("RESOURCE.CONFLICT", message.into())),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    match err.kind() {
        StorageErrorKind::Conflict => conflict_error(err.to_string()),
        StorageErrorKind::Scope => forbidden_error(),
        StorageErrorKind::Backend => {
            error!(target: "aqua.api", error = %err, "storage_failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("INTERNAL.ERROR", err.to_string())),
            )
                .into_response()
        }
    }
}

/// 建议服务错误响应
pub fn advisor_error(err: AdvisorError) -> Response {
    match err {
        AdvisorError::Validation(message) => bad_request_error(message),
        AdvisorError::NotFound(_) => not_found_error(),
        AdvisorError::Storage(err) => storage_error(err),
    }
}

pub fn targets_to_dto(targets: TankTargets) -> TankTargetsDto {
    TankTargetsDto {
        temp_min: targets.temp_min,
        temp_max: targets.temp_max,
        ph_min: targets.ph_min,
        ph_max: targets.ph_max,
        tds_min: targets.tds_min,
        tds_max: targets.tds_max,
        gh_min: targets.gh_min,
        gh_max: targets.gh_max,
        kh_min: targets.kh_min,
        kh_max: targets.kh_max,
        ammonia_max: targets.ammonia_max,
        nitrite_max: targets.nitrite_max,
        nitrate_max: targets.nitrate_max,
        phosphate_max: targets.phosphate_max,
    }
}

pub fn tank_to_dto(record: TankRecord) -> TankDto {
    TankDto {
        tank_id: record.tank_id,
        name: record.name,
        volume_l: record.volume_l,
        length_cm: record.length_cm,
        width_cm: record.width_cm,
        height_cm: record.height_cm,
        water_type: record.water_type.as_str().to_string(),
        start_date_ms: record.start_date_ms,
        description: record.description,
        has_plants: record.has_plants,
        auto_targets: record.auto_targets,
        targets: targets_to_dto(record.targets),
    }
}

pub fn species_to_dto(record: SpeciesRecord) -> SpeciesDto {
    SpeciesDto {
        species_id: record.species_id,
        kind: record.kind.as_str().to_string(),
        name: record.name,
        latin_name: record.latin_name,
        size_cm: record.size_cm,
        aggressiveness: record
            .aggressiveness
            .map(|value| value.as_str().to_string()),
        feeding_frequency: record.feeding_frequency,
        min_tank_size_l: record.min_tank_size_l,
        min_water_volume_l: record.min_water_volume_l,
        temp_min: record.temp_min,
        temp_max: record.temp_max,
        ph_min: record.ph_min,
        ph_max: record.ph_max,
    }
}

pub fn stocking_to_dto(estimate: StockingEstimate) -> StockingDto {
    StockingDto {
        percent: estimate.percent,
        status: estimate.status.as_str().to_string(),
    }
}

pub fn recalculation_to_dto(result: TargetRecalculation) -> TargetsResultDto {
    TargetsResultDto {
        temp_min: result.temp_min,
        temp_max: result.temp_max,
        ph_min: result.ph_min,
        ph_max: result.ph_max,
        conflicts: result.conflicts,
        applied: result.applied,
    }
}

pub fn cycle_to_dto(report: CycleReport) -> CycleStatusDto {
    CycleStatusDto {
        status: report.status.to_string(),
        percent: report.percent,
        message: report.message.to_string(),
        color: report.color.map(|color| color.as_str().to_string()),
    }
}

pub fn trend_to_dto(parameter: SensorParameter, report: TrendReport) -> TrendDto {
    TrendDto {
        parameter: parameter.as_str().to_string(),
        status: report.status.to_string(),
        rate_per_hour: report.rate_per_hour,
        message: report.message,
        color: report.color.map(|color| color.as_str().to_string()),
    }
}

pub fn task_to_dto(record: TaskRecord) -> TaskDto {
    TaskDto {
        task_id: record.task_id,
        tank_id: record.tank_id,
        title: record.title,
        description: record.description,
        start_date_ms: record.start_date_ms,
        recurrence: record.recurrence,
        is_active: record.is_active,
    }
}

pub fn activity_to_dto(record: ActivityLogRecord) -> ActivityDto {
    ActivityDto {
        activity_id: record.activity_id,
        tank_id: record.tank_id,
        ts_ms: record.ts_ms,
        description: record.description,
        event_type: record.event_type,
    }
}

pub fn manual_to_dto(record: ManualMeasurementRecord) -> ManualMeasurementDto {
    ManualMeasurementDto {
        measurement_id: record.measurement_id,
        tank_id: record.tank_id,
        ts_ms: record.ts_ms,
        ammonia: record.ammonia,
        nitrite: record.nitrite,
        nitrate: record.nitrate,
        gh: record.gh,
        kh: record.kh,
        phosphate: record.phosphate,
    }
}

pub fn sensor_to_dto(record: SensorMeasurementRecord) -> SensorMeasurementDto {
    SensorMeasurementDto {
        measurement_id: record.measurement_id,
        device_id: record.device_id,
        ts_ms: record.ts_ms,
        temperature: record.temperature,
        ph: record.ph,
        tds: record.tds,
        turbidity: record.turbidity,
    }
}

pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        device_id: record.device_id,
        tank_id: record.tank_id,
        name: record.name,
        power_watts: record.power_watts,
        config: record.config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kinds_map_to_status_codes() {
        assert_eq!(
            storage_error(StorageError::conflict("dup")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            storage_error(StorageError::scope("scope")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            storage_error(StorageError::new("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn advisor_errors_map_to_status_codes() {
        assert_eq!(
            advisor_error(AdvisorError::Validation("bad".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            advisor_error(AdvisorError::NotFound("tank")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            advisor_error(AdvisorError::Storage(StorageError::conflict("dup"))).status(),
            StatusCode::CONFLICT
        );
    }
}
