//! 建议引擎计数指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use aqua_telemetry::metrics;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            compatibility_checks: snapshot.compatibility_checks,
            compatibility_warnings: snapshot.compatibility_warnings,
            livestock_added: snapshot.livestock_added,
            livestock_rejected: snapshot.livestock_rejected,
            target_recalculations: snapshot.target_recalculations,
            target_conflicts: snapshot.target_conflicts,
            device_configs_written: snapshot.device_configs_written,
            tasks_created: snapshot.tasks_created,
            sensor_readings_ingested: snapshot.sensor_readings_ingested,
            manual_readings_recorded: snapshot.manual_readings_recorded,
        })),
    )
        .into_response()
}
