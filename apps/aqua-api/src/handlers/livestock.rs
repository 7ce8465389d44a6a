//! 放养 handlers
//!
//! - GET /tanks/{id}/livestock
//! - POST /tanks/{id}/livestock

use crate::AppState;
use crate::handlers::TankPath;
use crate::middleware::{require_owner, require_tank};
use crate::utils::normalize_required;
use crate::utils::response::{
    advisor_error, recalculation_to_dto, stocking_to_dto, storage_error,
};
use api_contract::{AddLivestockRequest, AddLivestockResponse, ApiResponse, StockingItemDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

/// 列出水族箱的放养记录（附物种名称）
pub async fn list_livestock(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
) -> Response {
    let (ctx, _) = match require_tank(&state, &headers, &path.tank_id).await {
        Ok(scoped) => scoped,
        Err(response) => return response,
    };
    let rows = match state.stores.stocking.list_stocking(&ctx, &path.tank_id).await {
        Ok(rows) => rows,
        Err(err) => return storage_error(err),
    };
    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        let name = match state.stores.species.find_species(&ctx, &row.species_id).await {
            Ok(Some(species)) => species.name,
            Ok(None) => row.species_id.clone(),
            Err(err) => return storage_error(err),
        };
        data.push(StockingItemDto {
            species_id: row.species_id,
            name,
            quantity: row.quantity,
            added_at_ms: row.added_at_ms,
        });
    }
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 加入物种
///
/// 兼容性警告不是错误：未忽略警告时返回 200 与 `added=false`。
pub async fn add_livestock(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<AddLivestockRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let species_id = match normalize_required(req.species_id, "speciesId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .advisor
        .add_livestock(
            &ctx,
            &path.tank_id,
            &species_id,
            req.quantity,
            req.ignore_warnings,
        )
        .await
    {
        Ok(outcome) => {
            info!(
                target: "aqua.api",
                tank_id = %path.tank_id,
                added = outcome.added,
                warnings = outcome.warnings.len(),
                "livestock_request"
            );
            let data = AddLivestockResponse {
                added: outcome.added,
                warnings: outcome.warnings,
                stocking: stocking_to_dto(outcome.stocking),
                targets: outcome.targets.map(recalculation_to_dto),
                device_config: outcome.device_config,
            };
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => advisor_error(err),
    }
}
