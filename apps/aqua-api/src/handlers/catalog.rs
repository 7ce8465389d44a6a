//! 物种目录 handlers
//!
//! - GET /catalog/species
//! - POST /catalog/species
//! - GET /catalog/species/{id}
//! - PUT /catalog/species/{id}

use crate::AppState;
use crate::middleware::require_owner;
use crate::utils::response::{not_found_error, species_to_dto, storage_error};
use crate::utils::{
    ensure_ordered, normalize_optional, normalize_required, parse_aggressiveness, parse_kind,
    validate_positive,
};
use api_contract::{ApiResponse, CreateSpeciesRequest, SpeciesDto, UpdateSpeciesRequest};
use aqua_storage::{SpeciesRecord, SpeciesUpdate};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct SpeciesPath {
    pub(crate) species_id: String,
}

pub async fn list_species(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.stores.species.list_species(&ctx).await {
        Ok(items) => {
            let data: Vec<SpeciesDto> = items.into_iter().map(species_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn create_species(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateSpeciesRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let record = match build_species(req) {
        Ok(record) => record,
        Err(response) => return response,
    };
    match state.stores.species.create_species(&ctx, record).await {
        Ok(species) => (
            StatusCode::OK,
            Json(ApiResponse::success(species_to_dto(species))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

fn build_species(req: CreateSpeciesRequest) -> Result<SpeciesRecord, Response> {
    ensure_ordered(req.temp_min, req.temp_max, "temperature")?;
    ensure_ordered(req.ph_min, req.ph_max, "ph")?;
    Ok(SpeciesRecord {
        species_id: Uuid::new_v4().to_string(),
        kind: parse_kind(&req.kind)?,
        name: normalize_required(req.name, "name")?,
        latin_name: normalize_optional(req.latin_name, "latinName")?,
        size_cm: validate_positive(req.size_cm, "sizeCm")?,
        aggressiveness: parse_aggressiveness(req.aggressiveness.as_deref())?,
        feeding_frequency: normalize_optional(req.feeding_frequency, "feedingFrequency")?,
        min_tank_size_l: validate_positive(req.min_tank_size_l, "minTankSizeL")?,
        min_water_volume_l: validate_positive(req.min_water_volume_l, "minWaterVolumeL")?,
        temp_min: req.temp_min,
        temp_max: req.temp_max,
        ph_min: req.ph_min,
        ph_max: req.ph_max,
    })
}

pub async fn get_species(
    State(state): State<AppState>,
    Path(path): Path<SpeciesPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.stores.species.find_species(&ctx, &path.species_id).await {
        Ok(Some(species)) => (
            StatusCode::OK,
            Json(ApiResponse::success(species_to_dto(species))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 局部更新物种；合并后的温度与 pH 区间仍须有序
pub async fn update_species(
    State(state): State<AppState>,
    Path(path): Path<SpeciesPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateSpeciesRequest>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let current = match state.stores.species.find_species(&ctx, &path.species_id).await {
        Ok(Some(species)) => species,
        Ok(None) => return not_found_error(),
        Err(err) => return storage_error(err),
    };
    if let Err(response) = ensure_ordered(
        req.temp_min.or(current.temp_min),
        req.temp_max.or(current.temp_max),
        "temperature",
    ) {
        return response;
    }
    if let Err(response) = ensure_ordered(
        req.ph_min.or(current.ph_min),
        req.ph_max.or(current.ph_max),
        "ph",
    ) {
        return response;
    }
    let update = match build_update(req) {
        Ok(update) => update,
        Err(response) => return response,
    };
    match state
        .stores
        .species
        .update_species(&ctx, &path.species_id, update)
        .await
    {
        Ok(Some(species)) => (
            StatusCode::OK,
            Json(ApiResponse::success(species_to_dto(species))),
        )
            .into_response(),
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

fn build_update(req: UpdateSpeciesRequest) -> Result<SpeciesUpdate, Response> {
    Ok(SpeciesUpdate {
        name: normalize_optional(req.name, "name")?,
        latin_name: normalize_optional(req.latin_name, "latinName")?,
        size_cm: validate_positive(req.size_cm, "sizeCm")?,
        aggressiveness: parse_aggressiveness(req.aggressiveness.as_deref())?,
        feeding_frequency: normalize_optional(req.feeding_frequency, "feedingFrequency")?,
        min_tank_size_l: validate_positive(req.min_tank_size_l, "minTankSizeL")?,
        min_water_volume_l: validate_positive(req.min_water_volume_l, "minWaterVolumeL")?,
        temp_min: req.temp_min,
        temp_max: req.temp_max,
        ph_min: req.ph_min,
        ph_max: req.ph_max,
    })
}
