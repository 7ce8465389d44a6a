//! 月度运行成本 handler
//!
//! - POST /tanks/{id}/economy

use crate::AppState;
use crate::handlers::TankPath;
use crate::middleware::require_owner;
use crate::utils::normalize_required;
use crate::utils::response::{advisor_error, bad_request_error};
use api_contract::{
    ApiResponse, ConsumablesBreakdownDto, EconomyBreakdownDto, EconomyRequestDto,
    EconomyResponseDto, ElectricityBreakdownDto, WaterBreakdownDto,
};
use aqua_advisor::{Consumable, EconomyReport, EconomyRequest, ExpenseFrequency};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

pub async fn calculate_economy(
    State(state): State<AppState>,
    Path(path): Path<TankPath>,
    headers: HeaderMap,
    Json(req): Json<EconomyRequestDto>,
) -> Response {
    let ctx = match require_owner(&headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let request = match build_request(req) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state
        .advisor
        .monthly_cost(&ctx, &path.tank_id, &request)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report_to_dto(report))),
        )
            .into_response(),
        Err(err) => advisor_error(err),
    }
}

fn build_request(req: EconomyRequestDto) -> Result<EconomyRequest, Response> {
    let mut consumables = Vec::with_capacity(req.consumables.len());
    for item in req.consumables {
        let frequency = ExpenseFrequency::parse(item.frequency.trim()).ok_or_else(|| {
            bad_request_error(
                "frequency must be weekly|monthly|every_3_months|every_6_months|yearly",
            )
        })?;
        consumables.push(Consumable {
            name: normalize_required(item.name, "name")?,
            price: item.price,
            frequency,
        });
    }
    Ok(EconomyRequest {
        electricity_price: req.electricity_price,
        water_price_m3: req.water_price_m3,
        water_change_percent: req.manual_water_change_percent,
        consumables,
    })
}

fn report_to_dto(report: EconomyReport) -> EconomyResponseDto {
    EconomyResponseDto {
        total_monthly_cost: report.total_monthly_cost,
        currency: report.currency,
        breakdown: EconomyBreakdownDto {
            electricity: ElectricityBreakdownDto {
                watts_total: report.watts_total,
                kwh_month: report.kwh_month,
                cost: report.electricity_cost,
            },
            water: WaterBreakdownDto {
                volume_m3: report.water_volume_m3,
                cost: report.water_cost,
            },
            consumables: ConsumablesBreakdownDto {
                cost: report.consumables_cost,
                items_count: report.consumables_count,
            },
        },
        message: report.message,
    }
}
