//! 水族箱建议 HTTP API 与请求追踪 ID。

mod handlers;
mod middleware;
mod routes;
mod utils;

use aqua_advisor::{AdvisorRules, AdvisorService};
use aqua_config::AppConfig;
use aqua_storage::{AquariumStores, connect_pool, ensure_schema};
use aqua_telemetry::init_tracing;
use axum::{Json, Router, middleware::from_fn, response::IntoResponse, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub advisor: AdvisorService,
    pub stores: AquariumStores,
}

impl AppState {
    pub fn new(advisor: AdvisorService) -> Self {
        let stores = advisor.stores().clone();
        Self { advisor, stores }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let stores = match config.database_url.as_deref() {
        Some(url) => {
            let pool = connect_pool(url).await?;
            ensure_schema(&pool).await?;
            AquariumStores::postgres(pool)
        }
        None => {
            info!(target: "aqua.api", "database_url not set, using in-memory demo stores");
            AquariumStores::in_memory_demo()
        }
    };
    let advisor = AdvisorService::new(stores, rules_from_config(&config));
    let app = build_app(AppState::new(advisor));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "aqua.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// 把环境配置覆盖到默认规则表上。
fn rules_from_config(config: &AppConfig) -> AdvisorRules {
    AdvisorRules {
        trend_window: config.trend_window,
        default_max_tds: config.default_max_tds,
        water_change_interval_days: config.water_change_interval_days,
        filter_clean_interval_days: config.filter_clean_interval_days,
        bioload_alert_percent: config.bioload_alert_percent,
        currency: config.currency.clone(),
        ..AdvisorRules::default()
    }
}

pub fn build_app(state: AppState) -> Router {
    routes::create_api_router()
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(from_fn(middleware::request_context))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
