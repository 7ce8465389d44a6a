//! API 路由定义
//!
//! 除 `/health`、`/metrics` 与设备上报 `/measurements/sensor` 外，
//! 所有路由都需要网关注入的 `x-user-id`。

use crate::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::*;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(get_metrics))
        // 水族箱
        .route("/tanks", get(list_tanks).post(create_tank))
        .route(
            "/tanks/:tank_id",
            get(get_tank).put(update_tank).delete(delete_tank),
        )
        // 放养与建议
        .route(
            "/tanks/:tank_id/livestock",
            get(list_livestock).post(add_livestock),
        )
        .route("/tanks/:tank_id/diagnostics", get(get_diagnostics))
        .route("/tanks/:tank_id/stocking", get(get_stocking))
        .route(
            "/tanks/:tank_id/targets/recalculate",
            post(recalculate_targets),
        )
        .route("/tanks/:tank_id/targets", put(set_targets))
        .route("/tanks/:tank_id/targets/auto", post(enable_auto_targets))
        .route("/tanks/:tank_id/device-config", post(refresh_device_config))
        .route("/tanks/:tank_id/cycle", get(get_cycle))
        .route("/tanks/:tank_id/trend", get(get_trend))
        .route("/tanks/:tank_id/economy", post(calculate_economy))
        // 维护任务与活动
        .route("/tanks/:tank_id/tasks/generate", post(generate_tasks))
        .route("/tanks/:tank_id/tasks", get(list_tasks))
        .route("/tanks/:tank_id/tasks/:task_id/close", post(close_task))
        .route(
            "/tanks/:tank_id/activity",
            get(list_activity).post(create_activity),
        )
        // 测量
        .route(
            "/tanks/:tank_id/measurements/manual",
            get(list_manual_measurements).post(create_manual_measurement),
        )
        .route(
            "/tanks/:tank_id/measurements/sensor",
            get(list_sensor_measurements),
        )
        .route("/measurements/sensor", post(ingest_sensor_measurement))
        // 目录与设备
        .route("/catalog/species", get(list_species).post(create_species))
        .route(
            "/catalog/species/:species_id",
            get(get_species).put(update_species),
        )
        .route("/devices", post(create_device))
        .route("/devices/:device_id/attach", put(attach_device))
}

#[cfg(test)]
mod tests {
    use crate::{AppState, build_app};
    use aqua_advisor::{AdvisorRules, AdvisorService, FixedClock};
    use aqua_storage::AquariumStores;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use domain::DAY_MS;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const NOW_MS: i64 = 40 * DAY_MS;

    fn app() -> Router {
        let advisor = AdvisorService::new(AquariumStores::in_memory_demo(), AdvisorRules::default())
            .with_clock(Arc::new(FixedClock(NOW_MS)));
        build_app(AppState::new(advisor))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        assert!(response.headers().contains_key("x-request-id"));
        let bytes: bytes::Bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json")
        };
        (status, value)
    }

    async fn create_tank(app: &Router, user: &str, name: &str, volume_l: f64) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/tanks",
            Some(user),
            Some(json!({
                "name": name,
                "volumeL": volume_l,
                "startDateMs": 0,
                "hasPlants": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["tankId"].as_str().expect("tank id").to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], Value::Bool(true));
    }

    #[tokio::test]
    async fn tank_routes_require_owner_header() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/tanks", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");
    }

    #[tokio::test]
    async fn tank_creation_is_validated() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/tanks",
            Some("user-1"),
            Some(json!({ "name": "ab", "volumeL": 60.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");

        let (status, _) = call(
            &app,
            Method::POST,
            "/tanks",
            Some("user-1"),
            Some(json!({ "name": "Reef", "volumeL": 60.0, "lengthCm": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        create_tank(&app, "user-1", "Living room", 60.0).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/tanks",
            Some("user-1"),
            Some(json!({ "name": "LIVING ROOM", "volumeL": 30.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");

        // 其他用户可以使用相同名称
        create_tank(&app, "user-2", "Living room", 30.0).await;
    }

    #[tokio::test]
    async fn other_owners_tank_is_not_found() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let uri = format!("/tanks/{tank_id}");
        let (status, _) = call(&app, Method::GET, &uri, Some("user-2"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/tanks/{tank_id}/measurements/manual");
        let (status, _) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-2"),
            Some(json!({ "ammonia": 0.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn livestock_warning_is_a_successful_rejection() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Nano cube", 10.0).await;
        let uri = format!("/tanks/{tank_id}/livestock");
        let (status, body) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({ "speciesId": "oscar", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["added"], Value::Bool(false));
        assert!(!body["data"]["warnings"].as_array().expect("warnings").is_empty());

        let (status, body) = call(&app, Method::GET, &uri, Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().expect("items").is_empty());
    }

    #[tokio::test]
    async fn adding_livestock_updates_targets_and_stocking() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let uri = format!("/tanks/{tank_id}/livestock");
        let (status, body) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({ "speciesId": "neon-tetra", "quantity": 6 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["added"], Value::Bool(true));
        assert_eq!(body["data"]["stocking"]["status"], "green");
        assert_eq!(body["data"]["targets"]["temp_min"], json!(20.0));
        assert_eq!(body["data"]["targets"]["temp_max"], json!(26.0));

        let (_, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(body["data"]["targets"]["tempMin"], json!(20.0));
        assert_eq!(body["data"]["autoTargets"], Value::Bool(true));

        let (status, body) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({ "speciesId": "missing", "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

        let (status, _) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({ "speciesId": "guppy", "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn manual_targets_turn_off_auto_targets() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/tanks/{tank_id}/targets"),
            Some("user-1"),
            Some(json!({ "tempMin": 23.0, "tempMax": 25.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["autoTargets"], Value::Bool(false));
        assert_eq!(body["data"]["targets"]["tempMax"], json!(25.0));

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/tanks/{tank_id}/targets"),
            Some("user-1"),
            Some(json!({ "phMin": 8.0, "phMax": 7.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/tanks/{tank_id}/targets/auto"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tank"]["autoTargets"], Value::Bool(true));
    }

    #[tokio::test]
    async fn sensor_ingest_feeds_trend_analysis() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/devices",
            Some("user-1"),
            Some(json!({ "apiKey": "key-1", "tankId": tank_id, "powerWatts": 50.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(body["data"].get("apiKey").is_none());

        let (status, _) = call(
            &app,
            Method::POST,
            "/measurements/sensor",
            None,
            Some(json!({ "api_key": "unknown", "measurements": { "ph": 7.0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::POST,
            "/measurements/sensor",
            None,
            Some(json!({ "api_key": "key-1", "measurements": { "ph": 7.0, "temperature": 24.0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/measurements/sensor"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().expect("items").len(), 1);

        // 只有一条读数，不足以判断趋势
        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/trend?parameter=ph"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "Unknown");
        assert_eq!(body["data"]["rate_per_hour"], json!(0.0));
        assert!(body["data"].get("color").is_none());

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/trend?parameter=salinity"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/trend?parameter=ph&window=1000000000"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");
    }

    #[tokio::test]
    async fn generated_tasks_can_be_closed() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let generate = format!("/tanks/{tank_id}/tasks/generate");
        let (status, body) = call(&app, Method::POST, &generate, Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        // 开缸 40 天且从未清洗过滤器
        assert_eq!(body["data"]["tasks_created"], json!(1));

        let (_, body) = call(&app, Method::POST, &generate, Some("user-1"), None).await;
        assert_eq!(body["data"]["tasks_created"], json!(0));

        let (_, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/tasks"),
            Some("user-1"),
            None,
        )
        .await;
        let task_id = body["data"][0]["taskId"].as_str().expect("task id").to_string();
        assert_eq!(body["data"][0]["title"], "Filter rinse");

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/tanks/{tank_id}/tasks/{task_id}/close"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isActive"], Value::Bool(false));

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/tanks/{tank_id}/activity"),
            Some("user-1"),
            Some(json!({ "eventType": "filter_clean" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, Method::POST, &generate, Some("user-1"), None).await;
        assert_eq!(body["data"]["tasks_created"], json!(0));
    }

    #[tokio::test]
    async fn species_measures_must_be_positive() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/catalog/species",
            Some("user-1"),
            Some(json!({
                "kind": "fish",
                "name": "Ghost",
                "sizeCm": -30.0,
                "minWaterVolumeL": -50.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");

        for field in ["sizeCm", "minTankSizeL", "minWaterVolumeL"] {
            let (status, _) = call(
                &app,
                Method::PUT,
                "/catalog/species/neon-tetra",
                Some("user-1"),
                Some(json!({ field: 0.0 })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        }

        let (status, body) = call(
            &app,
            Method::POST,
            "/catalog/species",
            Some("user-1"),
            Some(json!({ "kind": "fish", "name": "Ghost", "sizeCm": 3.0, "minWaterVolumeL": 5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["sizeCm"], json!(3.0));
    }

    #[tokio::test]
    async fn cycle_reports_crash_from_manual_test() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/tanks/{tank_id}/measurements/manual"),
            Some("user-1"),
            // 客户端时间戳被忽略，以服务端时钟记账
            Some(json!({ "ammonia": 0.5, "nitrite": 0.0, "nitrate": 10.0, "tsMs": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tsMs"], json!(NOW_MS));

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/tanks/{tank_id}/cycle"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "CRASHED");
        assert_eq!(body["data"]["color"], "red");
    }

    #[tokio::test]
    async fn economy_uses_tank_devices() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 100.0).await;
        let (status, _) = call(
            &app,
            Method::POST,
            "/devices",
            Some("user-1"),
            Some(json!({ "apiKey": "key-1", "tankId": tank_id, "powerWatts": 100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/tanks/{tank_id}/economy");
        let (status, body) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({
                "electricity_price": 2.64,
                "water_price_m3": 30.0,
                "consumables": [
                    { "name": "Flake food", "price": 300.0, "frequency": "every_3_months" },
                    { "name": "Water conditioner", "price": 10.0, "frequency": "weekly" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["total_monthly_cost"], json!(260.65));
        assert_eq!(body["data"]["breakdown"]["electricity"]["kwh_month"], json!(43.2));
        assert_eq!(body["data"]["breakdown"]["consumables"]["items_count"], json!(2));

        let (status, _) = call(
            &app,
            Method::POST,
            &uri,
            Some("user-1"),
            Some(json!({
                "electricity_price": 2.64,
                "water_price_m3": 30.0,
                "consumables": [{ "name": "Food", "price": 1.0, "frequency": "daily" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_a_tank_detaches_its_device() {
        let app = app();
        let tank_id = create_tank(&app, "user-1", "Living room", 60.0).await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/devices",
            Some("user-1"),
            Some(json!({ "apiKey": "key-1", "tankId": tank_id })),
        )
        .await;
        let device_id = body["data"]["deviceId"].as_str().expect("device").to_string();

        let uri = format!("/tanks/{tank_id}");
        let (status, _) = call(&app, Method::DELETE, &uri, Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::GET, &uri, Some("user-1"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/devices/{device_id}/attach"),
            Some("user-1"),
            Some(json!({ "tankId": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["tankId"].is_null());
    }
}
