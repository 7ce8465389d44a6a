use aqua_storage::{
    ActivityLogRecord, ActivityLogStore, InMemoryActivityLogStore, InMemoryMeasurementStore,
    ManualMeasurementRecord, MeasurementStore, SensorMeasurementRecord,
};
use domain::{OwnerContext, SensorParameter};

fn reading(id: &str, ts_ms: i64, temperature: Option<f64>, ph: Option<f64>) -> SensorMeasurementRecord {
    SensorMeasurementRecord {
        measurement_id: id.to_string(),
        device_id: "device-1".to_string(),
        ts_ms,
        temperature,
        ph,
        tds: None,
        turbidity: None,
    }
}

#[tokio::test]
async fn recent_sensor_is_newest_first_and_limited() {
    let store = InMemoryMeasurementStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .append_sensor(reading("m-2", 2_000, Some(25.0), None))
        .await
        .expect("append");
    store
        .append_sensor(reading("m-1", 1_000, Some(24.0), None))
        .await
        .expect("append");
    store
        .append_sensor(reading("m-3", 3_000, Some(26.0), None))
        .await
        .expect("append");

    let items = store
        .recent_sensor(&ctx, "device-1", None, 2)
        .await
        .expect("query");
    let ids: Vec<&str> = items.iter().map(|m| m.measurement_id.as_str()).collect();
    assert_eq!(ids, vec!["m-3", "m-2"]);
    assert_eq!(store.sensor_len(), 3);
}

#[tokio::test]
async fn recent_sensor_filters_missing_parameter() {
    let store = InMemoryMeasurementStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .append_sensor(reading("m-1", 1_000, Some(24.0), Some(7.0)))
        .await
        .expect("append");
    store
        .append_sensor(reading("m-2", 2_000, Some(25.0), None))
        .await
        .expect("append");

    let items = store
        .recent_sensor(&ctx, "device-1", Some(SensorParameter::Ph), 10)
        .await
        .expect("query");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].measurement_id, "m-1");

    let other = store
        .recent_sensor(&ctx, "device-2", None, 10)
        .await
        .expect("query");
    assert!(other.is_empty());
}

#[tokio::test]
async fn recent_manual_is_per_tank() {
    let store = InMemoryMeasurementStore::new();
    let ctx = OwnerContext::new("alice", None);
    for (id, tank_id, ts_ms) in [("a", "tank-1", 1_000), ("b", "tank-1", 5_000), ("c", "tank-2", 9_000)] {
        store
            .append_manual(
                &ctx,
                ManualMeasurementRecord {
                    measurement_id: id.to_string(),
                    tank_id: tank_id.to_string(),
                    ts_ms,
                    ammonia: Some(0.0),
                    nitrite: Some(0.0),
                    nitrate: Some(10.0),
                    gh: None,
                    kh: None,
                    phosphate: None,
                },
            )
            .await
            .expect("append");
    }
    let items = store.recent_manual(&ctx, "tank-1", 1).await.expect("query");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].measurement_id, "b");
}

#[tokio::test]
async fn latest_activity_matches_keyword_case_insensitively() {
    let store = InMemoryActivityLogStore::new();
    let ctx = OwnerContext::new("alice", None);
    for (id, ts_ms, event_type) in [
        ("a-1", 1_000, "Water Change"),
        ("a-2", 2_000, "feeding"),
        ("a-3", 3_000, "partial water change"),
    ] {
        store
            .append_activity(
                &ctx,
                ActivityLogRecord {
                    activity_id: id.to_string(),
                    tank_id: "tank-1".to_string(),
                    ts_ms,
                    description: String::new(),
                    event_type: event_type.to_string(),
                },
            )
            .await
            .expect("append");
    }

    let latest = store
        .latest_activity(&ctx, "tank-1", "WATER")
        .await
        .expect("query")
        .expect("found");
    assert_eq!(latest.activity_id, "a-3");
    assert!(
        store
            .latest_activity(&ctx, "tank-1", "filter")
            .await
            .expect("query")
            .is_none()
    );
    assert_eq!(
        store.list_activity(&ctx, "tank-1", 10).await.expect("list")[0].activity_id,
        "a-3"
    );
}
