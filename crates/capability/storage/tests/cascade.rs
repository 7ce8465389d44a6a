use aqua_storage::{
    ActivityLogRecord, AquariumStores, DeviceRecord, TankRecord, TankTargets, TaskRecord,
};
use domain::{OwnerContext, WaterType};

fn tank(tank_id: &str) -> TankRecord {
    TankRecord {
        tank_id: tank_id.to_string(),
        owner_id: "alice".to_string(),
        name: format!("Tank {tank_id}"),
        volume_l: 120.0,
        length_cm: None,
        width_cm: None,
        height_cm: None,
        water_type: WaterType::Freshwater,
        start_date_ms: Some(0),
        description: None,
        has_plants: true,
        auto_targets: true,
        targets: TankTargets::default(),
    }
}

#[tokio::test]
async fn delete_tank_cascade_cleans_dependents_and_detaches_device() {
    let stores = AquariumStores::in_memory_demo();
    let ctx = OwnerContext::new("alice", None);
    stores.tanks.create_tank(&ctx, tank("tank-1")).await.expect("tank");
    stores.tanks.create_tank(&ctx, tank("tank-2")).await.expect("tank");
    stores
        .stocking
        .add_stocking(&ctx, "tank-1", "guppy", 4, 10)
        .await
        .expect("stocking");
    stores
        .stocking
        .add_stocking(&ctx, "tank-2", "guppy", 1, 10)
        .await
        .expect("stocking");
    stores
        .tasks
        .create_task(
            &ctx,
            TaskRecord {
                task_id: "task-1".to_string(),
                owner_id: "alice".to_string(),
                tank_id: "tank-1".to_string(),
                title: "Filter rinse".to_string(),
                description: None,
                start_date_ms: 0,
                recurrence: None,
                is_active: true,
            },
        )
        .await
        .expect("task");
    stores
        .activity
        .append_activity(
            &ctx,
            ActivityLogRecord {
                activity_id: "act-1".to_string(),
                tank_id: "tank-1".to_string(),
                ts_ms: 0,
                description: "rinsed".to_string(),
                event_type: "filter".to_string(),
            },
        )
        .await
        .expect("activity");
    stores
        .devices
        .create_device(
            &ctx,
            DeviceRecord {
                device_id: "device-1".to_string(),
                owner_id: "alice".to_string(),
                tank_id: Some("tank-1".to_string()),
                api_key: "key-1".to_string(),
                name: None,
                power_watts: Some(10.0),
                config: serde_json::json!({}),
            },
        )
        .await
        .expect("device");

    assert!(stores.delete_tank_cascade(&ctx, "tank-1").await.expect("delete"));

    assert!(stores.tanks.find_tank(&ctx, "tank-1").await.expect("find").is_none());
    assert!(stores.stocking.list_stocking(&ctx, "tank-1").await.expect("list").is_empty());
    assert!(stores.tasks.list_tasks(&ctx, "tank-1").await.expect("list").is_empty());
    assert!(stores.activity.list_activity(&ctx, "tank-1", 10).await.expect("list").is_empty());
    let device = stores
        .devices
        .find_device(&ctx, "device-1")
        .await
        .expect("find")
        .expect("device kept");
    assert_eq!(device.tank_id, None);

    assert_eq!(stores.stocking.list_stocking(&ctx, "tank-2").await.expect("list").len(), 1);
}

#[tokio::test]
async fn delete_tank_cascade_ignores_foreign_tank() {
    let stores = AquariumStores::in_memory();
    let alice = OwnerContext::new("alice", None);
    let bob = OwnerContext::new("bob", None);
    stores.tanks.create_tank(&alice, tank("tank-1")).await.expect("tank");
    stores
        .stocking
        .add_stocking(&alice, "tank-1", "guppy", 4, 10)
        .await
        .expect("stocking");

    assert!(!stores.delete_tank_cascade(&bob, "tank-1").await.expect("delete"));
    assert_eq!(stores.stocking.list_stocking(&alice, "tank-1").await.expect("list").len(), 1);
}
