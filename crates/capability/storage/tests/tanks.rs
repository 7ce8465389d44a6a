use aqua_storage::{
    InMemoryTankStore, StorageErrorKind, TankRecord, TankStore, TankTargets, TankTargetsUpdate,
    TankUpdate,
};
use domain::{OwnerContext, WaterType};

fn tank(tank_id: &str, owner_id: &str, name: &str) -> TankRecord {
    TankRecord {
        tank_id: tank_id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        volume_l: 100.0,
        length_cm: Some(80),
        width_cm: Some(35),
        height_cm: Some(40),
        water_type: WaterType::Freshwater,
        start_date_ms: None,
        description: None,
        has_plants: false,
        auto_targets: true,
        targets: TankTargets::default(),
    }
}

#[tokio::test]
async fn tanks_are_isolated_by_owner() {
    let store = InMemoryTankStore::new();
    let alice = OwnerContext::new("alice", None);
    let bob = OwnerContext::new("bob", None);
    store
        .create_tank(&alice, tank("tank-1", "alice", "Living room"))
        .await
        .expect("create");

    assert_eq!(store.list_tanks(&alice).await.expect("list").len(), 1);
    assert!(store.list_tanks(&bob).await.expect("list").is_empty());
    assert!(store.find_tank(&bob, "tank-1").await.expect("find").is_none());
    assert!(!store.delete_tank(&bob, "tank-1").await.expect("delete"));
}

#[tokio::test]
async fn duplicate_name_is_case_insensitive_per_owner() {
    let store = InMemoryTankStore::new();
    let alice = OwnerContext::new("alice", None);
    let bob = OwnerContext::new("bob", None);
    store
        .create_tank(&alice, tank("tank-1", "alice", "Reef"))
        .await
        .expect("create");

    let err = store
        .create_tank(&alice, tank("tank-2", "alice", "REEF"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.kind(), StorageErrorKind::Conflict);

    store
        .create_tank(&bob, tank("tank-3", "bob", "reef"))
        .await
        .expect("other owner may reuse the name");
}

#[tokio::test]
async fn update_keeps_unset_fields() {
    let store = InMemoryTankStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .create_tank(&ctx, tank("tank-1", "alice", "Nano"))
        .await
        .expect("create");

    let updated = store
        .update_tank(
            &ctx,
            "tank-1",
            TankUpdate {
                volume_l: Some(60.0),
                has_plants: Some(true),
                ..TankUpdate::default()
            },
        )
        .await
        .expect("update")
        .expect("found");
    assert_eq!(updated.name, "Nano");
    assert_eq!(updated.volume_l, 60.0);
    assert!(updated.has_plants);
    assert_eq!(updated.length_cm, Some(80));
}

#[tokio::test]
async fn update_targets_writes_flag_and_ranges() {
    let store = InMemoryTankStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .create_tank(&ctx, tank("tank-1", "alice", "Nano"))
        .await
        .expect("create");

    let updated = store
        .update_targets(
            &ctx,
            "tank-1",
            TankTargetsUpdate {
                auto_targets: false,
                temp_min: Some(24.0),
                temp_max: Some(26.0),
                nitrate_max: Some(20.0),
                ..TankTargetsUpdate::default()
            },
        )
        .await
        .expect("update")
        .expect("found");
    assert!(!updated.auto_targets);
    assert_eq!(updated.targets.temp_range(), Some((24.0, 26.0)));
    assert_eq!(updated.targets.ph_range(), None);
    assert_eq!(updated.targets.nitrate_max, Some(20.0));
}

#[tokio::test]
async fn tank_scope_rejects_other_tanks() {
    let store = InMemoryTankStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .create_tank(&ctx, tank("tank-1", "alice", "Nano"))
        .await
        .expect("create");

    let scoped = ctx.scoped_to("tank-2");
    let err = store
        .find_tank(&scoped, "tank-1")
        .await
        .expect_err("scope mismatch");
    assert_eq!(err.kind(), StorageErrorKind::Scope);
}
