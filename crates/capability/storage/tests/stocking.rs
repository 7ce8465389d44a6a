use aqua_storage::{InMemorySpeciesStore, InMemoryStockingStore, SpeciesStore, StockingStore};
use domain::{InhabitantKind, OwnerContext};

#[tokio::test]
async fn adding_same_species_accumulates_quantity() {
    let store = InMemoryStockingStore::new();
    let ctx = OwnerContext::new("alice", None);

    store
        .add_stocking(&ctx, "tank-1", "guppy", 3, 1_000)
        .await
        .expect("add");
    store
        .add_stocking(&ctx, "tank-1", "neon-tetra", 6, 2_000)
        .await
        .expect("add");
    let merged = store
        .add_stocking(&ctx, "tank-1", "guppy", 2, 3_000)
        .await
        .expect("add");

    assert_eq!(merged.quantity, 5);
    assert_eq!(merged.added_at_ms, 1_000);

    let items = store.list_stocking(&ctx, "tank-1").await.expect("list");
    let order: Vec<&str> = items.iter().map(|item| item.species_id.as_str()).collect();
    assert_eq!(order, vec!["guppy", "neon-tetra"]);
}

#[tokio::test]
async fn delete_for_tank_leaves_other_tanks() {
    let store = InMemoryStockingStore::new();
    let ctx = OwnerContext::new("alice", None);
    store
        .add_stocking(&ctx, "tank-1", "guppy", 3, 1_000)
        .await
        .expect("add");
    store
        .add_stocking(&ctx, "tank-2", "guppy", 1, 1_000)
        .await
        .expect("add");

    assert_eq!(
        store
            .delete_stocking_for_tank(&ctx, "tank-1")
            .await
            .expect("delete"),
        1
    );
    assert!(store.list_stocking(&ctx, "tank-1").await.expect("list").is_empty());
    assert_eq!(store.list_stocking(&ctx, "tank-2").await.expect("list").len(), 1);
}

#[tokio::test]
async fn demo_catalog_is_seeded() {
    let store = InMemorySpeciesStore::with_demo_catalog();
    let ctx = OwnerContext::new("alice", None);
    let guppy = store
        .find_species(&ctx, "guppy")
        .await
        .expect("find")
        .expect("guppy");
    assert_eq!(guppy.kind, InhabitantKind::Fish);
    assert_eq!(guppy.feeding_frequency.as_deref(), Some("twice a day"));
    assert!(store.list_species(&ctx).await.expect("list").len() >= 5);
}
