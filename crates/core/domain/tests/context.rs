use domain::{Aggressiveness, OwnerContext, SensorParameter, WaterType, days_between, DAY_MS};

#[test]
fn owner_context_builds() {
    let ctx = OwnerContext::new("user-1", None);

    assert_eq!(ctx.user_id, "user-1");
    assert!(ctx.tank_scope.is_none());

    let scoped = ctx.scoped_to("tank-1");
    assert_eq!(scoped.user_id, "user-1");
    assert_eq!(scoped.tank_scope.as_deref(), Some("tank-1"));
}

#[test]
fn enums_parse_stored_text() {
    assert_eq!(WaterType::parse("Freshwater"), Some(WaterType::Freshwater));
    assert_eq!(
        Aggressiveness::parse("semi-aggressive"),
        Some(Aggressiveness::SemiAggressive)
    );
    assert_eq!(Aggressiveness::SemiAggressive.as_str(), "semi_aggressive");
    assert_eq!(SensorParameter::parse("pH"), Some(SensorParameter::Ph));
    assert!(SensorParameter::parse("salinity").is_none());
}

#[test]
fn days_between_floors_partial_days() {
    assert_eq!(days_between(0, DAY_MS * 3 - 1), 2);
    assert_eq!(days_between(0, DAY_MS * 3), 3);
}
