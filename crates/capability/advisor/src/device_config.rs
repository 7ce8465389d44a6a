//! 智能设备配置推导。
//!
//! `feeding`、`lighting`、`heating` 三个子块每次整体覆盖，
//! 其余已有键原样保留，并写入 `last_updated_ms`。

use crate::{AdvisorRules, StockedSpecies};
use aqua_storage::TankRecord;
use serde_json::{Map, Value, json};

/// 计算喂食间隔（小时）：取所有物种中最频繁的一档，没有声明时用每日一次。
pub fn feeding_interval_hours(stocking: &[StockedSpecies], rules: &AdvisorRules) -> u32 {
    stocking
        .iter()
        .filter_map(|item| item.species.feeding_frequency.as_deref())
        .filter_map(|frequency| interval_for(frequency, rules))
        .min()
        .unwrap_or(rules.once_daily_interval_hours)
}

fn interval_for(frequency: &str, rules: &AdvisorRules) -> Option<u32> {
    let frequency = frequency.to_lowercase();
    if rules
        .twice_daily_markers
        .iter()
        .any(|marker| frequency.contains(*marker))
    {
        return Some(rules.twice_daily_interval_hours);
    }
    if rules
        .once_daily_markers
        .iter()
        .any(|marker| frequency.contains(*marker))
    {
        return Some(rules.once_daily_interval_hours);
    }
    None
}

/// 在已有配置上合并新的喂食、照明与加热子块。
pub fn build_device_config(
    tank: &TankRecord,
    stocking: &[StockedSpecies],
    existing: &Value,
    now_ms: i64,
    rules: &AdvisorRules,
) -> Value {
    let mut config = match existing {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    config.insert(
        "feeding".to_string(),
        json!({
            "enabled": !stocking.is_empty(),
            "interval_hours": feeding_interval_hours(stocking, rules),
        }),
    );

    let lighting = if tank.has_plants {
        json!({
            "enabled": true,
            "on_hour": rules.light_on_hour,
            "off_hour": rules.light_off_hour,
            "duration_hours": rules.light_off_hour.saturating_sub(rules.light_on_hour),
        })
    } else {
        json!({ "enabled": false })
    };
    config.insert("lighting".to_string(), lighting);

    let heating = match tank.targets.temp_range() {
        Some((min_temp, max_temp)) => json!({
            "enabled": true,
            "min_temp": min_temp,
            "max_temp": max_temp,
        }),
        None => json!({ "enabled": false }),
    };
    config.insert("heating".to_string(), heating);

    config.insert("last_updated_ms".to_string(), json!(now_ms));
    Value::Object(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::tests::{species, tank};

    fn feeding(frequency: Option<&str>) -> StockedSpecies {
        let mut record = species("Fish");
        record.feeding_frequency = frequency.map(str::to_string);
        StockedSpecies {
            species: record,
            quantity: 1,
        }
    }

    #[test]
    fn most_frequent_feeding_wins() {
        let rules = AdvisorRules::default();
        let stocking = vec![feeding(Some("Once a day")), feeding(Some("Twice a day"))];
        assert_eq!(feeding_interval_hours(&stocking, &rules), 12);
        assert_eq!(feeding_interval_hours(&[feeding(Some("DAILY"))], &rules), 24);
        assert_eq!(feeding_interval_hours(&[feeding(Some("2 рази на день"))], &rules), 12);
    }

    #[test]
    fn unknown_or_missing_frequency_defaults_to_daily() {
        let rules = AdvisorRules::default();
        assert_eq!(feeding_interval_hours(&[], &rules), 24);
        let stocking = vec![feeding(None), feeding(Some("every other day"))];
        assert_eq!(feeding_interval_hours(&stocking, &rules), 24);
    }

    #[test]
    fn lighting_follows_plants_and_heating_follows_targets() {
        let rules = AdvisorRules::default();
        let mut planted = tank(80.0);
        planted.has_plants = true;
        planted.targets.temp_min = Some(23.0);
        planted.targets.temp_max = Some(26.0);

        let config = build_device_config(&planted, &[feeding(None)], &Value::Null, 1_000, &rules);
        assert_eq!(config["feeding"]["enabled"], json!(true));
        assert_eq!(config["lighting"]["on_hour"], json!(10));
        assert_eq!(config["lighting"]["off_hour"], json!(18));
        assert_eq!(config["lighting"]["duration_hours"], json!(8));
        assert_eq!(config["heating"]["min_temp"], json!(23.0));
        assert_eq!(config["heating"]["max_temp"], json!(26.0));
        assert_eq!(config["last_updated_ms"], json!(1_000));

        let bare = tank(80.0);
        let config = build_device_config(&bare, &[], &Value::Null, 1_000, &rules);
        assert_eq!(config["feeding"]["enabled"], json!(false));
        assert_eq!(config["lighting"], json!({ "enabled": false }));
        assert_eq!(config["heating"], json!({ "enabled": false }));
    }

    #[test]
    fn unrelated_keys_are_preserved_and_blocks_overwritten() {
        let existing = json!({
            "wifi": { "ssid": "tank-net" },
            "lighting": { "enabled": true, "on_hour": 6, "color": "blue" },
        });
        let config =
            build_device_config(&tank(80.0), &[], &existing, 5, &AdvisorRules::default());
        assert_eq!(config["wifi"]["ssid"], json!("tank-net"));
        assert_eq!(config["lighting"], json!({ "enabled": false }));
    }
}
