//! 物种目录内存存储实现
//!
//! `with_demo_catalog` 预置少量常见物种，供本地演示使用。

use crate::error::StorageError;
use crate::models::{SpeciesRecord, SpeciesUpdate};
use crate::traits::SpeciesStore;
use crate::validation::ensure_owner;
use domain::{Aggressiveness, InhabitantKind, OwnerContext};
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemorySpeciesStore {
    species: RwLock<HashMap<String, SpeciesRecord>>,
}

impl InMemorySpeciesStore {
    pub fn new() -> Self {
        Self {
            species: RwLock::new(HashMap::new()),
        }
    }

    /// 创建带演示目录的存储
    pub fn with_demo_catalog() -> Self {
        let map = demo_catalog()
            .into_iter()
            .map(|item| (item.species_id.clone(), item))
            .collect();
        Self {
            species: RwLock::new(map),
        }
    }
}

impl Default for InMemorySpeciesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_species(
    species_id: &str,
    kind: InhabitantKind,
    name: &str,
    latin_name: &str,
    size_cm: f64,
    aggressiveness: Aggressiveness,
    feeding_frequency: &str,
    min_water_volume_l: f64,
    temp: (f64, f64),
    ph: (f64, f64),
) -> SpeciesRecord {
    SpeciesRecord {
        species_id: species_id.to_string(),
        kind,
        name: name.to_string(),
        latin_name: Some(latin_name.to_string()),
        size_cm: Some(size_cm),
        aggressiveness: Some(aggressiveness),
        feeding_frequency: Some(feeding_frequency.to_string()),
        min_tank_size_l: Some(min_water_volume_l),
        min_water_volume_l: Some(min_water_volume_l),
        temp_min: Some(temp.0),
        temp_max: Some(temp.1),
        ph_min: Some(ph.0),
        ph_max: Some(ph.1),
    }
}

fn demo_catalog() -> Vec<SpeciesRecord> {
    use Aggressiveness::{Aggressive, Peaceful, SemiAggressive};
    use InhabitantKind::{Fish, Plant, Shrimp, Snail};
    vec![
        demo_species(
            "neon-tetra",
            Fish,
            "Neon Tetra",
            "Paracheirodon innesi",
            3.5,
            Peaceful,
            "once a day",
            5.0,
            (20.0, 26.0),
            (6.0, 7.0),
        ),
        demo_species(
            "guppy",
            Fish,
            "Guppy",
            "Poecilia reticulata",
            5.0,
            Peaceful,
            "twice a day",
            5.0,
            (22.0, 28.0),
            (6.8, 7.8),
        ),
        demo_species(
            "betta",
            Fish,
            "Betta",
            "Betta splendens",
            6.5,
            SemiAggressive,
            "once a day",
            20.0,
            (24.0, 30.0),
            (6.0, 7.5),
        ),
        demo_species(
            "oscar",
            Fish,
            "Oscar",
            "Astronotus ocellatus",
            30.0,
            Aggressive,
            "once a day",
            150.0,
            (22.0, 28.0),
            (6.0, 8.0),
        ),
        demo_species(
            "goldfish",
            Fish,
            "Goldfish",
            "Carassius auratus",
            15.0,
            Peaceful,
            "twice a day",
            40.0,
            (10.0, 20.0),
            (7.0, 8.0),
        ),
        demo_species(
            "cherry-shrimp",
            Shrimp,
            "Cherry Shrimp",
            "Neocaridina davidi",
            2.5,
            Peaceful,
            "once a day",
            2.0,
            (18.0, 28.0),
            (6.5, 8.0),
        ),
        demo_species(
            "nerite-snail",
            Snail,
            "Nerite Snail",
            "Neritina natalensis",
            2.5,
            Peaceful,
            "once a day",
            5.0,
            (22.0, 28.0),
            (7.0, 8.5),
        ),
        demo_species(
            "java-fern",
            Plant,
            "Java Fern",
            "Microsorum pteropus",
            0.0,
            Peaceful,
            "",
            0.0,
            (18.0, 30.0),
            (6.0, 7.5),
        ),
    ]
}

#[async_trait::async_trait]
impl SpeciesStore for InMemorySpeciesStore {
    async fn list_species(&self, ctx: &OwnerContext) -> Result<Vec<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let mut items: Vec<SpeciesRecord> = self
            .species
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
    ) -> Result<Option<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let item = self
            .species
            .read()
            .ok()
            .and_then(|map| map.get(species_id).cloned());
        Ok(item)
    }

    async fn create_species(
        &self,
        ctx: &OwnerContext,
        record: SpeciesRecord,
    ) -> Result<SpeciesRecord, StorageError> {
        ensure_owner(ctx)?;
        let mut map = self
            .species
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.species_id) || map.values().any(|item| item.name == record.name)
        {
            return Err(StorageError::conflict("species exists"));
        }
        map.insert(record.species_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
        update: SpeciesUpdate,
    ) -> Result<Option<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let mut map = self
            .species
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(name) = update.name.as_deref() {
            if map
                .values()
                .any(|item| item.name == name && item.species_id != species_id)
            {
                return Err(StorageError::conflict("species exists"));
            }
        }
        let Some(species) = map.get_mut(species_id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            species.name = name;
        }
        if let Some(latin_name) = update.latin_name {
            species.latin_name = Some(latin_name);
        }
        if let Some(size_cm) = update.size_cm {
            species.size_cm = Some(size_cm);
        }
        if let Some(aggressiveness) = update.aggressiveness {
            species.aggressiveness = Some(aggressiveness);
        }
        if let Some(feeding_frequency) = update.feeding_frequency {
            species.feeding_frequency = Some(feeding_frequency);
        }
        if let Some(min_tank_size_l) = update.min_tank_size_l {
            species.min_tank_size_l = Some(min_tank_size_l);
        }
        if let Some(min_water_volume_l) = update.min_water_volume_l {
            species.min_water_volume_l = Some(min_water_volume_l);
        }
        if let Some(temp_min) = update.temp_min {
            species.temp_min = Some(temp_min);
        }
        if let Some(temp_max) = update.temp_max {
            species.temp_max = Some(temp_max);
        }
        if let Some(ph_min) = update.ph_min {
            species.ph_min = Some(ph_min);
        }
        if let Some(ph_max) = update.ph_max {
            species.ph_max = Some(ph_max);
        }
        Ok(Some(species.clone()))
    }
}
