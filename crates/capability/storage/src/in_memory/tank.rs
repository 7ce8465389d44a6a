//! 水族箱内存存储实现
//!
//! 功能：
//! - 水族箱 CRUD 操作
//! - 所有者隔离
//! - 同一用户下名称忽略大小写唯一

use crate::error::StorageError;
use crate::models::{TankRecord, TankTargetsUpdate, TankUpdate};
use crate::traits::TankStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::OwnerContext;
use std::collections::HashMap;
use std::sync::RwLock;

/// 水族箱内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryTankStore {
    tanks: RwLock<HashMap<String, TankRecord>>,
}

impl InMemoryTankStore {
    pub fn new() -> Self {
        Self {
            tanks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTankStore {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(map: &HashMap<String, TankRecord>, owner_id: &str, name: &str, skip: &str) -> bool {
    map.values().any(|item| {
        item.owner_id == owner_id
            && item.tank_id != skip
            && item.name.to_lowercase() == name.to_lowercase()
    })
}

#[async_trait::async_trait]
impl TankStore for InMemoryTankStore {
    async fn list_tanks(&self, ctx: &OwnerContext) -> Result<Vec<TankRecord>, StorageError> {
        ensure_owner(ctx)?;
        let mut items: Vec<TankRecord> = self
            .tanks
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.owner_id == ctx.user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let item = self
            .tanks
            .read()
            .ok()
            .and_then(|map| map.get(tank_id).cloned())
            .filter(|item| item.owner_id == ctx.user_id);
        Ok(item)
    }

    async fn create_tank(
        &self,
        ctx: &OwnerContext,
        record: TankRecord,
    ) -> Result<TankRecord, StorageError> {
        ensure_owner(ctx)?;
        if record.owner_id != ctx.user_id {
            return Err(StorageError::scope("owner mismatch"));
        }
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.tank_id) {
            return Err(StorageError::conflict("tank exists"));
        }
        if name_taken(&map, &record.owner_id, &record.name, &record.tank_id) {
            return Err(StorageError::conflict("tank name already used"));
        }
        map.insert(record.tank_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankUpdate,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get(tank_id) {
            Some(item) if item.owner_id == ctx.user_id => {}
            _ => return Ok(None),
        }
        if let Some(name) = update.name.as_deref() {
            if name_taken(&map, &ctx.user_id, name, tank_id) {
                return Err(StorageError::conflict("tank name already used"));
            }
        }
        let Some(tank) = map.get_mut(tank_id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            tank.name = name;
        }
        if let Some(volume_l) = update.volume_l {
            tank.volume_l = volume_l;
        }
        if let Some(length_cm) = update.length_cm {
            tank.length_cm = Some(length_cm);
        }
        if let Some(width_cm) = update.width_cm {
            tank.width_cm = Some(width_cm);
        }
        if let Some(height_cm) = update.height_cm {
            tank.height_cm = Some(height_cm);
        }
        if let Some(water_type) = update.water_type {
            tank.water_type = water_type;
        }
        if let Some(start_date_ms) = update.start_date_ms {
            tank.start_date_ms = Some(start_date_ms);
        }
        if let Some(description) = update.description {
            tank.description = Some(description);
        }
        if let Some(has_plants) = update.has_plants {
            tank.has_plants = has_plants;
        }
        Ok(Some(tank.clone()))
    }

    async fn update_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankTargetsUpdate,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let tank = match map.get_mut(tank_id) {
            Some(tank) if tank.owner_id == ctx.user_id => tank,
            _ => return Ok(None),
        };
        update.apply_to(&mut tank.targets);
        tank.auto_targets = update.auto_targets;
        Ok(Some(tank.clone()))
    }

    async fn delete_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<bool, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut map = self
            .tanks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get(tank_id) {
            Some(item) if item.owner_id == ctx.user_id => {
                map.remove(tank_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
