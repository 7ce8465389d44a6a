//! 智能设备内存存储实现
//!
//! 功能：
//! - 设备注册、绑定水族箱
//! - 配置覆盖
//! - 按 api_key 查找（设备上报入口）

use crate::error::StorageError;
use crate::models::DeviceRecord;
use crate::traits::DeviceStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::OwnerContext;
use std::collections::HashMap;
use std::sync::RwLock;

/// 设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn find_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned())
            .filter(|item| item.owner_id == ctx.user_id);
        Ok(item)
    }

    async fn find_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        Ok(self.list_by_tank(ctx, tank_id).await?.into_iter().next())
    }

    async fn list_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items: Vec<DeviceRecord> = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| {
                        item.owner_id == ctx.user_id && item.tank_id.as_deref() == Some(tank_id)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(items)
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.values().find(|item| item.api_key == api_key).cloned());
        Ok(item)
    }

    async fn create_device(
        &self,
        ctx: &OwnerContext,
        record: DeviceRecord,
    ) -> Result<DeviceRecord, StorageError> {
        ensure_owner(ctx)?;
        if record.owner_id != ctx.user_id {
            return Err(StorageError::scope("owner mismatch"));
        }
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.device_id) {
            return Err(StorageError::conflict("device exists"));
        }
        if map.values().any(|item| item.api_key == record.api_key) {
            return Err(StorageError::conflict("api key already registered"));
        }
        map.insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    async fn attach_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        tank_id: Option<String>,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) if device.owner_id == ctx.user_id => device,
            _ => return Ok(None),
        };
        device.tank_id = tank_id;
        Ok(Some(device.clone()))
    }

    async fn update_config(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        config: serde_json::Value,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) if device.owner_id == ctx.user_id => device,
            _ => return Ok(None),
        };
        device.config = config;
        Ok(Some(device.clone()))
    }

    async fn detach_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut detached = 0;
        for device in map.values_mut() {
            if device.owner_id == ctx.user_id && device.tank_id.as_deref() == Some(tank_id) {
                device.tank_id = None;
                detached += 1;
            }
        }
        Ok(detached)
    }
}
