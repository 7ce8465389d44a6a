//! 测量内存存储实现
//!
//! 传感器读数按设备归档，手动读数按水族箱归档；两者均只追加。

use crate::error::StorageError;
use crate::models::{ManualMeasurementRecord, SensorMeasurementRecord};
use crate::traits::MeasurementStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::{OwnerContext, SensorParameter};
use std::sync::RwLock;

pub struct InMemoryMeasurementStore {
    sensor: RwLock<Vec<SensorMeasurementRecord>>,
    manual: RwLock<Vec<ManualMeasurementRecord>>,
}

impl InMemoryMeasurementStore {
    pub fn new() -> Self {
        Self {
            sensor: RwLock::new(Vec::new()),
            manual: RwLock::new(Vec::new()),
        }
    }

    /// 当前累计的传感器读数数量（用于测试）
    pub fn sensor_len(&self) -> usize {
        self.sensor.read().map(|v| v.len()).unwrap_or(0)
    }
}

impl Default for InMemoryMeasurementStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MeasurementStore for InMemoryMeasurementStore {
    async fn append_sensor(&self, record: SensorMeasurementRecord) -> Result<(), StorageError> {
        let mut values = self
            .sensor
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        values.push(record);
        Ok(())
    }

    async fn append_manual(
        &self,
        ctx: &OwnerContext,
        record: ManualMeasurementRecord,
    ) -> Result<(), StorageError> {
        ensure_tank_scope(ctx, &record.tank_id)?;
        let mut values = self
            .manual
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        values.push(record);
        Ok(())
    }

    async fn recent_sensor(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        parameter: Option<SensorParameter>,
        limit: usize,
    ) -> Result<Vec<SensorMeasurementRecord>, StorageError> {
        ensure_owner(ctx)?;
        let values = self
            .sensor
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut selected: Vec<SensorMeasurementRecord> = values
            .iter()
            .filter(|item| item.device_id == device_id)
            .filter(|item| parameter.is_none_or(|p| item.value_of(p).is_some()))
            .cloned()
            .collect();
        // 稳定排序：同一时间戳保持追加顺序的逆序
        selected.reverse();
        selected.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        selected.truncate(limit);
        Ok(selected)
    }

    async fn recent_manual(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ManualMeasurementRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let values = self
            .manual
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut selected: Vec<ManualMeasurementRecord> = values
            .iter()
            .filter(|item| item.tank_id == tank_id)
            .cloned()
            .collect();
        selected.reverse();
        selected.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        selected.truncate(limit);
        Ok(selected)
    }

    async fn delete_manual_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut values = self
            .manual
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = values.len();
        values.retain(|item| item.tank_id != tank_id);
        Ok((before - values.len()) as u64)
    }
}
