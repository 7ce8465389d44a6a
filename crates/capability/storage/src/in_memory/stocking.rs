//! 放养关系内存存储实现

use crate::error::StorageError;
use crate::models::StockingRecord;
use crate::traits::StockingStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use std::sync::RwLock;

/// 放养关系内存存储
///
/// 按插入顺序保存，`list_stocking` 即为加入顺序。
pub struct InMemoryStockingStore {
    items: RwLock<Vec<StockingRecord>>,
}

impl InMemoryStockingStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStockingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StockingStore for InMemoryStockingStore {
    async fn list_stocking(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<StockingRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let items = self
            .items
            .read()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.tank_id == tank_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn add_stocking(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        species_id: &str,
        quantity: u32,
        added_at_ms: i64,
    ) -> Result<StockingRecord, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(existing) = items
            .iter_mut()
            .find(|item| item.tank_id == tank_id && item.species_id == species_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return Ok(existing.clone());
        }
        let record = StockingRecord {
            tank_id: tank_id.to_string(),
            species_id: species_id.to_string(),
            quantity,
            added_at_ms,
        };
        items.push(record.clone());
        Ok(record)
    }

    async fn delete_stocking_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items = self
            .items
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = items.len();
        items.retain(|item| item.tank_id != tank_id);
        Ok((before - items.len()) as u64)
    }
}
