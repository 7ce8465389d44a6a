//! 活动日志内存存储实现

use crate::error::StorageError;
use crate::models::ActivityLogRecord;
use crate::traits::ActivityLogStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use std::sync::RwLock;

pub struct InMemoryActivityLogStore {
    entries: RwLock<Vec<ActivityLogRecord>>,
}

impl InMemoryActivityLogStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    fn newest_first(
        &self,
        tank_id: &str,
        keep: impl Fn(&ActivityLogRecord) -> bool,
    ) -> Result<Vec<ActivityLogRecord>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut selected: Vec<ActivityLogRecord> = entries
            .iter()
            .filter(|item| item.tank_id == tank_id && keep(item))
            .cloned()
            .collect();
        selected.reverse();
        selected.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        Ok(selected)
    }
}

impl Default for InMemoryActivityLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ActivityLogStore for InMemoryActivityLogStore {
    async fn append_activity(
        &self,
        ctx: &OwnerContext,
        record: ActivityLogRecord,
    ) -> Result<(), StorageError> {
        ensure_tank_scope(ctx, &record.tank_id)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        entries.push(record);
        Ok(())
    }

    async fn list_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items = self.newest_first(tank_id, |_| true)?;
        items.truncate(limit);
        Ok(items)
    }

    async fn latest_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        keyword: &str,
    ) -> Result<Option<ActivityLogRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let keyword = keyword.to_lowercase();
        let items = self.newest_first(tank_id, |item| {
            item.event_type.to_lowercase().contains(&keyword)
        })?;
        Ok(items.into_iter().next())
    }

    async fn delete_activity_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = entries.len();
        entries.retain(|item| item.tank_id != tank_id);
        Ok((before - entries.len()) as u64)
    }
}
