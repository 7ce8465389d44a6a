//! 维护任务内存存储实现

use crate::error::StorageError;
use crate::models::TaskRecord;
use crate::traits::TaskStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use std::sync::RwLock;

pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<TaskRecord>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn owned_by(item: &TaskRecord, ctx: &OwnerContext, tank_id: &str) -> bool {
    item.owner_id == ctx.user_id && item.tank_id == tank_id
}

#[async_trait::async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let items = self
            .tasks
            .read()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| owned_by(item, ctx, tank_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn find_active_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        title: &str,
    ) -> Result<Option<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let item = self.tasks.read().ok().and_then(|items| {
            items
                .iter()
                .find(|item| owned_by(item, ctx, tank_id) && item.is_active && item.title == title)
                .cloned()
        });
        Ok(item)
    }

    async fn create_task(
        &self,
        ctx: &OwnerContext,
        record: TaskRecord,
    ) -> Result<TaskRecord, StorageError> {
        ensure_tank_scope(ctx, &record.tank_id)?;
        if record.owner_id != ctx.user_id {
            return Err(StorageError::scope("owner mismatch"));
        }
        let mut items = self
            .tasks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if items.iter().any(|item| item.task_id == record.task_id) {
            return Err(StorageError::conflict("task exists"));
        }
        items.push(record.clone());
        Ok(record)
    }

    async fn close_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items = self
            .tasks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(task) = items
            .iter_mut()
            .find(|item| owned_by(item, ctx, tank_id) && item.task_id == task_id)
        else {
            return Ok(None);
        };
        task.is_active = false;
        Ok(Some(task.clone()))
    }

    async fn delete_tasks_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let mut items = self
            .tasks
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let before = items.len();
        items.retain(|item| !owned_by(item, ctx, tank_id));
        Ok((before - items.len()) as u64)
    }
}
