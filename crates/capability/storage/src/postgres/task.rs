//! Postgres 维护任务存储实现

use crate::error::StorageError;
use crate::models::TaskRecord;
use crate::traits::TaskStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const TASK_COLUMNS: &str =
    "task_id, owner_id, tank_id, title, description, start_date_ms, recurrence, is_active";

pub struct PgTaskStore {
    pub pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Result<TaskRecord, StorageError> {
    Ok(TaskRecord {
        task_id: row.try_get("task_id")?,
        owner_id: row.try_get("owner_id")?,
        tank_id: row.try_get("tank_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        start_date_ms: row.try_get("start_date_ms")?,
        recurrence: row.try_get("recurrence")?,
        is_active: row.try_get("is_active")?,
    })
}

#[async_trait::async_trait]
impl TaskStore for PgTaskStore {
    async fn list_tasks(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "select {TASK_COLUMNS} from maintenance_tasks \
             where owner_id = $1 and tank_id = $2 order by start_date_ms"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn find_active_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        title: &str,
    ) -> Result<Option<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "select {TASK_COLUMNS} from maintenance_tasks \
             where owner_id = $1 and tank_id = $2 and title = $3 and is_active \
             limit 1"
        );
        let row = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
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
        sqlx::query(
            "insert into maintenance_tasks \
             (task_id, owner_id, tank_id, title, description, start_date_ms, recurrence, is_active) \
             values ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&record.task_id)
        .bind(&record.owner_id)
        .bind(&record.tank_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.start_date_ms)
        .bind(&record.recurrence)
        .bind(record.is_active)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn close_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "update maintenance_tasks set is_active = false \
             where owner_id = $1 and tank_id = $2 and task_id = $3 \
             returning {TASK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn delete_tasks_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result =
            sqlx::query("delete from maintenance_tasks where owner_id = $1 and tank_id = $2")
                .bind(&ctx.user_id)
                .bind(tank_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
