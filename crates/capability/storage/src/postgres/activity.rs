//! Postgres 活动日志存储实现

use crate::error::StorageError;
use crate::models::ActivityLogRecord;
use crate::traits::ActivityLogStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgActivityLogStore {
    pub pool: PgPool,
}

impl PgActivityLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn activity_from_row(row: &PgRow) -> Result<ActivityLogRecord, StorageError> {
    Ok(ActivityLogRecord {
        activity_id: row.try_get("activity_id")?,
        tank_id: row.try_get("tank_id")?,
        ts_ms: row.try_get("ts_ms")?,
        description: row.try_get("description")?,
        event_type: row.try_get("event_type")?,
    })
}

#[async_trait::async_trait]
impl ActivityLogStore for PgActivityLogStore {
    async fn append_activity(
        &self,
        ctx: &OwnerContext,
        record: ActivityLogRecord,
    ) -> Result<(), StorageError> {
        ensure_tank_scope(ctx, &record.tank_id)?;
        sqlx::query(
            "insert into activity_log (activity_id, tank_id, ts_ms, description, event_type) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.activity_id)
        .bind(&record.tank_id)
        .bind(record.ts_ms)
        .bind(&record.description)
        .bind(&record.event_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let rows = sqlx::query(
            "select activity_id, tank_id, ts_ms, description, event_type \
             from activity_log where tank_id = $1 \
             order by ts_ms desc limit $2",
        )
        .bind(tank_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(activity_from_row).collect()
    }

    async fn latest_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        keyword: &str,
    ) -> Result<Option<ActivityLogRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let row = sqlx::query(
            "select activity_id, tank_id, ts_ms, description, event_type \
             from activity_log \
             where tank_id = $1 and strpos(lower(event_type), lower($2)) > 0 \
             order by ts_ms desc limit 1",
        )
        .bind(tank_id)
        .bind(keyword)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(activity_from_row).transpose()
    }

    async fn delete_activity_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result = sqlx::query("delete from activity_log where tank_id = $1")
            .bind(tank_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
