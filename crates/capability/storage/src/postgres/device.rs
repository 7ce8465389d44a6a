//! Postgres 设备存储实现
//!
//! 设计要点：
//! - 配置 JSON 以 text 列保存，读写时序列化
//! - `find_by_api_key` 不带用户过滤，仅供设备上报入口使用

use crate::error::StorageError;
use crate::models::DeviceRecord;
use crate::traits::DeviceStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::OwnerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const DEVICE_COLUMNS: &str = "device_id, owner_id, tank_id, api_key, name, power_watts, config";

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn device_from_row(row: &PgRow) -> Result<DeviceRecord, StorageError> {
    let config: String = row.try_get("config")?;
    let config = serde_json::from_str(&config)
        .map_err(|err| StorageError::new(format!("invalid device config: {err}")))?;
    Ok(DeviceRecord {
        device_id: row.try_get("device_id")?,
        owner_id: row.try_get("owner_id")?,
        tank_id: row.try_get("tank_id")?,
        api_key: row.try_get("api_key")?,
        name: row.try_get("name")?,
        power_watts: row.try_get("power_watts")?,
        config,
    })
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn find_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql =
            format!("select {DEVICE_COLUMNS} from devices where owner_id = $1 and device_id = $2");
        let row = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn find_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "select {DEVICE_COLUMNS} from devices where owner_id = $1 and tank_id = $2 \
             order by device_id limit 1"
        );
        let row = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn list_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "select {DEVICE_COLUMNS} from devices where owner_id = $1 and tank_id = $2 \
             order by device_id"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(device_from_row).collect()
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let sql = format!("select {DEVICE_COLUMNS} from devices where api_key = $1");
        let row = sqlx::query(&sql)
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
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
        sqlx::query(
            "insert into devices (device_id, owner_id, tank_id, api_key, name, power_watts, config) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.device_id)
        .bind(&record.owner_id)
        .bind(&record.tank_id)
        .bind(&record.api_key)
        .bind(&record.name)
        .bind(record.power_watts)
        .bind(record.config.to_string())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn attach_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        tank_id: Option<String>,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!(
            "update devices set tank_id = $1 where owner_id = $2 and device_id = $3 \
             returning {DEVICE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tank_id)
            .bind(&ctx.user_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn update_config(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        config: serde_json::Value,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!(
            "update devices set config = $1 where owner_id = $2 and device_id = $3 \
             returning {DEVICE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(config.to_string())
            .bind(&ctx.user_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn detach_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result =
            sqlx::query("update devices set tank_id = null where owner_id = $1 and tank_id = $2")
                .bind(&ctx.user_id)
                .bind(tank_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
