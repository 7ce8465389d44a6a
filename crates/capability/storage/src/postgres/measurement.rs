//! Postgres 测量存储实现

use crate::error::StorageError;
use crate::models::{ManualMeasurementRecord, SensorMeasurementRecord};
use crate::traits::MeasurementStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::{OwnerContext, SensorParameter};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgMeasurementStore {
    pub pool: PgPool,
}

impl PgMeasurementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sensor_from_row(row: &PgRow) -> Result<SensorMeasurementRecord, StorageError> {
    Ok(SensorMeasurementRecord {
        measurement_id: row.try_get("measurement_id")?,
        device_id: row.try_get("device_id")?,
        ts_ms: row.try_get("ts_ms")?,
        temperature: row.try_get("temperature")?,
        ph: row.try_get("ph")?,
        tds: row.try_get("tds")?,
        turbidity: row.try_get("turbidity")?,
    })
}

fn manual_from_row(row: &PgRow) -> Result<ManualMeasurementRecord, StorageError> {
    Ok(ManualMeasurementRecord {
        measurement_id: row.try_get("measurement_id")?,
        tank_id: row.try_get("tank_id")?,
        ts_ms: row.try_get("ts_ms")?,
        ammonia: row.try_get("ammonia")?,
        nitrite: row.try_get("nitrite")?,
        nitrate: row.try_get("nitrate")?,
        gh: row.try_get("gh")?,
        kh: row.try_get("kh")?,
        phosphate: row.try_get("phosphate")?,
    })
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl MeasurementStore for PgMeasurementStore {
    async fn append_sensor(&self, record: SensorMeasurementRecord) -> Result<(), StorageError> {
        sqlx::query(
            "insert into sensor_measurements \
             (measurement_id, device_id, ts_ms, temperature, ph, tds, turbidity) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.measurement_id)
        .bind(&record.device_id)
        .bind(record.ts_ms)
        .bind(record.temperature)
        .bind(record.ph)
        .bind(record.tds)
        .bind(record.turbidity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_manual(
        &self,
        ctx: &OwnerContext,
        record: ManualMeasurementRecord,
    ) -> Result<(), StorageError> {
        ensure_tank_scope(ctx, &record.tank_id)?;
        sqlx::query(
            "insert into manual_measurements \
             (measurement_id, tank_id, ts_ms, ammonia, nitrite, nitrate, gh, kh, phosphate) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&record.measurement_id)
        .bind(&record.tank_id)
        .bind(record.ts_ms)
        .bind(record.ammonia)
        .bind(record.nitrite)
        .bind(record.nitrate)
        .bind(record.gh)
        .bind(record.kh)
        .bind(record.phosphate)
        .execute(&self.pool)
        .await?;
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
        // 列名来自枚举，不来自用户输入
        let filter = match parameter {
            Some(parameter) => format!("and m.{} is not null", parameter.as_str()),
            None => String::new(),
        };
        let sql = format!(
            "select m.measurement_id, m.device_id, m.ts_ms, m.temperature, m.ph, m.tds, m.turbidity \
             from sensor_measurements m join devices d on d.device_id = m.device_id \
             where d.owner_id = $1 and m.device_id = $2 {filter} \
             order by m.ts_ms desc \
             limit $3"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(device_id)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(sensor_from_row).collect()
    }

    async fn recent_manual(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ManualMeasurementRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let rows = sqlx::query(
            "select measurement_id, tank_id, ts_ms, ammonia, nitrite, nitrate, gh, kh, phosphate \
             from manual_measurements where tank_id = $1 \
             order by ts_ms desc \
             limit $2",
        )
        .bind(tank_id)
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(manual_from_row).collect()
    }

    async fn delete_manual_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result = sqlx::query("delete from manual_measurements where tank_id = $1")
            .bind(tank_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
