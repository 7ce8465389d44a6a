//! Postgres 水族箱存储实现
//!
//! 设计要点：
//! - 所有查询带 `owner_id` 过滤
//! - 名称唯一性由 `(owner_id, lower(name))` 唯一索引保证，冲突映射为 Conflict

use crate::error::StorageError;
use crate::models::{TankRecord, TankTargets, TankTargetsUpdate, TankUpdate};
use crate::traits::TankStore;
use crate::validation::{ensure_owner, ensure_tank_scope};
use domain::{OwnerContext, WaterType};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const TANK_COLUMNS: &str = "tank_id, owner_id, name, volume_l, length_cm, width_cm, height_cm, \
     water_type, start_date_ms, description, has_plants, auto_targets, \
     temp_min, temp_max, ph_min, ph_max, tds_min, tds_max, gh_min, gh_max, kh_min, kh_max, \
     ammonia_max, nitrite_max, nitrate_max, phosphate_max";

pub struct PgTankStore {
    pub pool: PgPool,
}

impl PgTankStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn tank_from_row(row: &PgRow) -> Result<TankRecord, StorageError> {
    let water_type: String = row.try_get("water_type")?;
    let water_type = WaterType::parse(&water_type)
        .ok_or_else(|| StorageError::new(format!("invalid water_type: {water_type}")))?;
    Ok(TankRecord {
        tank_id: row.try_get("tank_id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        volume_l: row.try_get("volume_l")?,
        length_cm: row.try_get("length_cm")?,
        width_cm: row.try_get("width_cm")?,
        height_cm: row.try_get("height_cm")?,
        water_type,
        start_date_ms: row.try_get("start_date_ms")?,
        description: row.try_get("description")?,
        has_plants: row.try_get("has_plants")?,
        auto_targets: row.try_get("auto_targets")?,
        targets: TankTargets {
            temp_min: row.try_get("temp_min")?,
            temp_max: row.try_get("temp_max")?,
            ph_min: row.try_get("ph_min")?,
            ph_max: row.try_get("ph_max")?,
            tds_min: row.try_get("tds_min")?,
            tds_max: row.try_get("tds_max")?,
            gh_min: row.try_get("gh_min")?,
            gh_max: row.try_get("gh_max")?,
            kh_min: row.try_get("kh_min")?,
            kh_max: row.try_get("kh_max")?,
            ammonia_max: row.try_get("ammonia_max")?,
            nitrite_max: row.try_get("nitrite_max")?,
            nitrate_max: row.try_get("nitrate_max")?,
            phosphate_max: row.try_get("phosphate_max")?,
        },
    })
}

#[async_trait::async_trait]
impl TankStore for PgTankStore {
    async fn list_tanks(&self, ctx: &OwnerContext) -> Result<Vec<TankRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!("select {TANK_COLUMNS} from tanks where owner_id = $1 order by name");
        let rows = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(tank_from_row).collect()
    }

    async fn find_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!("select {TANK_COLUMNS} from tanks where owner_id = $1 and tank_id = $2");
        let row = sqlx::query(&sql)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(tank_from_row).transpose()
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
        let targets = &record.targets;
        sqlx::query(
            "insert into tanks (tank_id, owner_id, name, volume_l, length_cm, width_cm, height_cm, \
             water_type, start_date_ms, description, has_plants, auto_targets, \
             temp_min, temp_max, ph_min, ph_max, tds_min, tds_max, gh_min, gh_max, kh_min, kh_max, \
             ammonia_max, nitrite_max, nitrate_max, phosphate_max) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
             $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)",
        )
        .bind(&record.tank_id)
        .bind(&record.owner_id)
        .bind(&record.name)
        .bind(record.volume_l)
        .bind(record.length_cm)
        .bind(record.width_cm)
        .bind(record.height_cm)
        .bind(record.water_type.as_str())
        .bind(record.start_date_ms)
        .bind(&record.description)
        .bind(record.has_plants)
        .bind(record.auto_targets)
        .bind(targets.temp_min)
        .bind(targets.temp_max)
        .bind(targets.ph_min)
        .bind(targets.ph_max)
        .bind(targets.tds_min)
        .bind(targets.tds_max)
        .bind(targets.gh_min)
        .bind(targets.gh_max)
        .bind(targets.kh_min)
        .bind(targets.kh_max)
        .bind(targets.ammonia_max)
        .bind(targets.nitrite_max)
        .bind(targets.nitrate_max)
        .bind(targets.phosphate_max)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankUpdate,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "update tanks set \
             name = coalesce($1, name), \
             volume_l = coalesce($2, volume_l), \
             length_cm = coalesce($3, length_cm), \
             width_cm = coalesce($4, width_cm), \
             height_cm = coalesce($5, height_cm), \
             water_type = coalesce($6, water_type), \
             start_date_ms = coalesce($7, start_date_ms), \
             description = coalesce($8, description), \
             has_plants = coalesce($9, has_plants) \
             where owner_id = $10 and tank_id = $11 \
             returning {TANK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.name)
            .bind(update.volume_l)
            .bind(update.length_cm)
            .bind(update.width_cm)
            .bind(update.height_cm)
            .bind(update.water_type.map(|w| w.as_str()))
            .bind(update.start_date_ms)
            .bind(update.description)
            .bind(update.has_plants)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(tank_from_row).transpose()
    }

    async fn update_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankTargetsUpdate,
    ) -> Result<Option<TankRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let sql = format!(
            "update tanks set \
             auto_targets = $1, \
             temp_min = coalesce($2, temp_min), \
             temp_max = coalesce($3, temp_max), \
             ph_min = coalesce($4, ph_min), \
             ph_max = coalesce($5, ph_max), \
             tds_min = coalesce($6, tds_min), \
             tds_max = coalesce($7, tds_max), \
             gh_min = coalesce($8, gh_min), \
             gh_max = coalesce($9, gh_max), \
             kh_min = coalesce($10, kh_min), \
             kh_max = coalesce($11, kh_max), \
             ammonia_max = coalesce($12, ammonia_max), \
             nitrite_max = coalesce($13, nitrite_max), \
             nitrate_max = coalesce($14, nitrate_max), \
             phosphate_max = coalesce($15, phosphate_max) \
             where owner_id = $16 and tank_id = $17 \
             returning {TANK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.auto_targets)
            .bind(update.temp_min)
            .bind(update.temp_max)
            .bind(update.ph_min)
            .bind(update.ph_max)
            .bind(update.tds_min)
            .bind(update.tds_max)
            .bind(update.gh_min)
            .bind(update.gh_max)
            .bind(update.kh_min)
            .bind(update.kh_max)
            .bind(update.ammonia_max)
            .bind(update.nitrite_max)
            .bind(update.nitrate_max)
            .bind(update.phosphate_max)
            .bind(&ctx.user_id)
            .bind(tank_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(tank_from_row).transpose()
    }

    async fn delete_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<bool, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result = sqlx::query("delete from tanks where owner_id = $1 and tank_id = $2")
            .bind(&ctx.user_id)
            .bind(tank_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
