//! Postgres 放养关系存储实现

use crate::error::StorageError;
use crate::models::StockingRecord;
use crate::traits::StockingStore;
use crate::validation::ensure_tank_scope;
use domain::OwnerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgStockingStore {
    pub pool: PgPool,
}

impl PgStockingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn stocking_from_row(row: &PgRow) -> Result<StockingRecord, StorageError> {
    let quantity: i32 = row.try_get("quantity")?;
    Ok(StockingRecord {
        tank_id: row.try_get("tank_id")?,
        species_id: row.try_get("species_id")?,
        quantity: u32::try_from(quantity)
            .map_err(|_| StorageError::new("negative stocking quantity"))?,
        added_at_ms: row.try_get("added_at_ms")?,
    })
}

#[async_trait::async_trait]
impl StockingStore for PgStockingStore {
    async fn list_stocking(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<StockingRecord>, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let rows = sqlx::query(
            "select s.tank_id, s.species_id, s.quantity, s.added_at_ms \
             from tank_stocking s join tanks t on t.tank_id = s.tank_id \
             where t.owner_id = $1 and s.tank_id = $2 \
             order by s.added_at_ms, s.species_id",
        )
        .bind(&ctx.user_id)
        .bind(tank_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(stocking_from_row).collect()
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
        let quantity =
            i32::try_from(quantity).map_err(|_| StorageError::new("quantity out of range"))?;
        let row = sqlx::query(
            "insert into tank_stocking (tank_id, species_id, quantity, added_at_ms) \
             values ($1, $2, $3, $4) \
             on conflict (tank_id, species_id) \
             do update set quantity = tank_stocking.quantity + excluded.quantity \
             returning tank_id, species_id, quantity, added_at_ms",
        )
        .bind(tank_id)
        .bind(species_id)
        .bind(quantity)
        .bind(added_at_ms)
        .fetch_one(&self.pool)
        .await?;
        stocking_from_row(&row)
    }

    async fn delete_stocking_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError> {
        ensure_tank_scope(ctx, tank_id)?;
        let result = sqlx::query("delete from tank_stocking where tank_id = $1")
            .bind(tank_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
