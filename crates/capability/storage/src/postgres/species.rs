//! Postgres 物种目录存储实现

use crate::error::StorageError;
use crate::models::{SpeciesRecord, SpeciesUpdate};
use crate::traits::SpeciesStore;
use crate::validation::ensure_owner;
use domain::{Aggressiveness, InhabitantKind, OwnerContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SPECIES_COLUMNS: &str = "species_id, kind, name, latin_name, size_cm, aggressiveness, \
     feeding_frequency, min_tank_size_l, min_water_volume_l, temp_min, temp_max, ph_min, ph_max";

pub struct PgSpeciesStore {
    pub pool: PgPool,
}

impl PgSpeciesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn species_from_row(row: &PgRow) -> Result<SpeciesRecord, StorageError> {
    let kind: String = row.try_get("kind")?;
    let kind = InhabitantKind::parse(&kind)
        .ok_or_else(|| StorageError::new(format!("invalid kind: {kind}")))?;
    let aggressiveness: Option<String> = row.try_get("aggressiveness")?;
    Ok(SpeciesRecord {
        species_id: row.try_get("species_id")?,
        kind,
        name: row.try_get("name")?,
        latin_name: row.try_get("latin_name")?,
        size_cm: row.try_get("size_cm")?,
        // 未识别的攻击性文本视为缺失
        aggressiveness: aggressiveness.as_deref().and_then(Aggressiveness::parse),
        feeding_frequency: row.try_get("feeding_frequency")?,
        min_tank_size_l: row.try_get("min_tank_size_l")?,
        min_water_volume_l: row.try_get("min_water_volume_l")?,
        temp_min: row.try_get("temp_min")?,
        temp_max: row.try_get("temp_max")?,
        ph_min: row.try_get("ph_min")?,
        ph_max: row.try_get("ph_max")?,
    })
}

#[async_trait::async_trait]
impl SpeciesStore for PgSpeciesStore {
    async fn list_species(&self, ctx: &OwnerContext) -> Result<Vec<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!("select {SPECIES_COLUMNS} from species order by name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(species_from_row).collect()
    }

    async fn find_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
    ) -> Result<Option<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!("select {SPECIES_COLUMNS} from species where species_id = $1");
        let row = sqlx::query(&sql)
            .bind(species_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(species_from_row).transpose()
    }

    async fn create_species(
        &self,
        ctx: &OwnerContext,
        record: SpeciesRecord,
    ) -> Result<SpeciesRecord, StorageError> {
        ensure_owner(ctx)?;
        sqlx::query(
            "insert into species (species_id, kind, name, latin_name, size_cm, aggressiveness, \
             feeding_frequency, min_tank_size_l, min_water_volume_l, temp_min, temp_max, ph_min, ph_max) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&record.species_id)
        .bind(record.kind.as_str())
        .bind(&record.name)
        .bind(&record.latin_name)
        .bind(record.size_cm)
        .bind(record.aggressiveness.map(|a| a.as_str()))
        .bind(&record.feeding_frequency)
        .bind(record.min_tank_size_l)
        .bind(record.min_water_volume_l)
        .bind(record.temp_min)
        .bind(record.temp_max)
        .bind(record.ph_min)
        .bind(record.ph_max)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
        update: SpeciesUpdate,
    ) -> Result<Option<SpeciesRecord>, StorageError> {
        ensure_owner(ctx)?;
        let sql = format!(
            "update species set \
             name = coalesce($1, name), \
             latin_name = coalesce($2, latin_name), \
             size_cm = coalesce($3, size_cm), \
             aggressiveness = coalesce($4, aggressiveness), \
             feeding_frequency = coalesce($5, feeding_frequency), \
             min_tank_size_l = coalesce($6, min_tank_size_l), \
             min_water_volume_l = coalesce($7, min_water_volume_l), \
             temp_min = coalesce($8, temp_min), \
             temp_max = coalesce($9, temp_max), \
             ph_min = coalesce($10, ph_min), \
             ph_max = coalesce($11, ph_max) \
             where species_id = $12 \
             returning {SPECIES_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.name)
            .bind(update.latin_name)
            .bind(update.size_cm)
            .bind(update.aggressiveness.map(|a| a.as_str()))
            .bind(update.feeding_frequency)
            .bind(update.min_tank_size_l)
            .bind(update.min_water_volume_l)
            .bind(update.temp_min)
            .bind(update.temp_max)
            .bind(update.ph_min)
            .bind(update.ph_max)
            .bind(species_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(species_from_row).transpose()
    }
}
