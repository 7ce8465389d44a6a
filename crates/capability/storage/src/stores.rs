//! 存储组合
//!
//! `AquariumStores` 把各资源存储打包在一起，供建议服务与 HTTP 层共享，
//! 并负责编排跨表操作（删除水族箱时的级联清理）。

use crate::error::StorageError;
use crate::in_memory::{
    InMemoryActivityLogStore, InMemoryDeviceStore, InMemoryMeasurementStore,
    InMemorySpeciesStore, InMemoryStockingStore, InMemoryTankStore, InMemoryTaskStore,
};
use crate::postgres::{
    PgActivityLogStore, PgDeviceStore, PgMeasurementStore, PgSpeciesStore, PgStockingStore,
    PgTankStore, PgTaskStore,
};
use crate::traits::{
    ActivityLogStore, DeviceStore, MeasurementStore, SpeciesStore, StockingStore, TankStore,
    TaskStore,
};
use domain::OwnerContext;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AquariumStores {
    pub tanks: Arc<dyn TankStore>,
    pub species: Arc<dyn SpeciesStore>,
    pub stocking: Arc<dyn StockingStore>,
    pub measurements: Arc<dyn MeasurementStore>,
    pub devices: Arc<dyn DeviceStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub activity: Arc<dyn ActivityLogStore>,
}

impl AquariumStores {
    /// 空的内存存储（目录为空）
    pub fn in_memory() -> Self {
        Self::in_memory_with_species(InMemorySpeciesStore::new())
    }

    /// 内存存储，目录预置演示物种
    pub fn in_memory_demo() -> Self {
        Self::in_memory_with_species(InMemorySpeciesStore::with_demo_catalog())
    }

    fn in_memory_with_species(species: InMemorySpeciesStore) -> Self {
        Self {
            tanks: Arc::new(InMemoryTankStore::new()),
            species: Arc::new(species),
            stocking: Arc::new(InMemoryStockingStore::new()),
            measurements: Arc::new(InMemoryMeasurementStore::new()),
            devices: Arc::new(InMemoryDeviceStore::new()),
            tasks: Arc::new(InMemoryTaskStore::new()),
            activity: Arc::new(InMemoryActivityLogStore::new()),
        }
    }

    /// 共享同一连接池的 Postgres 存储
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tanks: Arc::new(PgTankStore::new(pool.clone())),
            species: Arc::new(PgSpeciesStore::new(pool.clone())),
            stocking: Arc::new(PgStockingStore::new(pool.clone())),
            measurements: Arc::new(PgMeasurementStore::new(pool.clone())),
            devices: Arc::new(PgDeviceStore::new(pool.clone())),
            tasks: Arc::new(PgTaskStore::new(pool.clone())),
            activity: Arc::new(PgActivityLogStore::new(pool)),
        }
    }

    /// 删除水族箱及其附属数据
    ///
    /// 放养、手动读数、任务、活动日志随水族箱删除；设备仅解绑，保留其传感器历史。
    /// 水族箱不存在（或不属于当前用户）时返回 `false` 且不做任何修改。
    pub async fn delete_tank_cascade(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<bool, StorageError> {
        if self.tanks.find_tank(ctx, tank_id).await?.is_none() {
            return Ok(false);
        }
        self.stocking.delete_stocking_for_tank(ctx, tank_id).await?;
        self.measurements.delete_manual_for_tank(ctx, tank_id).await?;
        self.tasks.delete_tasks_for_tank(ctx, tank_id).await?;
        self.activity.delete_activity_for_tank(ctx, tank_id).await?;
        self.devices.detach_tank(ctx, tank_id).await?;
        self.tanks.delete_tank(ctx, tank_id).await
    }
}
