//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - TankStore：水族箱存储
//! - SpeciesStore：物种目录存储
//! - StockingStore：放养关系存储
//! - MeasurementStore：传感器 / 手动测量存储
//! - DeviceStore：智能设备存储
//! - TaskStore：维护任务存储
//! - ActivityLogStore：活动日志存储
//!
//! 设计原则：
//! - 所有接口显式接收 OwnerContext
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    ActivityLogRecord, DeviceRecord, ManualMeasurementRecord, SensorMeasurementRecord,
    SpeciesRecord, SpeciesUpdate, StockingRecord, TankRecord, TankTargetsUpdate, TankUpdate,
    TaskRecord,
};
use async_trait::async_trait;
use domain::{OwnerContext, SensorParameter};

/// 水族箱存储接口
///
/// 所有查询按 `owner_id` 过滤。
#[async_trait]
pub trait TankStore: Send + Sync {
    /// 列出当前用户的所有水族箱
    async fn list_tanks(&self, ctx: &OwnerContext) -> Result<Vec<TankRecord>, StorageError>;

    /// 查找指定水族箱
    async fn find_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<TankRecord>, StorageError>;

    /// 创建新水族箱（同一用户下名称忽略大小写唯一）
    async fn create_tank(
        &self,
        ctx: &OwnerContext,
        record: TankRecord,
    ) -> Result<TankRecord, StorageError>;

    /// 更新水族箱基本信息
    async fn update_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankUpdate,
    ) -> Result<Option<TankRecord>, StorageError>;

    /// 更新目标范围与 auto_targets 标记
    async fn update_targets(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        update: TankTargetsUpdate,
    ) -> Result<Option<TankRecord>, StorageError>;

    /// 删除水族箱（仅删除本表记录，级联由 `delete_tank_cascade` 编排）
    async fn delete_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<bool, StorageError>;
}

/// 物种目录存储接口
#[async_trait]
pub trait SpeciesStore: Send + Sync {
    /// 列出目录中的所有物种
    async fn list_species(&self, ctx: &OwnerContext) -> Result<Vec<SpeciesRecord>, StorageError>;

    /// 查找指定物种
    async fn find_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
    ) -> Result<Option<SpeciesRecord>, StorageError>;

    /// 新增物种（名称唯一）
    async fn create_species(
        &self,
        ctx: &OwnerContext,
        record: SpeciesRecord,
    ) -> Result<SpeciesRecord, StorageError>;

    /// 更新物种
    async fn update_species(
        &self,
        ctx: &OwnerContext,
        species_id: &str,
        update: SpeciesUpdate,
    ) -> Result<Option<SpeciesRecord>, StorageError>;
}

/// 放养关系存储接口
#[async_trait]
pub trait StockingStore: Send + Sync {
    /// 列出水族箱的放养记录（按加入时间升序）
    async fn list_stocking(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<StockingRecord>, StorageError>;

    /// 加入物种：已存在则累加数量，否则新建
    async fn add_stocking(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        species_id: &str,
        quantity: u32,
        added_at_ms: i64,
    ) -> Result<StockingRecord, StorageError>;

    /// 删除水族箱下的全部放养记录
    async fn delete_stocking_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError>;
}

/// 测量存储接口（只追加）
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// 追加一条传感器读数
    async fn append_sensor(&self, record: SensorMeasurementRecord) -> Result<(), StorageError>;

    /// 追加一条手动测试读数
    async fn append_manual(
        &self,
        ctx: &OwnerContext,
        record: ManualMeasurementRecord,
    ) -> Result<(), StorageError>;

    /// 最近的传感器读数（按时间倒序）
    ///
    /// 指定 `parameter` 时只返回该参数非空的读数。
    async fn recent_sensor(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        parameter: Option<SensorParameter>,
        limit: usize,
    ) -> Result<Vec<SensorMeasurementRecord>, StorageError>;

    /// 最近的手动测试读数（按时间倒序）
    async fn recent_manual(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ManualMeasurementRecord>, StorageError>;

    /// 删除水族箱下的全部手动读数
    async fn delete_manual_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError>;
}

/// 智能设备存储接口
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 查找指定设备
    async fn find_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 查找绑定到水族箱的设备
    async fn find_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 列出绑定到水族箱的所有设备（按 device_id 排序）
    async fn list_by_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 按设备密钥查找（设备上报入口，无用户上下文）
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 注册新设备（api_key 唯一）
    async fn create_device(
        &self,
        ctx: &OwnerContext,
        record: DeviceRecord,
    ) -> Result<DeviceRecord, StorageError>;

    /// 绑定 / 解绑水族箱
    async fn attach_device(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        tank_id: Option<String>,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 覆盖设备配置
    async fn update_config(
        &self,
        ctx: &OwnerContext,
        device_id: &str,
        config: serde_json::Value,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    /// 解除所有绑定到该水族箱的设备
    async fn detach_tank(&self, ctx: &OwnerContext, tank_id: &str) -> Result<u64, StorageError>;
}

/// 维护任务存储接口
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// 列出水族箱的任务
    async fn list_tasks(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<Vec<TaskRecord>, StorageError>;

    /// 查找同标题的活动任务
    async fn find_active_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        title: &str,
    ) -> Result<Option<TaskRecord>, StorageError>;

    /// 创建任务
    async fn create_task(
        &self,
        ctx: &OwnerContext,
        record: TaskRecord,
    ) -> Result<TaskRecord, StorageError>;

    /// 关闭任务（is_active = false）
    async fn close_task(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, StorageError>;

    /// 删除水族箱下的全部任务
    async fn delete_tasks_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError>;
}

/// 活动日志存储接口（只追加）
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    /// 追加活动
    async fn append_activity(
        &self,
        ctx: &OwnerContext,
        record: ActivityLogRecord,
    ) -> Result<(), StorageError>;

    /// 列出水族箱的活动（按时间倒序）
    async fn list_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogRecord>, StorageError>;

    /// 事件类型包含 `keyword`（忽略大小写）的最近一条活动
    async fn latest_activity(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
        keyword: &str,
    ) -> Result<Option<ActivityLogRecord>, StorageError>;

    /// 删除水族箱下的全部活动
    async fn delete_activity_for_tank(
        &self,
        ctx: &OwnerContext,
        tank_id: &str,
    ) -> Result<u64, StorageError>;
}
