//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 使用参数绑定（`$1`, `$2`），禁止拼接用户输入
//! 2. **所有者隔离**：水族箱、设备、任务查询都带 `owner_id` 条件
//! 3. **连接池管理**：所有实现共享同一个 `PgPool`
//!
//! ## 包含的实现
//!
//! - **TankStore** (`tank.rs`)：水族箱与目标范围
//! - **SpeciesStore** (`species.rs`)：物种目录
//! - **StockingStore** (`stocking.rs`)：放养关系（upsert 累加数量）
//! - **MeasurementStore** (`measurement.rs`)：传感器 / 手动读数
//! - **DeviceStore** (`device.rs`)：智能设备与配置
//! - **TaskStore** (`task.rs`)：维护任务
//! - **ActivityLogStore** (`activity.rs`)：活动日志
//!
//! ## 数据库模式
//!
//! 建表脚本见 `migrations/0001_init.sql`，由 `ensure_schema` 执行：
//! - `tanks`：`(owner_id, lower(name))` 唯一索引
//! - `species`：`name` 唯一
//! - `tank_stocking`：`(tank_id, species_id)` 主键
//! - `devices`：`api_key` 唯一，`config` 为 JSON 文本
//! - `sensor_measurements` / `manual_measurements`：`(.., ts_ms desc)` 索引
//! - `maintenance_tasks`、`activity_log`
//!
//! ## 错误处理
//!
//! `sqlx::Error` 自动转换为 `StorageError`；唯一约束冲突映射为 `StorageErrorKind::Conflict`。
//!
//! ## 事务支持
//!
//! 当前实现不使用事务；级联删除由 `AquariumStores::delete_tank_cascade` 逐表执行，
//! 外键 `on delete cascade` 兜底。

pub mod activity;
pub mod device;
pub mod measurement;
pub mod species;
pub mod stocking;
pub mod tank;
pub mod task;

pub use activity::*;
pub use device::*;
pub use measurement::*;
pub use species::*;
pub use stocking::*;
pub use tank::*;
pub use task::*;
