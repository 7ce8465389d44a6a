//! # Aqua Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持内存与 PostgreSQL 两种后端。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：定义所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：所有者与水族箱作用域验证
//! 5. **连接管理层** (`connection.rs`)：数据库连接池与建表脚本
//! 6. **组合层** (`stores.rs`)：`AquariumStores` 打包所有存储并编排级联删除
//! 7. **实现层**：
//!    - `in_memory/`：内存存储实现（本地演示和测试）
//!    - `postgres/`：PostgreSQL 存储实现
//!
//! ## 核心特性
//!
//! - **所有者隔离**：所有存储接口都显式接收 `OwnerContext`，水族箱与设备按 `owner_id` 过滤
//! - **水族箱作用域**：`OwnerContext.tank_scope` 非空时只允许访问该水族箱
//! - **只追加历史**：测量与活动日志只追加，查询按时间倒序
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use aqua_storage::{AquariumStores, TankStore};
//! use domain::OwnerContext;
//!
//! let stores = AquariumStores::in_memory_demo();
//! let ctx = OwnerContext::new("user-1", None);
//! let tanks = stores.tanks.list_tanks(&ctx).await?;
//! ```
//!
//! ## 设计约束
//!
//! - Handler 层禁止直接写 SQL，统一通过 storage 层
//! - 物种目录对建议引擎只读

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod stores;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use stores::AquariumStores;
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryActivityLogStore, InMemoryDeviceStore, InMemoryMeasurementStore,
    InMemorySpeciesStore, InMemoryStockingStore, InMemoryTankStore, InMemoryTaskStore,
};

pub use postgres::{
    PgActivityLogStore, PgDeviceStore, PgMeasurementStore, PgSpeciesStore, PgStockingStore,
    PgTankStore, PgTaskStore,
};
