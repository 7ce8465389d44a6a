//! 内存存储实现模块
//!
//! 用于本地演示（未配置数据库时）和测试。
//!
//! 包含以下实现：
//! - TankStore: InMemoryTankStore
//! - SpeciesStore: InMemorySpeciesStore
//! - StockingStore: InMemoryStockingStore
//! - MeasurementStore: InMemoryMeasurementStore
//! - DeviceStore: InMemoryDeviceStore
//! - TaskStore: InMemoryTaskStore
//! - ActivityLogStore: InMemoryActivityLogStore

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
