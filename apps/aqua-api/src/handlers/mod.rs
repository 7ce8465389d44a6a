pub mod activity;
pub mod advisor;
pub mod catalog;
pub mod devices;
pub mod economy;
pub mod livestock;
pub mod measurements;
pub mod metrics;
pub mod tanks;
pub mod tasks;

pub use activity::*;
pub use advisor::*;
pub use catalog::*;
pub use devices::*;
pub use economy::*;
pub use livestock::*;
pub use measurements::*;
pub use metrics::*;
pub use tanks::*;
pub use tasks::*;
