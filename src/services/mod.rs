pub mod monitor_status;
pub mod price_monitor;

pub use monitor_status::{MonitorSnapshot, MonitorStatus};
pub use price_monitor::{MonitorConfig, PriceMonitor};
