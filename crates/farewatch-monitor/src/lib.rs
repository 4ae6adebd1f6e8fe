//! farewatch monitor - the price check cycle and its scheduler

pub mod monitor;
pub mod scheduler;

pub use monitor::{CycleReport, PriceMonitor};
pub use scheduler::{CheckCycle, IntervalSource, Scheduler};
