pub mod monitor;

pub use monitor::{ConnectionMonitor, OnChangeGuard};
