//! Sampling and derived-metrics engine over the kernel's process
//! pseudo-filesystem.

pub mod cpu;
pub mod engine;
pub mod error;
pub mod loadavg;
pub mod memory;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod platform;
pub mod process;
pub mod procfs;
pub mod rate;
pub mod registry;
pub mod snapshot;
pub mod uptime;
pub mod users;

pub use engine::MetricsEngine;
pub use error::{Result, SystemInfoError};
pub use procfs::{ProcFs, RealFs};
pub use snapshot::EngineSnapshot;
