//! Application services - Orchestration around the dispatcher

pub mod relay_service;

pub use relay_service::{PumpStats, RelayHandle, RelayService, RelayStats};
