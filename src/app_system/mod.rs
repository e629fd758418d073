//! System orchestration, startup, and shutdown logic.

pub mod seed;
pub mod store_system;
pub mod telemetry;

pub use seed::*;
pub use store_system::*;
pub use telemetry::*;
