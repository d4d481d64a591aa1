#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod ai;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod realtime;
pub mod repos;
pub mod services;
pub mod telemetry;

// Re-exports for public API
pub use config::db::{db_url, DbBackendKind};
pub use config::EngineConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::{build_engine, EngineBuilder};
pub use realtime::{BroadcastSink, ClientMsg, GameCommand, NullSink, RoomHub, ServerMsg};
pub use repos::{InMemoryRoomStore, RoomStore, SeaRoomStore};
pub use services::game_flow::{CommandOutcome, GameFlowService, Joined};
pub use services::settlement::{NoopSettlement, SettlementHook};

// Prelude for test convenience
pub mod prelude {
    pub use super::domain::*;
    pub use super::error::*;
    pub use super::realtime::*;
    pub use super::services::game_flow::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
