//! Adapters for external dependencies.

pub mod rooms_sea;
