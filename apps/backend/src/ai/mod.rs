//! Bot players - decide actions for native bots and timed-out humans.
//!
//! This module provides:
//! - `BotStrategy` trait for different decision policies
//! - `Furthest`: advances the leading pawn (default)
//! - `RandomBot`: picks uniformly among legal moves (seedable for tests)
//! - A static registry to look strategies up by name

mod furthest;
mod random;
pub mod registry;
mod trait_def;

pub use furthest::Furthest;
pub use random::RandomBot;
pub use trait_def::{BotError, BotStrategy};

/// Create a bot strategy by registry name with an optional seed.
///
/// Returns None if `name` is unrecognized.
pub fn create_bot(name: &str, seed: Option<u64>) -> Option<Box<dyn BotStrategy>> {
    registry::by_name(name).map(|factory| (factory.make)(seed))
}
