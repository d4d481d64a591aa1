//! Bot strategy trait definition.

use std::fmt;

use crate::domain::room::Room;
use crate::domain::turn::BotAction;
use crate::error::AppError;

/// Errors that can occur while a bot picks an action.
#[derive(Debug)]
pub enum BotError {
    /// The room has no automated mover to decide for.
    NoMover,
    /// Strategy encountered an internal error
    Internal(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoMover => write!(f, "no mover to decide for"),
            BotError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}

impl From<BotError> for AppError {
    fn from(err: BotError) -> Self {
        AppError::internal(format!("Bot error: {err}"))
    }
}

/// Trait for bot strategies.
///
/// A strategy only decides. The chosen action is applied through the same
/// rule code a human command goes through, so an illegal choice is rejected
/// there rather than trusted here.
pub trait BotStrategy: Send + Sync {
    /// Choose the next action for the room's current mover.
    fn choose_action(&self, room: &Room) -> Result<BotAction, BotError>;
}
