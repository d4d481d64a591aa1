use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::domain::{DomainError, ValidationKind};

/// Why a command was refused.
///
/// Everything except [`RuleError::EmptyRoom`] is an ordinary rejection: the
/// room is left untouched and the caller is told nothing happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    NotStarted,
    AlreadyStarted,
    GameOver,
    RoomFull,
    NotEnoughReady,
    UnknownPlayer,
    NotYourTurn,
    /// Native bots only act through automation.
    BotMustUseAutomation,
    /// Automation asked to act for a human mover.
    MoverNotAutomated,
    RollPending,
    NoRollPending,
    UnknownRoll(u8),
    UnknownPawn(u8),
    NotYourPawn(u8),
    IllegalMove { pawn_id: u8, roll: u8 },
    /// Automation tried to pass while a legal move exists.
    MoveAvailable,
    Automation(String),
    /// A started room with no players; cannot be healed.
    EmptyRoom,
}

impl RuleError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RuleError::EmptyRoom)
    }
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RuleError::NotStarted => write!(f, "game has not started"),
            RuleError::AlreadyStarted => write!(f, "game already started"),
            RuleError::GameOver => write!(f, "game is over"),
            RuleError::RoomFull => write!(f, "room is full"),
            RuleError::NotEnoughReady => write!(f, "not enough players are ready"),
            RuleError::UnknownPlayer => write!(f, "player is not in this room"),
            RuleError::NotYourTurn => write!(f, "not your turn"),
            RuleError::BotMustUseAutomation => write!(f, "bots cannot send commands"),
            RuleError::MoverNotAutomated => write!(f, "mover is not automated"),
            RuleError::RollPending => write!(f, "a non-six roll is pending"),
            RuleError::NoRollPending => write!(f, "no roll to move with"),
            RuleError::UnknownRoll(r) => write!(f, "roll {r} is not pending"),
            RuleError::UnknownPawn(id) => write!(f, "pawn {id} does not exist"),
            RuleError::NotYourPawn(id) => write!(f, "pawn {id} belongs to another color"),
            RuleError::IllegalMove { pawn_id, roll } => {
                write!(f, "pawn {pawn_id} cannot move {roll}")
            }
            RuleError::MoveAvailable => write!(f, "a legal move is available"),
            RuleError::Automation(msg) => write!(f, "automation failed: {msg}"),
            RuleError::EmptyRoom => write!(f, "room has no players"),
        }
    }
}

impl Error for RuleError {}

impl From<RuleError> for DomainError {
    fn from(e: RuleError) -> Self {
        let kind = match e {
            RuleError::EmptyRoom => ValidationKind::EmptyRoom,
            _ => ValidationKind::Other(format!("{e:?}")),
        };
        DomainError::validation(kind, e.to_string())
    }
}
