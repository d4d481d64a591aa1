//! Domain layer: pure room state and rules.

pub mod board;
pub mod dice;
pub mod errors;
pub mod events;
pub mod fixtures;
pub mod lobby;
pub mod room;
pub mod rules;
pub mod turn;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_movement;
#[cfg(test)]
mod tests_props_turns;
#[cfg(test)]
mod tests_turns;

// Re-exports for ergonomics
pub use board::Color;
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use errors::RuleError;
pub use events::{BonusReason, GameEvent, TurnEndReason};
pub use room::{Pawn, PawnId, Player, PlayerId, Room, RoomId, RoomSummary};
pub use rules::TurnTiming;
pub use turn::{Actor, BotAction, TurnPhase};
