//! Engine services: the game flow and its collaborators.

pub mod clock;
pub mod game_flow;
pub mod room_gateway;
pub mod room_locks;
pub mod settlement;
pub mod turn_timers;
