//! Room storage: the store trait and its backends.

pub mod memory;
pub mod rooms;

pub use memory::InMemoryRoomStore;
pub use rooms::{RoomStore, SeaRoomStore};
