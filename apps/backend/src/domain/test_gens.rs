// Proptest generators for domain types.
// Positions are generated from route progress so every pawn is legal by construction.

use proptest::prelude::*;

use crate::domain::board::{position_for_progress, Color, MAX_PROGRESS};
use crate::domain::room::Pawn;

pub fn color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Red),
        Just(Color::Blue),
        Just(Color::Green),
        Just(Color::Yellow),
    ]
}

pub fn roll() -> impl Strategy<Value = u8> {
    1u8..=6
}

/// A pawn of `color` (slot `0..4`) somewhere on its route, base and finish included.
pub fn pawn_of(color: Color) -> impl Strategy<Value = Pawn> {
    (0u8..4, 0u8..=MAX_PROGRESS).prop_map(move |(slot, progress)| {
        let base_pos = color.first_base_slot() + slot;
        Pawn {
            id: base_pos,
            color,
            base_pos,
            position: position_for_progress(color, base_pos, progress).unwrap_or(base_pos),
        }
    })
}

pub fn pawn() -> impl Strategy<Value = Pawn> {
    color().prop_flat_map(pawn_of)
}

/// Progress values for all four pawns of one color.
pub fn route_progress() -> impl Strategy<Value = [u8; 4]> {
    [
        0u8..=MAX_PROGRESS,
        0u8..=MAX_PROGRESS,
        0u8..=MAX_PROGRESS,
        0u8..=MAX_PROGRESS,
    ]
}
