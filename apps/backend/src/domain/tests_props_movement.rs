//! Property tests for movement and capture (pure, no services).
//!
//! Properties tested:
//! - A base pawn moves only on a six and always lands on its start cell
//! - Any legal move advances route progress by exactly the roll
//! - A move is illegal exactly when it would overshoot the finish
//! - Captures send opposing pawns to their own base, never on safe cells

use proptest::prelude::*;

use crate::domain::board::{
    apply_capture, can_move, compute_destination, is_safe_cell, position_for_progress, progress,
    Area, MAX_PROGRESS,
};
use crate::domain::test_gens;
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_base_pawn_needs_a_six(
        color in test_gens::color(),
        slot in 0u8..4,
        roll in test_gens::roll(),
    ) {
        let base_pos = color.first_base_slot() + slot;
        let pawn = crate::domain::room::Pawn { id: base_pos, color, base_pos, position: base_pos };
        let dest = compute_destination(&pawn, roll);
        if roll == 6 {
            prop_assert_eq!(dest, Some(color.start_cell()));
        } else {
            prop_assert_eq!(dest, None);
        }
    }

    #[test]
    fn prop_legal_moves_advance_progress_by_roll(
        pawn in test_gens::pawn(),
        roll in test_gens::roll(),
    ) {
        let before = progress(&pawn);
        if let Some(dest) = compute_destination(&pawn, roll) {
            let mut moved = pawn.clone();
            moved.position = dest;
            let expected = if before == 0 { 1 } else { before + roll };
            prop_assert_eq!(progress(&moved), expected);
        }
    }

    #[test]
    fn prop_only_overshoot_and_base_block_a_move(
        pawn in test_gens::pawn(),
        roll in test_gens::roll(),
    ) {
        let p = progress(&pawn);
        let expected = match crate::domain::board::area(&pawn) {
            Some(Area::Base) => roll == 6,
            Some(Area::Finished) => false,
            _ => p + roll <= MAX_PROGRESS,
        };
        prop_assert_eq!(can_move(&pawn, roll), expected);
    }

    #[test]
    fn prop_capture_resets_opponents_except_on_safe_cells(
        mover in test_gens::color(),
        victims in proptest::collection::vec(test_gens::pawn(), 1..6),
        target_progress in 1u8..=52,
    ) {
        let target = position_for_progress(mover, mover.first_base_slot(), target_progress)
            .unwrap_or(mover.start_cell());
        let mut pawns = victims.clone();
        // Park every generated pawn on the target cell when it is on the ring.
        for p in pawns.iter_mut() {
            if matches!(crate::domain::board::area(p), Some(Area::Ring { .. })) {
                p.position = target;
            }
        }
        let before = pawns.clone();
        let captured = apply_capture(&mut pawns, target, mover);

        for (old, new) in before.iter().zip(pawns.iter()) {
            let hit = old.position == target && old.color != mover && !is_safe_cell(target);
            if hit {
                prop_assert_eq!(new.position, new.base_pos);
            } else {
                prop_assert_eq!(new.position, old.position);
            }
        }
        let expected_hits = before
            .iter()
            .filter(|p| p.position == target && p.color != mover && !is_safe_cell(target))
            .count();
        prop_assert_eq!(captured.len(), expected_hits);
    }
}
