// Property tests for the turn state machine under random automated play.

use proptest::prelude::*;
use time::macros::datetime;
use time::OffsetDateTime;

use crate::domain::board::{area, compute_destination, is_safe_cell};
use crate::domain::dice::ScriptedDice;
use crate::domain::events::{GameEvent, TurnEndReason};
use crate::domain::fixtures::RoomFixture;
use crate::domain::room::Room;
use crate::domain::rules::{bonus_turn, movable_pawns, pending_rolls, TurnTiming};
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::turn::{apply_bot_action, BotAction};

const NOW: OffsetDateTime = datetime!(2024-05-01 12:00:00 UTC);

fn bot_room(players: usize) -> Room {
    let mut fixture = RoomFixture::new("props");
    for i in 0..players {
        fixture = fixture.bot(&format!("bot{i}"));
    }
    fixture.started().build()
}

/// Pick an action for the mover. `pick` selects among movable pawns and
/// decides whether a six is banked.
fn choose(room: &Room, pick: usize) -> BotAction {
    let Some(rolled) = room.rolled_number else {
        return BotAction::Roll;
    };
    if rolled == 6 && pick % 3 == 0 {
        return BotAction::Roll;
    }
    let Some(color) = room.mover().map(|p| p.color) else {
        return BotAction::Pass;
    };
    for r in pending_rolls(room) {
        let movable = movable_pawns(room, color, r);
        if !movable.is_empty() {
            let pawn = movable[pick % movable.len()];
            return BotAction::Move {
                pawn_id: pawn.id,
                roll: r,
            };
        }
    }
    BotAction::Pass
}

fn assert_consistent(room: &Room) -> Result<(), TestCaseError> {
    let movers = room.players.iter().filter(|p| p.now_moving).count();
    if room.winner.is_some() {
        prop_assert_eq!(movers, 0);
    } else {
        prop_assert_eq!(movers, 1);
    }
    for pawn in &room.pawns {
        prop_assert!(area(pawn).is_some(), "pawn {:?} off its route", pawn);
    }
    Ok(())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn random_play_keeps_exactly_one_mover(
        players in 2usize..=4,
        faces in prop::collection::vec(test_gens::roll(), 50..300),
        picks in prop::collection::vec(any::<usize>(), 300),
    ) {
        let mut room = bot_room(players);
        let dice = ScriptedDice::new(faces).with_fallback(5);
        let timing = TurnTiming::default();

        for pick in picks {
            if room.winner.is_some() {
                break;
            }
            let action = choose(&room, pick);
            let result = apply_bot_action(&mut room, action, &dice, NOW, timing);
            prop_assert!(result.is_ok(), "{:?} rejected: {:?}", action, result);
            assert_consistent(&room)?;
        }
    }

    #[test]
    fn mover_keeps_turn_exactly_when_bonus_applies(
        faces in prop::collection::vec(test_gens::roll(), 50..200),
        picks in prop::collection::vec(any::<usize>(), 200),
    ) {
        let mut room = bot_room(3);
        let dice = ScriptedDice::new(faces).with_fallback(6);
        let timing = TurnTiming::default();

        for pick in picks {
            if room.winner.is_some() {
                break;
            }
            let action = choose(&room, pick);
            let BotAction::Move { pawn_id, roll } = action else {
                let _ = apply_bot_action(&mut room, action, &dice, NOW, timing);
                continue;
            };

            let before = room.clone();
            let mover = before.mover().map(|p| p.id.clone());
            let color = before.mover().map(|p| p.color);
            let pawn = before.pawn(pawn_id).cloned();
            let destination = pawn.as_ref().and_then(|p| compute_destination(p, roll));
            prop_assert!(destination.is_some());
            let destination = destination.unwrap_or_default();
            let captured = !is_safe_cell(destination)
                && before
                    .pawns
                    .iter()
                    .any(|p| p.position == destination && Some(p.color) != color);
            let mut remaining = before.roll_history.clone();
            if let Some(i) = remaining.iter().position(|&r| r == roll) {
                remaining.remove(i);
            }
            let expected_bonus = bonus_turn(roll, &remaining, captured, destination);

            let events = apply_bot_action(&mut room, action, &dice, NOW, timing);
            prop_assert!(events.is_ok());
            let events = events.unwrap_or_default();

            if room.winner.is_some() {
                let won = matches!(events.last(), Some(GameEvent::GameWon { .. }));
                prop_assert!(won, "last event should be the win: {:?}", events.last());
                continue;
            }
            let same_mover = room.mover().map(|p| p.id.clone()) == mover;
            prop_assert_eq!(same_mover, expected_bonus.is_some());
            let saw_bonus = events.iter().any(|e| matches!(e, GameEvent::BonusTurn { .. }));
            prop_assert_eq!(saw_bonus, expected_bonus.is_some());
        }
    }

    #[test]
    fn third_six_always_forfeits(players in 2usize..=4, leading in prop::collection::vec(1u8..=5, 0..=1)) {
        let mut room = bot_room(players);
        let mut faces = leading.clone();
        faces.extend([6, 6, 6]);
        let dice = ScriptedDice::new(faces);
        let timing = TurnTiming::default();

        // A leading non-six with every pawn in base ends the turn at once,
        // so only the sixes matter for whoever holds the turn afterwards.
        for _ in 0..leading.len() {
            apply_bot_action(&mut room, BotAction::Roll, &dice, NOW, timing).unwrap();
        }
        let holder = room.mover().map(|p| p.id.clone());

        let mut last = Vec::new();
        for _ in 0..3 {
            last = apply_bot_action(&mut room, BotAction::Roll, &dice, NOW, timing).unwrap();
        }
        let forfeited = last.iter().any(|e| matches!(
            e,
            GameEvent::TurnEnded { reason: TurnEndReason::ThreeSixes, .. }
        ));
        prop_assert!(forfeited, "third six should forfeit, got {:?}", last);
        prop_assert_ne!(room.mover().map(|p| p.id.clone()), holder);
        prop_assert!(room.roll_history.is_empty());
        prop_assert!(room.pawns.iter().all(|p| p.in_base()));
    }
}
