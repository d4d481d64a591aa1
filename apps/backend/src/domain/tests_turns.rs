//! Turn state machine scenarios.

use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::domain::board::Color;
use crate::domain::dice::ScriptedDice;
use crate::domain::errors::RuleError;
use crate::domain::events::{BonusReason, GameEvent, TurnEndReason};
use crate::domain::fixtures::RoomFixture;
use crate::domain::room::Room;
use crate::domain::rules::TurnTiming;
use crate::domain::turn::{
    apply_bot_action, expire_turn, move_pawn, phase, roll, Actor, BotAction, TurnPhase,
};

const NOW: OffsetDateTime = datetime!(2024-03-01 10:00:00 UTC);

fn timing() -> TurnTiming {
    TurnTiming::default()
}

/// Red (alice) and blue (bob), alice to move, deadline in 15s.
fn two_humans() -> RoomFixture {
    RoomFixture::new("t")
        .human("alice")
        .human("bob")
        .started()
        .deadline(NOW + Duration::seconds(15))
}

fn mover_id(room: &Room) -> Option<&str> {
    room.mover().map(|p| p.id.as_str())
}

#[test]
fn roll_three_then_base_pawn_move_is_rejected() {
    // A red pawn on the ring so the 3 is playable.
    let mut room = two_humans().pawn(1, 20).build();
    let dice = ScriptedDice::new([3]);

    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    assert_eq!(room.rolled_number, Some(3));

    let before = room.clone();
    let err = move_pawn(&mut room, Actor::Player("alice"), 0, None, NOW, timing()).unwrap_err();
    assert_eq!(err, RuleError::IllegalMove { pawn_id: 0, roll: 3 });
    assert_eq!(room, before);
}

#[test]
fn six_allows_a_second_roll_before_moving() {
    let mut room = two_humans().build();
    let dice = ScriptedDice::new([6, 4]);

    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    assert_eq!(room.roll_history, vec![6]);
    assert_eq!(phase(&room), TurnPhase::RolledAwaitingMove);

    // Rolled a 6: extension on top of the running deadline.
    assert_eq!(room.next_move_time, Some(NOW + Duration::seconds(30)));

    // 4 has no legal move with every pawn in base, so the turn ends.
    let events = roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    assert!(events.contains(&GameEvent::TurnEnded {
        player_id: "alice".into(),
        reason: TurnEndReason::NoLegalMove,
    }));
    assert_eq!(mover_id(&room), Some("bob"));
    assert!(room.roll_history.is_empty());
}

#[test]
fn moving_out_with_a_six_lands_on_start_and_keeps_the_turn() {
    let mut room = two_humans().build();
    let dice = ScriptedDice::new([6]);
    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();

    let events = move_pawn(&mut room, Actor::Player("alice"), 0, None, NOW, timing()).unwrap();
    assert_eq!(room.pawn(0).map(|p| p.position), Some(Color::Red.start_cell()));
    assert!(events.contains(&GameEvent::BonusTurn {
        player_id: "alice".into(),
        reason: BonusReason::Six,
    }));
    assert_eq!(mover_id(&room), Some("alice"));
    assert_eq!(room.rolled_number, None);
    assert_eq!(room.next_move_time, Some(NOW + Duration::seconds(15)));
}

#[test]
fn second_roll_may_spend_the_banked_six_first() {
    let mut room = two_humans().pawn(1, 20).build();
    let dice = ScriptedDice::new([6, 3]);
    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    assert_eq!(room.roll_history, vec![6, 3]);

    // Spend the six on a base pawn.
    move_pawn(&mut room, Actor::Player("alice"), 0, Some(6), NOW, timing()).unwrap();
    assert_eq!(room.roll_history, vec![3]);
    assert_eq!(mover_id(&room), Some("alice"));

    // Then the 3, which now ends the turn.
    move_pawn(&mut room, Actor::Player("alice"), 1, Some(3), NOW, timing()).unwrap();
    assert_eq!(room.pawn(1).map(|p| p.position), Some(23));
    assert_eq!(mover_id(&room), Some("bob"));
    assert!(room.roll_history.is_empty());
}

#[test]
fn unknown_roll_is_rejected() {
    let mut room = two_humans().pawn(1, 20).rolls(&[3]).build();
    let err = move_pawn(&mut room, Actor::Player("alice"), 1, Some(5), NOW, timing()).unwrap_err();
    assert_eq!(err, RuleError::UnknownRoll(5));
}

#[test]
fn wrong_actor_and_wrong_color_are_rejected() {
    let mut room = two_humans().pawn(1, 20).rolls(&[3]).build();
    let dice = ScriptedDice::new([2]);

    assert_eq!(
        roll(&mut room, Actor::Player("bob"), &dice, NOW, timing()),
        Err(RuleError::NotYourTurn)
    );
    assert_eq!(
        roll(&mut room, Actor::Player("mallory"), &dice, NOW, timing()),
        Err(RuleError::UnknownPlayer)
    );
    assert_eq!(
        move_pawn(&mut room, Actor::Player("alice"), 4, None, NOW, timing()),
        Err(RuleError::NotYourPawn(4))
    );
    assert_eq!(
        move_pawn(&mut room, Actor::Player("alice"), 99, None, NOW, timing()),
        Err(RuleError::UnknownPawn(99))
    );
    // Pending 3 blocks another roll.
    assert_eq!(
        roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()),
        Err(RuleError::RollPending)
    );
    assert_eq!(dice.remaining(), 1);
}

#[test]
fn native_bot_cannot_use_the_human_path() {
    let mut room = RoomFixture::new("b").bot("bot").human("h").started().build();
    let dice = ScriptedDice::new([6]);
    assert_eq!(
        roll(&mut room, Actor::Player("bot"), &dice, NOW, timing()),
        Err(RuleError::BotMustUseAutomation)
    );
    // And automation cannot act for a human.
    let mut room = two_humans().build();
    assert_eq!(
        roll(&mut room, Actor::Automation, &dice, NOW, timing()),
        Err(RuleError::MoverNotAutomated)
    );
}

#[test]
fn three_sixes_forfeit_the_turn() {
    let mut room = two_humans().build();
    let dice = ScriptedDice::new([6, 6, 6]);
    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    let events = roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();

    assert!(events.contains(&GameEvent::TurnEnded {
        player_id: "alice".into(),
        reason: TurnEndReason::ThreeSixes,
    }));
    assert_eq!(mover_id(&room), Some("bob"));
    assert_eq!(room.rolled_number, None);
    assert!(room.roll_history.is_empty());
    assert!(room.pawns_of(Color::Red).all(|p| p.in_base()));
}

#[test]
fn three_sixes_forfeit_applies_to_automation() {
    let mut room = RoomFixture::new("b").bot("bot").human("h").started().build();
    let dice = ScriptedDice::new([6, 6, 6]);
    for _ in 0..3 {
        apply_bot_action(&mut room, BotAction::Roll, &dice, NOW, timing()).unwrap();
    }
    assert_eq!(mover_id(&room), Some("h"));
    assert!(room.roll_history.is_empty());
}

#[test]
fn capture_sends_victim_home_and_grants_bonus() {
    // Blue pawn 4 sits on 30 (not safe); red pawn 1 on 27 rolls a 3.
    let mut room = two_humans().pawn(4, 30).pawn(1, 27).rolls(&[3]).build();
    let events = move_pawn(&mut room, Actor::Player("alice"), 1, None, NOW, timing()).unwrap();

    assert_eq!(room.pawn(4).map(|p| p.position), Some(4));
    assert!(events.contains(&GameEvent::PawnCaptured {
        pawn_id: 4,
        color: Color::Blue,
        at: 30,
    }));
    assert!(events.contains(&GameEvent::BonusTurn {
        player_id: "alice".into(),
        reason: BonusReason::Capture,
    }));
    assert_eq!(mover_id(&room), Some("alice"));
    // Full window plus the capture extension.
    assert_eq!(room.next_move_time, Some(NOW + Duration::seconds(30)));
}

#[test]
fn no_capture_on_a_safe_cell() {
    // Blue pawn on yellow's start cell.
    let mut room = two_humans().pawn(4, 29).pawn(1, 26).rolls(&[3]).build();
    move_pawn(&mut room, Actor::Player("alice"), 1, None, NOW, timing()).unwrap();
    assert_eq!(room.pawn(4).map(|p| p.position), Some(29));
    assert_eq!(room.pawn(1).map(|p| p.position), Some(29));
    assert_eq!(mover_id(&room), Some("bob"));
}

#[test]
fn landing_on_a_star_grants_bonus() {
    let mut room = two_humans().pawn(1, 20).rolls(&[4]).build();
    let events = move_pawn(&mut room, Actor::Player("alice"), 1, None, NOW, timing()).unwrap();
    assert_eq!(room.pawn(1).map(|p| p.position), Some(24));
    assert!(events.contains(&GameEvent::BonusTurn {
        player_id: "alice".into(),
        reason: BonusReason::StarCell,
    }));
}

#[test]
fn last_pawn_home_wins_and_freezes_the_room() {
    let mut room = two_humans()
        .nearly_finished(Color::Red, 3, 70)
        .rolls(&[3])
        .build();
    let events = move_pawn(&mut room, Actor::Player("alice"), 3, None, NOW, timing()).unwrap();

    assert_eq!(events.last(), Some(&GameEvent::GameWon { color: Color::Red }));
    assert_eq!(room.winner, Some(Color::Red));
    assert!(room.players.iter().all(|p| !p.now_moving));
    assert_eq!(room.next_move_time, None);
    assert_eq!(phase(&room), TurnPhase::GameOver);

    let dice = ScriptedDice::new([1]);
    assert_eq!(
        roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()),
        Err(RuleError::GameOver)
    );
}

#[test]
fn missing_mover_is_healed_to_first_player() {
    let mut room = two_humans().build();
    for p in room.players.iter_mut() {
        p.now_moving = false;
    }
    let dice = ScriptedDice::new([2]);
    let events = roll(&mut room, Actor::Player("alice"), &dice, NOW, timing()).unwrap();
    assert_eq!(
        events.first(),
        Some(&GameEvent::MoverHealed {
            player_id: "alice".into()
        })
    );
    // 2 with everything in base ends the turn.
    assert_eq!(mover_id(&room), Some("bob"));
}

#[test]
fn empty_started_room_is_fatal() {
    let mut room = Room::new("empty");
    room.started = true;
    let dice = ScriptedDice::new([2]);
    let err = roll(&mut room, Actor::Automation, &dice, NOW, timing()).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn expired_human_becomes_bot_controlled() {
    let mut room = two_humans().build();
    let later = NOW + Duration::seconds(16);

    let events = expire_turn(&mut room, later).unwrap();
    assert_eq!(
        events,
        vec![GameEvent::BotTakeover {
            player_id: "alice".into()
        }]
    );
    assert!(room.bot_controlled_players.contains("alice"));
    assert!(room.mover_is_automated());
    assert_eq!(room.next_move_time, None);
    assert_eq!(mover_id(&room), Some("alice"));
}

#[test]
fn expiry_before_the_deadline_changes_nothing() {
    let mut room = two_humans().build();
    let before = room.clone();
    let events = expire_turn(&mut room, NOW + Duration::seconds(14)).unwrap();
    assert!(events.is_empty());
    assert_eq!(room, before);
}

#[test]
fn pass_is_refused_while_a_move_exists() {
    let mut room = RoomFixture::new("p")
        .bot("bot")
        .human("h")
        .started()
        .pawn(1, 20)
        .rolls(&[2])
        .build();
    let dice = ScriptedDice::new(Vec::new());
    assert_eq!(
        apply_bot_action(&mut room, BotAction::Pass, &dice, NOW, timing()),
        Err(RuleError::MoveAvailable)
    );
}

#[test]
fn bot_turns_never_carry_a_deadline() {
    let mut room = RoomFixture::new("d").bot("bot").human("h").started().build();
    let dice = ScriptedDice::new([6]);
    apply_bot_action(&mut room, BotAction::Roll, &dice, NOW, timing()).unwrap();
    assert_eq!(room.next_move_time, None);
    apply_bot_action(
        &mut room,
        BotAction::Move { pawn_id: 0, roll: 6 },
        &dice,
        NOW,
        timing(),
    )
    .unwrap();
    assert_eq!(room.next_move_time, None);
    assert_eq!(mover_id(&room), Some("bot"));
}
