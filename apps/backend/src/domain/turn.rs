//! Turn state machine.
//!
//! Every entry point takes the room by `&mut`, validates first and only then
//! mutates, so a returned `Err` always means "nothing happened". The caller
//! is expected to discard the room on error rather than persist it.
//!
//! Phases: `WaitingForRoll -> RolledAwaitingMove -> (advance | bonus)
//! -> WaitingForRoll`, with `GameOver` reachable from any of them.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::board::{apply_capture, compute_destination, has_finished, Color};
use crate::domain::dice::Dice;
use crate::domain::errors::RuleError;
use crate::domain::events::{GameEvent, TurnEndReason};
use crate::domain::room::{PawnId, Room};
use crate::domain::rules::{
    bonus_turn, has_legal_move, is_pending, may_roll, pending_rolls, three_sixes, TurnTiming, SIX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Lobby,
    WaitingForRoll,
    RolledAwaitingMove,
    GameOver,
}

pub fn phase(room: &Room) -> TurnPhase {
    if room.winner.is_some() {
        TurnPhase::GameOver
    } else if !room.started {
        TurnPhase::Lobby
    } else if room.rolled_number.is_some() {
        TurnPhase::RolledAwaitingMove
    } else {
        TurnPhase::WaitingForRoll
    }
}

/// Who is issuing a turn command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor<'a> {
    Player(&'a str),
    Automation,
}

/// A single automated decision, applied through the same entry points a
/// human command uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAction {
    Roll,
    Move { pawn_id: PawnId, roll: u8 },
    /// End the turn; only legal when no pending roll can move any pawn.
    Pass,
}

fn ensure_in_progress(room: &Room) -> Result<(), RuleError> {
    if room.winner.is_some() {
        return Err(RuleError::GameOver);
    }
    if !room.started {
        return Err(RuleError::NotStarted);
    }
    Ok(())
}

/// Restore the exactly-one-mover invariant.
///
/// A room with no mover gets its first player; extra movers are cleared.
/// Only an empty room is unrecoverable.
pub fn heal_mover(room: &mut Room, events: &mut Vec<GameEvent>) -> Result<usize, RuleError> {
    if room.players.is_empty() {
        return Err(RuleError::EmptyRoom);
    }
    match room.mover_index() {
        Some(idx) => {
            for p in room.players.iter_mut().skip(idx + 1) {
                if p.now_moving {
                    warn!(room_id = room.id, player_id = %p.id, "Clearing duplicate mover");
                    p.now_moving = false;
                }
            }
            Ok(idx)
        }
        None => {
            let first = &mut room.players[0];
            warn!(room_id = room.id, player_id = %first.id, "No player marked as mover, assigning first player");
            first.now_moving = true;
            events.push(GameEvent::MoverHealed {
                player_id: first.id.clone(),
            });
            Ok(0)
        }
    }
}

fn authorize(room: &Room, mover_idx: usize, actor: Actor<'_>) -> Result<(), RuleError> {
    let mover = &room.players[mover_idx];
    match actor {
        Actor::Player(id) => {
            if room.player(id).is_none() {
                return Err(RuleError::UnknownPlayer);
            }
            if mover.id != id {
                return Err(RuleError::NotYourTurn);
            }
            if mover.is_bot {
                return Err(RuleError::BotMustUseAutomation);
            }
        }
        Actor::Automation => {
            if !room.is_automated(mover) {
                return Err(RuleError::MoverNotAutomated);
            }
        }
    }
    Ok(())
}

/// Deadline for the current mover: humans get the full window, automated
/// movers none at all.
pub(crate) fn fresh_deadline(
    room: &Room,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Option<OffsetDateTime> {
    if room.mover_is_automated() {
        None
    } else {
        Some(now + timing.window)
    }
}

fn clear_roll_state(room: &mut Room) {
    room.rolled_number = None;
    room.roll_history.clear();
}

/// Hand the turn to the next player in join order.
pub fn advance_turn(
    room: &mut Room,
    now: OffsetDateTime,
    timing: TurnTiming,
    events: &mut Vec<GameEvent>,
) {
    if room.players.is_empty() {
        return;
    }
    let next = room
        .mover_index()
        .map(|i| (i + 1) % room.players.len())
        .unwrap_or(0);
    for p in room.players.iter_mut() {
        p.now_moving = false;
    }
    room.players[next].now_moving = true;
    clear_roll_state(room);
    room.next_move_time = fresh_deadline(room, now, timing);

    let player = &room.players[next];
    debug!(room_id = room.id, player_id = %player.id, color = %player.color, "Turn changed");
    events.push(GameEvent::TurnChanged {
        player_id: player.id.clone(),
    });
}

fn end_turn(
    room: &mut Room,
    player_id: String,
    reason: TurnEndReason,
    now: OffsetDateTime,
    timing: TurnTiming,
    events: &mut Vec<GameEvent>,
) {
    events.push(GameEvent::TurnEnded { player_id, reason });
    clear_roll_state(room);
    advance_turn(room, now, timing, events);
}

fn end_game(room: &mut Room, color: Color, events: &mut Vec<GameEvent>) {
    info!(room_id = room.id, color = %color, "Game won");
    room.winner = Some(color);
    for p in room.players.iter_mut() {
        p.now_moving = false;
    }
    clear_roll_state(room);
    room.next_move_time = None;
    events.push(GameEvent::GameWon { color });
}

/// Roll the die for the current mover.
pub fn roll(
    room: &mut Room,
    actor: Actor<'_>,
    dice: &dyn Dice,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    ensure_in_progress(room)?;
    let mut events = Vec::new();
    let idx = heal_mover(room, &mut events)?;
    authorize(room, idx, actor)?;
    if !may_roll(room.rolled_number) {
        return Err(RuleError::RollPending);
    }

    let mover = room.players[idx].clone();
    let automated = room.is_automated(&mover);
    let value = dice.roll();
    room.rolled_number = Some(value);
    room.roll_history.push(value);
    debug!(room_id = room.id, player_id = %mover.id, roll = value, history = ?room.roll_history, "Dice rolled");
    events.push(GameEvent::DiceRolled {
        player_id: mover.id.clone(),
        value,
    });

    if three_sixes(&room.roll_history) {
        info!(room_id = room.id, player_id = %mover.id, "Three sixes in a row, turn forfeited");
        end_turn(room, mover.id, TurnEndReason::ThreeSixes, now, timing, &mut events);
        return Ok(events);
    }

    if !has_legal_move(room, mover.color, value) {
        debug!(room_id = room.id, player_id = %mover.id, roll = value, "No legal move, ending turn");
        end_turn(room, mover.id, TurnEndReason::NoLegalMove, now, timing, &mut events);
        return Ok(events);
    }

    if value == SIX && !automated {
        let deadline = room.next_move_time.unwrap_or(now + timing.window);
        room.next_move_time = Some(deadline + timing.extension);
    }
    Ok(events)
}

/// Move one of the mover's pawns with a pending roll.
///
/// `chosen_roll` defaults to the current roll; any roll still in the
/// history may be spent instead.
pub fn move_pawn(
    room: &mut Room,
    actor: Actor<'_>,
    pawn_id: PawnId,
    chosen_roll: Option<u8>,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    ensure_in_progress(room)?;
    let mut events = Vec::new();
    let idx = heal_mover(room, &mut events)?;
    authorize(room, idx, actor)?;

    let roll = chosen_roll
        .or(room.rolled_number)
        .ok_or(RuleError::NoRollPending)?;
    if !is_pending(room, roll) {
        return Err(RuleError::UnknownRoll(roll));
    }

    let mover = room.players[idx].clone();
    let automated = room.is_automated(&mover);
    let pawn_idx = room
        .pawns
        .iter()
        .position(|p| p.id == pawn_id)
        .ok_or(RuleError::UnknownPawn(pawn_id))?;
    let pawn = &room.pawns[pawn_idx];
    if pawn.color != mover.color {
        return Err(RuleError::NotYourPawn(pawn_id));
    }
    let destination =
        compute_destination(pawn, roll).ok_or(RuleError::IllegalMove { pawn_id, roll })?;

    let from = pawn.position;
    room.pawns[pawn_idx].position = destination;
    events.push(GameEvent::PawnMoved {
        pawn_id,
        color: mover.color,
        from,
        to: destination,
        roll,
    });

    let captures = apply_capture(&mut room.pawns, destination, mover.color);
    for c in &captures {
        info!(room_id = room.id, color = %mover.color, captured = %c.color, at = c.at, "Pawn captured");
        events.push(GameEvent::PawnCaptured {
            pawn_id: c.pawn_id,
            color: c.color,
            at: c.at,
        });
    }

    if let Some(i) = room.roll_history.iter().position(|&r| r == roll) {
        room.roll_history.remove(i);
    }
    room.rolled_number = None;

    if has_finished(&room.pawns, mover.color) {
        end_game(room, mover.color, &mut events);
        return Ok(events);
    }

    let captured = !captures.is_empty();
    match bonus_turn(roll, &room.roll_history, captured, destination) {
        Some(reason) => {
            debug!(room_id = room.id, player_id = %mover.id, ?reason, "Bonus turn");
            room.next_move_time = if automated {
                None
            } else if captured {
                Some(now + timing.window + timing.extension)
            } else {
                Some(now + timing.window)
            };
            events.push(GameEvent::BonusTurn {
                player_id: mover.id,
                reason,
            });
        }
        None => {
            clear_roll_state(room);
            advance_turn(room, now, timing, &mut events);
        }
    }
    Ok(events)
}

/// Give up the rest of an automated turn when nothing pending can move.
pub fn pass(
    room: &mut Room,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    ensure_in_progress(room)?;
    let mut events = Vec::new();
    let idx = heal_mover(room, &mut events)?;
    authorize(room, idx, Actor::Automation)?;
    if room.rolled_number.is_none() {
        return Err(RuleError::NoRollPending);
    }
    let mover = room.players[idx].clone();
    if pending_rolls(room)
        .into_iter()
        .any(|r| has_legal_move(room, mover.color, r))
    {
        return Err(RuleError::MoveAvailable);
    }
    end_turn(room, mover.id, TurnEndReason::NoLegalMove, now, timing, &mut events);
    Ok(events)
}

/// Apply one automated decision.
pub fn apply_bot_action(
    room: &mut Room,
    action: BotAction,
    dice: &dyn Dice,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    match action {
        BotAction::Roll => roll(room, Actor::Automation, dice, now, timing),
        BotAction::Move { pawn_id, roll } => {
            move_pawn(room, Actor::Automation, pawn_id, Some(roll), now, timing)
        }
        BotAction::Pass => pass(room, now, timing),
    }
}

/// Handle a passed turn deadline.
///
/// Decides purely from the room as it is now. A deadline that has not
/// passed, or a finished room, yields no change. A plain human mover is
/// converted to bot-controlled for the rest of the game; automation then
/// plays the turn from wherever it stands.
pub fn expire_turn(room: &mut Room, now: OffsetDateTime) -> Result<Vec<GameEvent>, RuleError> {
    let mut events = Vec::new();
    if !room.in_progress() {
        return Ok(events);
    }
    match room.next_move_time {
        Some(deadline) if deadline <= now => {}
        _ => return Ok(events),
    }

    let idx = heal_mover(room, &mut events)?;
    room.next_move_time = None;
    let mover = room.players[idx].clone();
    if room.is_automated(&mover) {
        debug!(room_id = room.id, player_id = %mover.id, "Deadline passed for automated mover");
        return Ok(events);
    }

    info!(room_id = room.id, player_id = %mover.id, color = %mover.color, "Turn timed out, player is now bot-controlled");
    room.bot_controlled_players.insert(mover.id.clone());
    events.push(GameEvent::BotTakeover {
        player_id: mover.id,
    });
    Ok(events)
}
