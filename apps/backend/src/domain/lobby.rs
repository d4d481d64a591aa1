//! Lobby transitions: joining, readiness and game start.

use time::OffsetDateTime;
use tracing::info;

use crate::domain::board::Color;
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::room::{Player, PlayerId, Room, MAX_PLAYERS, MIN_PLAYERS_TO_START};
use crate::domain::rules::TurnTiming;
use crate::domain::turn::fresh_deadline;

/// Seat a new player. Colors follow join order. Bots join ready.
pub fn add_player(
    room: &mut Room,
    player_id: PlayerId,
    name: impl Into<String>,
    is_bot: bool,
) -> Result<Vec<GameEvent>, RuleError> {
    if room.started {
        return Err(RuleError::AlreadyStarted);
    }
    if room.players.len() >= MAX_PLAYERS {
        return Err(RuleError::RoomFull);
    }
    let color = Color::for_seat(room.players.len()).ok_or(RuleError::RoomFull)?;
    room.players.push(Player {
        id: player_id.clone(),
        name: name.into(),
        color,
        is_bot,
        ready: is_bot,
        now_moving: false,
    });
    Ok(vec![GameEvent::PlayerJoined {
        player_id,
        color,
        is_bot,
    }])
}

pub fn ready_count(room: &Room) -> usize {
    room.players.iter().filter(|p| p.ready).count()
}

/// Toggle a player's ready flag; the game starts as soon as enough
/// players are ready.
pub fn toggle_ready(
    room: &mut Room,
    player_id: &str,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    if room.started {
        return Err(RuleError::AlreadyStarted);
    }
    let player = room
        .players
        .iter_mut()
        .find(|p| p.id == player_id)
        .ok_or(RuleError::UnknownPlayer)?;
    player.ready = !player.ready;
    let mut events = vec![GameEvent::ReadyChanged {
        player_id: player.id.clone(),
        ready: player.ready,
    }];

    if ready_count(room) >= MIN_PLAYERS_TO_START {
        events.extend(start_game(room, now, timing)?);
    }
    Ok(events)
}

/// Start the game: everyone becomes ready and the first joiner moves.
pub fn start_game(
    room: &mut Room,
    now: OffsetDateTime,
    timing: TurnTiming,
) -> Result<Vec<GameEvent>, RuleError> {
    if room.started {
        return Err(RuleError::AlreadyStarted);
    }
    if ready_count(room) < MIN_PLAYERS_TO_START {
        return Err(RuleError::NotEnoughReady);
    }

    room.started = true;
    room.rolled_number = None;
    room.roll_history.clear();
    for (i, p) in room.players.iter_mut().enumerate() {
        p.ready = true;
        p.now_moving = i == 0;
    }
    room.next_move_time = fresh_deadline(room, now, timing);

    let first = room.players[0].id.clone();
    info!(room_id = room.id, players = room.players.len(), first_mover = %first, "Game started");
    Ok(vec![GameEvent::GameStarted { first_mover: first }])
}
