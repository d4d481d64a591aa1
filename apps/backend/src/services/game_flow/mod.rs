//! Game flow service - bridges the pure turn rules with persistence, timers,
//! broadcast and bot automation.
//!
//! Every public entry point takes the per-room lock for its whole duration,
//! automation included, so no two turn mutations for one room overlap.

mod bot_coordinator;
mod lobby;
mod mutation;
mod orchestration;
mod player_actions;

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::error;

use crate::ai::BotStrategy;
use crate::config::EngineConfig;
use crate::domain::dice::Dice;
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::room::{PlayerId, Room, RoomId};
use crate::domain::rules::TurnTiming;
use crate::realtime::BroadcastSink;
use crate::repos::RoomStore;
use crate::services::clock::Clock;
use crate::services::room_gateway::RoomGateway;
use crate::services::room_locks::RoomLocks;
use crate::services::settlement::SettlementHook;
use crate::services::turn_timers::{DeadlineHandler, TurnTimers};

/// What a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Saved and broadcast. `room` is the state right after this command,
    /// before any automation it triggered.
    Applied { room: Room, events: Vec<GameEvent> },
    /// Valid but changed nothing.
    Unchanged(Room),
    /// Refused by the rules; the room is untouched.
    Rejected(RuleError),
    /// Lost the save race twice; the room is untouched and the caller
    /// should re-query.
    Conflicted,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied { .. })
    }

    pub fn room(&self) -> Option<&Room> {
        match self {
            CommandOutcome::Applied { room, .. } | CommandOutcome::Unchanged(room) => Some(room),
            _ => None,
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        match self {
            CommandOutcome::Applied { events, .. } => events,
            _ => &[],
        }
    }

    pub fn rejection(&self) -> Option<&RuleError> {
        match self {
            CommandOutcome::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of seating a player or bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub player_id: PlayerId,
    pub outcome: CommandOutcome,
}

/// Collaborators the engine is assembled from.
pub struct EngineDeps {
    pub store: Arc<dyn RoomStore>,
    pub sink: Arc<dyn BroadcastSink>,
    pub settlement: Arc<dyn SettlementHook>,
    pub bot: Arc<dyn BotStrategy>,
    pub dice: Arc<dyn Dice>,
    pub clock: Arc<dyn Clock>,
    pub config: EngineConfig,
}

pub struct GameFlowService {
    me: Weak<GameFlowService>,
    gateway: RoomGateway,
    locks: RoomLocks,
    timers: TurnTimers,
    sink: Arc<dyn BroadcastSink>,
    settlement: Arc<dyn SettlementHook>,
    bot: Arc<dyn BotStrategy>,
    dice: Arc<dyn Dice>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    timing: TurnTiming,
}

impl GameFlowService {
    pub fn new(deps: EngineDeps) -> Arc<Self> {
        let timing = deps.config.turn_timing();
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            gateway: RoomGateway::new(deps.store, deps.config.listing_cache_ttl),
            locks: RoomLocks::new(),
            timers: TurnTimers::new(deps.clock.clone()),
            sink: deps.sink,
            settlement: deps.settlement,
            bot: deps.bot,
            dice: deps.dice,
            clock: deps.clock,
            config: deps.config,
            timing,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Deadline of the room's armed timer, if one is armed.
    pub fn armed_deadline(&self, room_id: RoomId) -> Option<OffsetDateTime> {
        self.timers.deadline(room_id)
    }

    pub fn armed_timer_count(&self) -> usize {
        self.timers.armed_count()
    }

    /// Rooms whose mutex is currently held or awaited.
    pub fn room_lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Cancel every armed timer. Rooms keep their stored deadlines, so
    /// [`GameFlowService::resume_rooms`] can pick them up again.
    pub fn shutdown(&self) {
        self.timers.cancel_all();
    }
}

#[async_trait]
impl DeadlineHandler for GameFlowService {
    async fn on_deadline(&self, room_id: RoomId) {
        if let Err(e) = self.handle_deadline(room_id).await {
            error!(room_id, error = %e, "Turn deadline handling failed");
        }
    }
}
