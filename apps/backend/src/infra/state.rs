use std::sync::Arc;

use crate::ai::{self, BotStrategy};
use crate::config::EngineConfig;
use crate::domain::dice::{Dice, RandomDice};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::realtime::{BroadcastSink, NullSink};
use crate::repos::{InMemoryRoomStore, RoomStore, SeaRoomStore};
use crate::services::clock::{Clock, TokioClock};
use crate::services::game_flow::{EngineDeps, GameFlowService};
use crate::services::settlement::{NoopSettlement, SettlementHook};

enum StoreChoice {
    Memory,
    Database(String),
    Custom(Arc<dyn RoomStore>),
}

/// Builder for the engine (used in tests, the simulator and hosts).
///
/// Defaults: in-memory store, no broadcast, no-op settlement, unseeded dice,
/// the configured bot strategy and a tokio-backed clock.
pub struct EngineBuilder {
    config: EngineConfig,
    store: StoreChoice,
    sink: Option<Arc<dyn BroadcastSink>>,
    settlement: Option<Arc<dyn SettlementHook>>,
    bot: Option<Arc<dyn BotStrategy>>,
    dice: Option<Arc<dyn Dice>>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: StoreChoice::Memory,
            sink: None,
            settlement: None,
            bot: None,
            dice: None,
            clock: None,
            seed: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the SeaORM store at `url`, creating its schema if needed.
    pub fn with_db(mut self, url: impl Into<String>) -> Self {
        self.store = StoreChoice::Database(url.into());
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RoomStore>) -> Self {
        self.store = StoreChoice::Custom(store);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn BroadcastSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_settlement(mut self, settlement: Arc<dyn SettlementHook>) -> Self {
        self.settlement = Some(settlement);
        self
    }

    pub fn with_bot(mut self, bot: Arc<dyn BotStrategy>) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn with_dice(mut self, dice: Arc<dyn Dice>) -> Self {
        self.dice = Some(dice);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seed for the default dice and the bot strategy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn build(self) -> Result<Arc<GameFlowService>, AppError> {
        self.config.validate()?;

        let store: Arc<dyn RoomStore> = match self.store {
            StoreChoice::Memory => Arc::new(InMemoryRoomStore::new()),
            StoreChoice::Database(url) => Arc::new(SeaRoomStore::new(bootstrap_db(&url).await?)),
            StoreChoice::Custom(store) => store,
        };

        let bot = match self.bot {
            Some(bot) => bot,
            None => {
                let bot = ai::create_bot(&self.config.bot_strategy, self.seed).ok_or_else(|| {
                    AppError::config(format!(
                        "Unknown bot strategy '{}'",
                        self.config.bot_strategy
                    ))
                })?;
                Arc::from(bot)
            }
        };

        let seed = self.seed;
        Ok(GameFlowService::new(EngineDeps {
            store,
            sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
            settlement: self.settlement.unwrap_or_else(|| Arc::new(NoopSettlement)),
            bot,
            dice: self
                .dice
                .unwrap_or_else(|| Arc::new(RandomDice::new(seed))),
            clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock::new())),
            config: self.config,
        }))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_engine() -> EngineBuilder {
    EngineBuilder::new()
}
