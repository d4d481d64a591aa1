//! Engine assembly for integration tests.

use std::sync::Arc;

use ludo_backend::config::EngineConfig;
use ludo_backend::domain::{Room, ScriptedDice};
use ludo_backend::infra::state::{build_engine, EngineBuilder};
use ludo_backend::repos::{InMemoryRoomStore, RoomStore};
use ludo_backend::services::game_flow::GameFlowService;

use super::recording::{RecordingSettlement, RecordingSink};

pub struct Harness {
    pub engine: Arc<GameFlowService>,
    pub store: Arc<InMemoryRoomStore>,
    pub sink: Arc<RecordingSink>,
    pub settlement: Arc<RecordingSettlement>,
    pub dice: Arc<ScriptedDice>,
}

impl Harness {
    /// Engine over an in-memory store with scripted dice. Once the script
    /// is used up every roll is a 1.
    pub async fn new(faces: impl IntoIterator<Item = u8>) -> Harness {
        Self::with_config(faces, EngineConfig::default()).await
    }

    /// Engine whose dice only ever roll 1.
    pub async fn idle() -> Harness {
        Self::new(Vec::<u8>::new()).await
    }

    pub async fn with_config(faces: impl IntoIterator<Item = u8>, config: EngineConfig) -> Harness {
        Self::from_builder(faces, build_engine().with_config(config)).await
    }

    pub async fn from_builder(
        faces: impl IntoIterator<Item = u8>,
        builder: EngineBuilder,
    ) -> Harness {
        let store = Arc::new(InMemoryRoomStore::new());
        let sink = Arc::new(RecordingSink::default());
        let settlement = Arc::new(RecordingSettlement::default());
        let dice = Arc::new(ScriptedDice::new(faces));

        let engine = builder
            .with_store(store.clone())
            .with_sink(sink.clone())
            .with_settlement(settlement.clone())
            .with_dice(dice.clone())
            .build()
            .await
            .expect("engine builds");

        Harness {
            engine,
            store,
            sink,
            settlement,
            dice,
        }
    }

    /// Store a hand-built room directly, bypassing the engine.
    pub async fn seed(&self, room: Room) -> Room {
        self.store.create_room(room).await.expect("seed room")
    }
}
