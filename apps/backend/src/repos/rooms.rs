//! Room repository: the store trait and its SeaORM backend.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::adapters::rooms_sea as rooms_adapter;
use crate::domain::board::Color;
use crate::domain::room::{Room, RoomId, RoomSummary};
use crate::entities::rooms;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Durable room storage.
///
/// Every save is a compare-and-swap on `Room::version`; a stale version
/// fails with `ConflictKind::OptimisticLock` and leaves the stored room
/// untouched.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a new room. The returned copy carries the assigned id and version 1.
    async fn create_room(&self, room: Room) -> Result<Room, DomainError>;

    async fn load_room(&self, room_id: RoomId) -> Result<Option<Room>, DomainError>;

    /// Save `room` if the stored version still equals `room.version`.
    /// Returns the new version.
    async fn save_room(&self, room: &Room) -> Result<i32, DomainError>;

    /// Summaries of every room, oldest first.
    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, DomainError>;
}

/// Rooms table over SeaORM. Works with Postgres and SQLite.
#[derive(Clone)]
pub struct SeaRoomStore {
    conn: DatabaseConnection,
}

impl SeaRoomStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

fn encode(room: &Room) -> Result<String, DomainError> {
    serde_json::to_string(room).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Serialize".into()),
            format!("Failed to serialize room {}: {e}", room.id),
        )
    })
}

fn decode(row: rooms::Model) -> Result<Room, DomainError> {
    let mut room: Room = serde_json::from_str(&row.document).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Room {} document is unreadable: {e}", row.id),
        )
    })?;
    // Row columns are authoritative for identity and version.
    room.id = row.id;
    room.version = row.lock_version;
    Ok(room)
}

impl From<rooms::Model> for RoomSummary {
    fn from(row: rooms::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            player_count: usize::try_from(row.player_count).unwrap_or_default(),
            started: row.started,
            winner: row.winner.as_deref().and_then(Color::parse),
        }
    }
}

fn player_count(room: &Room) -> i32 {
    i32::try_from(room.players.len()).unwrap_or(i32::MAX)
}

#[async_trait]
impl RoomStore for SeaRoomStore {
    async fn create_room(&self, room: Room) -> Result<Room, DomainError> {
        let row = rooms_adapter::create_room(
            &self.conn,
            rooms_adapter::RoomCreate {
                name: room.name.clone(),
                started: room.started,
                winner: room.winner.map(|c| c.as_str().to_string()),
                player_count: player_count(&room),
                document: encode(&room)?,
            },
        )
        .await?;
        Ok(Room {
            id: row.id,
            version: row.lock_version,
            ..room
        })
    }

    async fn load_room(&self, room_id: RoomId) -> Result<Option<Room>, DomainError> {
        let row = rooms_adapter::find_by_id(&self.conn, room_id).await?;
        row.map(decode).transpose()
    }

    async fn save_room(&self, room: &Room) -> Result<i32, DomainError> {
        let row = rooms_adapter::update_room(
            &self.conn,
            rooms_adapter::RoomUpdate {
                id: room.id,
                name: room.name.clone(),
                started: room.started,
                winner: room.winner.map(|c| c.as_str().to_string()),
                player_count: player_count(room),
                document: encode(room)?,
                expected_version: room.version,
            },
        )
        .await?;
        Ok(row.lock_version)
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, DomainError> {
        let rows = rooms_adapter::list_all(&self.conn).await?;
        Ok(rows.into_iter().map(RoomSummary::from).collect())
    }
}
