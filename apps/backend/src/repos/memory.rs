//! Process-local room store for tests and the simulator.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::rooms::RoomStore;
use crate::domain::room::{Room, RoomId, RoomSummary};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

pub struct InMemoryRoomStore {
    rooms: DashMap<RoomId, Room>,
    next_id: AtomicI64,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(&self, mut room: Room) -> Result<Room, DomainError> {
        room.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        room.version = 1;
        self.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn load_room(&self, room_id: RoomId) -> Result<Option<Room>, DomainError> {
        Ok(self.rooms.get(&room_id).map(|r| r.clone()))
    }

    async fn save_room(&self, room: &Room) -> Result<i32, DomainError> {
        let mut stored = self.rooms.get_mut(&room.id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("Room {} not found", room.id))
        })?;
        if stored.version != room.version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Room was modified concurrently (expected version {}, actual version {})",
                    room.version, stored.version
                ),
            ));
        }
        let version = room.version + 1;
        *stored = Room {
            version,
            ..room.clone()
        };
        Ok(version)
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, DomainError> {
        let mut rooms: Vec<RoomSummary> = self.rooms.iter().map(|r| r.summary()).collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }
}
