//! Persistence gateway: fresh room reads, retrying compare-and-swap writes
//! and a short-lived listing cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, error, warn};

use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::room::{Room, RoomId, RoomSummary};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::RoomStore;

/// Saves attempted per mutation: the first try plus one retry on fresh data.
const SAVE_ATTEMPTS: usize = 2;

/// Result of running a mutation through the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Saved; `room.version` is the new stored version.
    Committed { room: Room, events: Vec<GameEvent> },
    /// The mutation left the room as it was, so nothing was written.
    Unchanged { room: Room },
    /// Refused by the rules; nothing was written.
    Rejected { room: Room, error: RuleError },
    /// Lost the version race twice; nothing was written.
    Conflicted,
}

pub struct RoomGateway {
    store: Arc<dyn RoomStore>,
    listing: Cache<(), Arc<Vec<RoomSummary>>>,
}

impl RoomGateway {
    pub fn new(store: Arc<dyn RoomStore>, listing_ttl: Duration) -> Self {
        let listing = Cache::builder()
            .max_capacity(1)
            .time_to_live(listing_ttl)
            .build();
        Self { store, listing }
    }

    pub async fn create_room(&self, room: Room) -> Result<Room, AppError> {
        let room = self.store.create_room(room).await?;
        self.listing.invalidate_all();
        debug!(room_id = room.id, name = %room.name, "Room created");
        Ok(room)
    }

    /// Always reads the store; turn logic never sees cached state.
    pub async fn load_room(&self, room_id: RoomId) -> Result<Option<Room>, AppError> {
        Ok(self.store.load_room(room_id).await?)
    }

    pub async fn require_room(&self, room_id: RoomId) -> Result<Room, AppError> {
        self.load_room(room_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found")).into()
        })
    }

    /// Room summaries, served from cache for up to the listing TTL.
    pub async fn list_rooms(&self) -> Result<Arc<Vec<RoomSummary>>, AppError> {
        if let Some(cached) = self.listing.get(&()).await {
            return Ok(cached);
        }
        let rooms = Arc::new(self.store.list_rooms().await?);
        self.listing.insert((), rooms.clone()).await;
        Ok(rooms)
    }

    /// Room summaries straight from the store, refreshing the cache.
    pub async fn list_rooms_fresh(&self) -> Result<Arc<Vec<RoomSummary>>, AppError> {
        self.listing.invalidate_all();
        self.list_rooms().await
    }

    /// Load, mutate and save one room.
    ///
    /// On a version conflict the mutation is re-run against a fresh load, so
    /// it re-validates against whatever won the race. A second conflict gives
    /// up and reports [`Mutation::Conflicted`]. Fatal rule errors (a started
    /// room with no players) are returned as `Err`.
    pub async fn mutate<F>(&self, room_id: RoomId, mut mutation: F) -> Result<Mutation, AppError>
    where
        F: FnMut(&mut Room) -> Result<Vec<GameEvent>, RuleError> + Send,
    {
        for attempt in 1..=SAVE_ATTEMPTS {
            let before = self.require_room(room_id).await?;
            let mut room = before.clone();

            let events = match mutation(&mut room) {
                Ok(events) => events,
                Err(error) if error.is_fatal() => {
                    error!(room_id, %error, "Room is unrecoverable");
                    return Err(DomainError::from(error).into());
                }
                Err(error) => {
                    return Ok(Mutation::Rejected {
                        room: before,
                        error,
                    })
                }
            };

            if room == before {
                return Ok(Mutation::Unchanged { room });
            }

            match self.store.save_room(&room).await {
                Ok(version) => {
                    room.version = version;
                    self.listing.invalidate_all();
                    debug!(room_id, version, events = events.len(), "Room saved");
                    return Ok(Mutation::Committed { room, events });
                }
                Err(e) if e.is_optimistic_lock() && attempt < SAVE_ATTEMPTS => {
                    warn!(room_id, attempt, "Save conflicted, retrying on fresh state");
                }
                Err(e) if e.is_optimistic_lock() => {
                    error!(room_id, attempts = attempt, "Save conflicted again, abandoning write");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(Mutation::Conflicted)
    }
}
