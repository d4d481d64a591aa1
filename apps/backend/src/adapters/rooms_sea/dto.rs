//! DTOs for rooms_sea adapter.

/// DTO for inserting a new room row.
#[derive(Debug, Clone)]
pub struct RoomCreate {
    pub name: String,
    pub started: bool,
    pub winner: Option<String>,
    pub player_count: i32,
    pub document: String,
}

/// Full-row update guarded by the optimistic lock.
///
/// `expected_version` must match the stored `lock_version`; the adapter
/// bumps it by one on success.
#[derive(Debug, Clone)]
pub struct RoomUpdate {
    pub id: i64,
    pub name: String,
    pub started: bool,
    pub winner: Option<String>,
    pub player_count: i32,
    pub document: String,
    pub expected_version: i32,
}
