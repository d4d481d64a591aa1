//! Error codes for the ludo backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and are what collaborators see.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// General validation error
    ValidationError,
    /// Room has no players and cannot run a turn
    EmptyRoom,
    /// Invalid engine configuration
    ConfigError,

    // Resource not found
    /// Room not found
    RoomNotFound,
    /// Player not found in room
    PlayerNotFound,
    /// General not found error
    NotFound,
    /// Record not found (DB-driven not-found)
    RecordNotFound,

    // Conflicts
    /// Optimistic lock conflict
    OptimisticLock,
    /// Unique constraint violation
    UniqueViolation,
    /// Generic conflict
    Conflict,

    // System errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Stored room document could not be decoded
    DataCorruption,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::EmptyRoom => "EMPTY_ROOM",
            Self::ConfigError => "CONFIG_ERROR",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::ValidationError,
        ErrorCode::EmptyRoom,
        ErrorCode::ConfigError,
        ErrorCode::RoomNotFound,
        ErrorCode::PlayerNotFound,
        ErrorCode::NotFound,
        ErrorCode::RecordNotFound,
        ErrorCode::OptimisticLock,
        ErrorCode::UniqueViolation,
        ErrorCode::Conflict,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::DbTimeout,
        ErrorCode::DataCorruption,
        ErrorCode::Internal,
    ];

    #[test]
    fn codes_are_unique_screaming_snake_case() {
        let mut seen = HashSet::new();
        for code in ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate code {s}");
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "{s} is not SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::OptimisticLock), "OPTIMISTIC_LOCK");
        assert_eq!(format!("{}", ErrorCode::RoomNotFound), "ROOM_NOT_FOUND");
    }
}
