//! Unique test data built on ULIDs.

use ulid::Ulid;

/// Generate a unique string in the form `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("room");
/// let b = unique_str("room");
/// assert_ne!(a, b);
/// assert!(a.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A room name that no other test will reuse.
pub fn unique_room_name() -> String {
    unique_str("room")
}

/// A display name for a joining player.
///
/// Kept short because player names show up in every log line of a test.
pub fn unique_player_name(prefix: &str) -> String {
    let id = Ulid::new().to_string();
    format!("{}-{}", prefix, &id[id.len() - 6..])
}
