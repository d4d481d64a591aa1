//! Test support for the ludo backend.
//!
//! Shared logging bootstrap for unit and integration test binaries, plus
//! helpers that mint unique names so parallel tests never collide.

pub mod logging;
pub mod unique_helpers;
