//! Infrastructure layer - database, engine assembly, and error handling.

pub mod db;
pub mod db_errors;
pub mod state;
