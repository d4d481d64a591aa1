pub mod db;
pub mod engine;

pub use engine::EngineConfig;
