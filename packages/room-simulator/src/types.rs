//! Shared types for the simulator.

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One record per line, written as rooms finish.
    Jsonl,
    /// A single array, written once every room is done.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    Furthest,
    Random,
}

impl Strategy {
    /// Name in the bot registry.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Furthest => "furthest",
            Strategy::Random => "random",
        }
    }
}
