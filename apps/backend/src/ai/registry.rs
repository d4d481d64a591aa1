//! Static registry of bot strategies.
//!
//! Add a strategy by implementing `BotStrategy` and appending a
//! `BotFactory` entry with a stable `name`. Same seed means same play.

use crate::ai::{BotStrategy, Furthest, RandomBot};

/// Factory definition for constructing bot strategies.
pub struct BotFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn BotStrategy>,
}

static BOT_FACTORIES: &[BotFactory] = &[
    BotFactory {
        name: Furthest::NAME,
        version: Furthest::VERSION,
        make: make_furthest,
    },
    BotFactory {
        name: RandomBot::NAME,
        version: RandomBot::VERSION,
        make: make_random,
    },
];

/// Returns the statically registered bot factories.
pub fn registered_bots() -> &'static [BotFactory] {
    BOT_FACTORIES
}

/// Finds a registered bot factory by its name.
pub fn by_name(name: &str) -> Option<&'static BotFactory> {
    registered_bots().iter().find(|factory| factory.name == name)
}

fn make_furthest(_seed: Option<u64>) -> Box<dyn BotStrategy> {
    Box::new(Furthest)
}

fn make_random(seed: Option<u64>) -> Box<dyn BotStrategy> {
    Box::new(RandomBot::new(seed))
}
