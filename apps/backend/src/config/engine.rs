//! Engine tuning knobs.

use std::env;
use std::time::Duration;

use crate::ai::registry;
use crate::domain::rules::TurnTiming;
use crate::error::AppError;

pub const DEFAULT_TURN_WINDOW: Duration = Duration::from_secs(15);
pub const DEFAULT_TURN_EXTENSION: Duration = Duration::from_secs(15);
pub const DEFAULT_LISTING_CACHE_TTL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_AUTOMATION_STEPS: usize = 5000;
pub const DEFAULT_BOT_STRATEGY: &str = "furthest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time a human mover gets per turn and per bonus turn.
    pub turn_window: Duration,
    /// Added to the deadline on a six or a capture.
    pub turn_extension: Duration,
    pub listing_cache_ttl: Duration,
    /// Upper bound on committed automation steps in one drive.
    pub max_automation_steps: usize,
    /// Registry name of the bot strategy.
    pub bot_strategy: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_window: DEFAULT_TURN_WINDOW,
            turn_extension: DEFAULT_TURN_EXTENSION,
            listing_cache_ttl: DEFAULT_LISTING_CACHE_TTL,
            max_automation_steps: DEFAULT_MAX_AUTOMATION_STEPS,
            bot_strategy: DEFAULT_BOT_STRATEGY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `LUDO_*` variables that are set.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let cfg = Self {
            turn_window: millis_var("LUDO_TURN_WINDOW_MS")?.unwrap_or(defaults.turn_window),
            turn_extension: millis_var("LUDO_TURN_EXTENSION_MS")?
                .unwrap_or(defaults.turn_extension),
            listing_cache_ttl: millis_var("LUDO_LISTING_CACHE_TTL_MS")?
                .unwrap_or(defaults.listing_cache_ttl),
            max_automation_steps: parse_var::<usize>("LUDO_MAX_AUTOMATION_STEPS")?
                .unwrap_or(defaults.max_automation_steps),
            bot_strategy: env::var("LUDO_BOT_STRATEGY").unwrap_or(defaults.bot_strategy),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.turn_window.is_zero() {
            return Err(AppError::config("Turn window must be greater than zero"));
        }
        if self.max_automation_steps == 0 {
            return Err(AppError::config(
                "LUDO_MAX_AUTOMATION_STEPS must be greater than zero",
            ));
        }
        if registry::by_name(&self.bot_strategy).is_none() {
            return Err(AppError::config(format!(
                "Unknown bot strategy '{}'",
                self.bot_strategy
            )));
        }
        Ok(())
    }

    /// Deadline arithmetic for the pure turn rules.
    pub fn turn_timing(&self) -> TurnTiming {
        TurnTiming {
            window: to_time(self.turn_window),
            extension: to_time(self.turn_extension),
        }
    }
}

fn to_time(d: Duration) -> time::Duration {
    time::Duration::try_from(d).unwrap_or(time::Duration::MAX)
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
        }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn millis_var(name: &str) -> Result<Option<Duration>, AppError> {
    Ok(parse_var::<u64>(name)?.map(Duration::from_millis))
}
