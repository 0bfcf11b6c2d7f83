//! Simulation configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`SimulationConfig::capacity`].
pub const ENV_CAPACITY: &str = "CAR_PARK_CAPACITY";
/// Environment variable overriding [`SimulationConfig::tick_ms`].
pub const ENV_TICK_MS: &str = "CAR_PARK_TICK_MS";
/// Environment variable overriding [`SimulationConfig::arrival_probability`].
pub const ENV_ARRIVAL_PROBABILITY: &str = "CAR_PARK_ARRIVAL_PROBABILITY";
/// Environment variable overriding [`SimulationConfig::departure_probability`].
pub const ENV_DEPARTURE_PROBABILITY: &str = "CAR_PARK_DEPARTURE_PROBABILITY";
/// Environment variable overriding [`SimulationConfig::seed`].
pub const ENV_SEED: &str = "CAR_PARK_SEED";

/// Car park simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of bays.
    pub capacity: usize,
    /// Interval between arrival/departure attempts, in milliseconds.
    pub tick_ms: u64,
    /// Chance that an arrival tick tries to park a car.
    pub arrival_probability: f64,
    /// Chance that a departure tick tries to remove a car.
    pub departure_probability: f64,
    /// Seed for all randomness; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// How long to wait for arrival/departure threads after quitting.
    pub join_timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            tick_ms: 500,
            arrival_probability: 0.6,
            departure_probability: 0.4,
            seed: None,
            join_timeout_ms: 2000,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.tick_ms == 0 {
            return Err("tick_ms must be greater than 0".into());
        }
        for (name, p) in [
            ("arrival_probability", self.arrival_probability),
            ("departure_probability", self.departure_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        Ok(())
    }

    /// Tick interval as a duration.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Join timeout as a duration.
    #[must_use]
    pub const fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a description of the read, parse or validation failure.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Apply `CAR_PARK_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a description of the first variable that fails to parse.
    pub fn apply_env(self) -> Result<Self, String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `CAR_PARK_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first value that fails to parse.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, String>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim()
                .parse()
                .map_err(|e| format!("{key}={raw:?} is invalid: {e}"))
        }

        if let Some(raw) = lookup(ENV_CAPACITY) {
            self.capacity = parse(ENV_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TICK_MS) {
            self.tick_ms = parse(ENV_TICK_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ARRIVAL_PROBABILITY) {
            self.arrival_probability = parse(ENV_ARRIVAL_PROBABILITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEPARTURE_PROBABILITY) {
            self.departure_probability = parse(ENV_DEPARTURE_PROBABILITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = Some(parse(ENV_SEED, &raw)?);
        }
        Ok(self)
    }
}
