//! Top-level simulation configuration.
//!
//! Loaded from a TOML file by the application crate (every key is optional)
//! and passed to the simulation builder.  Durations are plain seconds so the
//! file stays readable:
//!
//! ```toml
//! agent_count         = 5
//! think               = { min_secs = 0.5, max_secs = 2.0 }
//! eat                 = { min_secs = 0.5, max_secs = 1.0 }
//! hunger_timeout_secs = 15.0
//! duration_secs       = 30.0
//! poll_interval_secs  = 0.5
//! seed                = 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DpError, DpResult, TimeRange};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of philosophers, and therefore of slots in the ring.  At least 2.
    pub agent_count: usize,

    /// Thinking delay range.  Default: 0.5–2.0 s.
    pub think: TimeRange,

    /// Eating delay range.  Default: 0.5–1.0 s.
    pub eat: TimeRange,

    /// A philosopher that has not started a meal for longer than this is
    /// starving and stops the run.  Default: 15 s.
    pub hunger_timeout_secs: f64,

    /// Wall-clock budget for the whole run.  Default: 30 s.
    pub duration_secs: f64,

    /// How often the liveness monitor wakes up.  Default: 0.5 s.
    pub poll_interval_secs: f64,

    /// Master RNG seed for per-philosopher delay sampling.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count:         5,
            think:               TimeRange::new(0.5, 2.0),
            eat:                 TimeRange::new(0.5, 1.0),
            hunger_timeout_secs: 15.0,
            duration_secs:       30.0,
            poll_interval_secs:  0.5,
            seed:                42,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) TOML document.  Missing keys keep their
    /// defaults.  The result is validated.
    pub fn from_toml_str(s: &str) -> DpResult<Self> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> DpResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> DpResult<()> {
        if self.agent_count < 2 {
            return Err(DpError::Config(format!(
                "agent_count must be at least 2, got {}",
                self.agent_count
            )));
        }
        if u32::try_from(self.agent_count).is_err() {
            return Err(DpError::Config(format!(
                "agent_count {} does not fit a u32 id",
                self.agent_count
            )));
        }
        self.think.validate("think")?;
        self.eat.validate("eat")?;
        positive_secs("hunger_timeout_secs", self.hunger_timeout_secs)?;
        positive_secs("duration_secs", self.duration_secs)?;
        positive_secs("poll_interval_secs", self.poll_interval_secs)?;
        Ok(())
    }

    #[inline]
    pub fn hunger_timeout(&self) -> Duration {
        secs_to_duration(self.hunger_timeout_secs)
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        secs_to_duration(self.poll_interval_secs)
    }
}

/// Saturates instead of panicking; `validate` rejects the values that would saturate.
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn positive_secs(what: &str, secs: f64) -> DpResult<()> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(DpError::Config(format!(
            "{what} must be a positive number of seconds, got {secs}"
        )));
    }
    if Duration::try_from_secs_f64(secs).is_err() {
        return Err(DpError::Config(format!("{what} is too large: {secs} s")));
    }
    Ok(())
}
