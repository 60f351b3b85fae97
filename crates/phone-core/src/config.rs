//! Phone configuration
//!
//! Timer delays, the transition policy and event channel sizing. Values come
//! from [`Default`], the `MOCKPHONE_*` environment variables, a JSON file, or
//! the `with_*` builder methods, in whatever order the caller layers them.
//!
//! ```rust
//! use mockphone_core::config::{PhoneConfig, TransitionPolicy};
//! use std::time::Duration;
//!
//! let config = PhoneConfig::new()
//!     .with_blocked_clear_delay(Duration::from_millis(500))
//!     .with_transition_policy(TransitionPolicy::Strict)
//!     .without_simulated_incoming();
//!
//! assert!(config.validate().is_ok());
//! assert!(!config.simulate_incoming);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PhoneError, PhoneResult};

/// How the controller answers commands that are illegal in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Ignore the command and report it as ignored
    #[default]
    Permissive,
    /// Reject the command with `PhoneError::InvalidTransition`
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(PhoneError::config(format!("Unknown transition policy: {}", other))),
        }
    }
}

/// Main phone configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneConfig {
    /// How long the blocked screen stays up before clearing itself
    #[serde(with = "millis")]
    pub blocked_clear_delay: Duration,
    /// Delay from start until the simulated incoming call rings
    #[serde(with = "millis")]
    pub incoming_call_delay: Duration,
    /// Period of the active-call duration ticker
    #[serde(with = "millis")]
    pub duration_tick_interval: Duration,
    /// Whether the controller schedules the simulated incoming call
    pub simulate_incoming: bool,
    pub transition_policy: TransitionPolicy,
    /// Broadcast channel capacity for phone events
    pub event_capacity: usize,
    /// Seed for the incoming-call contact choice; random when absent
    pub rng_seed: Option<u64>,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            blocked_clear_delay: Duration::from_secs(3),
            incoming_call_delay: Duration::from_secs(5),
            duration_tick_interval: Duration::from_secs(1),
            simulate_incoming: true,
            transition_policy: TransitionPolicy::Permissive,
            event_capacity: 256,
            rng_seed: None,
        }
    }
}

impl PhoneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocked_clear_delay(mut self, delay: Duration) -> Self {
        self.blocked_clear_delay = delay;
        self
    }

    pub fn with_incoming_call_delay(mut self, delay: Duration) -> Self {
        self.incoming_call_delay = delay;
        self
    }

    pub fn with_duration_tick_interval(mut self, interval: Duration) -> Self {
        self.duration_tick_interval = interval;
        self
    }

    pub fn without_simulated_incoming(mut self) -> Self {
        self.simulate_incoming = false;
        self
    }

    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> PhoneResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by any `MOCKPHONE_*` variables that are set
    pub fn from_env() -> PhoneResult<Self> {
        Self::default().merge_env()
    }

    /// Apply `MOCKPHONE_*` environment overrides on top of `self`
    pub fn merge_env(mut self) -> PhoneResult<Self> {
        if let Some(ms) = env_parse::<u64>("MOCKPHONE_BLOCKED_CLEAR_MS")? {
            self.blocked_clear_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("MOCKPHONE_INCOMING_DELAY_MS")? {
            self.incoming_call_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("MOCKPHONE_TICK_MS")? {
            self.duration_tick_interval = Duration::from_millis(ms);
        }
        if let Some(enabled) = env_parse::<bool>("MOCKPHONE_SIMULATE_INCOMING")? {
            self.simulate_incoming = enabled;
        }
        if let Some(policy) = env_parse::<TransitionPolicy>("MOCKPHONE_TRANSITION_POLICY")? {
            self.transition_policy = policy;
        }
        if let Some(seed) = env_parse::<u64>("MOCKPHONE_SEED")? {
            self.rng_seed = Some(seed);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> PhoneResult<()> {
        if self.duration_tick_interval.is_zero() {
            return Err(PhoneError::config("Duration tick interval must be greater than zero"));
        }
        if self.event_capacity == 0 {
            return Err(PhoneError::config("Event capacity must be greater than zero"));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str) -> PhoneResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PhoneError::config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

mod millis {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{:?} does not fit in u64 milliseconds", d)))?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
