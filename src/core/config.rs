

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, TruncateError};
use crate::db::RequestPriority;
use crate::{DEFAULT_POLL_MULTIPLIER, DEFAULT_STALENESS_SECS};


const ENV_PREFIX: &str = "TRUNCATE";

const STALENESS_ENV: &str = "TRUNCATE_STALENESS_SECS";
const POLL_MULTIPLIER_ENV: &str = "TRUNCATE_POLL_MULTIPLIER";
const PRIORITY_ENV: &str = "TRUNCATE_PRIORITY";


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncateConfig {
    /// Exact staleness of the row-count reads, in seconds.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,

    /// The poller sleeps this many times the duration of the last count query.
    #[serde(default = "default_poll_multiplier")]
    pub poll_multiplier: u32,

    /// Priority for tables whose options leave it unset. Read from the
    /// `priority` key (`TRUNCATE_PRIORITY`), by name or wire integer.
    #[serde(default, rename = "priority")]
    pub default_priority: RequestPriority,
}

fn default_staleness_secs() -> u64 { DEFAULT_STALENESS_SECS }
fn default_poll_multiplier() -> u32 { DEFAULT_POLL_MULTIPLIER }

impl TruncateConfig {

    pub fn new() -> Self {
        Self {
            staleness_secs: default_staleness_secs(),
            poll_multiplier: default_poll_multiplier(),
            default_priority: RequestPriority::default(),
        }
    }


    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }


    /// Reads the same `TRUNCATE_*` variables as [`TruncateConfig::load`], but
    /// keeps the default for any variable that is missing or invalid.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(secs) = std::env::var(STALENESS_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.staleness_secs = secs;
        }
        if let Some(multiplier) = std::env::var(POLL_MULTIPLIER_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|m: &u32| *m > 0)
        {
            config.poll_multiplier = multiplier;
        }
        if let Some(priority) = std::env::var(PRIORITY_ENV)
            .ok()
            .and_then(|v| parse_priority(&v))
        {
            config.default_priority = priority;
        }

        config
    }

    /// Layers defaults, an optional config file and `TRUNCATE_*` environment
    /// variables, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .set_default("staleness_secs", default_staleness_secs() as i64)?
            .set_default("poll_multiplier", default_poll_multiplier() as i64)?
            .set_default("priority", RequestPriority::default().as_str())?;

        if let Some(path) = path {
            debug!("Loading truncate config from {}", path.display());
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }


    pub fn validate(&self) -> Result<()> {
        if self.poll_multiplier == 0 {
            return Err(TruncateError::Configuration(
                "poll_multiplier must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_priority(value: &str) -> Option<RequestPriority> {
    match value.trim().parse::<i32>() {
        Ok(code) => RequestPriority::try_from(code).ok(),
        Err(_) => value.trim().parse().ok(),
    }
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self::new()
    }
}
