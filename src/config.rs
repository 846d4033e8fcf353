use crate::{allocator::AllocatorConfig, autosave::AutosaveConfig, error::ConfigError};
use std::{net::SocketAddr, path::PathBuf};

pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";

const ADDR_VAR: &str = "WORLD_ADDR";
const MAX_PROBES_VAR: &str = "WORLD_MAX_PROBES";
const SNAPSHOT_VAR: &str = "WORLD_SNAPSHOT";
const AUTOSAVE_VAR: &str = "WORLD_AUTOSAVE_SECS";

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub allocator: AllocatorConfig,
    /// Where the world is loaded from at startup and saved to on shutdown.
    pub snapshot: Option<PathBuf>,
    /// Only used when `snapshot` is set.
    pub autosave: AutosaveConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr_value = read(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value.parse::<SocketAddr>().map_err(|_| ConfigError::Address {
            var: ADDR_VAR,
            value: addr_value.clone(),
        })?;

        let max_probes = match read(MAX_PROBES_VAR) {
            Some(value) => match value.parse::<u32>() {
                Ok(probes) if probes > 0 => Some(probes),
                _ => {
                    return Err(ConfigError::Number {
                        var: MAX_PROBES_VAR,
                        value,
                    })
                }
            },
            None => None,
        };

        let interval_seconds = match read(AUTOSAVE_VAR) {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Seconds {
                var: AUTOSAVE_VAR,
                value: value.clone(),
            })?,
            None => 0,
        };

        Ok(Self {
            addr,
            allocator: AllocatorConfig { max_probes },
            snapshot: read(SNAPSHOT_VAR).map(PathBuf::from),
            autosave: AutosaveConfig { interval_seconds },
        })
    }
}
