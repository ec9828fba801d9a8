use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_GENESIS_DATA};

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub genesis_data: String,
    pub mining_timeout: Duration,
    /// Highest difficulty the HTTP API lets clients set.
    pub max_api_difficulty: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            difficulty: DEFAULT_DIFFICULTY,
            genesis_data: DEFAULT_GENESIS_DATA.to_string(),
            mining_timeout: Duration::from_secs(30),
            max_api_difficulty: 24,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            difficulty: parse_or(&lookup, "DIFFICULTY", defaults.difficulty),
            genesis_data: lookup("GENESIS_DATA").unwrap_or(defaults.genesis_data),
            mining_timeout: Duration::from_secs(parse_or(
                &lookup,
                "MINING_TIMEOUT_SECS",
                defaults.mining_timeout.as_secs(),
            )),
            max_api_difficulty: parse_or(
                &lookup,
                "MAX_API_DIFFICULTY",
                defaults.max_api_difficulty,
            ),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config_from(&[]);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 3001);
        assert_eq!(c.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(c.genesis_data, "genesis block");
        assert_eq!(c.mining_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_and_bad_values() {
        let c = config_from(&[
            ("PORT", "8080"),
            ("DIFFICULTY", "abc"),
            ("GENESIS_DATA", "my genesis block!!"),
            ("MINING_TIMEOUT_SECS", " 5 "),
        ]);
        assert_eq!(c.port, 8080);
        assert_eq!(c.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(c.genesis_data, "my genesis block!!");
        assert_eq!(c.mining_timeout, Duration::from_secs(5));
    }
}
