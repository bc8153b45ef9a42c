//! Service configuration from the environment.

use rps_game_core::arbiter::DEFAULT_REVEAL_TIMEOUT_SECS;
use rps_game_core::ArbiterConfig;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STARTING_BALANCE: u64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `PORT`
    pub port: u16,
    /// `REVEAL_TIMEOUT_SECS`
    pub reveal_timeout_secs: u64,
    /// `STARTING_BALANCE`: value credited to each newly opened account
    pub starting_balance: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            reveal_timeout_secs: DEFAULT_REVEAL_TIMEOUT_SECS,
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_var(&lookup, "PORT", defaults.port)?,
            reveal_timeout_secs: parse_var(
                &lookup,
                "REVEAL_TIMEOUT_SECS",
                defaults.reveal_timeout_secs,
            )?,
            starting_balance: parse_var(&lookup, "STARTING_BALANCE", defaults.starting_balance)?,
        })
    }

    pub fn arbiter_config(&self) -> ArbiterConfig {
        ArbiterConfig::with_reveal_timeout(self.reveal_timeout_secs)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.arbiter_config().reveal_timeout_secs, 86_400);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("REVEAL_TIMEOUT_SECS", " 120 "),
            ("STARTING_BALANCE", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.reveal_timeout_secs, 120);
        assert_eq!(config.starting_balance, 5);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("PORT", "seventy")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "seventy".to_string()
            }
        );
    }
}
