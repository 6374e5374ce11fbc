//! Runtime configuration read from the environment.
//!
//! The binary loads a `.env` file first (via `dotenvy`), so any of these can be
//! set there instead.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub db_max_connections: u32,
    /// Requests allowed per client address within `rate_limit_window`.
    pub rate_limit_max_requests: usize,
    pub rate_limit_window: Duration,
    pub session_inactivity_hours: i64,
    pub bcrypt_cost: u32,
    /// Insert the sample students and reference data into an empty database.
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://student_portal.db?mode=rwc".to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            db_max_connections: 10,
            rate_limit_max_requests: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            session_inactivity_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_sample_data: true,
        }
    }
}

/// bcrypt rejects work factors outside this range.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// One hour up to one year.
pub const SESSION_INACTIVITY_HOURS_RANGE: RangeInclusive<i64> = 1..=24 * 365;

impl Config {
    /// Reads every setting from the environment, falling back to the defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let vars = Vars(lookup);
        Ok(Self {
            database_url: vars
                .raw("DATABASE_URL")
                .unwrap_or(defaults.database_url),
            host: vars.parse("HOST", defaults.host)?,
            port: vars.parse("PORT", defaults.port)?,
            db_max_connections: vars.parse_in(
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
                1..=u32::MAX,
            )?,
            rate_limit_max_requests: vars.parse_in(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
                1..=usize::MAX,
            )?,
            rate_limit_window: Duration::from_secs(vars.parse_in(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window.as_secs(),
                1..=u64::MAX,
            )?),
            session_inactivity_hours: vars.parse_in(
                "SESSION_INACTIVITY_HOURS",
                defaults.session_inactivity_hours,
                SESSION_INACTIVITY_HOURS_RANGE,
            )?,
            bcrypt_cost: vars.parse_in("BCRYPT_COST", defaults.bcrypt_cost, BCRYPT_COST_RANGE)?,
            seed_sample_data: vars.parse("SEED_SAMPLE_DATA", defaults.seed_sample_data)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Set and not blank.
    fn raw(&self, var: &str) -> Option<String> {
        (self.0)(var).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.raw(var) {
            Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    fn parse_in<T>(
        &self,
        var: &'static str,
        default: T,
        range: RangeInclusive<T>,
    ) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + fmt::Display,
        T::Err: fmt::Display,
    {
        let value = self.parse(var, default)?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::Invalid {
                var,
                value: value.to_string(),
                reason: format!(
                    "must be between {} and {}",
                    range.start(),
                    range.end()
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert!(config.seed_sample_data);
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    fn rejected_var(result: Result<Config, ConfigError>) -> &'static str {
        match result {
            Err(ConfigError::Invalid { var, .. }) => var,
            Ok(config) => panic!("expected a config error, got {config:?}"),
        }
    }

    #[test]
    fn unset_and_blank_variables_use_defaults() {
        let config = from_pairs(&[("PORT", "  ")]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.session_inactivity_hours, 24);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = from_pairs(&[
            ("PORT", " 8080 "),
            ("BCRYPT_COST", "4"),
            ("SESSION_INACTIVITY_HOURS", "8760"),
            ("SEED_SAMPLE_DATA", "false"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.session_inactivity_hours, 8760);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn unparsable_value_is_rejected() {
        assert_eq!(rejected_var(from_pairs(&[("PORT", "http")])), "PORT");
    }

    #[test]
    fn bcrypt_cost_outside_supported_range_is_rejected() {
        assert_eq!(rejected_var(from_pairs(&[("BCRYPT_COST", "2")])), "BCRYPT_COST");
        assert_eq!(rejected_var(from_pairs(&[("BCRYPT_COST", "32")])), "BCRYPT_COST");
    }

    #[test]
    fn session_lifetime_must_be_positive_and_bounded() {
        for hours in ["-5", "0", "8761", "9223372036854775807"] {
            assert_eq!(
                rejected_var(from_pairs(&[("SESSION_INACTIVITY_HOURS", hours)])),
                "SESSION_INACTIVITY_HOURS"
            );
        }
    }

    #[test]
    fn zero_rate_limit_and_pool_size_are_rejected() {
        assert_eq!(
            rejected_var(from_pairs(&[("RATE_LIMIT_MAX_REQUESTS", "0")])),
            "RATE_LIMIT_MAX_REQUESTS"
        );
        assert_eq!(
            rejected_var(from_pairs(&[("RATE_LIMIT_WINDOW_SECS", "0")])),
            "RATE_LIMIT_WINDOW_SECS"
        );
        assert_eq!(
            rejected_var(from_pairs(&[("DB_MAX_CONNECTIONS", "0")])),
            "DB_MAX_CONNECTIONS"
        );
    }

    #[test]
    fn error_names_variable_and_range() {
        let err = from_pairs(&[("BCRYPT_COST", "2")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "BCRYPT_COST has invalid value \"2\": must be between 4 and 31"
        );
    }
}
