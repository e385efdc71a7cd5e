//! Runtime configuration loaded from the environment.
//!
//! Command line flags in the binary override whatever is read here.

use std::env;
use std::time::Duration;

use tracing::level_filters::LevelFilter;

use super::error::{PanelError, PanelResult};

/// Local model server address.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

pub const ENV_ENDPOINT: &str = "ALZPANEL_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "ALZPANEL_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "ALZPANEL_LOG_LEVEL";

/// Snapshot of configuration values consumed by the client.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub endpoint: String,
    /// `None` leaves the request unbounded, like the transport default.
    pub timeout: Option<Duration>,
    pub log_level: LevelFilter,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            log_level: LevelFilter::INFO,
        }
    }
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> PanelResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup. Unset or blank keys fall
    /// back to defaults, malformed values are rejected.
    pub fn from_lookup<F>(lookup: F) -> PanelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            cfg.endpoint = endpoint;
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            cfg.timeout = parse_timeout(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = get(ENV_LOG_LEVEL) {
            cfg.log_level = raw.parse().map_err(|_| PanelError::Config {
                key: ENV_LOG_LEVEL,
                value: raw.clone(),
            })?;
        }

        Ok(cfg)
    }

    /// Override the request timeout; zero clears it.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = (ms > 0).then(|| Duration::from_millis(ms));
        self
    }
}

/// Milliseconds to an optional timeout; `0` means no timeout, same as
/// `with_timeout_ms`.
fn parse_timeout(key: &'static str, raw: &str) -> PanelResult<Option<Duration>> {
    let ms: u64 = raw.parse().map_err(|_| PanelError::Config {
        key,
        value: raw.to_string(),
    })?;
    Ok((ms > 0).then(|| Duration::from_millis(ms)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppCfg::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.timeout.is_none());
        assert_eq!(cfg.log_level, LevelFilter::INFO);
    }

    #[test]
    fn reads_all_keys() {
        let cfg = AppCfg::from_lookup(lookup(&[
            (ENV_ENDPOINT, "http://models.local/predict"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.endpoint, "http://models.local/predict");
        assert_eq!(cfg.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(cfg.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = AppCfg::from_lookup(lookup(&[(ENV_ENDPOINT, "  ")])).unwrap();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn rejects_bad_timeout() {
        for raw in ["soon", "-5", "1.5"] {
            let err = AppCfg::from_lookup(lookup(&[(ENV_TIMEOUT_MS, raw)])).unwrap_err();
            assert!(matches!(err, PanelError::Config { key: ENV_TIMEOUT_MS, .. }));
        }
    }

    #[test]
    fn zero_timeout_from_env_means_none() {
        let cfg = AppCfg::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "0")])).unwrap();
        assert!(cfg.timeout.is_none());
        let flag = AppCfg::default().with_timeout_ms(0);
        assert_eq!(cfg.timeout, flag.timeout);
    }

    #[test]
    fn rejects_bad_log_level() {
        let err = AppCfg::from_lookup(lookup(&[(ENV_LOG_LEVEL, "chatty")])).unwrap_err();
        assert!(matches!(err, PanelError::Config { key: ENV_LOG_LEVEL, .. }));
    }

    #[test]
    fn zero_timeout_override_clears() {
        let cfg = AppCfg::default().with_timeout_ms(100).with_timeout_ms(0);
        assert!(cfg.timeout.is_none());
    }
}
