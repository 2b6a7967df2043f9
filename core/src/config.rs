//! Client configuration.

use std::env;
use std::time::Duration;

use crate::error::Error;

/// Where the Tika server listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9998";

pub const ENV_URL: &str = "TIKA_URL";
pub const ENV_TIMEOUT_SECS: &str = "TIKA_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout for the default transport; `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Reads `TIKA_URL` and `TIKA_TIMEOUT_SECS`, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|t| !t.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:9998");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TIKA_URL", " http://tika:9998 "),
            ("TIKA_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://tika:9998");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[("TIKA_URL", ""), ("TIKA_TIMEOUT_SECS", " ")]))
            .unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    // The only test in this binary that touches these variables.
    #[test]
    fn from_env_reads_process_environment() {
        env::set_var(ENV_URL, "http://tika.internal:9998");
        env::set_var(ENV_TIMEOUT_SECS, "7");
        let config = ClientConfig::from_env();
        env::remove_var(ENV_URL);
        env::remove_var(ENV_TIMEOUT_SECS);

        let config = config.unwrap();
        assert_eq!(config.base_url, "http://tika.internal:9998");
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[("TIKA_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
