//! Configuration management for the contributions Lambda.

use std::env;

use crate::{Error, Result};

/// Default upstream host serving the contribution calendar fragment.
pub const DEFAULT_UPSTREAM_URL: &str = "https://github.com";

/// Default client identifier sent upstream.
pub const DEFAULT_USER_AGENT: &str = "Lambda-GitHub-Contributions";

/// Default `max-age` for successful responses, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream site, without trailing slash
    pub upstream_url: String,
    /// User-Agent header for upstream requests
    pub user_agent: String,
    /// Cache-Control max-age for successful responses
    pub cache_max_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let upstream_url = lookup("CONTRIBUTIONS_UPSTREAM_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !upstream_url.starts_with("http://") && !upstream_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "CONTRIBUTIONS_UPSTREAM_URL must be an http(s) URL, got {:?}",
                upstream_url
            )));
        }

        let cache_max_age = match lookup("CONTRIBUTIONS_CACHE_MAX_AGE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("CONTRIBUTIONS_CACHE_MAX_AGE is not a number: {:?}", raw))
            })?,
            None => DEFAULT_CACHE_MAX_AGE,
        };

        Ok(Self {
            upstream_url,
            user_agent: lookup("CONTRIBUTIONS_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            cache_max_age,
        })
    }

    /// Value for the `Cache-Control` header on successful responses.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.upstream_url, "https://github.com");
        assert_eq!(config.cache_control(), "public, max-age=3600");
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("CONTRIBUTIONS_UPSTREAM_URL", "http://localhost:8080/"),
            ("CONTRIBUTIONS_USER_AGENT", "test-agent"),
            ("CONTRIBUTIONS_CACHE_MAX_AGE", "60"),
        ]))
        .unwrap();
        assert_eq!(config.upstream_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.cache_max_age, 60);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("CONTRIBUTIONS_CACHE_MAX_AGE", "soon")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("CONTRIBUTIONS_UPSTREAM_URL", "github.com")])),
            Err(Error::Config(_))
        ));
    }
}
