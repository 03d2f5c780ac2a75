use std::env;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub max_results: u32,
    pub summary_max_length: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_results: 50,
            summary_max_length: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub state_dir: PathBuf,
    pub search: SearchDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            state_dir: PathBuf::from(".arxiv-tracker"),
            search: SearchDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let base_url = var("TRACKER_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api.base_url);

        let timeout = match var("TRACKER_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().with_context(|| {
                    format!("TRACKER_REQUEST_TIMEOUT_SECS is not a number: {raw}")
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.api.timeout,
        };

        let state_dir = var("TRACKER_STATE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.state_dir);

        let search = SearchDefaults {
            max_results: var("TRACKER_DEFAULT_MAX_RESULTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.search.max_results),
            summary_max_length: var("TRACKER_SUMMARY_MAX_LENGTH")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.search.summary_max_length),
        };

        Ok(Config {
            api: ApiConfig { base_url, timeout },
            state_dir,
            search,
        })
    }

    pub fn require_state_dir(&self) -> Result<&PathBuf> {
        if self.state_dir.as_os_str().is_empty() {
            anyhow::bail!("TRACKER_STATE_DIR must not be empty");
        }
        Ok(&self.state_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.search.max_results, 50);
        assert_eq!(config.search.summary_max_length, 200);
        assert_eq!(config.state_dir, PathBuf::from(".arxiv-tracker"));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_vars(vars(&[
            ("TRACKER_API_BASE_URL", "https://tracker.example.org/api/"),
            ("TRACKER_REQUEST_TIMEOUT_SECS", "5"),
            ("TRACKER_DEFAULT_MAX_RESULTS", "20"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url, "https://tracker.example.org/api");
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let err = Config::from_vars(vars(&[("TRACKER_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("TRACKER_REQUEST_TIMEOUT_SECS"));
    }
}
