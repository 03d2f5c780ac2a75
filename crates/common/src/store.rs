use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{TrackerError, TrackerResult};

pub const LAST_SEARCH_KEY: &str = "lastSearch";

/// The form values of the most recent successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSearch {
    pub query: String,
    pub max_results: u32,
    pub ai_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_authority: Option<bool>,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl LastSearch {
    pub fn new(
        query: &str,
        max_results: u32,
        ai_summary: bool,
        enable_authority: Option<bool>,
    ) -> Self {
        Self {
            query: query.to_string(),
            max_results,
            ai_summary,
            enable_authority,
            timestamp: (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64,
        }
    }
}

/// File-backed key-value store. Each key is one JSON document in `root`.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    root: PathBuf,
}

impl KeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> TrackerResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(TrackerError::Store(format!("invalid key: {key:?}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Writes `value` under `key`, replacing whatever was there.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> TrackerResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let content = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &content)?;
        fs::rename(&tmp, &path)?;

        debug!("Stored {} ({} bytes) at {}", key, content.len(), path.display());
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> TrackerResult<Option<T>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns whether a value was actually removed.
    pub fn remove(&self, key: &str) -> TrackerResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed {} from {}", key, self.root.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LastSearch {
        LastSearch {
            query: "diffusion models".to_string(),
            max_results: 20,
            ai_summary: true,
            enable_authority: None,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_put_then_get_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::new(dir.path());

        store.put(LAST_SEARCH_KEY, &sample()).unwrap();
        let mut newer = sample();
        newer.query = "graph neural networks".to_string();
        store.put(LAST_SEARCH_KEY, &newer).unwrap();

        let loaded: Option<LastSearch> = store.get(LAST_SEARCH_KEY).unwrap();
        assert_eq!(loaded, Some(newer));
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::new(dir.path().join("nested"));
        assert!(!store.root().exists());

        store.put(LAST_SEARCH_KEY, &sample()).unwrap();
        assert!(store.remove(LAST_SEARCH_KEY).unwrap());
        assert!(!store.remove(LAST_SEARCH_KEY).unwrap());
        assert!(store.root().is_dir());

        let loaded: Option<LastSearch> = store.get(LAST_SEARCH_KEY).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_camel_case_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::new(dir.path());
        let mut record = sample();
        record.enable_authority = Some(true);
        store.put(LAST_SEARCH_KEY, &record).unwrap();

        let raw = fs::read_to_string(dir.path().join("lastSearch.json")).unwrap();
        assert!(raw.contains("\"maxResults\": 20"));
        assert!(raw.contains("\"aiSummary\": true"));
        assert!(raw.contains("\"enableAuthority\": true"));
    }

    #[test]
    fn test_corrupt_value_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lastSearch.json"), "{not json").unwrap();
        let store = KeyValueStore::new(dir.path());

        let result: TrackerResult<Option<LastSearch>> = store.get(LAST_SEARCH_KEY);
        assert!(matches!(result, Err(TrackerError::Decode(_))));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = KeyValueStore::new("/tmp/unused");
        assert!(matches!(store.remove("../etc"), Err(TrackerError::Store(_))));
    }
}
