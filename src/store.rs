use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_KEY_PREFIX: &str = "rvr-u12";

pub const KEY_PLAYERS: &str = "players";
pub const KEY_OPPONENTS: &str = "opponents";
pub const KEY_VENUES: &str = "venues";
pub const KEY_LEAGUES: &str = "leagues";
pub const KEY_MATCHES: &str = "matches";

/// Keyed persistence for whole collections. Loading never fails: anything
/// missing or unreadable yields the caller's fallback.
pub trait RecordStore {
    fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T;
    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()>;
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    prefix: String,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}-{key}.json", self.prefix))
    }
}

impl RecordStore for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return fallback,
            Err(err) => {
                log::warn!("unable to read {}: {err}", path.display());
                return fallback;
            }
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("ignoring corrupt {}: {err}", path.display());
                fallback
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create data dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        let json = serde_json::to_string(value).with_context(|| format!("serialize {key}"))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        log::debug!("saved {key} to {}", path.display());
        Ok(())
    }
}

/// Keeps serialized values in memory; for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl RecordStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(fallback)
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).with_context(|| format!("serialize {key}"))?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamedRef;

    #[test]
    fn json_store_round_trips_and_tolerates_corruption() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path(), DEFAULT_KEY_PREFIX);
        assert_eq!(
            store.path_for(KEY_VENUES),
            dir.path().join("rvr-u12-venues.json")
        );

        let empty: Vec<NamedRef> = store.load(KEY_VENUES, Vec::new());
        assert!(empty.is_empty());

        let venues = vec![NamedRef::new("v1", "Broadmeadow")];
        store.save(KEY_VENUES, &venues).expect("save venues");
        let back: Vec<NamedRef> = store.load(KEY_VENUES, Vec::new());
        assert_eq!(back, venues);
        assert!(!store.path_for(KEY_VENUES).with_extension("json.tmp").exists());

        fs::write(store.path_for(KEY_VENUES), "{not json").unwrap();
        let fallback: Vec<NamedRef> = store.load(KEY_VENUES, vec![NamedRef::new("x", "X")]);
        assert_eq!(fallback[0].id, "x");
    }

    #[test]
    fn memory_store_uses_fallback_for_wrong_shape() {
        let mut store = MemoryStore::new();
        store.save(KEY_MATCHES, "not a list").unwrap();
        assert!(store.contains(KEY_MATCHES));
        let out: Vec<NamedRef> = store.load(KEY_MATCHES, Vec::new());
        assert!(out.is_empty());
    }
}
