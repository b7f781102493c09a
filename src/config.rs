use std::env;
use std::path::PathBuf;

use crate::stats::DEFAULT_LEADER_LIMIT;
use crate::store::DEFAULT_KEY_PREFIX;

const DATA_DIR: &str = "matchday";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub key_prefix: String,
    pub leader_limit: usize,
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read `.env.local`/`.env` (if present) and then the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("MATCHDAY_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| non_empty("XDG_DATA_HOME").map(|base| PathBuf::from(base).join(DATA_DIR)))
            .or_else(|| {
                // Fallback to ~/.local/share on linux-like systems.
                non_empty("HOME").map(|home| {
                    PathBuf::from(home)
                        .join(".local")
                        .join("share")
                        .join(DATA_DIR)
                })
            })
            .unwrap_or_else(|| PathBuf::from(".").join(DATA_DIR));

        let key_prefix = non_empty("MATCHDAY_KEY_PREFIX")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());

        let leader_limit = non_empty("MATCHDAY_LEADER_LIMIT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LEADER_LIMIT);

        let db_path = non_empty("MATCHDAY_DB").map(PathBuf::from);

        Self {
            data_dir,
            key_prefix,
            leader_limit,
            db_path,
        }
    }
}
