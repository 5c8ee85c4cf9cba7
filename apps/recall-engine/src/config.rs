//! Engine configuration.
//!
//! Front-ends build an [`EngineConfig`] and hand it to
//! [`StudyEngine::open`](crate::engine::StudyEngine::open). `from_env` is a
//! convenience for front-ends that want `.env`/environment overrides; the
//! engine itself never reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the record store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// SQLite file, created along with its parent directory if missing.
    File(PathBuf),
    /// Named in-memory database shared by every connection in the process.
    Memory(String),
}

impl StoreLocation {
    /// Fresh in-memory store that no other engine will see.
    pub fn memory_unique() -> Self {
        Self::Memory(format!("recall-{}", Uuid::new_v4().simple()))
    }

    /// Platform data directory, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recall")
            .join("recall.db")
    }

    pub(crate) fn uri(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory(name) => format!("file:{name}?mode=memory&cache=shared"),
        }
    }
}

impl Default for StoreLocation {
    fn default() -> Self {
        Self::File(Self::default_path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub store: StoreLocation,
    pub busy_timeout_ms: u64,
    /// Maximum cards returned by one due-queue call.
    pub due_queue_limit: usize,
    /// Distinct study dates reported by the history view.
    pub history_days: usize,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::default(),
            busy_timeout_ms: 5000,
            due_queue_limit: 100,
            history_days: 7,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults with a private in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: StoreLocation::memory_unique(),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Load `.env` if present, then apply `RECALL_*` and `RUST_LOG` overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("RECALL_DB_PATH") {
            config.store = if path == ":memory:" {
                StoreLocation::memory_unique()
            } else {
                StoreLocation::File(PathBuf::from(path))
            };
        }
        if let Some(raw) = lookup("RECALL_BUSY_TIMEOUT_MS") {
            config.busy_timeout_ms = raw
                .parse()
                .with_context(|| format!("RECALL_BUSY_TIMEOUT_MS must be a number, got {raw:?}"))?;
        }
        if let Some(raw) = lookup("RECALL_DUE_QUEUE_LIMIT") {
            config.due_queue_limit = raw
                .parse()
                .with_context(|| format!("RECALL_DUE_QUEUE_LIMIT must be a number, got {raw:?}"))?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
