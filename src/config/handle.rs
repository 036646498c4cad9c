//! Shared config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so a
//! long-running host can pick up `blogql.toml` changes between requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ConfigHandle (ArcSwap)                     │
//! │                                                             │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────┐    │
//! │  │  Provider   │     │  Provider   │     │   Host      │    │
//! │  │ (request 1) │     │ (request 2) │     │  (watcher)  │    │
//! │  └──────┬──────┘     └──────┬──────┘     └──────┬──────┘    │
//! │         ▼                   ▼                   ▼           │
//! │     snapshot()          snapshot()          reload()        │
//! │    (lock-free)         (lock-free)      (atomic replace)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::{BlogConfig, ConfigError, ConfigSource, Scope};
use crate::design::{Theme, ThemeProvider};
use crate::log;
use anyhow::{Result, anyhow};
use arc_swap::ArcSwap;
use std::{
    fs,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Reloadable configuration shared by all providers.
#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<BlogConfig>,
    /// Hash of the file content behind `current` (0 when not file-backed)
    hash: AtomicU64,
}

impl ConfigHandle {
    pub fn new(config: BlogConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            hash: AtomicU64::new(0),
        }
    }

    /// Load and validate `path`, remembering its content hash for `reload`.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let config = BlogConfig::from_file_content(&content, path)?;
        log!("config"; "loaded {}", path.display());
        let handle = Self::new(config);
        handle.hash.store(content_hash(&content), Ordering::Relaxed);
        Ok(handle)
    }

    /// Current config as `Arc<BlogConfig>`.
    ///
    /// The snapshot stays valid even if a reload happens while it is held.
    #[inline]
    pub fn snapshot(&self) -> Arc<BlogConfig> {
        self.current.load_full()
    }

    /// Replace the config wholesale.
    pub fn store(&self, config: BlogConfig) {
        self.current.store(Arc::new(config));
        self.hash.store(0, Ordering::Relaxed);
    }

    /// Re-read the file the current config came from.
    ///
    /// Returns `true` if config was actually updated, `false` if content matches
    /// the last load. A file that fails to parse or validate leaves the current
    /// config in place.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let path = self.snapshot().config_path.clone();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "config was not loaded from a file".into(),
            ));
        }

        let content =
            fs::read_to_string(&path).map_err(|err| ConfigError::Io(path.clone(), err))?;
        let new_hash = content_hash(&content);
        if new_hash == self.hash.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let config = BlogConfig::from_file_content(&content, &path)?;

        log!("config"; "reloaded {}", config.config_path.display());
        self.current.store(Arc::new(config));
        self.hash.store(new_hash, Ordering::Relaxed);
        Ok(true)
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(BlogConfig::default())
    }
}

impl ConfigSource for ConfigHandle {
    fn value(&self, path: &str, scope: &Scope) -> Result<Option<String>> {
        self.current.load().value(path, scope)
    }
}

impl ThemeProvider for ConfigHandle {
    fn theme_by_id(&self, id: &str) -> Result<Theme> {
        self.current
            .load()
            .theme(id)
            .cloned()
            .ok_or_else(|| anyhow!("theme `{id}` is not registered"))
    }
}

/// First 8 bytes of the blake3 digest, enough to detect edits.
fn content_hash(content: &str) -> u64 {
    let digest = blake3::hash(content.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
