//! Provider configuration management for `blogql.toml`.
//!
//! # Sections
//!
//! | Section           | Purpose                                            |
//! |-------------------|----------------------------------------------------|
//! | `[scope.default]` | Scoped config values shared by every store         |
//! | `[scope.stores.*]`| Per-store overrides, keyed by store code           |
//! | `[[themes]]`      | Themes the design emulation can install            |
//!
//! # Example
//!
//! ```toml
//! [scope.default]
//! "mfblog/post_view/related_posts/enabled" = true
//! "mfblog/post_view/related_posts/number_of_posts" = 5
//! "design/theme/theme_id" = "3"
//!
//! [scope.stores.german]
//! "web/secure/base_url" = "https://shop.example.com/de/"
//!
//! [[themes]]
//! id = "3"
//! code = "Magento/luma"
//! ```

pub mod defaults;
mod error;
mod handle;
pub mod keys;
mod scope;

pub use error::ConfigError;
pub use handle::ConfigHandle;
pub use scope::{ConfigSource, Scope, ScopeConfig, is_truthy, leading_int, scalar_to_string};

use crate::design::Theme;
use crate::log;
use anyhow::Result;
use educe::Educe;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "blogql.toml";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing blogql.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    /// Path the config was loaded from (empty when parsed from a string)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Scoped key/value settings
    #[serde(default)]
    pub scope: ScopeConfig,

    /// Registered themes, looked up by id
    #[serde(default)]
    pub themes: Vec<Theme>,
}

impl BlogConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: BlogConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path and validate it
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let config = Self::from_file_content(&content, path)?;
        log!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate `content` already read from `path`.
    pub(crate) fn from_file_content(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_str(content)?;
        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Find a registered theme by id
    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = FxHashSet::default();
        for theme in &self.themes {
            if theme.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme `{}` has an empty id",
                    theme.code
                )));
            }
            if !seen.insert(theme.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate theme id `{}`",
                    theme.id
                )));
            }
        }

        for (scope, path, value) in self.scope.entries() {
            if scalar_to_string(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "`{path}` in scope `{scope}` must be a scalar value"
                )));
            }
        }

        for (scope, path, value) in self.scope.entries() {
            if path == keys::RELATED_POSTS_DEPTH
                && scalar_to_string(value).is_none_or(|v| leading_int(&v) < 1)
            {
                return Err(ConfigError::Validation(format!(
                    "`{path}` in scope `{scope}` must be a positive integer"
                )));
            }
        }

        Ok(())
    }
}

impl ConfigSource for BlogConfig {
    fn value(&self, path: &str, scope: &Scope) -> Result<Option<String>> {
        Ok(self.scope.lookup(path, scope))
    }
}
