//! Rendering context: application area and design theme.
//!
//! Content filtering resolves theme-relative asset URLs, so every filtering
//! call receives the [`RenderContext`] it should render under. The host keeps
//! one process-wide context in [`DesignState`]; providers that need a
//! different one enter a scoped [`Emulation`].

mod emulation;

pub use emulation::{DesignState, Emulation};

use crate::config::defaults;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application area a request is served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    #[default]
    Global,
    Frontend,
    Adminhtml,
    Graphql,
}

impl Area {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Frontend => "frontend",
            Self::Adminhtml => "adminhtml",
            Self::Graphql => "graphql",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// `[[themes]]` entry in blogql.toml.
///
/// # Example
/// ```toml
/// [[themes]]
/// id = "3"
/// code = "Magento/luma"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub id: String,

    /// Vendor/name path used in static asset URLs.
    pub code: String,

    /// Area the theme belongs to.
    #[serde(default = "defaults::theme::area")]
    pub area: Area,
}

impl Theme {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            area: defaults::theme::area(),
        }
    }
}

/// Area and theme content is rendered under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub area: Area,
    pub theme: Option<Theme>,
}

impl RenderContext {
    pub const fn new(area: Area) -> Self {
        Self { area, theme: None }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Resolves a configured theme id into a theme.
pub trait ThemeProvider: Send + Sync {
    fn theme_by_id(&self, id: &str) -> Result<Theme>;
}
