//! `[scope]` section and the scoped lookup contract.
//!
//! Values are resolved store first, then default scope, then the built-in
//! defaults in [`super::defaults::scope`].
//!
//! # Example
//! ```toml
//! [scope.default]
//! "mfblog/post_view/related_posts/enabled" = true
//!
//! [scope.stores.german]
//! "mfblog/post_view/related_posts/enabled" = false
//! ```

use super::defaults;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Scope a configuration value is read for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Global values only.
    #[default]
    Default,
    /// A store view, identified by its code.
    Store(String),
}

impl Scope {
    pub fn store(code: impl Into<String>) -> Self {
        Self::Store(code.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default scope"),
            Self::Store(code) => write!(f, "store `{code}`"),
        }
    }
}

/// Read-only access to scoped configuration.
///
/// `value` is the only required operation. Values are strings the way the host
/// application stores them; `flag` and `int` interpret them.
pub trait ConfigSource: Send + Sync {
    /// Raw value at `path` for `scope`, or `None` when unset everywhere.
    fn value(&self, path: &str, scope: &Scope) -> Result<Option<String>>;

    /// Boolean-like value: set, non-empty and not `"0"`.
    fn flag(&self, path: &str, scope: &Scope) -> Result<bool> {
        Ok(self
            .value(path, scope)?
            .is_some_and(|v| is_truthy(&v)))
    }

    /// Numeric value: the leading integer of the stored string, 0 otherwise.
    fn int(&self, path: &str, scope: &Scope) -> Result<i64> {
        Ok(self.value(path, scope)?.map_or(0, |v| leading_int(&v)))
    }
}

/// `[scope]` section in blogql.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Values for every store unless overridden.
    #[serde(default)]
    pub default: BTreeMap<String, toml::Value>,

    /// Per-store overrides, keyed by store code.
    #[serde(default)]
    pub stores: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

impl ScopeConfig {
    /// Resolve `path` for `scope`, falling back to built-in defaults.
    pub fn lookup(&self, path: &str, scope: &Scope) -> Option<String> {
        let store_value = match scope {
            Scope::Store(code) => self.stores.get(code).and_then(|values| values.get(path)),
            Scope::Default => None,
        };

        store_value
            .or_else(|| self.default.get(path))
            .and_then(scalar_to_string)
            .or_else(|| defaults::scope::value(path).map(str::to_owned))
    }

    /// Iterate every `(scope name, path, value)` entry.
    pub(super) fn entries(&self) -> impl Iterator<Item = (&str, &str, &toml::Value)> {
        let default = self
            .default
            .iter()
            .map(|(path, value)| ("default", path.as_str(), value));
        let stores = self.stores.iter().flat_map(|(code, values)| {
            values
                .iter()
                .map(move |(path, value)| (code.as_str(), path.as_str(), value))
        });
        default.chain(stores)
    }
}

/// Surface a TOML scalar the way the host stores config values.
///
/// Tables and arrays have no scalar form and resolve to `None`.
pub fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Boolean(true) => Some("1".into()),
        toml::Value::Boolean(false) => Some("0".into()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(n) => Some(n.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Empty strings and `"0"` are false, anything else is true.
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

/// Parse the leading integer of a string (`"12 posts"` → 12, `"abc"` → 0).
pub fn leading_int(value: &str) -> i64 {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

impl ConfigSource for ScopeConfig {
    fn value(&self, path: &str, scope: &Scope) -> Result<Option<String>> {
        Ok(self.lookup(path, scope))
    }
}
