use anyhow::{Context, Result};
use serde::Deserialize;

/// Tunables of a [`crate::ListAdapter`], usually read from a TOML table:
///
/// ```toml
/// animated = true
/// full_reload_threshold = 200
/// reloads_as_replacements = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterSettings {
    /// Animate batch updates.
    pub animated: bool,
    /// Reload everything instead of issuing a batch update with more operations than this.
    pub full_reload_threshold: Option<usize>,
    /// Turn reloads into a removal and an insertion at the same slot.
    pub reloads_as_replacements: bool,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            animated: true,
            full_reload_threshold: None,
            reloads_as_replacements: false,
        }
    }
}

impl AdapterSettings {
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).context("Failed to parse adapter settings")
    }
}
