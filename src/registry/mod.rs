//! Static key registry.
//!
//! The registry defines the universe of assignable plain actions with their
//! canonical display labels and per-dialect tokens. It is embedded in the
//! binary at compile time and indexed once into read-only lookup maps.

use crate::codec::action::neutral_token;
use crate::codec::labels::normalize_token;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One assignable action with its label and dialect tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRegistryItem {
    /// Canonical display label (e.g. "Vol+")
    pub label: String,
    /// ZMK binding string (e.g. `&kp C_VOL_UP`)
    pub zmk: String,
    /// QMK binding string (e.g. `KC_VOLU`)
    pub qmk: String,
    /// Alternative tokens that resolve to the same label
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// A titled run of registry items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySection {
    /// Section title (e.g. "Alphas")
    pub title: String,
    /// Items in display order
    pub items: Vec<KeyRegistryItem>,
}

/// A top-level registry group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGroup {
    /// Group title (e.g. "Core")
    pub title: String,
    /// Sections in display order
    pub sections: Vec<KeySection>,
}

/// Registry schema from `key_registry.json`.
#[derive(Debug, Clone, Deserialize)]
struct RegistryFile {
    #[allow(dead_code)]
    version: String,
    groups: Vec<KeyGroup>,
}

/// The indexed key registry with label lookup by normalized token.
///
/// Loaded once at startup; all lookups afterwards are read-only.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    groups: Vec<KeyGroup>,
    labels: HashMap<String, String>,
}

impl KeyRegistry {
    /// Loads the registry from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("key_registry.json");
        Self::from_json(json_data)
    }

    /// Loads a registry from JSON text (for alternate registries).
    pub fn from_json(json_data: &str) -> Result<Self> {
        let file: RegistryFile =
            serde_json::from_str(json_data).context("Failed to parse key registry")?;

        let mut labels = HashMap::new();
        for item in file.groups.iter().flat_map(|g| &g.sections).flat_map(|s| &s.items) {
            let mut add_token = |value: &str| {
                let token = neutral_token(value);
                if !token.is_empty() {
                    labels.insert(normalize_token(&token), item.label.clone());
                }
            };
            add_token(&item.zmk);
            add_token(&item.qmk);
            for alias in &item.aliases {
                add_token(alias);
            }
        }

        Ok(Self {
            groups: file.groups,
            labels,
        })
    }

    /// Resolves the canonical label for a binding string in either dialect.
    ///
    /// # Examples
    ///
    /// ```
    /// use keeber::registry::KeyRegistry;
    ///
    /// let registry = KeyRegistry::load().unwrap();
    /// assert_eq!(registry.label_for("&kp C_MUTE"), Some("Mute"));
    /// assert_eq!(registry.label_for("KC_MUTE"), Some("Mute"));
    /// assert_eq!(registry.label_for("KC_UNKNOWN_THING"), None);
    /// ```
    #[must_use]
    pub fn label_for(&self, binding: &str) -> Option<&str> {
        let token = neutral_token(binding);
        if token.is_empty() {
            return None;
        }
        self.labels.get(&normalize_token(&token)).map(String::as_str)
    }

    /// All registry groups, in display order.
    #[must_use]
    pub fn groups(&self) -> &[KeyGroup] {
        &self.groups
    }

    /// Iterates over every item across all groups and sections.
    pub fn items(&self) -> impl Iterator<Item = &KeyRegistryItem> {
        self.groups
            .iter()
            .flat_map(|g| &g.sections)
            .flat_map(|s| &s.items)
    }
}
