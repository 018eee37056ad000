//! Layer and binding data structures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A dual-dialect binding pair assigned to one key on one layer.
///
/// Both strings denote the same logical action whenever they are
/// machine-generated; direct text edits may make them diverge, which is
/// accepted as an explicit escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Binding {
    /// ZMK behavior string (e.g. `&kp A`)
    #[serde(default)]
    pub zmk: String,
    /// QMK keycode string (e.g. `KC_A`)
    #[serde(default)]
    pub qmk: String,
}

impl Binding {
    /// Creates a binding pair from the two dialect strings.
    pub fn new(zmk: impl Into<String>, qmk: impl Into<String>) -> Self {
        Self {
            zmk: zmk.into(),
            qmk: qmk.into(),
        }
    }

    /// The explicit no-action pair.
    #[must_use]
    pub fn none() -> Self {
        Self::new("&none", "KC_NO")
    }

    /// The transparent (fall-through) pair.
    #[must_use]
    pub fn transparent() -> Self {
        Self::new("&trans", "KC_TRNS")
    }

    /// True when both dialect strings are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zmk.is_empty() && self.qmk.is_empty()
    }
}

/// A single keymap layer: a display name plus per-key binding assignments.
///
/// Layer order in the surrounding list is significant: index 0 is the base
/// layer and can never be removed or displaced; indices 1..N-1 are overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier, stable across renames and reorders
    #[serde(default = "generate_layer_id")]
    pub id: String,
    /// Human-readable name (e.g. "Base", "Nav")
    pub name: String,
    /// Binding assignments keyed by [`crate::models::Key`] id
    #[serde(default)]
    pub bindings: BTreeMap<String, Binding>,
}

/// Generates a new unique layer ID.
fn generate_layer_id() -> String {
    Uuid::new_v4().to_string()
}

impl Layer {
    /// Creates an empty layer with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_layer_id(),
            name: name.into(),
            bindings: BTreeMap::new(),
        }
    }

    /// Creates the layer at `index` with its default display name
    /// ("Base" for index 0, "Layer {index}" otherwise).
    #[must_use]
    pub fn with_default_name(index: usize) -> Self {
        if index == 0 {
            Self::new("Base")
        } else {
            Self::new(format!("Layer {index}"))
        }
    }

    /// Gets the binding assigned to `key_id`, if any.
    #[must_use]
    pub fn binding(&self, key_id: &str) -> Option<&Binding> {
        self.bindings.get(key_id)
    }

    /// Assigns a binding to `key_id`, replacing any previous assignment.
    pub fn set_binding(&mut self, key_id: impl Into<String>, binding: Binding) {
        self.bindings.insert(key_id.into(), binding);
    }
}
