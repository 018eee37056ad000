//! Versioned project persistence.
//!
//! Save documents carry the resolved geometry, the editable layer table,
//! and the per-dialect export settings in one JSON file, schema version 1.
//! Loading validates the version and shape up front and returns a fully
//! formed value or a single error, so a failed load never leaves partial
//! state behind.

use crate::codec::magic::{normalize_hold_letters, DEFAULT_HOLD_LETTERS};
use crate::codec::unicode::UnicodeOs;
use crate::constants::PROJECT_FILE_VERSION;
use crate::firmware::ExportSettings;
use crate::models::{Dialect, Layer};
use crate::parser::ParsedLayout;
use crate::services::layer_ops::clamp_layer_index;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A value tracked separately per firmware dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialectPair<T> {
    /// ZMK-side value
    pub zmk: T,
    /// QMK-side value
    pub qmk: T,
}

/// Unicode settings block: OS mode id per dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeSettings {
    /// OS mode ids (e.g. "linux", "macos")
    pub os: DialectPair<String>,
}

impl Default for UnicodeSettings {
    fn default() -> Self {
        Self {
            os: DialectPair {
                zmk: UnicodeOs::default().id().to_string(),
                qmk: UnicodeOs::default().id().to_string(),
            },
        }
    }
}

/// Magic-key settings block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MagicSettings {
    /// Letters granted Ctrl-combos on the magic layer; absent means the
    /// built-in default set
    #[serde(rename = "holdLetters", default, skip_serializing_if = "Option::is_none")]
    pub hold_letters: Option<Vec<String>>,
}

/// The complete persisted project document (schema version 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version; always [`PROJECT_FILE_VERSION`]
    pub version: u32,
    /// Original layout YAML, when the caller chooses to embed it
    #[serde(default)]
    pub yaml: Option<String>,
    /// Resolved geometry from the last parse
    pub parsed: ParsedLayout,
    /// Editable layer table
    pub layers: Vec<Layer>,
    /// Index of the layer being edited
    #[serde(rename = "activeLayer", default)]
    pub active_layer: usize,
    /// Id of the selected key, if any
    #[serde(rename = "selectedKeyId", default, skip_serializing_if = "Option::is_none")]
    pub selected_key_id: Option<String>,
    /// Default layer index per dialect
    #[serde(rename = "defaultLayers", default)]
    pub default_layers: DialectPair<usize>,
    /// Unicode OS modes per dialect
    #[serde(default)]
    pub unicode: UnicodeSettings,
    /// Magic-key configuration
    #[serde(default)]
    pub magic: MagicSettings,
}

impl ProjectFile {
    /// Creates a fresh project around one resolution result, with a single
    /// empty base layer and default settings.
    #[must_use]
    pub fn new(parsed: ParsedLayout) -> Self {
        Self {
            version: PROJECT_FILE_VERSION,
            yaml: None,
            parsed,
            layers: vec![Layer::with_default_name(0)],
            active_layer: 0,
            selected_key_id: None,
            default_layers: DialectPair::default(),
            unicode: UnicodeSettings::default(),
            magic: MagicSettings::default(),
        }
    }

    /// Loads a project from JSON text.
    ///
    /// The version is checked before anything else is interpreted; an
    /// unsupported version or malformed shape fails with a descriptive
    /// error and no other effect.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).context("Failed to parse project file")?;
        match value.get("version").and_then(serde_json::Value::as_u64) {
            Some(v) if v == u64::from(PROJECT_FILE_VERSION) => {}
            Some(v) => bail!("Unsupported project file version {v}"),
            None => bail!("Project file has no version field"),
        }
        let mut file: Self =
            serde_json::from_value(value).context("Project file has a malformed shape")?;
        file.normalize();
        Ok(file)
    }

    /// Serializes the project to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamps indices into range and guarantees at least one layer.
    fn normalize(&mut self) {
        if self.layers.is_empty() {
            self.layers.push(Layer::with_default_name(0));
        }
        let len = self.layers.len();
        self.active_layer = clamp_layer_index(self.active_layer, len);
        self.default_layers.zmk = clamp_layer_index(self.default_layers.zmk, len);
        self.default_layers.qmk = clamp_layer_index(self.default_layers.qmk, len);
    }

    /// Resolved unicode OS mode for a dialect, falling back to the default
    /// for unknown ids.
    #[must_use]
    pub fn unicode_os(&self, dialect: Dialect) -> UnicodeOs {
        let id = match dialect {
            Dialect::Zmk => &self.unicode.os.zmk,
            Dialect::Qmk => &self.unicode.os.qmk,
        };
        UnicodeOs::from_id(id)
    }

    /// Normalized magic hold letters, defaulting when unconfigured.
    #[must_use]
    pub fn hold_letters(&self) -> Vec<char> {
        match &self.magic.hold_letters {
            Some(letters) => normalize_hold_letters(letters),
            None => DEFAULT_HOLD_LETTERS.to_vec(),
        }
    }

    /// Export settings derived from this project's configuration.
    #[must_use]
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            default_layer_zmk: self.default_layers.zmk,
            default_layer_qmk: self.default_layers.qmk,
            unicode_os_zmk: self.unicode_os(Dialect::Zmk),
            unicode_os_qmk: self.unicode_os(Dialect::Qmk),
            hold_letters: self.hold_letters(),
        }
    }
}
