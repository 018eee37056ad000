//! Firmware source generation.
//!
//! Deterministic, purely textual rendering of the resolved geometry and
//! layer table into the two firmware dialects' source files. Keys render in
//! the same traversal order the geometry resolver produced, filtered to
//! physical (non-skip) positions.

pub mod qmk;
pub mod zmk;

use crate::codec::unicode::UnicodeOs;
use crate::models::{Dialect, Key, Layer};
use crate::parser::ParsedLayout;
use anyhow::{bail, Result};

/// Per-dialect rendering options.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    /// Default layer index for the ZMK keymap
    pub default_layer_zmk: usize,
    /// Default layer index for the QMK keymap
    pub default_layer_qmk: usize,
    /// Unicode OS mode used by the ZMK keymap
    pub unicode_os_zmk: UnicodeOs,
    /// Unicode OS mode used by the QMK keymap
    pub unicode_os_qmk: UnicodeOs,
    /// Letters granted Ctrl-combos on the synthetic magic layer
    pub hold_letters: Vec<char>,
}

/// One generated firmware source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Dialect this file belongs to
    pub dialect: Dialect,
    /// File name within the dialect's output directory
    pub filename: &'static str,
    /// Rendered file contents
    pub contents: String,
}

/// Renders the full artifact set for both dialects.
///
/// Fails only when the layout has no matrix yet (nothing was parsed).
pub fn generate_artifacts(
    parsed: &ParsedLayout,
    layers: &[Layer],
    settings: &ExportSettings,
) -> Result<Vec<Artifact>> {
    let Some(matrix) = parsed.matrix.as_ref() else {
        bail!("No layout loaded; parse a layout document first");
    };
    let visible: Vec<Key> = parsed.visible_keys().cloned().collect();

    Ok(vec![
        Artifact {
            dialect: Dialect::Zmk,
            filename: "keymap.keymap",
            contents: zmk::keymap(
                &visible,
                layers,
                &settings.hold_letters,
                settings.default_layer_zmk,
                settings.unicode_os_zmk,
            ),
        },
        Artifact {
            dialect: Dialect::Zmk,
            filename: "matrix.overlay",
            contents: zmk::overlay(matrix),
        },
        Artifact {
            dialect: Dialect::Qmk,
            filename: "keymap.c",
            contents: qmk::keymap_c(
                &visible,
                layers,
                &settings.hold_letters,
                settings.default_layer_qmk,
                settings.unicode_os_qmk,
            ),
        },
        Artifact {
            dialect: Dialect::Qmk,
            filename: "info.json",
            contents: qmk::info_json(&visible, matrix)?,
        },
        Artifact {
            dialect: Dialect::Qmk,
            filename: "config.h",
            contents: qmk::config_h(matrix),
        },
        Artifact {
            dialect: Dialect::Qmk,
            filename: "rules.mk",
            contents: qmk::rules_mk(),
        },
    ])
}
