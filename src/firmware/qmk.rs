//! QMK firmware source generation.

use crate::codec::magic::{has_magic_binding, magic_layer_bindings, resolve_magic_binding};
use crate::codec::unicode::{layers_use_unicode, UnicodeOs};
use crate::constants::DEFAULT_UNIT;
use crate::models::{Dialect, Key, Layer, MatrixDescriptor};
use crate::services::layer_ops::clamp_layer_index;
use anyhow::Result;
use serde_json::json;

/// Renders `keymap.c` with one `LAYOUT(...)` block per layer.
///
/// Bindings appear in key traversal order with `KC_NO` filling unassigned
/// positions; magic substitution and the synthetic magic layer follow the
/// same rules as the ZMK keymap.
#[must_use]
pub fn keymap_c(
    keys: &[Key],
    layers: &[Layer],
    hold_letters: &[char],
    default_layer: usize,
    os: UnicodeOs,
) -> String {
    let has_magic = has_magic_binding(layers);
    let use_unicode = layers_use_unicode(layers, Dialect::Qmk);
    let magic_layer_index = layers.len();
    let enable_magic_layer = has_magic && os != UnicodeOs::MacOs;
    let safe_default = clamp_layer_index(default_layer, layers.len());

    let mut layer_blocks: Vec<String> = layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let keycodes: Vec<String> = keys
                .iter()
                .map(|key| {
                    let value = layer
                        .binding(&key.id)
                        .map(|b| b.qmk.as_str())
                        .filter(|v| !v.is_empty())
                        .unwrap_or("KC_NO");
                    let updated = if has_magic {
                        resolve_magic_binding(value, magic_layer_index, Dialect::Qmk, os)
                    } else {
                        value.to_string()
                    };
                    if updated.is_empty() {
                        "KC_NO".to_string()
                    } else {
                        updated
                    }
                })
                .collect();
            layout_block(index, &keycodes)
        })
        .collect();

    if enable_magic_layer {
        let keycodes = magic_layer_bindings(keys, layers.first(), Dialect::Qmk, hold_letters);
        layer_blocks.push(layout_block(magic_layer_index, &keycodes));
    }

    let unicode_init = if use_unicode {
        format!("  set_unicode_input_mode({});\n", os.qmk_mode())
    } else {
        String::new()
    };

    format!(
        "#include QMK_KEYBOARD_H\n\nconst uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {{\n{}\n}};\n\nvoid keyboard_post_init_user(void) {{\n{unicode_init}  default_layer_set(1UL << {safe_default});\n}}\n",
        layer_blocks.join(",\n")
    )
}

fn layout_block(index: usize, keycodes: &[String]) -> String {
    format!(
        "  [{index}] = LAYOUT(\n    {}\n  )",
        keycodes.join(",\n    ")
    )
}

/// Rounds a coordinate to two decimals, dropping the fraction entirely
/// when it is whole so the JSON matches hand-written info.json files.
fn round2(value: f64) -> serde_json::Value {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        json!(rounded as i64)
    } else {
        json!(rounded)
    }
}

/// Renders `info.json` with matrix pins and normalized key coordinates.
pub fn info_json(keys: &[Key], matrix: &MatrixDescriptor) -> Result<String> {
    let unit = keys.first().map_or(DEFAULT_UNIT, |key| key.unit);
    let layout: Vec<serde_json::Value> = keys
        .iter()
        .map(|key| {
            json!({
                "label": key.id,
                "x": round2(key.x / unit),
                "y": round2(key.y / unit),
            })
        })
        .collect();

    let info = json!({
        "keyboard_name": "custom-ergogen",
        "manufacturer": "custom",
        "maintainer": "you",
        "matrix_pins": {
            "rows": matrix
                .rows
                .iter()
                .map(|row| matrix.pin_for(&row.net).unwrap_or_default())
                .collect::<Vec<_>>(),
            "cols": matrix
                .cols
                .iter()
                .map(|col| matrix.pin_for(&col.net).unwrap_or_default())
                .collect::<Vec<_>>(),
        },
        "diode_direction": "COL2ROW",
        "split": matrix.mirrored,
        "layouts": {
            "LAYOUT": {
                "layout": layout,
            }
        }
    });

    Ok(serde_json::to_string_pretty(&info)?)
}

/// Renders `config.h`, wiring up the split serial pin when one exists.
#[must_use]
pub fn config_h(matrix: &MatrixDescriptor) -> String {
    let mut lines = vec!["#pragma once".to_string(), String::new(), "#define MASTER_LEFT".to_string()];
    if !matrix.trrs_pin.is_empty() {
        lines.push(format!("#define SOFT_SERIAL_PIN {}", matrix.trrs_pin));
    }
    format!("{}\n", lines.join("\n"))
}

/// Renders `rules.mk` for a split serial build.
#[must_use]
pub fn rules_mk() -> String {
    "SPLIT_KEYBOARD = yes\nSPLIT_TRANSPORT = serial\nSERIAL_DRIVER = software\n".to_string()
}
