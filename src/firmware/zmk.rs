//! ZMK firmware source generation.

use crate::codec::magic::{
    has_magic_binding, magic_layer_bindings, resolve_magic_binding, MAGIC_LAYER_NAME,
};
use crate::codec::unicode::{layers_use_unicode, UnicodeOs};
use crate::models::{Dialect, Key, Layer, MatrixDescriptor};
use crate::services::layer_ops::clamp_layer_index;

/// Renders the layered keymap source.
///
/// One `layer_{i}` node per layer, bindings in key traversal order with
/// `&none` filling unassigned positions. Magic placeholders are substituted
/// here; when any occur (and the OS mode is not macOS) the synthetic magic
/// layer is appended after the user layers.
#[must_use]
pub fn keymap(
    keys: &[Key],
    layers: &[Layer],
    hold_letters: &[char],
    default_layer: usize,
    os: UnicodeOs,
) -> String {
    let has_magic = has_magic_binding(layers);
    let use_unicode = layers_use_unicode(layers, Dialect::Zmk);
    let magic_layer_index = layers.len();
    let enable_magic_layer = has_magic && os != UnicodeOs::MacOs;

    let mut layer_blocks: Vec<String> = layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let bindings = keys
                .iter()
                .map(|key| {
                    let value = layer
                        .binding(&key.id)
                        .map(|b| b.zmk.as_str())
                        .filter(|v| !v.is_empty())
                        .unwrap_or("&none");
                    let updated = if has_magic {
                        resolve_magic_binding(value, magic_layer_index, Dialect::Zmk, os)
                    } else {
                        value.to_string()
                    };
                    if updated.is_empty() {
                        "&none".to_string()
                    } else {
                        updated
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            layer_block(index, &layer.name, &bindings)
        })
        .collect();

    if enable_magic_layer {
        let bindings =
            magic_layer_bindings(keys, layers.first(), Dialect::Zmk, hold_letters).join(" ");
        layer_blocks.push(layer_block(magic_layer_index, MAGIC_LAYER_NAME, &bindings));
    }

    let safe_default = clamp_layer_index(default_layer, layers.len());
    let unicode_header = if use_unicode {
        format!(
            "#include <behaviors/unicode.dtsi>\n\n&uc {{\n  default-mode = <{}>;\n}};\n\n",
            os.zmk_mode()
        )
    } else {
        String::new()
    };

    format!(
        "{unicode_header}/ {{\n  keymap {{\n    compatible = \"zmk,keymap\";\n    default_layer = <{safe_default}>;\n    layers {{\n{}\n    }};\n  }};\n}};\n",
        layer_blocks.join("\n")
    )
}

fn layer_block(index: usize, name: &str, bindings: &str) -> String {
    format!(
        "    layer_{index} {{\n      label = \"{name}\";\n      bindings = < {bindings} >;\n    }};"
    )
}

/// Renders `P<n>` pin names as devicetree GPIO phandles; anything else
/// passes through verbatim.
fn pin_to_gpio(pin: &str) -> Option<String> {
    if pin.is_empty() {
        return None;
    }
    let digits = pin.strip_prefix('P')?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("&gpio0 {digits} GPIO_ACTIVE_HIGH"))
    } else {
        Some(pin.to_string())
    }
}

/// Renders the kscan matrix overlay from the wiring description.
#[must_use]
pub fn overlay(matrix: &MatrixDescriptor) -> String {
    let row_pins: Vec<String> = matrix
        .rows
        .iter()
        .filter_map(|row| matrix.pin_for(&row.net))
        .filter_map(pin_to_gpio)
        .collect();
    let col_pins: Vec<String> = matrix
        .cols
        .iter()
        .filter_map(|col| matrix.pin_for(&col.net))
        .filter_map(pin_to_gpio)
        .collect();

    format!(
        "/ {{\n  kscan0: kscan_0 {{\n    compatible = \"zmk,kscan-gpio-matrix\";\n    row-gpios = < {} >;\n    col-gpios = < {} >;\n    diode-direction = \"col2row\";\n  }};\n}};\n",
        row_pins.join(" "),
        col_pins.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::magic::{magic_binding, DEFAULT_HOLD_LETTERS};
    use crate::models::{Binding, MatrixNet};
    use std::collections::BTreeMap;

    fn key(id: &str) -> Key {
        Key {
            id: id.to_string(),
            zone: "main".to_string(),
            row: "home".to_string(),
            col: "a".to_string(),
            row_net: "R0".to_string(),
            col_net: "C0".to_string(),
            x: 0.0,
            y: 0.0,
            rot: 0.0,
            unit: 19.05,
            row_index: 0,
            col_index: 0,
            zone_order: 0,
            skip: false,
            mirror_of: None,
        }
    }

    #[test]
    fn test_keymap_fills_unassigned_with_none() {
        let keys = vec![key("k0"), key("k1")];
        let mut base = Layer::new("Base");
        base.set_binding("k0", Binding::new("&kp A", "KC_A"));

        let source = keymap(&keys, &[base], &[], 0, UnicodeOs::Linux);
        assert!(source.contains("bindings = < &kp A &none >;"));
        assert!(source.contains("label = \"Base\";"));
        assert!(source.contains("default_layer = <0>;"));
        assert!(!source.contains("unicode.dtsi"));
    }

    #[test]
    fn test_keymap_appends_magic_layer() {
        let keys = vec![key("k0"), key("k1")];
        let mut base = Layer::new("Base");
        base.set_binding("k0", Binding::new("&kp A", "KC_A"));
        base.set_binding("k1", magic_binding());

        let source = keymap(&keys, &[base], &DEFAULT_HOLD_LETTERS, 0, UnicodeOs::Linux);
        // The placeholder becomes a layer-tap at the synthetic index
        assert!(source.contains("&lt 1 LGUI"));
        // Synthetic layer holds the Ctrl-combo for A and transparent filler
        assert!(source.contains("layer_1 {\n      label = \"Magic\";"));
        assert!(source.contains("< &kp LC(A) &trans >"));
    }

    #[test]
    fn test_keymap_magic_on_macos_uses_gui() {
        let keys = vec![key("k0")];
        let mut base = Layer::new("Base");
        base.set_binding("k0", magic_binding());

        let source = keymap(&keys, &[base], &DEFAULT_HOLD_LETTERS, 0, UnicodeOs::MacOs);
        assert!(source.contains("&kp LGUI"));
        assert!(!source.contains("label = \"Magic\""));
    }

    #[test]
    fn test_keymap_unicode_header() {
        let keys = vec![key("k0")];
        let mut base = Layer::new("Base");
        base.set_binding("k0", Binding::new("&uc 0x2014 0", "UC(0x2014)"));

        let source = keymap(&keys, &[base], &[], 0, UnicodeOs::WinCompose);
        assert!(source.starts_with("#include <behaviors/unicode.dtsi>"));
        assert!(source.contains("default-mode = <UC_MODE_WIN_COMPOSE>;"));
    }

    #[test]
    fn test_keymap_clamps_default_layer() {
        let keys = vec![key("k0")];
        let source = keymap(&keys, &[Layer::new("Base")], &[], 7, UnicodeOs::Linux);
        assert!(source.contains("default_layer = <0>;"));
    }

    #[test]
    fn test_overlay_renders_gpio_pins() {
        let mut pin_map = BTreeMap::new();
        pin_map.insert("R0".to_string(), "P2".to_string());
        pin_map.insert("C0".to_string(), "P10".to_string());
        let matrix = MatrixDescriptor {
            rows: vec![MatrixNet {
                name: "home".to_string(),
                net: "R0".to_string(),
            }],
            cols: vec![MatrixNet {
                name: "a".to_string(),
                net: "C0".to_string(),
            }],
            pin_map,
            mirrored: false,
            trrs_pin: String::new(),
        };

        let source = overlay(&matrix);
        assert!(source.contains("row-gpios = < &gpio0 2 GPIO_ACTIVE_HIGH >;"));
        assert!(source.contains("col-gpios = < &gpio0 10 GPIO_ACTIVE_HIGH >;"));
        assert!(source.contains("diode-direction = \"col2row\";"));
    }
}
