//! Display-label resolution for bindings.
//!
//! Labels come from, in order: the unicode codec, modifier composition,
//! the static key registry, a built-in table of common key names, and
//! finally the raw token. `L<index>` markers resolve to the target layer's
//! current display name.

use crate::codec::action::neutral_token;
use crate::codec::modifiers::{modifier_labels, unwrap_modifiers};
use crate::codec::unicode::parse_unicode_hex;
use crate::models::Layer;
use crate::registry::KeyRegistry;

/// Normalizes a token for case- and underscore-insensitive lookups.
#[must_use]
pub fn normalize_token(token: &str) -> String {
    token.to_uppercase().replace('_', "")
}

/// Built-in labels for common named keys, keyed by normalized token.
fn builtin_label(normalized: &str) -> Option<&'static str> {
    let label = match normalized {
        "ESC" | "ESCAPE" => "Esc",
        "TAB" => "Tab",
        "ENTER" | "RETURN" => "Ent",
        "SPACE" => "Spc",
        "BACKSPACE" | "BSPC" => "Bksp",
        "DELETE" | "DEL" => "Del",
        "SHIFT" | "LSHIFT" | "RSHIFT" | "LSFT" | "RSFT" => "Shift",
        "CONTROL" | "CTRL" | "LCTRL" | "RCTRL" | "LCTL" | "RCTL" => "Ctrl",
        "ALT" | "LALT" | "RALT" => "Alt",
        "GUI" | "LGUI" | "RGUI" => "Gui",
        "CMD" | "LCMD" | "RCMD" => "Cmd",
        "CAPS" | "CAPSLOCK" => "Caps",
        "HOME" => "Home",
        "END" => "End",
        "PGUP" | "PAGEUP" => "PgUp",
        "PGDN" | "PAGEDOWN" => "PgDn",
        "INS" | "INSERT" => "Ins",
        _ => return None,
    };
    Some(label)
}

/// Arrow-key symbols, keyed by normalized token.
fn arrow_label(normalized: &str) -> Option<&'static str> {
    let label = match normalized {
        "UP" => "↑",
        "DOWN" => "↓",
        "LEFT" => "←",
        "RIGHT" | "RGHT" => "→",
        _ => return None,
    };
    Some(label)
}

fn is_layer_marker(label: &str) -> Option<usize> {
    let rest = label.strip_prefix('L')?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Formats a bare display label for a binding without registry context.
///
/// # Examples
/// ```
/// use keeber::codec::format_key_label;
///
/// assert_eq!(format_key_label("&kp A"), "A");
/// assert_eq!(format_key_label("&kp N4"), "4");
/// assert_eq!(format_key_label("KC_PGUP"), "PgUp");
/// assert_eq!(format_key_label("&kp UP"), "↑");
/// ```
#[must_use]
pub fn format_key_label(binding: &str) -> String {
    let token = neutral_token(binding);
    if token.is_empty() {
        return String::new();
    }
    if is_layer_marker(&token).is_some() {
        return token;
    }

    let upper = token.to_uppercase();
    if upper.chars().count() == 1 {
        return upper;
    }
    if let Some(rest) = upper.strip_prefix('N') {
        if rest.len() == 1 && rest.bytes().all(|b| b.is_ascii_digit()) {
            return rest.to_string();
        }
    }

    let normalized = normalize_token(&upper);
    if let Some(label) = arrow_label(&normalized) {
        return label.to_string();
    }
    if let Some(label) = builtin_label(&normalized) {
        return label.to_string();
    }

    token
}

/// Resolves the display label for one binding string.
///
/// Registry labels win over the built-in table; `L<index>` markers resolve
/// to the referenced layer's current name.
#[must_use]
pub fn resolve_binding_label(binding: &str, layers: &[Layer], registry: &KeyRegistry) -> String {
    if binding.trim().is_empty() {
        return String::new();
    }
    let canonical = registry.label_for(binding);
    let label = canonical.map_or_else(|| format_key_label(binding), ToString::to_string);
    if let Some(index) = is_layer_marker(&label) {
        if let Some(layer) = layers.get(index) {
            return layer.name.clone();
        }
    }
    label
}

/// Resolves the display label for a dual-dialect binding pair.
///
/// Unicode bindings render as `U+<HEX>`; modifier-wrapped bindings as
/// `Mod1+Mod2+...+Base` in canonical modifier order; everything else falls
/// through to single-binding resolution, ZMK side first.
#[must_use]
pub fn resolve_key_label(zmk: &str, qmk: &str, layers: &[Layer], registry: &KeyRegistry) -> String {
    if let Some(hex) = parse_unicode_hex(zmk).or_else(|| parse_unicode_hex(qmk)) {
        return format!("U+{hex}");
    }

    let (zmk_mods, zmk_base) = unwrap_modifiers(zmk);
    let (qmk_mods, qmk_base) = unwrap_modifiers(qmk);
    let mod_info = if zmk_mods.is_empty() {
        (!qmk_mods.is_empty()).then_some((qmk_mods, qmk_base))
    } else {
        Some((zmk_mods, zmk_base))
    };

    if let Some((mods, base)) = mod_info {
        let base_label = [base.as_str(), zmk, qmk]
            .into_iter()
            .map(|b| resolve_binding_label(b, layers, registry))
            .find(|label| !label.is_empty())
            .unwrap_or_default();
        if !base_label.is_empty() {
            let labels = modifier_labels(&mods);
            if !labels.is_empty() {
                return format!("{}+{base_label}", labels.join("+"));
            }
        }
    }

    let zmk_label = resolve_binding_label(zmk, layers, registry);
    if zmk_label.is_empty() {
        resolve_binding_label(qmk, layers, registry)
    } else {
        zmk_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> KeyRegistry {
        KeyRegistry::load().expect("registry loads")
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("pg_up"), "PGUP");
        assert_eq!(normalize_token("C_VOL_UP"), "CVOLUP");
    }

    #[test]
    fn test_format_key_label_basics() {
        assert_eq!(format_key_label(""), "");
        assert_eq!(format_key_label("&none"), "");
        assert_eq!(format_key_label("&kp Q"), "Q");
        assert_eq!(format_key_label("KC_9"), "9");
        assert_eq!(format_key_label("&kp N0"), "0");
        assert_eq!(format_key_label("&mo 2"), "L2");
        assert_eq!(format_key_label("KC_LEFT"), "←");
        assert_eq!(format_key_label("&kp BSPC"), "Bksp");
        assert_eq!(format_key_label("&kp WEIRD_KEY"), "WEIRD_KEY");
    }

    #[test]
    fn test_resolve_binding_label_uses_registry() {
        let layers = vec![Layer::new("Base")];
        let reg = registry();
        assert_eq!(resolve_binding_label("&kp C_VOL_UP", &layers, &reg), "Vol+");
        assert_eq!(resolve_binding_label("KC_VOLU", &layers, &reg), "Vol+");
        // Aliases resolve to the same label
        assert_eq!(
            resolve_binding_label("KC_AUDIO_VOL_UP", &layers, &reg),
            "Vol+"
        );
    }

    #[test]
    fn test_resolve_binding_label_layer_names() {
        let layers = vec![Layer::new("Base"), Layer::new("Nav")];
        let reg = registry();
        assert_eq!(resolve_binding_label("&mo 1", &layers, &reg), "Nav");
        assert_eq!(resolve_binding_label("TG(0)", &layers, &reg), "Base");
        // Out-of-range references keep the neutral marker
        assert_eq!(resolve_binding_label("&mo 9", &layers, &reg), "L9");
    }

    #[test]
    fn test_resolve_key_label_unicode_first() {
        let layers = vec![Layer::new("Base")];
        let reg = registry();
        assert_eq!(
            resolve_key_label("&uc 0x2014 0", "UC(0x2014)", &layers, &reg),
            "U+2014"
        );
    }

    #[test]
    fn test_resolve_key_label_modifier_composition() {
        let layers = vec![Layer::new("Base")];
        let reg = registry();
        // Left shift then left ctrl still composes in canonical order
        assert_eq!(
            resolve_key_label("&kp LS(LC(A))", "LSFT(LCTL(KC_A))", &layers, &reg),
            "Ctrl+Shift+A"
        );
    }

    #[test]
    fn test_resolve_key_label_falls_back_to_qmk() {
        let layers = vec![Layer::new("Base")];
        let reg = registry();
        assert_eq!(resolve_key_label("", "KC_TAB", &layers, &reg), "Tab");
    }
}
