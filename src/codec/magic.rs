//! Magic-key placeholder and synthetic layer.
//!
//! The magic placeholder is stored verbatim in layers and only resolved
//! while rendering firmware: on macOS unicode mode it degrades to a plain
//! GUI press, otherwise it becomes a layer-tap into a synthetic trailing
//! layer holding Ctrl-combos for a configurable set of letters.

use crate::codec::action::neutral_token;
use crate::codec::modifiers::unwrap_modifiers;
use crate::codec::unicode::UnicodeOs;
use crate::models::{Binding, Dialect, Key, Layer};

/// Display name of the synthetic magic layer.
pub const MAGIC_LAYER_NAME: &str = "Magic";

/// Letters whose base-layer keys get a Ctrl-combo on the magic layer
/// when no explicit configuration is present.
pub const DEFAULT_HOLD_LETTERS: [char; 6] = ['A', 'X', 'C', 'V', 'B', 'P'];

/// The stored placeholder pair.
#[must_use]
pub fn magic_binding() -> Binding {
    Binding::new("&magic", "MAGIC")
}

/// True when `binding` is the magic placeholder in either dialect.
#[must_use]
pub fn is_magic_binding(binding: &str) -> bool {
    let trimmed = binding.trim();
    trimmed == "&magic" || trimmed == "MAGIC"
}

/// True when the placeholder occurs anywhere in any layer.
#[must_use]
pub fn has_magic_binding(layers: &[Layer]) -> bool {
    layers.iter().any(|layer| {
        layer
            .bindings
            .values()
            .any(|binding| is_magic_binding(&binding.zmk) || is_magic_binding(&binding.qmk))
    })
}

/// Cleans a user-supplied hold-letter list: trims, uppercases, keeps
/// single letters A-Z, deduplicates, and orders alphabetically.
#[must_use]
pub fn normalize_hold_letters<S: AsRef<str>>(letters: &[S]) -> Vec<char> {
    let mut cleaned: Vec<char> = letters
        .iter()
        .filter_map(|letter| {
            let trimmed = letter.as_ref().trim().to_uppercase();
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => Some(c),
                _ => None,
            }
        })
        .collect();
    cleaned.sort_unstable();
    cleaned.dedup();
    cleaned
}

/// Extracts the single alphabetic token behind a binding, looking through
/// modifier wrappers. Returns `None` for anything else.
#[must_use]
pub fn alpha_token(binding: &str) -> Option<char> {
    let (_, base) = unwrap_modifiers(binding);
    let base_binding = if base.is_empty() { binding } else { &base };
    let token = neutral_token(base_binding).to_uppercase();
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}

/// Substitutes the magic placeholder at render time.
///
/// Non-magic bindings pass through unchanged. `magic_layer_index` is the
/// index the synthetic layer will occupy (the current layer count).
#[must_use]
pub fn resolve_magic_binding(
    binding: &str,
    magic_layer_index: usize,
    dialect: Dialect,
    os: UnicodeOs,
) -> String {
    if !is_magic_binding(binding) {
        return binding.to_string();
    }
    if os == UnicodeOs::MacOs {
        return match dialect {
            Dialect::Zmk => "&kp LGUI".to_string(),
            Dialect::Qmk => "KC_LGUI".to_string(),
        };
    }
    match dialect {
        Dialect::Zmk => format!("&lt {magic_layer_index} LGUI"),
        Dialect::Qmk => format!("LT({magic_layer_index}, KC_LGUI)"),
    }
}

/// Builds the synthetic magic layer's bindings, one per key in order.
///
/// Keys whose base-layer binding is a bare letter in the hold set get a
/// Ctrl-combo of that letter; every other position is transparent.
#[must_use]
pub fn magic_layer_bindings(
    keys: &[Key],
    base_layer: Option<&Layer>,
    dialect: Dialect,
    hold_letters: &[char],
) -> Vec<String> {
    keys.iter()
        .map(|key| {
            let base_value = base_layer
                .and_then(|layer| layer.binding(&key.id))
                .map(|binding| {
                    if binding.zmk.is_empty() {
                        binding.qmk.as_str()
                    } else {
                        binding.zmk.as_str()
                    }
                })
                .unwrap_or_default();
            let alpha = alpha_token(base_value);
            match alpha {
                Some(letter) if hold_letters.contains(&letter) => match dialect {
                    Dialect::Zmk => format!("&kp LC({letter})"),
                    Dialect::Qmk => format!("LCTL(KC_{letter})"),
                },
                _ => match dialect {
                    Dialect::Zmk => "&trans".to_string(),
                    Dialect::Qmk => "KC_TRNS".to_string(),
                },
            }
        })
        .collect()
}
