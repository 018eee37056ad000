//! Modifier wrap/unwrap algebra.
//!
//! Eight two-sided modifiers with a fixed canonical order. Wrapping nests
//! one wrapper call per modifier around a plain key press; unwrapping peels
//! wrapper calls until none match. The canonical order decides both the
//! nesting produced by wrap and the display order of modifier labels,
//! regardless of the order the user toggled the modifiers on.

use crate::codec::action::{decode_binding, BindingAction};
use crate::models::{Binding, Dialect};
use regex::Regex;
use std::sync::OnceLock;

/// One of the eight two-sided keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Left control (`LC` / `LCTL`)
    LeftCtrl,
    /// Right control (`RC` / `RCTL`)
    RightCtrl,
    /// Left shift (`LS` / `LSFT`)
    LeftShift,
    /// Right shift (`RS` / `RSFT`)
    RightShift,
    /// Left alt (`LA` / `LALT`)
    LeftAlt,
    /// Right alt (`RA` / `RALT`)
    RightAlt,
    /// Left GUI (`LG` / `LGUI`)
    LeftGui,
    /// Right GUI (`RG` / `RGUI`)
    RightGui,
}

/// Canonical modifier order used for wrapping and label composition.
pub const CANONICAL_ORDER: [Modifier; 8] = [
    Modifier::LeftCtrl,
    Modifier::RightCtrl,
    Modifier::LeftShift,
    Modifier::RightShift,
    Modifier::LeftAlt,
    Modifier::RightAlt,
    Modifier::LeftGui,
    Modifier::RightGui,
];

impl Modifier {
    /// ZMK wrapper function name.
    #[must_use]
    pub const fn zmk_wrapper(self) -> &'static str {
        match self {
            Self::LeftCtrl => "LC",
            Self::RightCtrl => "RC",
            Self::LeftShift => "LS",
            Self::RightShift => "RS",
            Self::LeftAlt => "LA",
            Self::RightAlt => "RA",
            Self::LeftGui => "LG",
            Self::RightGui => "RG",
        }
    }

    /// QMK wrapper function name.
    #[must_use]
    pub const fn qmk_wrapper(self) -> &'static str {
        match self {
            Self::LeftCtrl => "LCTL",
            Self::RightCtrl => "RCTL",
            Self::LeftShift => "LSFT",
            Self::RightShift => "RSFT",
            Self::LeftAlt => "LALT",
            Self::RightAlt => "RALT",
            Self::LeftGui => "LGUI",
            Self::RightGui => "RGUI",
        }
    }

    /// Display label used in composed key labels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LeftCtrl => "Ctrl",
            Self::RightCtrl => "RCtrl",
            Self::LeftShift => "Shift",
            Self::RightShift => "RShift",
            Self::LeftAlt => "Alt",
            Self::RightAlt => "RAlt",
            Self::LeftGui => "Gui",
            Self::RightGui => "RGui",
        }
    }

    /// Resolves a wrapper function name from either dialect.
    #[must_use]
    pub fn from_wrapper(name: &str) -> Option<Self> {
        CANONICAL_ORDER
            .into_iter()
            .find(|m| m.zmk_wrapper() == name || m.qmk_wrapper() == name)
    }
}

/// Deduplicates a modifier set into canonical order.
#[must_use]
pub fn canonical_order(mods: &[Modifier]) -> Vec<Modifier> {
    CANONICAL_ORDER
        .into_iter()
        .filter(|m| mods.contains(m))
        .collect()
}

/// Display labels for a modifier set, in canonical order.
#[must_use]
pub fn modifier_labels(mods: &[Modifier]) -> Vec<&'static str> {
    canonical_order(mods).into_iter().map(Modifier::label).collect()
}

fn wrapper_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+)\((.+)\)$").expect("valid regex"))
}

/// Peels modifier wrappers off a binding in either dialect.
///
/// A leading `&kp` prefix is stripped first. Returns the modifier set in
/// canonical order together with the innermost binding text; a binding with
/// no wrappers comes back unchanged with an empty modifier list.
///
/// # Examples
/// ```
/// use keeber::codec::modifiers::{unwrap_modifiers, Modifier};
///
/// let (mods, base) = unwrap_modifiers("&kp LS(LC(A))");
/// assert_eq!(mods, vec![Modifier::LeftCtrl, Modifier::LeftShift]);
/// assert_eq!(base, "A");
///
/// let (mods, base) = unwrap_modifiers("LCTL(KC_B)");
/// assert_eq!(mods, vec![Modifier::LeftCtrl]);
/// assert_eq!(base, "KC_B");
/// ```
#[must_use]
pub fn unwrap_modifiers(binding: &str) -> (Vec<Modifier>, String) {
    let mut trimmed = binding.trim().to_string();
    if trimmed.is_empty() {
        return (Vec::new(), String::new());
    }

    if let Some(rest) = trimmed.strip_prefix("&kp") {
        trimmed = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let mut mods = Vec::new();
    loop {
        let Some(caps) = wrapper_re().captures(&trimmed) else {
            break;
        };
        let Some(modifier) = Modifier::from_wrapper(&caps[1]) else {
            break;
        };
        let inner = caps[2].to_string();
        mods.push(modifier);
        trimmed = inner;
    }

    (canonical_order(&mods), trimmed)
}

/// Nests wrapper calls around `inner`, one per modifier in canonical order.
///
/// The last modifier in canonical order becomes the outermost wrapper.
#[must_use]
pub fn nest_wrappers(mods: &[Modifier], inner: &str, dialect: Dialect) -> String {
    let mut wrapped = inner.to_string();
    for modifier in canonical_order(mods) {
        let name = match dialect {
            Dialect::Zmk => modifier.zmk_wrapper(),
            Dialect::Qmk => modifier.qmk_wrapper(),
        };
        wrapped = format!("{name}({wrapped})");
    }
    wrapped
}

/// Applies a modifier set to a binding string.
///
/// Only plain key-press bindings are wrapped; transparent, no-action,
/// layer, unicode, magic, already-modified, and free-form bindings pass
/// through unchanged.
#[must_use]
pub fn apply_modifiers(binding: &str, dialect: Dialect, mods: &[Modifier]) -> String {
    if mods.is_empty() {
        return binding.to_string();
    }
    match decode_binding(binding) {
        // Only exact plain forms wrap; a key token found inside a larger
        // expression (e.g. LT(1, KC_SPC)) must not be lifted out of it
        BindingAction::PlainKey(token)
            if BindingAction::PlainKey(token.clone()).encode(dialect) == binding.trim() =>
        {
            BindingAction::Modified {
                mods: canonical_order(mods),
                base: token,
            }
            .encode(dialect)
        }
        _ => binding.to_string(),
    }
}

/// Applies a modifier set to both halves of a binding pair.
#[must_use]
pub fn apply_to_pair(binding: &Binding, mods: &[Modifier]) -> Binding {
    Binding {
        zmk: apply_modifiers(&binding.zmk, Dialect::Zmk, mods),
        qmk: apply_modifiers(&binding.qmk, Dialect::Qmk, mods),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_ignores_insertion_order() {
        let mods = vec![Modifier::LeftShift, Modifier::LeftCtrl];
        assert_eq!(
            canonical_order(&mods),
            vec![Modifier::LeftCtrl, Modifier::LeftShift]
        );
    }

    #[test]
    fn test_canonical_order_dedupes() {
        let mods = vec![Modifier::LeftAlt, Modifier::LeftAlt, Modifier::LeftCtrl];
        assert_eq!(
            canonical_order(&mods),
            vec![Modifier::LeftCtrl, Modifier::LeftAlt]
        );
    }

    #[test]
    fn test_from_wrapper_both_dialects() {
        assert_eq!(Modifier::from_wrapper("LC"), Some(Modifier::LeftCtrl));
        assert_eq!(Modifier::from_wrapper("LCTL"), Some(Modifier::LeftCtrl));
        assert_eq!(Modifier::from_wrapper("RG"), Some(Modifier::RightGui));
        assert_eq!(Modifier::from_wrapper("RGUI"), Some(Modifier::RightGui));
        assert_eq!(Modifier::from_wrapper("MO"), None);
    }

    #[test]
    fn test_unwrap_no_modifiers() {
        let (mods, base) = unwrap_modifiers("&kp SPACE");
        assert!(mods.is_empty());
        assert_eq!(base, "SPACE");

        let (mods, base) = unwrap_modifiers("KC_A");
        assert!(mods.is_empty());
        assert_eq!(base, "KC_A");
    }

    #[test]
    fn test_unwrap_stops_at_non_modifier_wrapper() {
        let (mods, base) = unwrap_modifiers("MO(1)");
        assert!(mods.is_empty());
        assert_eq!(base, "MO(1)");
    }

    #[test]
    fn test_wrap_zmk() {
        let mods = vec![Modifier::LeftShift, Modifier::LeftCtrl];
        assert_eq!(
            apply_modifiers("&kp A", Dialect::Zmk, &mods),
            "&kp LS(LC(A))"
        );
    }

    #[test]
    fn test_wrap_qmk() {
        let mods = vec![Modifier::LeftShift, Modifier::LeftCtrl];
        assert_eq!(
            apply_modifiers("KC_A", Dialect::Qmk, &mods),
            "LSFT(LCTL(KC_A))"
        );
    }

    #[test]
    fn test_wrap_is_noop_for_non_plain_bindings() {
        let mods = vec![Modifier::LeftCtrl];
        for binding in ["&trans", "&none", "&mo 1", "&magic", "&uc 0x2014 0"] {
            assert_eq!(apply_modifiers(binding, Dialect::Zmk, &mods), binding);
        }
        for binding in ["KC_TRNS", "KC_NO", "MO(1)", "LSFT(KC_B)", "whatever"] {
            assert_eq!(apply_modifiers(binding, Dialect::Qmk, &mods), binding);
        }
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let mods = vec![Modifier::LeftGui, Modifier::LeftShift];
        let wrapped = apply_modifiers("&kp Q", Dialect::Zmk, &mods);
        let (unwrapped, base) = unwrap_modifiers(&wrapped);
        assert_eq!(unwrapped, canonical_order(&mods));
        assert_eq!(base, "Q");
    }

    #[test]
    fn test_apply_to_pair_keeps_dialects_in_step() {
        let binding = Binding::new("&kp A", "KC_A");
        let modified = apply_to_pair(&binding, &[Modifier::RightAlt]);
        assert_eq!(modified.zmk, "&kp RA(A)");
        assert_eq!(modified.qmk, "RALT(KC_A)");
    }
}
