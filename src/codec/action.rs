//! Dialect-neutral binding representation.
//!
//! Both firmware dialects are small string grammars. Decoding goes through
//! one shared routine into [`BindingAction`]; each dialect then gets its own
//! encoder. This keeps the per-dialect pattern knowledge in exactly two
//! places instead of being scattered through every feature.

use crate::codec::modifiers::{self, Modifier};
use crate::codec::unicode;
use crate::models::Dialect;
use regex::Regex;
use std::sync::OnceLock;

/// How a layer binding activates its target layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMode {
    /// Active while held (`&mo` / `MO`)
    Hold,
    /// Press to toggle (`&tog` / `TG`)
    Toggle,
    /// Active for the next key only (`&sl` / `OSL`)
    OneShot,
}

impl LayerMode {
    /// ZMK behavior prefix for this mode.
    #[must_use]
    pub const fn zmk_behavior(self) -> &'static str {
        match self {
            Self::Hold => "&mo",
            Self::Toggle => "&tog",
            Self::OneShot => "&sl",
        }
    }

    /// QMK function name for this mode.
    #[must_use]
    pub const fn qmk_function(self) -> &'static str {
        match self {
            Self::Hold => "MO",
            Self::Toggle => "TG",
            Self::OneShot => "OSL",
        }
    }
}

/// A decoded layer-index reference found inside a binding string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRef {
    /// Referenced layer index (position in the layer list)
    pub index: usize,
    /// Grammar the binding was written in
    pub dialect: Dialect,
    /// Activation mode
    pub mode: LayerMode,
}

/// Dialect-neutral decoded form of a binding string.
///
/// `PlainKey` only covers bindings in a recognized key-press shape
/// (`&kp X` / `KC_X`); free-form user edits that match no grammar land in
/// `Other` and flow through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    /// No action assigned (`&none` / `KC_NO`, or an empty string)
    NoAction,
    /// Fall through to the next lower layer (`&trans` / `KC_TRNS`)
    Transparent,
    /// Plain key press with a bare key token
    PlainKey(String),
    /// Layer activation with a positional layer index
    LayerAction(LayerRef),
    /// Key press wrapped in one or more modifiers (canonical order)
    Modified {
        /// Modifiers in canonical order
        mods: Vec<Modifier>,
        /// Bare inner key token
        base: String,
    },
    /// Unicode output binding carrying an uppercase hex codepoint
    Unicode(String),
    /// The magic placeholder, substituted at export time
    Magic,
    /// Unrecognized text, preserved verbatim
    Other(String),
}

fn kc_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"KC_([A-Z0-9_]+)").expect("valid regex"))
}

/// Parses a layer binding in either dialect (`&mo 2`, `TG(1)`, ...).
///
/// Returns `None` for anything that is not a layer binding with a numeric
/// index argument.
///
/// # Examples
/// ```
/// use keeber::codec::{parse_layer_binding, LayerMode};
/// use keeber::models::Dialect;
///
/// let layer_ref = parse_layer_binding("&mo 2").unwrap();
/// assert_eq!(layer_ref.index, 2);
/// assert_eq!(layer_ref.dialect, Dialect::Zmk);
/// assert_eq!(layer_ref.mode, LayerMode::Hold);
///
/// assert!(parse_layer_binding("KC_A").is_none());
/// ```
#[must_use]
pub fn parse_layer_binding(value: &str) -> Option<LayerRef> {
    let trimmed = value.trim();

    for (prefix, mode) in [
        ("&mo", LayerMode::Hold),
        ("&tog", LayerMode::Toggle),
        ("&sl", LayerMode::OneShot),
    ] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            if rest.starts_with(char::is_whitespace) {
                let arg = rest.trim();
                if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
                    return Some(LayerRef {
                        index: arg.parse().ok()?,
                        dialect: Dialect::Zmk,
                        mode,
                    });
                }
            }
        }
    }

    for (prefix, mode) in [
        ("MO(", LayerMode::Hold),
        ("TG(", LayerMode::Toggle),
        ("OSL(", LayerMode::OneShot),
    ] {
        if let Some(inner) = trimmed.strip_prefix(prefix) {
            let arg = inner.strip_suffix(')')?;
            if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
                return Some(LayerRef {
                    index: arg.parse().ok()?,
                    dialect: Dialect::Qmk,
                    mode,
                });
            }
        }
    }

    None
}

/// Renders a layer reference back into its dialect's binding string.
#[must_use]
pub fn format_layer_binding(index: usize, dialect: Dialect, mode: LayerMode) -> String {
    match dialect {
        Dialect::Zmk => format!("{} {index}", mode.zmk_behavior()),
        Dialect::Qmk => format!("{}({index})", mode.qmk_function()),
    }
}

/// Decodes a binding string from either dialect into the neutral form.
#[must_use]
pub fn decode_binding(binding: &str) -> BindingAction {
    let trimmed = binding.trim();
    if trimmed.is_empty() || trimmed == "&none" || trimmed == "KC_NO" {
        return BindingAction::NoAction;
    }
    if trimmed == "&trans" || trimmed == "KC_TRNS" {
        return BindingAction::Transparent;
    }
    if trimmed == "&magic" || trimmed == "MAGIC" {
        return BindingAction::Magic;
    }
    if let Some(hex) = unicode::parse_unicode_hex(trimmed) {
        return BindingAction::Unicode(hex);
    }
    if let Some(layer_ref) = parse_layer_binding(trimmed) {
        return BindingAction::LayerAction(layer_ref);
    }

    let (mods, base) = modifiers::unwrap_modifiers(trimmed);
    if !mods.is_empty() {
        let base = base.strip_prefix("KC_").unwrap_or(&base).to_string();
        return BindingAction::Modified { mods, base };
    }

    if let Some(rest) = trimmed.strip_prefix("&kp") {
        let token = rest.split_whitespace().next().unwrap_or_default();
        return BindingAction::PlainKey(token.to_string());
    }
    if let Some(caps) = kc_token_re().captures(trimmed) {
        return BindingAction::PlainKey(caps[1].to_string());
    }

    BindingAction::Other(trimmed.to_string())
}

impl BindingAction {
    /// Encodes this action into the given dialect's binding string.
    ///
    /// `Other` text is the user escape hatch and renders verbatim in both
    /// dialects.
    #[must_use]
    pub fn encode(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (Self::NoAction, Dialect::Zmk) => "&none".to_string(),
            (Self::NoAction, Dialect::Qmk) => "KC_NO".to_string(),
            (Self::Transparent, Dialect::Zmk) => "&trans".to_string(),
            (Self::Transparent, Dialect::Qmk) => "KC_TRNS".to_string(),
            (Self::Magic, Dialect::Zmk) => "&magic".to_string(),
            (Self::Magic, Dialect::Qmk) => "MAGIC".to_string(),
            (Self::PlainKey(token), Dialect::Zmk) => format!("&kp {token}"),
            (Self::PlainKey(token), Dialect::Qmk) => format!("KC_{token}"),
            (Self::LayerAction(layer_ref), _) => {
                format_layer_binding(layer_ref.index, dialect, layer_ref.mode)
            }
            (Self::Unicode(hex), _) => {
                let binding = unicode::unicode_binding(hex);
                match dialect {
                    Dialect::Zmk => binding.zmk,
                    Dialect::Qmk => binding.qmk,
                }
            }
            (Self::Modified { mods, base }, Dialect::Zmk) => {
                format!("&kp {}", modifiers::nest_wrappers(mods, base, Dialect::Zmk))
            }
            (Self::Modified { mods, base }, Dialect::Qmk) => {
                modifiers::nest_wrappers(mods, &format!("KC_{base}"), Dialect::Qmk)
            }
            (Self::Other(text), _) => text.clone(),
        }
    }

    /// The neutral token used for registry and label lookups.
    ///
    /// Layer actions collapse to an `L<index>` marker; no-action bindings
    /// collapse to the empty string.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            Self::NoAction => String::new(),
            Self::Transparent => "TRANS".to_string(),
            Self::Magic => "MAGIC".to_string(),
            Self::PlainKey(token) => token.clone(),
            Self::LayerAction(layer_ref) => format!("L{}", layer_ref.index),
            Self::Unicode(hex) => format!("U+{hex}"),
            Self::Modified { base, .. } => base.clone(),
            Self::Other(text) => text.clone(),
        }
    }
}

/// Extracts the neutral lookup token from a binding in either dialect.
///
/// # Examples
/// ```
/// use keeber::codec::action::neutral_token;
///
/// assert_eq!(neutral_token("&kp C_VOL_UP"), "C_VOL_UP");
/// assert_eq!(neutral_token("KC_AUDIO_VOL_UP"), "AUDIO_VOL_UP");
/// assert_eq!(neutral_token("MO(3)"), "L3");
/// assert_eq!(neutral_token("&none"), "");
/// ```
#[must_use]
pub fn neutral_token(binding: &str) -> String {
    decode_binding(binding).token()
}
