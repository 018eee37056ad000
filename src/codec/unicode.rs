//! Unicode codepoint bindings.
//!
//! Codepoints are carried as uppercase hex strings. Input validation is
//! pre-flight: invalid hex or out-of-range values are rejected before any
//! binding is produced.

use crate::models::{Binding, Dialect, Layer};
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Highest valid Unicode codepoint.
pub const UNICODE_MAX: u32 = 0x0010_FFFF;

fn zmk_unicode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^&uc\s+(?:0x)?([0-9a-fA-F]+)\b").expect("valid regex"))
}

fn qmk_unicode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^UC\(\s*0x([0-9a-fA-F]+)\s*\)$").expect("valid regex"))
}

/// Normalizes user hex input into a bare uppercase hex string.
///
/// Strips optional `U+` and `0x` prefixes. Fails on empty input, non-hex
/// characters, and codepoints above [`UNICODE_MAX`], without touching any
/// state.
///
/// # Examples
/// ```
/// use keeber::codec::unicode::normalize_hex_input;
///
/// assert_eq!(normalize_hex_input("U+1f600").unwrap(), "1F600");
/// assert_eq!(normalize_hex_input("0x2014").unwrap(), "2014");
/// assert!(normalize_hex_input("XYZ").is_err());
/// assert!(normalize_hex_input("110000").is_err());
/// ```
pub fn normalize_hex_input(input: &str) -> Result<String> {
    let trimmed = input.trim().to_uppercase();
    let stripped = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(&trimmed);
    if stripped.is_empty() {
        bail!("Enter a Unicode code point.");
    }
    if !stripped.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("Use hex digits 0-9 and A-F.");
    }
    let codepoint = u32::from_str_radix(stripped, 16);
    match codepoint {
        Ok(value) if value <= UNICODE_MAX => Ok(stripped.to_string()),
        _ => bail!("Code points must be between U+0 and U+10FFFF."),
    }
}

/// Builds the dual-dialect binding pair for a validated hex codepoint.
#[must_use]
pub fn unicode_binding(hex: &str) -> Binding {
    Binding {
        zmk: format!("&uc 0x{hex} 0"),
        qmk: format!("UC(0x{hex})"),
    }
}

/// Extracts the uppercase hex codepoint from a unicode binding in either
/// dialect, or `None` for any other binding.
#[must_use]
pub fn parse_unicode_hex(binding: &str) -> Option<String> {
    let trimmed = binding.trim();
    if let Some(caps) = zmk_unicode_re().captures(trimmed) {
        return Some(caps[1].to_uppercase());
    }
    if let Some(caps) = qmk_unicode_re().captures(trimmed) {
        return Some(caps[1].to_uppercase());
    }
    None
}

/// True when any binding on any layer emits unicode in the given dialect.
#[must_use]
pub fn layers_use_unicode(layers: &[Layer], dialect: Dialect) -> bool {
    layers.iter().any(|layer| {
        layer.bindings.values().any(|binding| {
            let value = match dialect {
                Dialect::Zmk => &binding.zmk,
                Dialect::Qmk => &binding.qmk,
            };
            parse_unicode_hex(value).is_some()
        })
    })
}

/// Operating-system flavor used for unicode input, tracked per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeOs {
    /// macOS unicode hex input
    MacOs,
    /// Linux IBus-style input
    #[default]
    Linux,
    /// Windows with WinCompose
    WinCompose,
    /// Windows hex numpad input
    WinNumpad,
}

impl UnicodeOs {
    /// All supported OS modes, in display order.
    pub const ALL: [Self; 4] = [Self::MacOs, Self::Linux, Self::WinCompose, Self::WinNumpad];

    /// Stable identifier used in save documents.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::WinCompose => "wincompose",
            Self::WinNumpad => "winnumpad",
        }
    }

    /// ZMK default-mode constant.
    #[must_use]
    pub const fn zmk_mode(self) -> &'static str {
        match self {
            Self::MacOs => "UC_MODE_MACOS",
            Self::Linux => "UC_MODE_LINUX",
            Self::WinCompose => "UC_MODE_WIN_COMPOSE",
            Self::WinNumpad => "UC_MODE_WIN_ALT",
        }
    }

    /// QMK input-mode constant.
    #[must_use]
    pub const fn qmk_mode(self) -> &'static str {
        match self {
            Self::MacOs => "UNICODE_MODE_MACOS",
            Self::Linux => "UNICODE_MODE_LINUX",
            Self::WinCompose => "UNICODE_MODE_WINCOMPOSE",
            Self::WinNumpad => "UNICODE_MODE_WINDOWS",
        }
    }

    /// Resolves an id from a save document, falling back to the default
    /// for unknown values.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|os| os.id() == id)
            .unwrap_or_default()
    }
}
