//! Dual-dialect binding codec.
//!
//! Pure functions over ZMK/QMK binding strings: a dialect-neutral
//! intermediate representation with per-dialect encoders, modifier
//! wrap/unwrap algebra, the unicode codec, display-label resolution, and
//! magic-key synthesis. Nothing in this module holds state; static lookup
//! data lives in [`crate::registry`].

pub mod action;
pub mod labels;
pub mod magic;
pub mod modifiers;
pub mod unicode;

pub use action::{format_layer_binding, parse_layer_binding, BindingAction, LayerMode, LayerRef};
pub use labels::{format_key_label, normalize_token, resolve_key_label};
pub use modifiers::Modifier;
pub use unicode::UnicodeOs;
