//! Data models for resolved key geometry, layers, and bindings.
//!
//! This module contains the core data structures used throughout the crate.
//! Models are designed to be independent of any UI and of the firmware
//! generators that consume them.

pub mod key;
pub mod layer;
pub mod matrix;

// Re-export all model types
pub use key::{Bounds, Key};
pub use layer::{Binding, Layer};
pub use matrix::{MatrixDescriptor, MatrixNet};

use serde::{Deserialize, Serialize};

/// Firmware dialect a binding string is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ZMK devicetree behaviors (e.g. `&kp A`, `&mo 1`)
    Zmk,
    /// QMK keycodes (e.g. `KC_A`, `MO(1)`)
    Qmk,
}

impl Dialect {
    /// Short identifier used in file names and save documents.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Zmk => "zmk",
            Self::Qmk => "qmk",
        }
    }
}
