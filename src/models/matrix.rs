//! Electrical matrix description derived from a resolved layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named matrix line (row or column) with its electrical net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixNet {
    /// Row or column name as declared in the layout document
    pub name: String,
    /// Net name wired to this line (may be empty when undeclared)
    pub net: String,
}

/// Read-only matrix wiring description produced by the geometry resolver.
///
/// Rows and columns are ordered by first sighting, matching the stable
/// `row_index`/`col_index` values on [`crate::models::Key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDescriptor {
    /// Ordered matrix rows
    pub rows: Vec<MatrixNet>,
    /// Ordered matrix columns
    pub cols: Vec<MatrixNet>,
    /// Net name to microcontroller pin, scanned from the MCU footprint
    #[serde(rename = "pinMap")]
    pub pin_map: BTreeMap<String, String>,
    /// Whether a mirror directive was present (split keyboard)
    pub mirrored: bool,
    /// Inter-half serial signal pin for split keyboards (empty when absent)
    #[serde(rename = "trrsPin")]
    pub trrs_pin: String,
}

impl MatrixDescriptor {
    /// Looks up the pin assigned to `net`, if any.
    #[must_use]
    pub fn pin_for(&self, net: &str) -> Option<&str> {
        self.pin_map.get(net).map(String::as_str)
    }

    /// Pins for all matrix rows, in row order, skipping unmapped nets.
    #[must_use]
    pub fn row_pins(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| self.pin_for(&row.net))
            .collect()
    }

    /// Pins for all matrix columns, in column order, skipping unmapped nets.
    #[must_use]
    pub fn col_pins(&self) -> Vec<&str> {
        self.cols
            .iter()
            .filter_map(|col| self.pin_for(&col.net))
            .collect()
    }
}
