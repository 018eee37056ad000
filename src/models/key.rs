//! Resolved key records and layout bounds.

use serde::{Deserialize, Serialize};

/// A single resolved key position produced by the geometry resolver.
///
/// Keys are created once per resolution pass and never mutated afterwards;
/// re-parsing a layout replaces the whole record set. Serialized field names
/// follow the project save-file schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    /// Unique id derived from zone, column, and row names
    /// (`{zone}_{col}_{row}`, prefixed `mirror_` for mirrored copies)
    pub id: String,
    /// Zone name this key belongs to
    pub zone: String,
    /// Row name within the zone
    pub row: String,
    /// Column name within the zone
    pub col: String,
    /// Electrical row net name (may be empty)
    pub row_net: String,
    /// Electrical column net name (may be empty)
    pub col_net: String,
    /// Absolute X position in layout units (millimeters)
    pub x: f64,
    /// Absolute Y position in layout units (millimeters)
    pub y: f64,
    /// Rotation in degrees
    pub rot: f64,
    /// Key pitch used when this key was resolved
    pub unit: f64,
    /// Stable row index, assigned on first sighting of the row name
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
    /// Stable column index, assigned on first sighting of the column name
    #[serde(rename = "colIndex")]
    pub col_index: usize,
    /// Document order of the zone that declared this key
    #[serde(rename = "zoneOrder")]
    pub zone_order: usize,
    /// Valid matrix position with no physical key
    pub skip: bool,
    /// Id of the source key for mirrored copies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_of: Option<String>,
}

impl Key {
    /// Returns true for mirrored copies synthesized by a mirror directive.
    #[must_use]
    pub const fn is_mirrored(&self) -> bool {
        self.mirror_of.is_some()
    }
}

/// Bounding box over all resolved keys, used for viewport sizing.
///
/// Uses the display convention of a vertically flipped Y axis and pads
/// half a key pitch around each key center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Left edge
    pub min_x: f64,
    /// Right edge
    pub max_x: f64,
    /// Top edge (display coordinates)
    pub min_y: f64,
    /// Bottom edge (display coordinates)
    pub max_y: f64,
}

impl Bounds {
    /// An empty bounding box that any real key will expand.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expands the box to cover `key`, including half-pitch padding.
    pub fn include(&mut self, key: &Key) {
        let half = key.unit / 2.0;
        let display_y = -key.y;
        self.min_x = self.min_x.min(key.x - half);
        self.max_x = self.max_x.max(key.x + half);
        self.min_y = self.min_y.min(display_y - half);
        self.max_y = self.max_y.max(display_y + half);
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_at(x: f64, y: f64) -> Key {
        Key {
            id: "zone_col_row".to_string(),
            zone: "zone".to_string(),
            row: "row".to_string(),
            col: "col".to_string(),
            row_net: String::new(),
            col_net: String::new(),
            x,
            y,
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
    fn test_bounds_include_pads_half_unit() {
        let mut bounds = Bounds::empty();
        bounds.include(&key_at(0.0, 0.0));

        assert_eq!(bounds.min_x, -19.05 / 2.0);
        assert_eq!(bounds.max_x, 19.05 / 2.0);
        assert_eq!(bounds.width(), 19.05);
        assert_eq!(bounds.height(), 19.05);
    }

    #[test]
    fn test_bounds_flips_y_for_display() {
        let mut bounds = Bounds::empty();
        bounds.include(&key_at(0.0, 19.05));

        // A key above the origin lands above it in display space too
        assert_eq!(bounds.min_y, -19.05 - 19.05 / 2.0);
        assert_eq!(bounds.max_y, -19.05 + 19.05 / 2.0);
    }

    #[test]
    fn test_key_serializes_with_editor_field_names() {
        let key = key_at(1.0, 2.0);
        let json = serde_json::to_value(&key).unwrap();

        assert!(json.get("rowIndex").is_some());
        assert!(json.get("colIndex").is_some());
        assert!(json.get("zoneOrder").is_some());
        // mirror_of is omitted when absent
        assert!(json.get("mirror_of").is_none());
    }
}
