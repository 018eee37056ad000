//! Geometry resolver for ergogen-style layout documents.
//!
//! Resolves zones, columns, and rows (with anchors, spread, stagger, splay,
//! and optional mirroring) into absolute key positions, plus the electrical
//! matrix and pin mapping scanned from the PCB footprint section.
//!
//! Resolution never aborts on semantic problems: dangling anchor
//! references, missing nets, and unmapped pins each append one warning and
//! resolution continues with a best-effort result. Only a document that
//! fails to deserialize is a fatal error.

use crate::constants::DEFAULT_UNIT;
use crate::models::{Bounds, Key, MatrixDescriptor, MatrixNet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yml::Value;
use std::collections::{BTreeMap, HashMap};

/// Output of one geometry resolution pass.
///
/// Replaced wholesale on every re-parse; nothing in here is ever mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedLayout {
    /// All resolved keys in traversal order, mirrored copies appended last
    #[serde(default)]
    pub keys: Vec<Key>,
    /// Matrix wiring description (`None` until a document is loaded)
    #[serde(default)]
    pub matrix: Option<MatrixDescriptor>,
    /// Non-fatal problems encountered during resolution
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Bounding box over all keys, including skipped positions
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

impl ParsedLayout {
    /// Keys that exist physically (skip positions filtered out).
    pub fn visible_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|key| !key.skip)
    }
}

/// Parses YAML text and resolves it into a layout.
///
/// Blank input yields an empty [`ParsedLayout`]; YAML that fails to
/// deserialize is the single fatal error of this module.
pub fn parse_layout_str(text: &str) -> Result<ParsedLayout> {
    if text.trim().is_empty() {
        return Ok(ParsedLayout::default());
    }
    let doc: Value = serde_yml::from_str(text).context("Failed to parse layout YAML")?;
    Ok(resolve_layout(&doc))
}

/// Rotates a point around the origin by `degrees`.
fn rotate_point(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Coerces a YAML scalar to a number, accepting numeric strings.
fn to_number(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}

/// Parses a distance that is either a plain number (millimeters) or a
/// string with a `u` suffix (multiples of the key pitch).
fn parse_distance(value: Option<&Value>, unit: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if let Some(prefix) = trimmed.strip_suffix('u') {
                prefix.parse::<f64>().map_or(0.0, |v| v * unit)
            } else {
                trimmed.parse().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    }
}

/// First present, non-null value among the candidates.
fn first_value<'a, const N: usize>(candidates: [Option<&'a Value>; N]) -> Option<&'a Value> {
    candidates.into_iter().flatten().find(|v| !v.is_null())
}

/// Expands dotted mapping keys (`points.key.column_net`) into nested maps.
///
/// Colliding maps are merged shallowly with later entries winning per key;
/// colliding scalars are overwritten.
fn expand_dots(value: &Value) -> Value {
    match value {
        Value::Sequence(seq) => Value::Sequence(seq.iter().map(expand_dots).collect()),
        Value::Mapping(map) => {
            let mut out = serde_yml::Mapping::new();
            for (key, val) in map {
                let expanded = expand_dots(val);
                match key.as_str() {
                    Some(key_str) if key_str.contains('.') => {
                        let parts: Vec<&str> = key_str.split('.').collect();
                        insert_path(&mut out, &parts, expanded);
                    }
                    _ => merge_entry(&mut out, key.clone(), expanded),
                }
            }
            Value::Mapping(out)
        }
        other => other.clone(),
    }
}

fn merge_value(target: Option<Value>, value: Value) -> Value {
    match (target, value) {
        (Some(Value::Mapping(mut existing)), Value::Mapping(incoming)) => {
            for (k, v) in incoming {
                existing.insert(k, v);
            }
            Value::Mapping(existing)
        }
        (_, value) => value,
    }
}

fn merge_entry(map: &mut serde_yml::Mapping, key: Value, value: Value) {
    if let Some(existing) = map.get_mut(&key) {
        let taken = std::mem::replace(existing, Value::Null);
        *existing = merge_value(Some(taken), value);
    } else {
        map.insert(key, value);
    }
}

fn insert_path(map: &mut serde_yml::Mapping, parts: &[&str], value: Value) {
    let key = Value::String(parts[0].to_string());
    if parts.len() == 1 {
        merge_entry(map, key, value);
        return;
    }
    if !matches!(map.get(&key), Some(Value::Mapping(_))) {
        merge_entry(map, key.clone(), Value::Mapping(serde_yml::Mapping::new()));
    }
    if let Some(Value::Mapping(inner)) = map.get_mut(&key) {
        insert_path(inner, &parts[1..], value);
    }
}

/// Scans the MCU footprint parameters for pin assignments, inverted into a
/// net-to-pin map.
fn scan_pin_map(doc: &Value) -> BTreeMap<String, String> {
    let mut pin_map = BTreeMap::new();
    let params = doc
        .get("pcbs")
        .and_then(|v| v.get("main"))
        .and_then(|v| v.get("footprints"))
        .and_then(|v| v.get("mcu"))
        .and_then(|v| v.get("params"));
    if let Some(Value::Mapping(params)) = params {
        for (pin, net) in params {
            if let (Some(pin), Some(net)) = (pin.as_str(), net.as_str()) {
                if pin.starts_with('P') {
                    pin_map.insert(net.to_string(), pin.to_string());
                }
            }
        }
    }
    pin_map
}

fn looks_like_pin(value: &str) -> bool {
    value
        .strip_prefix('P')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Finds the inter-half serial signal pin on the TRRS footprint, if any.
fn scan_trrs_pin(doc: &Value) -> Option<String> {
    let params = doc
        .get("pcbs")
        .and_then(|v| v.get("main"))
        .and_then(|v| v.get("footprints"))
        .and_then(|v| v.get("trrs"))
        .and_then(|v| v.get("params"))?;
    let Value::Mapping(params) = params else {
        return None;
    };
    params
        .iter()
        .filter(|(key, _)| {
            key.as_str()
                .is_some_and(|k| k.len() == 1 && matches!(k.as_bytes()[0], b'A'..=b'D'))
        })
        .filter_map(|(_, net)| net.as_str())
        .find(|net| looks_like_pin(net))
        .map(ToString::to_string)
}

fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Resolves a deserialized layout document into keys, matrix, and bounds.
///
/// This is a pure function of the document; it never fails, collecting
/// problems as warnings instead.
pub fn resolve_layout(doc: &Value) -> ParsedLayout {
    let doc = expand_dots(doc);
    let mut warnings = Vec::new();

    let unit = to_number(doc.get("units").and_then(|u| u.get("u")), DEFAULT_UNIT);
    let points = doc.get("points");
    let global_rotate = to_number(points.and_then(|p| p.get("rotate")), 0.0);

    let pin_map = scan_pin_map(&doc);
    let trrs_pin = scan_trrs_pin(&doc);

    let mut keys: Vec<Key> = Vec::new();
    let mut key_index_by_id: HashMap<String, usize> = HashMap::new();
    let mut row_list: Vec<MatrixNet> = Vec::new();
    let mut col_list: Vec<MatrixNet> = Vec::new();
    let mut row_index_by_name: HashMap<String, usize> = HashMap::new();
    let mut col_index_by_name: HashMap<String, usize> = HashMap::new();

    let zones = points.and_then(|p| p.get("zones"));
    if let Some(Value::Mapping(zones)) = zones {
        for (zone_order, (zone_name, zone)) in zones.iter().enumerate() {
            let Some(zone_name) = zone_name.as_str() else {
                continue;
            };

            // Anchor: absolute shift/rotation, optionally composed with a
            // previously resolved key
            let anchor = zone.get("anchor");
            let shift = anchor.and_then(|a| a.get("shift"));
            let shift_x = parse_distance(shift.and_then(|s| s.get(0)), unit);
            let shift_y = parse_distance(shift.and_then(|s| s.get(1)), unit);
            let anchor_rotate = to_number(anchor.and_then(|a| a.get("rotate")), 0.0);

            let mut base_rotate = global_rotate;
            let mut ref_x = 0.0;
            let mut ref_y = 0.0;
            if let Some(ref_name) = anchor.and_then(|a| a.get("ref")).and_then(Value::as_str) {
                if let Some(&index) = key_index_by_id.get(ref_name) {
                    ref_x = keys[index].x;
                    ref_y = keys[index].y;
                    base_rotate = keys[index].rot;
                } else {
                    warnings.push(format!(
                        "Anchor ref {ref_name} not found for zone {zone_name}"
                    ));
                }
            }

            let zone_rotate = base_rotate + anchor_rotate + to_number(zone.get("rotate"), 0.0);
            let (shift_rx, shift_ry) = rotate_point(shift_x, shift_y, base_rotate + anchor_rotate);
            let anchor_x = ref_x + shift_rx;
            let anchor_y = ref_y + shift_ry;

            // Intern row names on first sighting, in declaration order
            let rows_val = zone.get("rows");
            let row_names: Vec<String> = match rows_val {
                Some(Value::Mapping(rows)) => rows
                    .keys()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            for row_name in &row_names {
                if !row_index_by_name.contains_key(row_name) {
                    row_index_by_name.insert(row_name.clone(), row_list.len());
                    let net = rows_val
                        .and_then(|r| r.get(row_name.as_str()))
                        .and_then(|r| r.get("row_net"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    row_list.push(MatrixNet {
                        name: row_name.clone(),
                        net: net.to_string(),
                    });
                }
            }

            let zone_key = zone.get("key");
            let mut column_x = 0.0;
            let mut column_y = 0.0;
            let mut column_rotation = zone_rotate;

            let Some(Value::Mapping(columns)) = zone.get("columns") else {
                continue;
            };
            for (col_name, column) in columns {
                let Some(col_name) = col_name.as_str() else {
                    continue;
                };
                let column_key = column.get("key");
                if !col_index_by_name.contains_key(col_name) {
                    col_index_by_name.insert(col_name.to_string(), col_list.len());
                    let net = column_key
                        .and_then(|k| k.get("column_net"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    col_list.push(MatrixNet {
                        name: col_name.to_string(),
                        net: net.to_string(),
                    });
                }

                let spread = to_number(
                    first_value([
                        column_key.and_then(|k| k.get("spread")),
                        zone_key.and_then(|k| k.get("spread")),
                    ]),
                    unit,
                );
                let stagger = to_number(
                    first_value([
                        column_key.and_then(|k| k.get("stagger")),
                        zone_key.and_then(|k| k.get("stagger")),
                    ]),
                    0.0,
                );
                let splay = to_number(
                    first_value([
                        column_key.and_then(|k| k.get("splay")),
                        zone_key.and_then(|k| k.get("splay")),
                    ]),
                    0.0,
                );
                let origin = first_value([
                    column_key.and_then(|k| k.get("origin")),
                    zone_key.and_then(|k| k.get("origin")),
                ]);
                let origin_x = parse_distance(origin.and_then(|o| o.get(0)), unit);
                let origin_y = parse_distance(origin.and_then(|o| o.get(1)), unit);

                column_y += stagger;

                // Splay pivots the running column cursor around a
                // column-local origin, and the rotation carries over into
                // every following column of the zone
                if splay != 0.0 {
                    let pivot_x = column_x + origin_x;
                    let pivot_y = column_y + origin_y;
                    let (rx, ry) = rotate_point(column_x - pivot_x, column_y - pivot_y, splay);
                    column_x = pivot_x + rx;
                    column_y = pivot_y + ry;
                }
                column_rotation += splay;

                let col_rows = column.get("rows");
                for (row_index, row_name) in row_names.iter().enumerate() {
                    let row_info = rows_val.and_then(|r| r.get(row_name.as_str()));
                    let row_entry = col_rows.and_then(|r| r.get(row_name.as_str()));
                    let skipped = is_true(row_entry.and_then(|e| e.get("skip")))
                        || is_true(row_entry.and_then(|e| e.get("key")).and_then(|k| k.get("skip")));

                    let local_x = column_x;
                    let local_y = column_y + row_index as f64 * unit;
                    let (rx, ry) = rotate_point(local_x, local_y, column_rotation);

                    let id = format!("{zone_name}_{col_name}_{row_name}");
                    key_index_by_id.insert(id.clone(), keys.len());
                    keys.push(Key {
                        id,
                        zone: zone_name.to_string(),
                        row: row_name.clone(),
                        col: col_name.to_string(),
                        row_net: row_info
                            .and_then(|r| r.get("row_net"))
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        col_net: column_key
                            .and_then(|k| k.get("column_net"))
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        x: rx + anchor_x,
                        y: ry + anchor_y,
                        rot: column_rotation,
                        unit,
                        row_index: row_index_by_name[row_name],
                        col_index: col_index_by_name[col_name],
                        zone_order,
                        skip: skipped,
                        mirror_of: None,
                    });
                }

                column_x += spread;
            }
        }
    }

    // Mirror: reflect every key across a vertical axis, appending the
    // copies after all originals
    let mirror = points.and_then(|p| p.get("mirror")).filter(|m| !m.is_null());
    let mirrored = mirror.is_some();
    if let Some(mirror) = mirror {
        let distance = parse_distance(mirror.get("distance"), unit);
        let ref_x = mirror
            .get("ref")
            .and_then(Value::as_str)
            .and_then(|name| key_index_by_id.get(name))
            .map(|&index| keys[index].x);
        let axis = ref_x.unwrap_or(0.0) + distance / 2.0;

        let copies: Vec<Key> = keys
            .iter()
            .map(|key| Key {
                id: format!("mirror_{}", key.id),
                x: axis + (axis - key.x),
                rot: -key.rot,
                mirror_of: Some(key.id.clone()),
                ..key.clone()
            })
            .collect();
        for copy in copies {
            key_index_by_id.insert(copy.id.clone(), keys.len());
            keys.push(copy);
        }
    }

    if mirrored && trrs_pin.is_none() {
        warnings.push("TRRS pin not found for split QMK configuration".to_string());
    }

    let bounds = if keys.is_empty() {
        None
    } else {
        let mut bounds = Bounds::empty();
        for key in &keys {
            bounds.include(key);
        }
        Some(bounds)
    };

    for row in &row_list {
        if row.net.is_empty() {
            warnings.push(format!("Row {} is missing row_net", row.name));
        } else if !pin_map.contains_key(&row.net) {
            warnings.push(format!("Row net {} has no MCU pin mapping", row.net));
        }
    }
    for col in &col_list {
        if col.net.is_empty() {
            warnings.push(format!("Column {} is missing column_net", col.name));
        } else if !pin_map.contains_key(&col.net) {
            warnings.push(format!("Column net {} has no MCU pin mapping", col.net));
        }
    }

    let matrix = MatrixDescriptor {
        rows: row_list,
        cols: col_list,
        pin_map,
        mirrored,
        trrs_pin: trrs_pin.unwrap_or_default(),
    };

    ParsedLayout {
        keys,
        matrix: Some(matrix),
        warnings,
        bounds,
    }
}
