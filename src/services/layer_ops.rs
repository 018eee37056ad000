//! Structural layer edits with reference integrity.
//!
//! Bindings address layers by position, which makes the layer list a
//! foreign-key target: every structural edit (remove, reorder) must rewrite
//! the layer-index references stored inside bindings so they keep pointing
//! at the same logical layer, or clear them when that layer is gone.
//!
//! Guards (layer 0 is immovable and unremovable, the last layer must stay)
//! are enforced as silent no-ops: they are caller preconditions this module
//! refuses to violate rather than errors.

use crate::codec::action::{format_layer_binding, parse_layer_binding};
use crate::models::{Binding, Layer};

/// Clamps a layer index into the valid range for `len` layers.
#[must_use]
pub fn clamp_layer_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Finds the new index of the layer with `id`, falling back when it no
/// longer exists. Used to let default-layer selections follow a layer
/// through structural edits.
#[must_use]
pub fn layer_index_by_id(layers: &[Layer], id: &str, fallback: usize) -> usize {
    layers
        .iter()
        .position(|layer| layer.id == id)
        .unwrap_or(fallback)
}

/// Appends a new empty layer with its default name.
#[must_use]
pub fn add_layer(layers: &[Layer]) -> Vec<Layer> {
    let mut next = layers.to_vec();
    next.push(Layer::with_default_name(next.len()));
    next
}

/// Appends a copy of the layer at `source` (bindings included).
///
/// No reference rewriting is needed: the copy takes the next unused
/// trailing index. Out-of-range sources are a no-op.
#[must_use]
pub fn duplicate_layer(layers: &[Layer], source: usize) -> Vec<Layer> {
    let mut next = layers.to_vec();
    if let Some(layer) = layers.get(source) {
        let mut copy = Layer::new(format!("{} Copy", layer.name));
        copy.bindings = layer.bindings.clone();
        next.push(copy);
    }
    next
}

/// Replaces the display name of the layer at `index`.
#[must_use]
pub fn rename_layer(layers: &[Layer], index: usize, name: &str) -> Vec<Layer> {
    let mut next = layers.to_vec();
    if let Some(layer) = next.get_mut(index) {
        layer.name = name.to_string();
    }
    next
}

/// Rewrites one binding string after the layer at `removed` was deleted:
/// references to it are cleared, references above it shift down by one.
fn rewrite_after_removal(value: &str, removed: usize) -> String {
    let Some(layer_ref) = parse_layer_binding(value) else {
        return value.to_string();
    };
    if layer_ref.index == removed {
        return String::new();
    }
    if layer_ref.index > removed {
        return format_layer_binding(layer_ref.index - 1, layer_ref.dialect, layer_ref.mode);
    }
    value.to_string()
}

/// Rewrites one binding string through an old-to-new index permutation.
/// Indices outside the map are tolerated and left unchanged.
fn rewrite_through_map(value: &str, index_map: &[usize]) -> String {
    let Some(layer_ref) = parse_layer_binding(value) else {
        return value.to_string();
    };
    match index_map.get(layer_ref.index) {
        Some(&new_index) => format_layer_binding(new_index, layer_ref.dialect, layer_ref.mode),
        None => value.to_string(),
    }
}

fn rewrite_bindings(layers: Vec<Layer>, rewrite: impl Fn(&str) -> String) -> Vec<Layer> {
    layers
        .into_iter()
        .map(|mut layer| {
            layer.bindings = layer
                .bindings
                .into_iter()
                .map(|(key_id, binding)| {
                    let rewritten = Binding {
                        zmk: rewrite(&binding.zmk),
                        qmk: rewrite(&binding.qmk),
                    };
                    (key_id, rewritten)
                })
                .collect();
            layer
        })
        .collect()
}

/// Removes the layer at `index` and repairs all layer references.
///
/// Silent no-op when `index` is 0, out of range, or only one layer remains.
///
/// # Examples
/// ```
/// use keeber::models::{Binding, Layer};
/// use keeber::services::layer_ops::remove_layer;
///
/// let mut base = Layer::new("Base");
/// base.set_binding("k", Binding::new("&mo 2", "MO(2)"));
/// let layers = vec![base, Layer::new("Nav"), Layer::new("Sym")];
///
/// let next = remove_layer(&layers, 1);
/// assert_eq!(next.len(), 2);
/// // The reference to old layer 2 now points at its new position
/// assert_eq!(next[0].binding("k").unwrap().zmk, "&mo 1");
/// ```
#[must_use]
pub fn remove_layer(layers: &[Layer], index: usize) -> Vec<Layer> {
    if index == 0 || index >= layers.len() || layers.len() <= 1 {
        return layers.to_vec();
    }
    let remaining: Vec<Layer> = layers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, layer)| layer.clone())
        .collect();
    rewrite_bindings(remaining, |value| rewrite_after_removal(value, index))
}

/// Result of a reorder: the new layer list plus the old-to-new index map
/// applied to every stored layer reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordered {
    /// Layers in their new order
    pub layers: Vec<Layer>,
    /// Permutation: `index_map[old_index] == new_index`
    pub index_map: Vec<usize>,
}

/// Moves the layer at `from` to position `to` and rewrites all references
/// through the resulting permutation.
///
/// Layer 0 can neither move nor be displaced, so `from == 0` or `to == 0`
/// (as well as out-of-range or equal indices) return the layers unchanged
/// with an identity map.
#[must_use]
pub fn reorder_layers(layers: &[Layer], from: usize, to: usize) -> Reordered {
    let len = layers.len();
    if from == 0 || to == 0 || from >= len || to >= len || from == to {
        return Reordered {
            layers: layers.to_vec(),
            index_map: (0..len).collect(),
        };
    }

    let mut order: Vec<usize> = (0..len).collect();
    let moved = order.remove(from);
    order.insert(to, moved);

    // order[new] == old; invert into old -> new
    let mut index_map = vec![0; len];
    for (new_index, &old_index) in order.iter().enumerate() {
        index_map[old_index] = new_index;
    }

    let next: Vec<Layer> = order.iter().map(|&old| layers[old].clone()).collect();
    let layers = rewrite_bindings(next, |value| rewrite_through_map(value, &index_map));

    Reordered { layers, index_map }
}
