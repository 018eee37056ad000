//! Integration tests for structural layer edits and reference integrity.

use keeber::models::{Binding, Layer};
use keeber::services::layer_ops::{
    add_layer, duplicate_layer, layer_index_by_id, remove_layer, reorder_layers,
};

fn build_layers() -> Vec<Layer> {
    // Base references every overlay; overlays cross-reference each other
    let mut base = Layer::new("Base");
    base.set_binding("k0", Binding::new("&mo 1", "MO(1)"));
    base.set_binding("k1", Binding::new("&tog 2", "TG(2)"));
    base.set_binding("k2", Binding::new("&sl 3", "OSL(3)"));
    base.set_binding("k3", Binding::new("&kp A", "KC_A"));

    let mut nav = Layer::new("Nav");
    nav.set_binding("k0", Binding::new("&mo 3", "MO(3)"));

    let mut sym = Layer::new("Sym");
    sym.set_binding("k0", Binding::new("&tog 1", "TG(1)"));

    let fun = Layer::new("Fun");

    vec![base, nav, sym, fun]
}

#[test]
fn test_remove_clears_decrements_and_preserves() {
    let layers = build_layers();
    let next = remove_layer(&layers, 2);

    assert_eq!(next.len(), 3);
    let base = &next[0];
    // Reference to removed layer 2: cleared in both dialects
    assert_eq!(base.binding("k1").unwrap(), &Binding::new("", ""));
    // Reference to layer 1 (< removed): untouched
    assert_eq!(base.binding("k0").unwrap().zmk, "&mo 1");
    // Reference to layer 3 (> removed): decremented, mode preserved
    assert_eq!(base.binding("k2").unwrap(), &Binding::new("&sl 2", "OSL(2)"));
    // Plain keys untouched
    assert_eq!(base.binding("k3").unwrap().qmk, "KC_A");
    // Nav's reference to Fun follows it down
    assert_eq!(next[1].binding("k0").unwrap(), &Binding::new("&mo 2", "MO(2)"));
}

#[test]
fn test_remove_rewrites_every_remaining_layer() {
    let layers = build_layers();
    let next = remove_layer(&layers, 1);

    // Sym's reference to removed Nav is cleared
    assert_eq!(next[1].binding("k0").unwrap(), &Binding::new("", ""));
    // Base's references above the removed index all shift down
    assert_eq!(next[0].binding("k1").unwrap().zmk, "&tog 1");
    assert_eq!(next[0].binding("k2").unwrap().qmk, "OSL(2)");
}

#[test]
fn test_remove_guards_are_silent_noops() {
    let layers = build_layers();
    assert_eq!(remove_layer(&layers, 0), layers);

    let single = vec![Layer::new("Base")];
    assert_eq!(remove_layer(&single, 0), single);
}

#[test]
fn test_reorder_is_bijective_over_references() {
    let layers = build_layers();
    let result = reorder_layers(&layers, 1, 3);

    // Permutation: 0->0, 1->3, 2->1, 3->2
    assert_eq!(result.index_map, vec![0, 3, 1, 2]);

    let names: Vec<&str> = result.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Base", "Sym", "Fun", "Nav"]);

    let base = &result.layers[0];
    assert_eq!(base.binding("k0").unwrap().zmk, "&mo 3");
    assert_eq!(base.binding("k1").unwrap().qmk, "TG(1)");
    assert_eq!(base.binding("k2").unwrap().zmk, "&sl 2");

    // Sym (now index 1) still points at Nav (now index 3)
    assert_eq!(result.layers[1].binding("k0").unwrap().qmk, "TG(3)");
    // Nav (now index 3) still points at Fun (now index 2)
    assert_eq!(result.layers[3].binding("k0").unwrap().zmk, "&mo 2");
}

#[test]
fn test_reorder_into_position_zero_is_rejected() {
    let layers = build_layers();
    let result = reorder_layers(&layers, 2, 0);
    assert_eq!(result.layers, layers);
    assert_eq!(result.index_map, vec![0, 1, 2, 3]);
}

#[test]
fn test_reorder_then_remove_keeps_references_consistent() {
    let layers = build_layers();
    let reordered = reorder_layers(&layers, 1, 2).layers;
    let removed = remove_layer(&reordered, 1);

    // After moving Nav to index 2 and removing Sym (now index 1), Base's
    // original "&mo 1" (Nav) should still point at Nav
    let nav_position = removed.iter().position(|l| l.name == "Nav").unwrap();
    assert_eq!(
        removed[0].binding("k0").unwrap().zmk,
        format!("&mo {nav_position}")
    );
}

#[test]
fn test_add_and_duplicate_never_rewrite() {
    let layers = build_layers();

    let added = add_layer(&layers);
    assert_eq!(added.len(), 5);
    assert_eq!(added[4].name, "Layer 4");
    for (before, after) in layers.iter().zip(&added) {
        assert_eq!(before.bindings, after.bindings);
    }

    let duplicated = duplicate_layer(&layers, 0);
    assert_eq!(duplicated.len(), 5);
    assert_eq!(duplicated[4].name, "Base Copy");
    assert_eq!(duplicated[4].bindings, layers[0].bindings);
}

#[test]
fn test_default_layer_follows_identity() {
    let layers = build_layers();
    let sym_id = layers[2].id.clone();

    // Reorder: Sym moves from 2 to 1
    let reordered = reorder_layers(&layers, 2, 1).layers;
    assert_eq!(layer_index_by_id(&reordered, &sym_id, 0), 1);

    // Removing Sym: fall back to base
    let removed = remove_layer(&layers, 2);
    assert_eq!(layer_index_by_id(&removed, &sym_id, 0), 0);
}
