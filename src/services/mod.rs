//! Service layer for keymap state transforms.
//!
//! Everything in here is a pure old-state-to-new-state transform; callers
//! own the state and decide when to commit a result.

pub mod layer_ops;
