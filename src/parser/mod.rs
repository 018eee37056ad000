//! Parsing of declarative layout documents.
//!
//! The only supported input format is the ergogen-style YAML layout
//! description; parsing produces the resolved key geometry and matrix
//! wiring consumed by the firmware generators.

pub mod ergogen;

pub use ergogen::{parse_layout_str, resolve_layout, ParsedLayout};
