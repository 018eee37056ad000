//! CLI command handlers.
//!
//! This module provides headless, scriptable access to the core pipeline
//! for automation, testing, and CI integration.

pub mod generate;
pub mod inspect;

// Re-export types used by main.rs and tests
pub use generate::GenerateArgs;
pub use inspect::InspectArgs;
