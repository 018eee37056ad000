//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and shared defaults.

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "keeber";

/// Default key pitch in millimeters (standard MX spacing).
pub const DEFAULT_UNIT: f64 = 19.05;

/// Schema version for saved project files.
pub const PROJECT_FILE_VERSION: u32 = 1;
