//! Shared configuration layer for sigtriage.
//!
//! Loads and validates the theme taxonomy and emerging-theme detection
//! settings from a YAML file. Validation happens here, at the load boundary:
//! the analysis crate treats configuration as an immutable, already-validated
//! input to every call.

pub mod detection;
pub mod themes;

mod error;

pub use detection::{DetectionOverrides, DetectionSettings};
pub use error::ConfigError;
pub use themes::{load_themes, ThemeDefinition, ThemesFile};
