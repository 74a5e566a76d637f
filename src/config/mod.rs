//! Configuration loading and management for the swipe audit engine.
//!
//! The rule set (nominal shift times, anchoring, thresholds and label
//! keywords) is loaded from a YAML file, or taken from the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use swipe_audit::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/audit.yaml").unwrap();
//! println!("Day shift ends at {}", config.config().day.work_end);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AuditConfig, DirectionMarkers, NightAnchoring, RuleThresholds, ShiftLabelKeywords,
    ShiftProfile,
};
