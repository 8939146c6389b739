//! Configuration for the comparison engine.

use serde::{Deserialize, Serialize};

/// What to do about records in an entity collection that lack their
/// identity field. Such records are always excluded from presence
/// comparison; this only controls whether the exclusion is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnidentifiedBehavior {
    /// Exclude silently.
    Ignore,
    /// Exclude, and record a warning in the report.
    Warn,
}

/// Behavioral knobs for [`crate::compare`]. All fields have defaults and
/// the struct deserializes from partial JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub on_unidentified: UnidentifiedBehavior,
    /// Keep in-sync matched entities in section `matched` lists. Summary
    /// counts are unaffected either way.
    pub include_in_sync: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            on_unidentified: UnidentifiedBehavior::Warn,
            include_in_sync: true,
        }
    }
}
