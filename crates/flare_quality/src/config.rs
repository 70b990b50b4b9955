//! Quality controller settings.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::level::QualityLevel;

/// Settings snapshot for [`QualityController`](crate::QualityController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Initial (or overriding) level. Unknown names and non-string values
    /// fall back to `high`.
    #[serde(deserialize_with = "level_or_default")]
    pub level: QualityLevel,
    /// Let the control loop move the level.
    pub auto_adjust: bool,
    /// Minimum spacing between appended samples (ms).
    pub sampling_interval_ms: f64,
    /// Minimum spacing between two level changes (ms).
    pub adjustment_cooldown_ms: f64,
    /// Frame-rate ring capacity.
    pub sample_capacity: usize,
    /// Instantaneous frame rate that triggers the emergency path.
    pub emergency_fps: f64,
    /// Downgrade when the mean falls below `target × downgrade_ratio`.
    pub downgrade_ratio: f64,
    /// Upgrade requires every sample above `target × upgrade_sample_ratio`.
    pub upgrade_sample_ratio: f64,
    /// Upgrade requires the mean above `target × upgrade_mean_ratio`.
    pub upgrade_mean_ratio: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            level: QualityLevel::High,
            auto_adjust: true,
            sampling_interval_ms: 1000.0,
            adjustment_cooldown_ms: 2000.0,
            sample_capacity: 10,
            emergency_fps: 20.0,
            downgrade_ratio: 0.8,
            upgrade_sample_ratio: 1.05,
            upgrade_mean_ratio: 1.1,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Name(String),
    Other(IgnoredAny),
}

/// Accepts any value; unknown levels become `High` with a warning.
fn level_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<QualityLevel, D::Error> {
    match RawLevel::deserialize(deserializer)? {
        RawLevel::Name(raw) => Ok(QualityLevel::parse_or_default(&raw)),
        RawLevel::Other(_) => {
            tracing::warn!("quality level is not a string, using high");
            Ok(QualityLevel::High)
        }
    }
}
