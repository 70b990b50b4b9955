//! # Configuration Snapshot
//!
//! One TOML document, every key optional:
//!
//! ```toml
//! [screen]
//! enabled = true
//! shake_intensity_scale = 1.0
//! flash_duration_ms = 200.0
//!
//! [quality]
//! level = "high"
//! auto_adjust = true
//!
//! [monitor]
//! cull_margin = 50.0
//! ```
//!
//! The manager takes a snapshot at construction and again on
//! [`EffectManager::apply_configuration`](crate::EffectManager::apply_configuration).

use std::fs;
use std::path::Path;

pub use flare_quality::QualityConfig;
use serde::{Deserialize, Serialize};

use crate::error::{FlareError, FlareResult};

/// Zoom targets are clamped to this range after sensitivity scaling.
pub const ZOOM_RANGE: (f32, f32) = (0.5, 3.0);

/// Upper bound for pool, channel and sample-ring capacities.
pub const MAX_CAPACITY: usize = 16_384;

/// Complete settings snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    /// Screen effect creation settings.
    pub screen: ScreenConfig,
    /// Adaptive quality settings.
    pub quality: QualityConfig,
    /// Monitor, culling and cleanup settings.
    pub monitor: MonitorConfig,
}

impl FlareConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::ConfigParse`] for malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> FlareResult<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Clamps every capacity into `1..=MAX_CAPACITY`.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.monitor = self.monitor.sanitized();
        self
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::ConfigIo`] if the file cannot be read, or
    /// [`FlareError::ConfigParse`] if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> FlareResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FlareError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("loaded effects config from {}", path.display());
        Ok(config)
    }

    /// Reads a TOML file, falling back to defaults on any failure.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!("{}, using default effects config", e);
            Self::default()
        })
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::ConfigSerialize`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> FlareResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Screen effect creation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Master switch. Creation calls return `None` while off.
    pub enabled: bool,
    /// Multiplies requested shake intensity.
    pub shake_intensity_scale: f32,
    /// Multiplies requested flash intensity.
    pub flash_intensity_scale: f32,
    /// Multiplies requested tint intensity.
    pub tint_intensity_scale: f32,
    /// Rescales zoom targets as `1 + (target - 1) · sensitivity`.
    pub zoom_sensitivity: f32,
    /// Shake duration when the caller gives none.
    pub shake_duration_ms: f64,
    /// Shake damping when the caller gives none.
    pub shake_damping: f32,
    /// Shake frequency when the caller gives none.
    pub shake_frequency: f32,
    /// Flash duration when the caller gives none.
    pub flash_duration_ms: f64,
    /// Flash intensity when the caller gives none.
    pub flash_intensity: f32,
    /// Tint duration when the caller gives none.
    pub tint_duration_ms: f64,
    /// Tint intensity when the caller gives none.
    pub tint_intensity: f32,
    /// Zoom duration when the caller gives none.
    pub zoom_duration_ms: f64,
    /// Seed for random shake noise.
    pub shake_seed: u64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shake_intensity_scale: 1.0,
            flash_intensity_scale: 1.0,
            tint_intensity_scale: 1.0,
            zoom_sensitivity: 1.0,
            shake_duration_ms: 500.0,
            shake_damping: 0.9,
            shake_frequency: 20.0,
            flash_duration_ms: 200.0,
            flash_intensity: 0.5,
            tint_duration_ms: 500.0,
            tint_intensity: 0.3,
            zoom_duration_ms: 300.0,
            shake_seed: 0,
        }
    }
}

impl ScreenConfig {
    /// Applies zoom sensitivity and the allowed range.
    #[must_use]
    pub fn scale_zoom(&self, target: f32) -> f32 {
        (1.0 + (target - 1.0) * self.zoom_sensitivity).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1)
    }
}

/// Monitor, culling and cleanup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Cull margin at full quality. Lower levels tighten it.
    pub cull_margin: f32,
    /// Tracked spatial content older than this is reclaimed.
    pub cleanup_ttl_ms: f64,
    /// Spacing between memory checks.
    pub memory_check_interval_ms: f64,
    /// Memory above this logs a warning and schedules a sweep.
    pub memory_high_water_bytes: u64,
    /// Memory above this, combined with low fps, triggers the emergency path.
    pub memory_critical_bytes: u64,
    /// Frame rate under which critical memory becomes an emergency.
    pub memory_critical_fps: f64,
    /// Frame timestamp ring capacity.
    pub frame_sample_capacity: usize,
    /// Memory sample ring capacity.
    pub memory_sample_capacity: usize,
    /// Scratch buffers per content category.
    pub pool_capacity: usize,
    /// Command channel capacity.
    pub command_capacity: usize,
}

impl MonitorConfig {
    /// Clamps every capacity into `1..=MAX_CAPACITY`.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        for (name, capacity) in [
            ("frame_sample_capacity", &mut self.frame_sample_capacity),
            ("memory_sample_capacity", &mut self.memory_sample_capacity),
            ("pool_capacity", &mut self.pool_capacity),
            ("command_capacity", &mut self.command_capacity),
        ] {
            let clamped = (*capacity).clamp(1, MAX_CAPACITY);
            if clamped != *capacity {
                tracing::warn!("monitor.{} = {} out of range, using {}", name, capacity, clamped);
                *capacity = clamped;
            }
        }
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cull_margin: 50.0,
            cleanup_ttl_ms: 10_000.0,
            memory_check_interval_ms: 2000.0,
            memory_high_water_bytes: 80 * 1024 * 1024,
            memory_critical_bytes: 500 * 1024 * 1024,
            memory_critical_fps: 15.0,
            frame_sample_capacity: 10,
            memory_sample_capacity: 30,
            pool_capacity: 256,
            command_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_quality::QualityLevel;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(FlareConfig::from_toml_str("").unwrap(), FlareConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = FlareConfig::from_toml_str(
            r#"
            [screen]
            enabled = false
            zoom_sensitivity = 0.5

            [quality]
            level = "ultra"
            "#,
        )
        .unwrap();
        assert!(!config.screen.enabled);
        assert!((config.screen.flash_duration_ms - 200.0).abs() < f64::EPSILON);
        assert_eq!(config.quality.level, QualityLevel::Ultra);
        assert!(config.quality.auto_adjust);
    }

    #[test]
    fn test_garbled_level_falls_back_to_high() {
        let config = FlareConfig::from_toml_str("[quality]\nlevel = \"extreme\"\n").unwrap();
        assert_eq!(config.quality.level, QualityLevel::High);
    }

    #[test]
    fn test_non_string_level_falls_back_to_high() {
        let config = FlareConfig::from_toml_str("[quality]\nlevel = 3\nauto_adjust = false\n").unwrap();
        assert_eq!(config.quality.level, QualityLevel::High);
        assert!(!config.quality.auto_adjust);

        let config = FlareConfig::from_toml_str("[quality]\nlevel = [\"low\"]\n").unwrap();
        assert_eq!(config.quality.level, QualityLevel::High);
    }

    #[test]
    fn test_capacities_are_clamped_on_load() {
        let config = FlareConfig::from_toml_str(
            r#"
            [monitor]
            pool_capacity = 9_000_000_000_000
            command_capacity = 0
            memory_sample_capacity = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.monitor.pool_capacity, MAX_CAPACITY);
        assert_eq!(config.monitor.command_capacity, 1);
        assert_eq!(config.monitor.memory_sample_capacity, 12);
        assert_eq!(config.monitor.frame_sample_capacity, 10);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            FlareConfig::from_toml_str("[screen\nenabled = yes"),
            Err(FlareError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = FlareConfig::from_file("/nonexistent/flare.toml").unwrap_err();
        assert!(matches!(err, FlareError::ConfigIo { .. }));
        assert_eq!(FlareConfig::load_or_default("/nonexistent/flare.toml"), FlareConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = FlareConfig::default();
        config.monitor.cull_margin = 30.0;
        let text = config.to_toml_string().unwrap();
        assert_eq!(FlareConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_zoom_sensitivity() {
        let screen = ScreenConfig {
            zoom_sensitivity: 0.5,
            ..ScreenConfig::default()
        };
        assert!((screen.scale_zoom(1.2) - 1.1).abs() < 1e-6);
        assert!((ScreenConfig::default().scale_zoom(10.0) - 3.0).abs() < 1e-6);
        assert!((ScreenConfig::default().scale_zoom(0.1) - 0.5).abs() < 1e-6);
    }
}
