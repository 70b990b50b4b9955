//! Discrete quality tiers and their parameter records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Effect quality tier. Ordered `Low < Medium < High < Ultra`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Minimum fidelity.
    Low,
    /// Reduced fidelity.
    Medium,
    /// Full fidelity.
    #[default]
    High,
    /// Beyond full fidelity (extra particles, reflections).
    Ultra,
}

impl QualityLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Ultra];

    /// One step down; `Low` stays `Low`.
    #[must_use]
    pub const fn step_down(self) -> Self {
        match self {
            Self::Low | Self::Medium => Self::Low,
            Self::High => Self::Medium,
            Self::Ultra => Self::High,
        }
    }

    /// One step up; `Ultra` stays `Ultra`.
    #[must_use]
    pub const fn step_up(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Ultra => Self::Ultra,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }

    /// Parses a level name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Parses a level name, falling back to `High` on anything unrecognized.
    #[must_use]
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!("unknown quality level {:?}, using high", name);
            Self::High
        })
    }

    /// The fixed parameter record for this level.
    #[must_use]
    pub const fn params(self) -> QualityParams {
        match self {
            Self::Low => QualityParams {
                particle_count_multiplier: 0.3,
                particle_size_multiplier: 0.8,
                complexity: 1,
                effect_distance: 0.5,
                animation_detail: 0.5,
                shadow_enabled: false,
                reflection_enabled: false,
                blur_enabled: false,
                background_particles_enabled: false,
                frame_rate_target: 30.0,
                cull_margin_cap: 20.0,
            },
            Self::Medium => QualityParams {
                particle_count_multiplier: 0.6,
                particle_size_multiplier: 0.9,
                complexity: 2,
                effect_distance: 0.75,
                animation_detail: 0.75,
                shadow_enabled: false,
                reflection_enabled: false,
                blur_enabled: true,
                background_particles_enabled: true,
                frame_rate_target: 45.0,
                cull_margin_cap: 35.0,
            },
            Self::High => QualityParams {
                particle_count_multiplier: 1.0,
                particle_size_multiplier: 1.0,
                complexity: 3,
                effect_distance: 1.0,
                animation_detail: 1.0,
                shadow_enabled: true,
                reflection_enabled: false,
                blur_enabled: true,
                background_particles_enabled: true,
                frame_rate_target: 60.0,
                cull_margin_cap: 50.0,
            },
            Self::Ultra => QualityParams {
                particle_count_multiplier: 1.5,
                particle_size_multiplier: 1.2,
                complexity: 4,
                effect_distance: 1.25,
                animation_detail: 1.25,
                shadow_enabled: true,
                reflection_enabled: true,
                blur_enabled: true,
                background_particles_enabled: true,
                frame_rate_target: 60.0,
                cull_margin_cap: 50.0,
            },
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters bound to a quality level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityParams {
    /// Scales particle counts and most budgets.
    pub particle_count_multiplier: f32,
    /// Scales particle sprite size.
    pub particle_size_multiplier: f32,
    /// Content-renderer detail tier (1-4).
    pub complexity: u8,
    /// Scales how far from the focus point effects are spawned.
    pub effect_distance: f32,
    /// Scales animation detail and the screen-effect budget.
    pub animation_detail: f32,
    /// Content renderers may draw shadows.
    pub shadow_enabled: bool,
    /// Content renderers may draw reflections.
    pub reflection_enabled: bool,
    /// Blur effects are honoured.
    pub blur_enabled: bool,
    /// Ambient background particles are allowed.
    pub background_particles_enabled: bool,
    /// Frame rate this level aims to sustain.
    pub frame_rate_target: f64,
    /// Upper bound on the cull margin at this level.
    pub cull_margin_cap: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_single() {
        assert_eq!(QualityLevel::High.step_down(), QualityLevel::Medium);
        assert_eq!(QualityLevel::Low.step_down(), QualityLevel::Low);
        assert_eq!(QualityLevel::Medium.step_up(), QualityLevel::High);
        assert_eq!(QualityLevel::Ultra.step_up(), QualityLevel::Ultra);
    }

    #[test]
    fn test_parse() {
        assert_eq!(QualityLevel::from_name("ULTRA"), Some(QualityLevel::Ultra));
        assert_eq!(QualityLevel::parse_or_default("potato"), QualityLevel::High);
        assert_eq!(QualityLevel::parse_or_default(""), QualityLevel::High);
    }

    #[test]
    fn test_targets_non_decreasing() {
        let targets: Vec<f64> = QualityLevel::ALL.iter().map(|l| l.params().frame_rate_target).collect();
        assert!(targets.windows(2).all(|w| w[0] <= w[1]));
    }
}
