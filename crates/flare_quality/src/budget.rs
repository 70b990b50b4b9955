//! Effect budgets and live occupancy counters.

use flare_core::EffectCategory;
use serde::Serialize;

use crate::level::QualityParams;

/// Base particle budget at multiplier 1.0.
pub const BASE_ACTIVE_PARTICLES: f32 = 500.0;
/// Base spatial-effect budget at multiplier 1.0.
pub const BASE_ACTIVE_EFFECTS: f32 = 30.0;
/// Base screen-effect budget at animation detail 1.0.
pub const BASE_SCREEN_EFFECTS: f32 = 8.0;
/// Base background-particle budget at multiplier 1.0.
pub const BASE_BACKGROUND_PARTICLES: f32 = 200.0;

/// Per-category ceilings derived from the quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectBudget {
    /// Particle ceiling.
    pub max_active_particles: u32,
    /// Spatial effect ceiling.
    pub max_active_effects: u32,
    /// Screen effect ceiling.
    pub max_screen_effects: u32,
    /// Background particle ceiling (0 when disabled).
    pub max_background_particles: u32,
}

impl EffectBudget {
    /// Derives a budget from a parameter record.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_params(params: &QualityParams) -> Self {
        let scaled = |base: f32, multiplier: f32| (base * multiplier).floor().max(0.0) as u32;
        Self {
            max_active_particles: scaled(BASE_ACTIVE_PARTICLES, params.particle_count_multiplier),
            max_active_effects: scaled(BASE_ACTIVE_EFFECTS, params.particle_count_multiplier),
            max_screen_effects: scaled(BASE_SCREEN_EFFECTS, params.animation_detail),
            max_background_particles: if params.background_particles_enabled {
                scaled(BASE_BACKGROUND_PARTICLES, params.particle_count_multiplier)
            } else {
                0
            },
        }
    }

    /// Ceiling for one category.
    #[must_use]
    pub const fn limit(&self, category: EffectCategory) -> u32 {
        match category {
            EffectCategory::Particle => self.max_active_particles,
            EffectCategory::Effect => self.max_active_effects,
            EffectCategory::ScreenEffect => self.max_screen_effects,
            EffectCategory::BackgroundParticle => self.max_background_particles,
        }
    }
}

/// Live counters per category. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActiveEffectCounts {
    /// Active particles.
    pub particles: u32,
    /// Active spatial effects.
    pub effects: u32,
    /// Active screen effects.
    pub screen_effects: u32,
    /// Active background particles.
    pub background_particles: u32,
}

impl ActiveEffectCounts {
    /// Current count for one category.
    #[must_use]
    pub const fn get(&self, category: EffectCategory) -> u32 {
        match category {
            EffectCategory::Particle => self.particles,
            EffectCategory::Effect => self.effects,
            EffectCategory::ScreenEffect => self.screen_effects,
            EffectCategory::BackgroundParticle => self.background_particles,
        }
    }

    fn slot(&mut self, category: EffectCategory) -> &mut u32 {
        match category {
            EffectCategory::Particle => &mut self.particles,
            EffectCategory::Effect => &mut self.effects,
            EffectCategory::ScreenEffect => &mut self.screen_effects,
            EffectCategory::BackgroundParticle => &mut self.background_particles,
        }
    }

    /// Counts one creation.
    pub fn increment(&mut self, category: EffectCategory) {
        let slot = self.slot(category);
        *slot = slot.saturating_add(1);
    }

    /// Counts one removal. Underflow is clamped at zero and logged.
    pub fn decrement(&mut self, category: EffectCategory) {
        let slot = self.slot(category);
        if *slot == 0 {
            tracing::warn!("active count for {:?} would go negative, clamping at 0", category);
            return;
        }
        *slot -= 1;
    }

    /// Sum over all categories.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.particles + self.effects + self.screen_effects + self.background_particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::QualityLevel;

    #[test]
    fn test_budgets_per_level() {
        let high = EffectBudget::from_params(&QualityLevel::High.params());
        assert_eq!(high.max_active_particles, 500);
        assert_eq!(high.max_active_effects, 30);
        assert_eq!(high.max_screen_effects, 8);
        assert_eq!(high.max_background_particles, 200);

        let low = EffectBudget::from_params(&QualityLevel::Low.params());
        assert_eq!(low.max_active_particles, 150);
        assert_eq!(low.max_active_effects, 9);
        assert_eq!(low.max_screen_effects, 4);
        assert_eq!(low.max_background_particles, 0);

        let ultra = EffectBudget::from_params(&QualityLevel::Ultra.params());
        assert_eq!(ultra.max_active_particles, 750);
        assert_eq!(ultra.max_screen_effects, 10);
    }

    #[test]
    fn test_counts_never_negative() {
        let mut counts = ActiveEffectCounts::default();
        counts.increment(EffectCategory::Particle);
        counts.decrement(EffectCategory::Particle);
        counts.decrement(EffectCategory::Particle);
        assert_eq!(counts.get(EffectCategory::Particle), 0);
        assert_eq!(counts.total(), 0);
    }
}
