//! Identifiers and classification shared across crates.

use serde::{Deserialize, Serialize};

/// Identifier handed out for every created effect.
///
/// Ids are monotonically increasing within one manager and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Importance of an effect request, used by admission control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Priority {
    /// Purely cosmetic; first to go under pressure.
    Decorative = 0,
    /// Regular gameplay feedback.
    #[default]
    Normal = 1,
    /// Feedback the player should not miss. Always admitted.
    Important = 2,
    /// Must always render. Always admitted.
    Critical = 3,
}

impl Priority {
    /// Returns true if this priority bypasses budget checks.
    #[inline]
    #[must_use]
    pub const fn bypasses_budget(self) -> bool {
        matches!(self, Self::Important | Self::Critical)
    }
}

/// Budget category an active effect is counted against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Individual spatial particles.
    Particle,
    /// Spatial effects that are not particles (bursts, rings).
    Effect,
    /// Full-surface effects handled by the composer.
    ScreenEffect,
    /// Ambient background particles.
    BackgroundParticle,
}

impl EffectCategory {
    /// All categories, in counter order.
    pub const ALL: [Self; 4] = [
        Self::Particle,
        Self::Effect,
        Self::ScreenEffect,
        Self::BackgroundParticle,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::Decorative < Priority::Normal);
        assert!(Priority::Important < Priority::Critical);
        assert!(Priority::Critical.bypasses_budget());
        assert!(!Priority::Normal.bypasses_budget());
    }
}
