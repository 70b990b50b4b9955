//! Spatial content effects.
//!
//! Bubbles, menu sparkles and seasonal particles are drawn by their own
//! renderers. The manager only knows their bounds (for culling) and their
//! clock; each tick it hands back progress for the visible ones.

use flare_core::{EffectCategory, EffectId, Priority, Rect};
use flare_rendering::{Bounded, Easing, EffectTimer};
use serde::Serialize;

/// A tracked piece of spatial content.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialEffect {
    /// Identifier shared with the cleanup queue.
    pub id: EffectId,
    /// Current bounds in surface units.
    pub bounds: Rect,
    /// Lifecycle clock.
    pub timer: EffectTimer,
    /// Curve applied to progress before it is handed out.
    pub easing: Easing,
    /// Budget counter this content is charged to.
    pub category: EffectCategory,
    /// Admission priority; decorative content is dropped under emergency.
    pub priority: Priority,
}

impl Bounded for SpatialEffect {
    #[inline]
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl SpatialEffect {
    /// What the content renderer gets this tick.
    #[must_use]
    pub fn frame(&self) -> SpatialFrame {
        let progress = self.timer.progress();
        SpatialFrame {
            id: self.id,
            bounds: self.bounds,
            progress,
            eased_progress: self.easing.apply(progress),
        }
    }
}

/// Progress of one visible spatial effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpatialFrame {
    /// Which effect.
    pub id: EffectId,
    /// Its bounds.
    pub bounds: Rect,
    /// Linear progress (0 for persistent content).
    pub progress: f32,
    /// Progress after easing.
    pub eased_progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_reports_eased_progress() {
        let mut effect = SpatialEffect {
            id: EffectId(4),
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            timer: EffectTimer::finite(100.0),
            easing: Easing::EaseIn,
            category: EffectCategory::Particle,
            priority: Priority::Normal,
        };
        effect.timer.advance(50.0);
        let frame = effect.frame();
        assert!((frame.progress - 0.5).abs() < 1e-6);
        assert!((frame.eased_progress - 0.25).abs() < 1e-6);
        assert_eq!(effect.bounds(), frame.bounds);
    }
}
