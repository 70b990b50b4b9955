//! Effect lifecycle clock.

/// How long an effect lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifetime {
    /// Expires once `elapsed >= duration` (ms).
    Finite(f64),
    /// Lives until explicitly cancelled. Ambient/background content only.
    Persistent,
}

/// Tracks elapsed vs duration for one effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTimer {
    /// Lifetime of the effect.
    lifetime: Lifetime,
    /// Milliseconds since creation. Never negative.
    elapsed_ms: f64,
}

impl EffectTimer {
    /// Creates a finite timer.
    ///
    /// Negative or non-finite durations are clamped to zero, which makes
    /// the effect expire on its first advance.
    #[must_use]
    pub fn finite(duration_ms: f64) -> Self {
        let duration = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
        Self {
            lifetime: Lifetime::Finite(duration),
            elapsed_ms: 0.0,
        }
    }

    /// Creates a timer that never expires on its own.
    #[must_use]
    pub const fn persistent() -> Self {
        Self {
            lifetime: Lifetime::Persistent,
            elapsed_ms: 0.0,
        }
    }

    /// Creates a timer from a lifetime.
    #[must_use]
    pub fn new(lifetime: Lifetime) -> Self {
        match lifetime {
            Lifetime::Finite(duration) => Self::finite(duration),
            Lifetime::Persistent => Self::persistent(),
        }
    }

    /// Adds `delta_ms` to the elapsed time (negative deltas are ignored).
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
        }
    }

    /// Milliseconds since creation.
    #[inline]
    #[must_use]
    pub const fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// The configured lifetime.
    #[inline]
    #[must_use]
    pub const fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Duration for finite timers.
    #[must_use]
    pub const fn duration_ms(&self) -> Option<f64> {
        match self.lifetime {
            Lifetime::Finite(duration) => Some(duration),
            Lifetime::Persistent => None,
        }
    }

    /// Returns true while the effect should still contribute.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        match self.lifetime {
            Lifetime::Finite(duration) => self.elapsed_ms < duration,
            Lifetime::Persistent => true,
        }
    }

    /// Normalized progress in `0.0..=1.0`.
    ///
    /// Persistent timers report 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn progress(&self) -> f32 {
        match self.lifetime {
            Lifetime::Finite(duration) if duration > 0.0 => {
                (self.elapsed_ms / duration).clamp(0.0, 1.0) as f32
            }
            Lifetime::Finite(_) => 1.0,
            Lifetime::Persistent => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_progress_and_expiry() {
        let mut timer = EffectTimer::finite(150.0);
        timer.advance(75.0);
        assert!((timer.progress() - 0.5).abs() < 1e-6);
        assert!(timer.is_live());
        timer.advance(75.0);
        assert!(!timer.is_live());
        assert!((timer.progress() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_duration_expires_immediately() {
        let mut timer = EffectTimer::finite(-100.0);
        assert_eq!(timer.duration_ms(), Some(0.0));
        timer.advance(1.0);
        assert!(!timer.is_live());
    }

    #[test]
    fn test_persistent_never_expires() {
        let mut timer = EffectTimer::persistent();
        timer.advance(1.0e9);
        assert!(timer.is_live());
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut timer = EffectTimer::finite(100.0);
        timer.advance(-50.0);
        assert_eq!(timer.elapsed_ms(), 0.0);
    }
}
