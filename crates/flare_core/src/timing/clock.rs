//! Monotonic frame clock.

/// Largest delta accepted in one tick (ms).
///
/// Longer gaps (debugger pause, window drag) are clamped so effects do not
/// jump straight to their end state.
pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

/// Monotonic clock advanced by the frame loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    /// Milliseconds since the clock started.
    now_ms: f64,
    /// Frames ticked.
    frame: u64,
    /// Last clamped delta.
    last_delta_ms: f64,
}

impl FrameClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now_ms: 0.0,
            frame: 0,
            last_delta_ms: 0.0,
        }
    }

    /// Advances the clock by `delta_ms`.
    ///
    /// Negative and non-finite deltas count as zero; large deltas are
    /// clamped to [`MAX_FRAME_DELTA_MS`].
    ///
    /// # Returns
    ///
    /// The delta actually applied.
    pub fn advance(&mut self, delta_ms: f64) -> f64 {
        let delta = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        self.now_ms += delta;
        self.frame += 1;
        self.last_delta_ms = delta;
        delta
    }

    /// Current time in milliseconds.
    #[inline]
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of frames ticked.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Delta applied on the last tick.
    #[inline]
    #[must_use]
    pub const fn last_delta_ms(&self) -> f64 {
        self.last_delta_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_clamps() {
        let mut clock = FrameClock::new();
        assert!((clock.advance(16.0) - 16.0).abs() < f64::EPSILON);
        assert!((clock.advance(10_000.0) - MAX_FRAME_DELTA_MS).abs() < f64::EPSILON);
        assert!(clock.advance(-5.0).abs() < f64::EPSILON);
        assert!(clock.advance(f64::NAN).abs() < f64::EPSILON);
        assert_eq!(clock.frame(), 4);
        assert!((clock.now_ms() - 266.0).abs() < f64::EPSILON);
    }
}
