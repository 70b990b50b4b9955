//! Easing curves for effect progress.
//!
//! Every curve maps `0.0..=1.0` onto `0.0..=1.0` (bounce overshoots nothing,
//! it only changes speed) and is pure.

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic ease-in (accelerating).
    EaseIn,
    /// Quadratic ease-out (decelerating).
    EaseOut,
    /// Quadratic ease-in-out.
    EaseInOut,
    /// Bounces into the target.
    EaseOutBounce,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    ///
    /// Input outside the range is clamped first.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutBounce => ease_out_bounce(t),
        }
    }

    /// Looks an easing up by its camelCase name (`"easeInOut"`).
    ///
    /// Unknown names fall back to linear.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Self::Linear,
            "easeIn" => Self::EaseIn,
            "easeOut" => Self::EaseOut,
            "easeInOut" => Self::EaseInOut,
            "easeOutBounce" => Self::EaseOutBounce,
            other => {
                tracing::debug!("unknown easing {:?}, using linear", other);
                Self::Linear
            }
        }
    }
}

/// Piecewise-quadratic bounce.
fn ease_out_bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984_375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutBounce,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_quadratic_shapes() {
        assert!((Easing::EaseIn.apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Easing::from_name("easeOutBounce"), Easing::EaseOutBounce);
        assert_eq!(Easing::from_name("wobble"), Easing::Linear);
    }
}
