//! # Composite Presets
//!
//! A preset is a list of timed steps. The manager schedules every step on
//! its delayed-task queue against the frame clock, so a chain such as
//! "zoom in, then zoom back out 300 ms later" replays identically for the
//! same sequence of frame deltas.
//!
//! ```text
//!   t=0    flash ────┐
//!   t=0    zoom 1.05 ├── time stop
//!   t=300  zoom 1.00 │
//!   t=0    tint ─────┘
//! ```

use flare_core::Color4;
use flare_rendering::{Easing, FadeType, ShakeType};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::options::{EffectOptions, EffectRequest};

/// Largest random tilt of the electric preset (radians).
const ELECTRIC_MAX_TILT: f32 = 0.05;

/// Most zoom pulses one bonus-time preset schedules (ten minutes' worth).
const MAX_BONUS_PULSES: u32 = 600;

/// A named composite effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum Preset {
    /// Circular shake, white flash and a quick zoom punch.
    Explosion {
        /// Scales shake and flash strength.
        intensity: f32,
    },
    /// Red flash, short shake, red tint.
    Damage,
    /// Green flash, gentle zoom pulse, green tint.
    Heal,
    /// Long jittery shake, strobing yellow flashes, a random tilt.
    Electric,
    /// Blue freeze: flash, zoom, tint and blur held for `duration_ms`.
    TimeStop {
        /// Total length (ms).
        duration_ms: f64,
    },
    /// Gold flash and tint with a zoom pulse every second.
    BonusTime {
        /// Total length (ms).
        duration_ms: f64,
    },
    /// Black tint darkening the whole surface.
    Vignette {
        /// Final alpha.
        intensity: f32,
        /// Length (ms).
        duration_ms: f64,
    },
}

/// One scheduled step of a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetStep {
    /// Offset from the moment the preset was triggered (ms).
    pub delay_ms: f64,
    /// Effect to create.
    pub request: EffectRequest,
    /// Its options.
    pub options: EffectOptions,
}

struct Steps(Vec<PresetStep>);

impl Steps {
    fn at(&mut self, delay_ms: f64, request: EffectRequest, duration_ms: f64, easing: Easing) -> &mut Self {
        self.0.push(PresetStep {
            delay_ms,
            request,
            options: EffectOptions::lasting(duration_ms.max(0.0)).eased(easing),
        });
        self
    }

    fn now(&mut self, request: EffectRequest, duration_ms: f64, easing: Easing) -> &mut Self {
        self.at(0.0, request, duration_ms, easing)
    }
}

fn flash(color: &str, intensity: f32, fade: FadeType) -> EffectRequest {
    EffectRequest::Flash {
        color: Color4::parse_or_white(color),
        intensity,
        fade,
    }
}

fn tint(color: &str, intensity: f32) -> EffectRequest {
    EffectRequest::Tint {
        color: Color4::parse_or_white(color),
        intensity,
    }
}

const fn shake(intensity: f32, shake_type: ShakeType) -> EffectRequest {
    EffectRequest::Shake { intensity, shake_type }
}

const fn zoom(target: f32) -> EffectRequest {
    EffectRequest::Zoom { target }
}

const fn blur(radius: f32) -> EffectRequest {
    EffectRequest::Blur { radius }
}

impl Preset {
    /// Name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Explosion { .. } => "explosion",
            Self::Damage => "damage",
            Self::Heal => "heal",
            Self::Electric => "electric",
            Self::TimeStop { .. } => "time_stop",
            Self::BonusTime { .. } => "bonus_time",
            Self::Vignette { .. } => "vignette",
        }
    }

    /// Expands into timed steps. `rng` drives the electric tilt.
    pub fn steps<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PresetStep> {
        use Easing::{EaseIn, EaseInOut, EaseOut, Linear};

        let mut s = Steps(Vec::with_capacity(8));
        match *self {
            Self::Explosion { intensity } => {
                s.now(shake(15.0 * intensity, ShakeType::Circular), 500.0, Linear)
                    .now(flash("#FFFFFF", 0.6 * intensity, FadeType::Out), 150.0, Linear)
                    .now(zoom(0.95), 100.0, EaseOut)
                    .at(100.0, zoom(1.0), 200.0, EaseOut);
            }
            Self::Damage => {
                s.now(flash("#FF0000", 0.4, FadeType::Out), 200.0, Linear)
                    .now(shake(8.0, ShakeType::Random), 300.0, Linear)
                    .now(tint("#FF0000", 0.3), 400.0, EaseOut);
            }
            Self::Heal => {
                s.now(flash("#00FF00", 0.3, FadeType::InOut), 400.0, Linear)
                    .now(zoom(1.02), 300.0, EaseInOut)
                    .at(300.0, zoom(1.0), 300.0, EaseInOut)
                    .now(tint("#00FF88", 0.2), 600.0, EaseInOut);
            }
            Self::Electric => {
                s.now(shake(20.0, ShakeType::Random), 800.0, Linear);
                for i in 0..4 {
                    s.at(f64::from(i) * 200.0, flash("#FFFF00", 0.5, FadeType::Out), 100.0, Linear);
                }
                let angle = rng.gen_range(-ELECTRIC_MAX_TILT..=ELECTRIC_MAX_TILT);
                s.now(EffectRequest::Rotation { angle }, 200.0, EaseOut);
            }
            Self::TimeStop { duration_ms } => {
                s.now(flash("#0088FF", 0.3, FadeType::Out), 200.0, Linear)
                    .now(zoom(1.05), 300.0, EaseOut)
                    .at(300.0, zoom(1.0), duration_ms - 300.0, EaseIn)
                    .now(tint("#0088FF", 0.2), duration_ms, EaseInOut)
                    .now(blur(2.0), 200.0, EaseOut)
                    .at(200.0, blur(0.0), duration_ms - 200.0, EaseIn);
            }
            Self::BonusTime { duration_ms } => {
                s.now(flash("#FFD700", 0.4, FadeType::Out), 300.0, Linear);
                let seconds = (duration_ms / 1000.0).floor();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let pulses = if seconds.is_nan() {
                    0
                } else {
                    seconds.clamp(0.0, f64::from(MAX_BONUS_PULSES)) as u32
                };
                for i in 0..pulses {
                    let start = f64::from(i) * 1000.0;
                    s.at(start, zoom(1.02), 200.0, EaseOut)
                        .at(start + 200.0, zoom(1.0), 200.0, EaseIn);
                }
                s.now(tint("#FFD700", 0.15), duration_ms, EaseInOut);
            }
            Self::Vignette {
                intensity,
                duration_ms,
            } => {
                s.now(tint("#000000", intensity), duration_ms, Linear);
            }
        }
        s.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_explosion_scales_with_intensity() {
        let steps = Preset::Explosion { intensity: 2.0 }.steps(&mut rng());
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].request, shake(30.0, ShakeType::Circular));
        assert!(matches!(steps[1].request, EffectRequest::Flash { intensity, .. } if (intensity - 1.2).abs() < 1e-6));
        assert!((steps[3].delay_ms - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_stop_chains() {
        let steps = Preset::TimeStop { duration_ms: 1000.0 }.steps(&mut rng());
        let delayed: Vec<_> = steps.iter().filter(|s| s.delay_ms > 0.0).collect();
        assert_eq!(delayed.len(), 2);
        assert_eq!(delayed[0].request, zoom(1.0));
        assert_eq!(delayed[0].options.duration_ms, Some(700.0));
        assert_eq!(delayed[1].request, blur(0.0));
        assert_eq!(delayed[1].options.duration_ms, Some(800.0));
    }

    #[test]
    fn test_short_time_stop_clamps_durations() {
        let steps = Preset::TimeStop { duration_ms: 100.0 }.steps(&mut rng());
        assert!(steps.iter().all(|s| s.options.duration_ms.unwrap_or(0.0) >= 0.0));
    }

    #[test]
    fn test_bonus_time_pulses_every_second() {
        let steps = Preset::BonusTime { duration_ms: 3500.0 }.steps(&mut rng());
        let zooms = steps.iter().filter(|s| matches!(s.request, EffectRequest::Zoom { .. })).count();
        assert_eq!(zooms, 6);
    }

    #[test]
    fn test_bonus_time_pulses_are_capped() {
        let zooms = |duration_ms: f64| {
            Preset::BonusTime { duration_ms }
                .steps(&mut rng())
                .iter()
                .filter(|s| matches!(s.request, EffectRequest::Zoom { .. }))
                .count()
        };
        let cap = 2 * MAX_BONUS_PULSES as usize;
        assert_eq!(zooms(1.0e12), cap);
        assert_eq!(zooms(f64::INFINITY), cap);
        assert_eq!(zooms(f64::NAN), 0);
        assert_eq!(zooms(-5000.0), 0);
    }

    #[test]
    fn test_electric_tilt_is_bounded_and_seeded() {
        let a = Preset::Electric.steps(&mut rng());
        let b = Preset::Electric.steps(&mut rng());
        assert_eq!(a, b);
        let flashes = a.iter().filter(|s| matches!(s.request, EffectRequest::Flash { .. })).count();
        assert_eq!(flashes, 4);
        let tilt = a.iter().find_map(|s| match s.request {
            EffectRequest::Rotation { angle } => Some(angle),
            _ => None,
        });
        assert!(tilt.is_some_and(|t| t.abs() <= ELECTRIC_MAX_TILT));
    }

    #[test]
    fn test_vignette_is_black_tint() {
        let steps = Preset::Vignette {
            intensity: 0.5,
            duration_ms: 800.0,
        }
        .steps(&mut rng());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].request, tint("#000000", 0.5));
        assert!(matches!(steps[0].request, EffectRequest::Tint { color, .. } if color == Color4::BLACK));
    }
}
