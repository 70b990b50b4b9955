//! # Effect Requests
//!
//! A request says WHAT to create; [`EffectOptions`] says for how long, on
//! which curve and at which priority. Anything left `None` takes the
//! configured default for that kind.
//!
//! [`NamedEffectOptions`] is the loosely typed form used by scripts and
//! config files: strings for colours and enum names, every field optional.
//! Bad values are corrected to defaults, never rejected.

use flare_core::{Color4, Priority};
use flare_rendering::{Easing, FadeType, FilterType, ShakeType};
use serde::{Deserialize, Serialize};

/// Shake intensity used when a named request gives none.
pub const DEFAULT_SHAKE_INTENSITY: f32 = 10.0;

/// Duration of rotation/blur/filter transitions when none is given (ms).
pub const DEFAULT_TRANSITION_MS: f64 = 300.0;

/// What to create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectRequest {
    /// Camera shake.
    Shake {
        /// Peak displacement before config scaling.
        intensity: f32,
        /// Motion pattern.
        shake_type: ShakeType,
    },
    /// Screen-blended flash.
    Flash {
        /// Flash colour.
        color: Color4,
        /// Peak alpha before config scaling.
        intensity: f32,
        /// Alpha envelope.
        fade: FadeType,
    },
    /// Multiplicative tint.
    Tint {
        /// Tint colour.
        color: Color4,
        /// Final alpha before config scaling.
        intensity: f32,
    },
    /// Zoom from the current aggregate zoom to `target`.
    Zoom {
        /// Target factor before sensitivity scaling.
        target: f32,
    },
    /// Rotate by `angle` radians relative to the current aggregate rotation.
    Rotation {
        /// Relative angle.
        angle: f32,
    },
    /// Blur from the current radius to `radius`.
    Blur {
        /// Target radius.
        radius: f32,
    },
    /// Filter sweep from the current value to `target`.
    Filter {
        /// Which channel.
        filter: FilterType,
        /// Target multiplier.
        target: f32,
    },
}

impl EffectRequest {
    /// Type tag of the effect this creates.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Shake { .. } => "shake",
            Self::Flash { .. } => "flash",
            Self::Tint { .. } => "tint",
            Self::Zoom { .. } => "zoom",
            Self::Rotation { .. } => "rotation",
            Self::Blur { .. } => "blur",
            Self::Filter { .. } => "filter",
        }
    }

    /// Curve used when the caller gives none.
    #[must_use]
    pub const fn default_easing(&self) -> Easing {
        match self {
            Self::Zoom { .. } => Easing::EaseOut,
            Self::Blur { .. } | Self::Filter { .. } => Easing::EaseInOut,
            Self::Shake { .. } | Self::Flash { .. } | Self::Tint { .. } | Self::Rotation { .. } => {
                Easing::Linear
            }
        }
    }
}

/// Timing and admission options shared by every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectOptions {
    /// Duration (ms). `None` uses the configured default for the kind.
    pub duration_ms: Option<f64>,
    /// Progress curve. `None` uses the kind's default.
    pub easing: Option<Easing>,
    /// Admission priority.
    pub priority: Priority,
}

impl EffectOptions {
    /// Options with an explicit duration.
    #[must_use]
    pub const fn lasting(duration_ms: f64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            easing: None,
            priority: Priority::Normal,
        }
    }

    /// Sets the easing.
    #[must_use]
    pub const fn eased(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Loosely typed creation record for [`EffectManager::create_named`](crate::EffectManager::create_named).
///
/// ```toml
/// color = "#FF8800"
/// intensity = 0.4
/// duration_ms = 250
/// easing = "easeOut"
/// fade = "inout"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedEffectOptions {
    /// `#RRGGBB`; unparsable values become white.
    pub color: Option<String>,
    /// Shake displacement, flash peak or tint alpha.
    pub intensity: Option<f32>,
    /// Duration (ms).
    pub duration_ms: Option<f64>,
    /// camelCase easing name.
    pub easing: Option<String>,
    /// Shake pattern name.
    pub shake_type: Option<String>,
    /// Flash envelope name.
    pub fade: Option<String>,
    /// Filter channel name.
    pub filter: Option<String>,
    /// Zoom factor, rotation angle, blur radius or filter multiplier.
    pub target: Option<f32>,
    /// Admission priority.
    pub priority: Priority,
}

fn named<T: Default>(field: &str, value: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> T {
    match value {
        None => T::default(),
        Some(name) => parse(name).unwrap_or_else(|| {
            tracing::warn!("unknown {} {:?}, using default", field, name);
            T::default()
        }),
    }
}

impl NamedEffectOptions {
    /// Resolves into a typed request.
    ///
    /// `flash_intensity` and `tint_intensity` fill in missing intensities.
    /// Returns `None` (and logs) for an unknown `kind` or a filter without
    /// a recognised channel.
    #[must_use]
    pub fn resolve(&self, kind: &str, flash_intensity: f32, tint_intensity: f32) -> Option<(EffectRequest, EffectOptions)> {
        let color = || self.color.as_deref().map_or(Color4::WHITE, Color4::parse_or_white);
        let request = match kind {
            "shake" => EffectRequest::Shake {
                intensity: self.intensity.unwrap_or(DEFAULT_SHAKE_INTENSITY),
                shake_type: named("shake type", self.shake_type.as_deref(), ShakeType::from_name),
            },
            "flash" => EffectRequest::Flash {
                color: color(),
                intensity: self.intensity.unwrap_or(flash_intensity),
                fade: named("fade type", self.fade.as_deref(), FadeType::from_name),
            },
            "tint" => EffectRequest::Tint {
                color: color(),
                intensity: self.intensity.unwrap_or(tint_intensity),
            },
            "zoom" => EffectRequest::Zoom {
                target: self.target.unwrap_or(1.0),
            },
            "rotation" => EffectRequest::Rotation {
                angle: self.target.unwrap_or(0.0),
            },
            "blur" => EffectRequest::Blur {
                radius: self.target.unwrap_or(0.0),
            },
            "filter" => {
                let Some(filter) = self.filter.as_deref().and_then(FilterType::from_name) else {
                    tracing::warn!("filter effect without a known channel ({:?}), skipped", self.filter);
                    return None;
                };
                EffectRequest::Filter {
                    filter,
                    target: self.target.unwrap_or(1.0),
                }
            }
            other => {
                tracing::warn!("unknown effect type {:?}, skipped", other);
                return None;
            }
        };
        let options = EffectOptions {
            duration_ms: self.duration_ms,
            easing: self.easing.as_deref().map(Easing::from_name),
            priority: self.priority,
        };
        Some((request, options))
    }
}
