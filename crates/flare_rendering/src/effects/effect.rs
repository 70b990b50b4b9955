//! The screen-effect tagged union.
//!
//! Adding a new kind means adding a variant here; the composer's match is
//! exhaustive, so the compiler points at every place that must learn it.

use flare_core::{Color4, EffectId, Priority};
use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::timer::EffectTimer;

/// Shake motion pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakeType {
    /// Independent uniform noise on both axes every tick.
    #[default]
    Random,
    /// Sine along X.
    Horizontal,
    /// Sine along Y.
    Vertical,
    /// Both axes, 90° out of phase.
    Circular,
}

/// Flash alpha envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeType {
    /// Ramps up to full intensity.
    In,
    /// Starts at full intensity and fades away.
    #[default]
    Out,
    /// Rises then falls (half sine).
    InOut,
}

/// Colour filter channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Contrast multiplier.
    Contrast,
    /// Brightness multiplier.
    Brightness,
    /// Saturation multiplier.
    Saturation,
}

impl ShakeType {
    /// Parses a lowercase name; unknown names are None.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "random" => Some(Self::Random),
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "circular" => Some(Self::Circular),
            _ => None,
        }
    }
}

impl FadeType {
    /// Parses a lowercase name; unknown names are None.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "inout" => Some(Self::InOut),
            _ => None,
        }
    }

    /// Alpha at `progress` for a flash of `intensity`.
    #[must_use]
    pub fn alpha(self, progress: f32, intensity: f32) -> f32 {
        let envelope = match self {
            Self::In => progress,
            Self::Out => 1.0 - progress,
            Self::InOut => (progress * std::f32::consts::PI).sin(),
        };
        (envelope * intensity).clamp(0.0, 1.0)
    }
}

impl FilterType {
    /// Parses a lowercase name; unknown names are None.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "contrast" => Some(Self::Contrast),
            "brightness" => Some(Self::Brightness),
            "saturation" => Some(Self::Saturation),
            _ => None,
        }
    }
}

/// Per-kind parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Camera shake.
    Shake {
        /// Peak displacement in surface units.
        intensity: f32,
        /// Motion pattern.
        shake_type: ShakeType,
        /// Oscillation frequency (radians per second of elapsed time).
        frequency: f32,
        /// Intensity multiplier reached at the end (`intensity · damping^progress`).
        damping: f32,
    },
    /// Full-surface additive flash.
    Flash {
        /// Flash colour (alpha ignored; the envelope drives it).
        color: Color4,
        /// Peak alpha.
        intensity: f32,
        /// Alpha envelope.
        fade: FadeType,
    },
    /// Full-surface multiplicative tint.
    Tint {
        /// Tint colour (alpha ignored).
        color: Color4,
        /// Alpha reached at the end of the easing curve.
        intensity: f32,
    },
    /// Camera zoom.
    Zoom {
        /// Zoom factor at progress 0.
        start: f32,
        /// Zoom factor at progress 1.
        target: f32,
    },
    /// Camera rotation (radians).
    Rotation {
        /// Angle at progress 0.
        start: f32,
        /// Angle at progress 1.
        target: f32,
    },
    /// Gaussian blur radius.
    Blur {
        /// Radius at progress 0.
        start: f32,
        /// Radius at progress 1.
        target: f32,
    },
    /// Colour filter sweep.
    Filter {
        /// Which channel.
        filter: FilterType,
        /// Multiplier at progress 0.
        start: f32,
        /// Multiplier at progress 1.
        target: f32,
    },
}

impl EffectKind {
    /// Type tag as used in configuration and logs.
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
}

/// An active screen effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    /// Identifier handed back to the creator.
    pub id: EffectId,
    /// Lifecycle clock.
    pub timer: EffectTimer,
    /// Progress easing.
    pub easing: Easing,
    /// Admission priority; decorative effects are purged under emergency.
    pub priority: Priority,
    /// Per-kind parameters.
    pub kind: EffectKind,
}

impl Effect {
    /// Creates a finite effect.
    ///
    /// Screen effects are never persistent: a negative duration is treated
    /// as zero (the effect expires on its first tick) and logged.
    #[must_use]
    pub fn new(id: EffectId, kind: EffectKind, duration_ms: f64, easing: Easing, priority: Priority) -> Self {
        if duration_ms < 0.0 {
            tracing::warn!(
                "{} effect {} requested negative duration {}ms, clamping to 0",
                kind.name(),
                id,
                duration_ms
            );
        }
        Self {
            id,
            timer: EffectTimer::finite(duration_ms),
            easing,
            priority,
            kind,
        }
    }

    /// Eased progress for this tick.
    #[inline]
    #[must_use]
    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.timer.progress())
    }
}

/// Live effect counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EffectKindCounts {
    /// Active shakes.
    pub shake: u32,
    /// Active flashes.
    pub flash: u32,
    /// Active tints.
    pub tint: u32,
    /// Active zooms.
    pub zoom: u32,
    /// Active rotations.
    pub rotation: u32,
    /// Active blurs.
    pub blur: u32,
    /// Active filters.
    pub filter: u32,
}

impl EffectKindCounts {
    /// Counts one effect.
    pub fn record(&mut self, kind: &EffectKind) {
        let slot = match kind {
            EffectKind::Shake { .. } => &mut self.shake,
            EffectKind::Flash { .. } => &mut self.flash,
            EffectKind::Tint { .. } => &mut self.tint,
            EffectKind::Zoom { .. } => &mut self.zoom,
            EffectKind::Rotation { .. } => &mut self.rotation,
            EffectKind::Blur { .. } => &mut self.blur,
            EffectKind::Filter { .. } => &mut self.filter,
        };
        *slot += 1;
    }

    /// Sum over all kinds.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.shake + self.flash + self.tint + self.zoom + self.rotation + self.blur + self.filter
    }
}
