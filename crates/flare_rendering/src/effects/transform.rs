//! Aggregate transform and its reduction rules.
//!
//! Each effect produces exactly one [`Contribution`]. Contributions land in
//! per-field buckets and are reduced with fixed rules:
//!
//! | field | rule |
//! |---|---|
//! | shake x/y, rotation | sum |
//! | zoom, contrast, brightness, saturation | product, seeded at 1 |
//! | blur | max, seeded at 0 |
//! | flash, tint | alpha-over (see [`OverlayAccumulator`]) |
//!
//! Every rule is commutative, so the result does not depend on effect order.

use flare_core::{Color4, Vec2};
use serde::Serialize;

use super::effect::FilterType;

/// Smallest zoom factor the composer will emit.
pub const MIN_ZOOM: f32 = 1.0e-3;

/// The aggregate the renderer reads once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentTransform {
    /// Camera offset.
    pub shake: Vec2,
    /// Camera scale. Always > 0.
    pub zoom: f32,
    /// Camera rotation in radians.
    pub rotation: f32,
    /// Screen-blended overlay, drawn first.
    pub flash: Color4,
    /// Multiplicative overlay, drawn after the flash.
    pub tint: Color4,
    /// Blur radius. Always >= 0.
    pub blur: f32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Saturation multiplier.
    pub saturation: f32,
}

impl CurrentTransform {
    /// The transform with no effects applied.
    pub const IDENTITY: Self = Self {
        shake: Vec2::ZERO,
        zoom: 1.0,
        rotation: 0.0,
        flash: Color4::TRANSPARENT,
        tint: Color4::TRANSPARENT,
        blur: 0.0,
        contrast: 1.0,
        brightness: 1.0,
        saturation: 1.0,
    };

    /// Reduces a set of contributions in one pass.
    pub fn compose<I: IntoIterator<Item = Contribution>>(contributions: I) -> Self {
        let mut acc = TransformAccumulator::new();
        for contribution in contributions {
            acc.add(contribution);
        }
        acc.finish()
    }

    /// Returns true if any filter channel differs from neutral.
    #[must_use]
    pub fn has_filter(&self) -> bool {
        #[allow(clippy::float_cmp)]
        let neutral = self.contrast == 1.0 && self.brightness == 1.0 && self.saturation == 1.0;
        !neutral
    }

    /// Returns true if this is exactly the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for CurrentTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One effect's typed output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contribution {
    /// Camera offset.
    Shake(Vec2),
    /// Zoom factor.
    Zoom(f32),
    /// Angle in radians.
    Rotation(f32),
    /// Blur radius.
    Blur(f32),
    /// Filter multiplier on one channel.
    Filter(FilterType, f32),
    /// Flash colour; alpha is this flash's contribution.
    Flash(Color4),
    /// Tint colour; alpha is this tint's contribution.
    Tint(Color4),
}

/// Alpha-over reduction for overlay colours.
///
/// Alpha composites as `a = a_prev + a_new · (1 - a_prev)`, which is order
/// independent. Colour channels are weighted by each contribution's own
/// alpha and normalized at the end, so two equal-alpha overlays average and
/// a zero-alpha overlay contributes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayAccumulator {
    /// Σ colour · alpha
    weighted: [f32; 3],
    /// Σ alpha
    weight: f32,
    /// Composited alpha.
    alpha: f32,
}

impl OverlayAccumulator {
    /// Adds one overlay.
    pub fn add(&mut self, color: Color4) {
        let a = if color.a.is_finite() { color.a.clamp(0.0, 1.0) } else { 0.0 };
        if a <= 0.0 {
            return;
        }
        self.weighted[0] += color.r * a;
        self.weighted[1] += color.g * a;
        self.weighted[2] += color.b * a;
        self.weight += a;
        self.alpha += a * (1.0 - self.alpha);
    }

    /// Resolves the blended colour.
    #[must_use]
    pub fn resolve(&self) -> Color4 {
        if self.weight <= 0.0 {
            return Color4::TRANSPARENT;
        }
        Color4::new(
            self.weighted[0] / self.weight,
            self.weighted[1] / self.weight,
            self.weighted[2] / self.weight,
            self.alpha.clamp(0.0, 1.0),
        )
    }
}

/// Running buckets for one composition pass.
#[derive(Debug, Clone, Copy)]
pub struct TransformAccumulator {
    shake: Vec2,
    zoom: f32,
    rotation: f32,
    blur: f32,
    contrast: f32,
    brightness: f32,
    saturation: f32,
    flash: OverlayAccumulator,
    tint: OverlayAccumulator,
}

impl TransformAccumulator {
    /// Empty buckets (every reduction at its seed).
    #[must_use]
    pub fn new() -> Self {
        Self {
            shake: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            blur: 0.0,
            contrast: 1.0,
            brightness: 1.0,
            saturation: 1.0,
            flash: OverlayAccumulator::default(),
            tint: OverlayAccumulator::default(),
        }
    }

    /// Routes a contribution into its bucket.
    pub fn add(&mut self, contribution: Contribution) {
        match contribution {
            Contribution::Shake(offset) => self.shake += offset,
            Contribution::Zoom(factor) => self.zoom *= factor,
            Contribution::Rotation(angle) => self.rotation += angle,
            Contribution::Blur(radius) => self.blur = self.blur.max(radius),
            Contribution::Filter(FilterType::Contrast, v) => self.contrast *= v,
            Contribution::Filter(FilterType::Brightness, v) => self.brightness *= v,
            Contribution::Filter(FilterType::Saturation, v) => self.saturation *= v,
            Contribution::Flash(color) => self.flash.add(color),
            Contribution::Tint(color) => self.tint.add(color),
        }
    }

    /// Produces the final transform, enforcing its invariants.
    #[must_use]
    pub fn finish(&self) -> CurrentTransform {
        let zoom = if self.zoom.is_finite() { self.zoom.max(MIN_ZOOM) } else { 1.0 };
        CurrentTransform {
            shake: self.shake,
            zoom,
            rotation: self.rotation,
            flash: self.flash.resolve(),
            tint: self.tint.resolve(),
            blur: self.blur.max(0.0),
            contrast: self.contrast,
            brightness: self.brightness,
            saturation: self.saturation,
        }
    }
}

impl Default for TransformAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_identity() {
        assert!(CurrentTransform::compose(std::iter::empty()).is_identity());
    }

    #[test]
    fn test_zoom_product_is_associative() {
        let split = CurrentTransform::compose([Contribution::Zoom(1.2), Contribution::Zoom(0.9)]).zoom
            * CurrentTransform::compose([Contribution::Zoom(1.1)]).zoom;
        let joined = CurrentTransform::compose([
            Contribution::Zoom(1.2),
            Contribution::Zoom(0.9),
            Contribution::Zoom(1.1),
        ])
        .zoom;
        assert!((split - joined).abs() < 1e-6);
        assert!((joined - 1.188).abs() < 1e-5);
    }

    #[test]
    fn test_blur_takes_max_and_never_negative() {
        let t = CurrentTransform::compose([Contribution::Blur(2.0), Contribution::Blur(5.0), Contribution::Blur(1.0)]);
        assert!((t.blur - 5.0).abs() < 1e-6);
        let t = CurrentTransform::compose([Contribution::Blur(-3.0)]);
        assert_eq!(t.blur, 0.0);
    }

    #[test]
    fn test_equal_alpha_flashes_average() {
        let t = CurrentTransform::compose([
            Contribution::Flash(Color4::new(1.0, 0.0, 0.0, 0.5)),
            Contribution::Flash(Color4::new(0.0, 0.0, 1.0, 0.5)),
        ]);
        assert!((t.flash.r - 0.5).abs() < 1e-6);
        assert!(t.flash.g.abs() < 1e-6);
        assert!((t.flash.b - 0.5).abs() < 1e-6);
        assert!((t.flash.a - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_alpha_contributes_nothing() {
        let red = Contribution::Tint(Color4::new(1.0, 0.0, 0.0, 0.4));
        let ghost = Contribution::Tint(Color4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(CurrentTransform::compose([red]), CurrentTransform::compose([red, ghost]));
    }

    #[test]
    fn test_final_alpha_order_independent() {
        let a = Contribution::Flash(Color4::new(1.0, 1.0, 1.0, 0.2));
        let b = Contribution::Flash(Color4::new(0.0, 0.0, 0.0, 0.7));
        let ab = CurrentTransform::compose([a, b]).flash.a;
        let ba = CurrentTransform::compose([b, a]).flash.a;
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_filters_multiply_independently() {
        let t = CurrentTransform::compose([
            Contribution::Filter(FilterType::Contrast, 1.5),
            Contribution::Filter(FilterType::Contrast, 2.0),
            Contribution::Filter(FilterType::Saturation, 0.5),
        ]);
        assert!((t.contrast - 3.0).abs() < 1e-6);
        assert!((t.brightness - 1.0).abs() < 1e-6);
        assert!((t.saturation - 0.5).abs() < 1e-6);
        assert!(t.has_filter());
    }

    #[test]
    fn test_zoom_stays_positive() {
        let t = CurrentTransform::compose([Contribution::Zoom(0.0)]);
        assert!(t.zoom > 0.0);
    }
}
