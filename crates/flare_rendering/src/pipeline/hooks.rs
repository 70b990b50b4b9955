//! Pre/post render hooks and the surface abstraction they draw on.

use std::fmt;

use flare_core::{Color4, Vec2};
use thiserror::Error;

use super::stats::RenderStats;
use crate::effects::CurrentTransform;

/// Errors raised by a drawing surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backing context is gone (device lost, canvas detached).
    #[error("render context lost")]
    ContextLost,

    /// `restore` without a matching `save`.
    #[error("restore without matching save")]
    UnbalancedRestore,

    /// Backend-specific failure.
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// How an overlay combines with the scene below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over.
    Normal,
    /// Screen, `1 - (1 - dst)(1 - src)`; used for flashes.
    Screen,
    /// Multiply; used for tints.
    Multiply,
}

/// Post-processing filters applied to the scene for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterChain {
    /// Blur radius in surface units.
    pub blur: f32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Saturation multiplier.
    pub saturation: f32,
}

impl FilterChain {
    /// Extracts the filter channels of a transform.
    #[must_use]
    pub fn from_transform(transform: &CurrentTransform) -> Self {
        Self {
            blur: transform.blur,
            contrast: transform.contrast,
            brightness: transform.brightness,
            saturation: transform.saturation,
        }
    }

    /// Returns true if applying the chain would change nothing.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_neutral(&self) -> bool {
        self.blur <= 0.0 && self.contrast == 1.0 && self.brightness == 1.0 && self.saturation == 1.0
    }
}

/// CSS-style filter string (`blur(2px) contrast(1.2)`), omitting neutral entries.
impl fmt::Display for FilterChain {
    #[allow(clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.blur > 0.0 {
            parts.push(format!("blur({}px)", self.blur));
        }
        if self.contrast != 1.0 {
            parts.push(format!("contrast({})", self.contrast));
        }
        if self.brightness != 1.0 {
            parts.push(format!("brightness({})", self.brightness));
        }
        if self.saturation != 1.0 {
            parts.push(format!("saturate({})", self.saturation));
        }
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// A 2D drawing context the hooks can drive.
///
/// Implemented by the host renderer. Every call may fail; the caller decides
/// how to degrade.
pub trait RenderSurface {
    /// Surface size, used as the zoom/rotation pivot (centre).
    fn size(&self) -> Vec2;
    /// Pushes the context state.
    fn save(&mut self) -> Result<(), SurfaceError>;
    /// Pops the context state.
    fn restore(&mut self) -> Result<(), SurfaceError>;
    /// Translates the context.
    fn translate(&mut self, offset: Vec2) -> Result<(), SurfaceError>;
    /// Scales the context uniformly.
    fn scale(&mut self, factor: f32) -> Result<(), SurfaceError>;
    /// Rotates the context by `radians`.
    fn rotate(&mut self, radians: f32) -> Result<(), SurfaceError>;
    /// Sets the filter chain for subsequent drawing.
    fn set_filter(&mut self, chain: &FilterChain) -> Result<(), SurfaceError>;
    /// Fills the whole surface with `color`.
    fn fill_overlay(&mut self, color: Color4, blend: BlendMode) -> Result<(), SurfaceError>;
}

/// Applies shake, zoom, rotation and filters ahead of the scene.
///
/// Leaves one saved state on the surface that [`render_post_pass`] restores.
///
/// # Errors
///
/// Returns the first surface error; the context may then be left saved.
#[allow(clippy::float_cmp)]
pub fn render_pre_pass<S: RenderSurface + ?Sized>(
    surface: &mut S,
    transform: &CurrentTransform,
    stats: &mut RenderStats,
) -> Result<(), SurfaceError> {
    surface.save()?;
    stats.commands += 1;

    if transform.shake != Vec2::ZERO {
        surface.translate(transform.shake)?;
        stats.commands += 1;
    }

    if transform.zoom != 1.0 || transform.rotation != 0.0 {
        let size = surface.size();
        let centre = Vec2::new(size.x * 0.5, size.y * 0.5);
        surface.translate(centre)?;
        if transform.zoom != 1.0 {
            surface.scale(transform.zoom)?;
            stats.commands += 1;
        }
        if transform.rotation != 0.0 {
            surface.rotate(transform.rotation)?;
            stats.commands += 1;
        }
        surface.translate(Vec2::new(-centre.x, -centre.y))?;
        stats.commands += 2;
    }

    let chain = FilterChain::from_transform(transform);
    if !chain.is_neutral() {
        surface.set_filter(&chain)?;
        stats.commands += 1;
        stats.filters_applied += 1;
    }

    stats.pre_passes += 1;
    Ok(())
}

/// Composites flash then tint over the scene and restores the context.
///
/// # Errors
///
/// Returns the first surface error.
pub fn render_post_pass<S: RenderSurface + ?Sized>(
    surface: &mut S,
    transform: &CurrentTransform,
    stats: &mut RenderStats,
) -> Result<(), SurfaceError> {
    if transform.flash.a > 0.0 {
        surface.fill_overlay(transform.flash, BlendMode::Screen)?;
        stats.commands += 1;
        stats.overlays_drawn += 1;
    }
    if transform.tint.a > 0.0 {
        surface.fill_overlay(transform.tint, BlendMode::Multiply)?;
        stats.commands += 1;
        stats.overlays_drawn += 1;
    }
    surface.restore()?;
    stats.commands += 1;
    stats.post_passes += 1;
    Ok(())
}
