//! GPU-uploadable form of the aggregate transform.

use bytemuck::{Pod, Zeroable};

use crate::effects::CurrentTransform;

/// Uniform block for a post-process shader (64 bytes, std140-compatible).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TransformUniforms {
    /// Shake offset (x, y).
    pub offset: [f32; 2],
    /// Zoom factor.
    pub zoom: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Flash colour, straight alpha.
    pub flash: [f32; 4],
    /// Tint colour, straight alpha.
    pub tint: [f32; 4],
    /// Blur, contrast, brightness, saturation.
    pub filter: [f32; 4],
}

impl From<&CurrentTransform> for TransformUniforms {
    fn from(t: &CurrentTransform) -> Self {
        Self {
            offset: [t.shake.x, t.shake.y],
            zoom: t.zoom,
            rotation: t.rotation,
            flash: t.flash.to_array(),
            tint: t.tint.to_array(),
            filter: [t.blur, t.contrast, t.brightness, t.saturation],
        }
    }
}

impl TransformUniforms {
    /// Returns the uniforms as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
