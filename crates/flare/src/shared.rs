//! Transform published once per tick for renderer threads.

use std::sync::Arc;

use flare_rendering::{CurrentTransform, TransformUniforms};
use parking_lot::RwLock;

/// One published frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublishedTransform {
    /// Frame the transform was composed on.
    pub frame: u64,
    /// Aggregate transform.
    pub transform: CurrentTransform,
    /// The same, laid out for upload.
    pub uniforms: TransformUniforms,
}

impl Default for PublishedTransform {
    fn default() -> Self {
        Self {
            frame: 0,
            transform: CurrentTransform::IDENTITY,
            uniforms: TransformUniforms::from(&CurrentTransform::IDENTITY),
        }
    }
}

/// Cloneable read handle on the latest transform.
///
/// Only the manager writes; readers never block the tick for longer than
/// one copy.
#[derive(Debug, Clone, Default)]
pub struct SharedTransform {
    inner: Arc<RwLock<PublishedTransform>>,
}

impl SharedTransform {
    /// Creates a handle holding the identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&self, frame: u64, transform: &CurrentTransform) {
        let published = PublishedTransform {
            frame,
            transform: *transform,
            uniforms: TransformUniforms::from(transform),
        };
        *self.inner.write() = published;
    }

    /// Latest published frame.
    #[must_use]
    pub fn snapshot(&self) -> PublishedTransform {
        *self.inner.read()
    }

    /// Latest uniforms as bytes, ready for a buffer write.
    #[must_use]
    pub fn uniform_bytes(&self) -> Vec<u8> {
        bytemuck::bytes_of(&self.inner.read().uniforms).to_vec()
    }
}
