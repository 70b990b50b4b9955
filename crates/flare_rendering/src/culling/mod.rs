//! Viewport culling for spatial effect content.
//!
//! Screen effects cover the whole surface and are never culled; only
//! content with a bounding box (particles, bursts, bubbles) goes through here.

mod viewport;

pub use viewport::{Bounded, CullOutcome, CullStats, Viewport, ViewportCuller, DEFAULT_CULL_MARGIN};
