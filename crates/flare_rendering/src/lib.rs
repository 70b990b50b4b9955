//! # FLARE Rendering
//!
//! Transient full-surface effects for a 2D presentation loop:
//! - Camera shake, zoom and rotation
//! - Flash and tint overlays
//! - Blur and colour filter sweeps
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     COMPOSITION PIPELINE                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Effect list → advance(dt) → drop expired                    │
//! │       ↓                                                      │
//! │  progress → easing → typed contribution (one bucket each)    │
//! │       ↓                                                      │
//! │  reduce buckets → CurrentTransform                           │
//! │       ↓                                                      │
//! │  pre-pass (shake/zoom/rotate/filter) → scene → post-pass     │
//! │                                         (flash, then tint)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Spatial content (particles, bubbles) never passes through the composer;
//! it is only culled here by its bounding box.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod culling;
pub mod effects;
pub mod pipeline;

pub use culling::{Bounded, CullOutcome, CullStats, Viewport, ViewportCuller, DEFAULT_CULL_MARGIN};
pub use effects::{
    Contribution, CurrentTransform, Easing, Effect, EffectKind, EffectKindCounts, EffectTimer,
    ExpiredEffect, FadeType, FilterType, Lifetime, ShakeType, TransformComposer,
};
pub use pipeline::{
    render_post_pass, render_pre_pass, BlendMode, CommandBuffer, DrawCommand, FilterChain,
    RenderStatKind, RenderStats, RenderSurface, SurfaceError, TransformUniforms,
};
