//! # Screen Effects
//!
//! This module provides:
//! - `Effect` - the tagged union of every screen effect kind
//! - `EffectTimer` / `Easing` - lifecycle and progress shaping
//! - `TransformComposer` - advances effects and reduces them per tick
//! - `CurrentTransform` - the aggregate the renderer reads

mod composer;
mod easing;
mod effect;
mod timer;
mod transform;

pub use composer::{ExpiredEffect, TransformComposer};
pub use easing::Easing;
pub use effect::{Effect, EffectKind, EffectKindCounts, FadeType, FilterType, ShakeType};
pub use timer::{EffectTimer, Lifetime};
pub use transform::{
    Contribution, CurrentTransform, OverlayAccumulator, TransformAccumulator, MIN_ZOOM,
};
