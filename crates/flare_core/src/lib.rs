//! # FLARE Core
//!
//! Primitives shared by the composition engine, the quality controller and
//! the performance monitor:
//! - Colour / rectangle / vector math
//! - Effect identifiers, priorities and budget categories
//! - Fixed-capacity sample rings
//! - A deterministic delayed-task queue driven by the frame clock
//! - Pre-allocated pools for poolable effect resources
//!
//! ## Architecture Rules
//!
//! 1. **Single writer** - every structure here is owned by the frame tick
//! 2. **No wall clock** - time is whatever the frame loop says it is
//! 3. **Pre-allocated** - rings and pools never grow after construction

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod math;
pub mod memory;
pub mod timing;
pub mod types;

pub use math::{Color4, Rect, Vec2};
pub use memory::{PoolAllocator, PoolHandle, Poolable};
pub use timing::{DelayedTaskQueue, FrameClock, SampleRing, ScheduledTask};
pub use types::{EffectCategory, EffectId, Priority};
