//! # Timing
//!
//! Everything time-related is driven by the frame loop's own monotonic
//! clock, never by wall-clock reads. That keeps a recorded sequence of
//! frame deltas replayable.

mod clock;
mod ring;
mod scheduler;

pub use clock::FrameClock;
pub use ring::SampleRing;
pub use scheduler::{DelayedTaskQueue, ScheduledTask};
