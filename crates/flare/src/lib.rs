//! # FLARE
//!
//! Adaptive full-surface effects for a 2D frame loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           EffectManager                             │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │ flare_rendering │   │ flare_quality   │   │ monitor         │   │
//! │  │                 │   │                 │   │                 │   │
//! │  │ • Composer      │   │ • Levels        │   │ • Frame meter   │   │
//! │  │ • Culling       │<──│ • Budget        │──>│ • Cleanup queue │   │
//! │  │ • Render hooks  │   │ • Hysteresis    │   │ • Memory watch  │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │           │                     ▲                     │            │
//! │           ▼                     └──── fps / memory ───┘            │
//! │    CurrentTransform ──> SharedTransform (renderer threads)         │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//!          ▲
//!          └── EffectCommand channel (gameplay / input threads)
//! ```
//!
//! ## Modules
//!
//! - `manager`: the per-frame orchestrator
//! - `monitor`: frame rate, culling, cleanup and memory watch
//! - `presets`: composite effects scheduled on the delayed-task queue
//! - `config`: the TOML configuration snapshot

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod commands;
pub mod config;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod options;
pub mod presets;
pub mod shared;
pub mod spatial;
pub mod stats;

// Re-export the layers
pub use flare_core as core;
pub use flare_quality as quality;
pub use flare_rendering as rendering;

// Re-export commonly used types
pub use commands::{command_channel, CommandReceiver, CommandSender, EffectCommand};
pub use config::{FlareConfig, MonitorConfig, QualityConfig, ScreenConfig};
pub use error::{FlareError, FlareResult};
pub use manager::{EffectManager, FrameReport};
pub use monitor::{MemoryVerdict, PerformanceMonitor};
pub use options::{EffectOptions, EffectRequest, NamedEffectOptions};
pub use presets::{Preset, PresetStep};
pub use shared::{PublishedTransform, SharedTransform};
pub use spatial::{SpatialEffect, SpatialFrame};
pub use stats::{DebugInfo, EffectDebug, FallbackMode, PerformanceStats};
