//! # Telemetry
//!
//! Two in-process snapshots for dashboards:
//!
//! - [`PerformanceStats`] - aggregates: mean fps, mean memory, counters,
//!   level, budget
//! - [`DebugInfo`] - raw sample buffers and the live effect list
//!
//! Both are plain `Serialize` values; how they leave the process is the
//! host's business.

use flare_core::{EffectId, Priority};
use flare_quality::{ActiveEffectCounts, EffectBudget, PerformanceSample, QualityLevel};
use flare_rendering::{CullStats, CurrentTransform, EffectKindCounts, RenderStats};
use serde::Serialize;

use crate::monitor::PoolUsage;

/// Whether the manager is drawing normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Effects run and the render hooks draw.
    #[default]
    Normal,
    /// The surface failed: effects are off and the hooks do nothing.
    Minimal,
}

/// Aggregate performance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceStats {
    /// Frames ticked.
    pub frame: u64,
    /// Smoothed frame rate from the frame meter.
    pub frame_rate: Option<f64>,
    /// Mean over the quality controller's sample window.
    pub mean_frame_rate: Option<f64>,
    /// Mean over the memory watch samples.
    pub mean_memory_bytes: Option<f64>,
    /// Render counters of the last completed frame.
    pub render: RenderStats,
    /// Result of the last cull.
    pub cull: CullStats,
    /// Current quality level.
    pub level: QualityLevel,
    /// Live occupancy per category.
    pub counts: ActiveEffectCounts,
    /// Admission ceilings per category.
    pub budget: EffectBudget,
    /// Live screen effects per kind.
    pub kinds: EffectKindCounts,
    /// Spatial effects currently tracked.
    pub spatial_effects: usize,
    /// Preset steps not yet due.
    pub pending_tasks: usize,
    /// Level changes so far.
    pub adjustments: u32,
    /// Emergency activations so far.
    pub emergencies: u32,
    /// Cleanup releases so far.
    pub released_total: u64,
    /// Master switch.
    pub enabled: bool,
    /// Render path in use.
    pub fallback: FallbackMode,
}

/// One live screen effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectDebug {
    /// Identifier.
    pub id: EffectId,
    /// Type tag.
    pub kind: &'static str,
    /// Linear progress.
    pub progress: f32,
    /// Admission priority.
    pub priority: Priority,
}

/// Raw buffers behind [`PerformanceStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    /// Frame start timestamps, oldest first.
    pub frame_timestamps: Vec<f64>,
    /// Quality controller sample window.
    pub quality_samples: Vec<PerformanceSample>,
    /// Memory watch samples (bytes).
    pub memory_samples: Vec<u64>,
    /// Scratch pool occupancy.
    pub pools: Vec<PoolUsage>,
    /// Live screen effects.
    pub effects: Vec<EffectDebug>,
    /// Aggregate transform.
    pub transform: CurrentTransform,
    /// Clock time of the next preset step.
    pub next_task_due_ms: Option<f64>,
}
