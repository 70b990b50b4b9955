//! The adaptive quality control loop.
//!
//! ```text
//! observe(t, fps, mem)
//!   ├─ fps < emergency_fps ───────────────► force Low (no cooldown)
//!   ├─ t - last_sample < sampling interval ► Unchanged
//!   ├─ append sample, t - last_adjust < cooldown ► Unchanged
//!   ├─ mean < target × 0.8 ────────────────► one step down
//!   └─ ring full ∧ all > target × 1.05
//!        ∧ mean > target × 1.1 ────────────► one step up
//! ```

use flare_core::{EffectCategory, Priority, SampleRing};
use serde::Serialize;

use crate::budget::{ActiveEffectCounts, EffectBudget};
use crate::config::QualityConfig;
use crate::level::{QualityLevel, QualityParams};

/// One telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceSample {
    /// Frame-loop time (ms).
    pub timestamp_ms: f64,
    /// Frames per second.
    pub frame_rate: f64,
    /// Process memory, when the host can measure it.
    pub memory_bytes: Option<u64>,
}

/// Outcome of one `observe` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityDecision {
    /// Level kept.
    Unchanged,
    /// Stepped down one level.
    Downgraded {
        /// Previous level.
        from: QualityLevel,
        /// New level.
        to: QualityLevel,
    },
    /// Stepped up one level.
    Upgraded {
        /// Previous level.
        from: QualityLevel,
        /// New level.
        to: QualityLevel,
    },
    /// Forced to `Low`. Decorative effects should be purged and memory reclaimed.
    Emergency {
        /// Level before the emergency.
        from: QualityLevel,
    },
}

impl QualityDecision {
    /// Returns true if the level changed (or an emergency fired).
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Owns the quality level, the sample window and the admission budget.
pub struct QualityController {
    config: QualityConfig,
    level: QualityLevel,
    budget: EffectBudget,
    counts: ActiveEffectCounts,
    samples: SampleRing<PerformanceSample>,
    /// Latest timestamp seen by `observe`.
    now_ms: f64,
    last_sample_ms: Option<f64>,
    last_adjust_ms: Option<f64>,
    adjustments: u32,
    emergencies: u32,
}

impl QualityController {
    /// Creates a controller at `config.level`.
    #[must_use]
    pub fn new(config: QualityConfig) -> Self {
        let level = config.level;
        Self {
            samples: SampleRing::new(config.sample_capacity),
            budget: EffectBudget::from_params(&level.params()),
            counts: ActiveEffectCounts::default(),
            level,
            config,
            now_ms: 0.0,
            last_sample_ms: None,
            last_adjust_ms: None,
            adjustments: 0,
            emergencies: 0,
        }
    }

    /// Replaces the settings.
    ///
    /// A different configured level is applied as a manual override; the
    /// sample window is rebuilt if its capacity changed.
    pub fn apply_configuration(&mut self, config: QualityConfig) {
        if config.sample_capacity.max(1) != self.samples.capacity() {
            self.samples = SampleRing::new(config.sample_capacity);
        }
        let level = config.level;
        let previous = self.config.level;
        self.config = config;
        if level != previous && level != self.level {
            self.set_level(level);
        }
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Sets the level explicitly. Starts the cooldown.
    pub fn set_level(&mut self, level: QualityLevel) {
        if level == self.level {
            return;
        }
        tracing::info!("quality level set {} -> {}", self.level, level);
        self.change_level(level);
    }

    /// Current level.
    #[inline]
    #[must_use]
    pub const fn current_level(&self) -> QualityLevel {
        self.level
    }

    /// Parameter record of the current level.
    #[must_use]
    pub const fn params(&self) -> QualityParams {
        self.level.params()
    }

    /// Current admission budget.
    #[inline]
    #[must_use]
    pub const fn current_budget(&self) -> EffectBudget {
        self.budget
    }

    /// Live occupancy counters.
    #[inline]
    #[must_use]
    pub const fn counts(&self) -> ActiveEffectCounts {
        self.counts
    }

    /// Counts one admitted effect.
    pub fn record_created(&mut self, category: EffectCategory) {
        self.counts.increment(category);
    }

    /// Counts one removed effect.
    pub fn record_removed(&mut self, category: EffectCategory) {
        self.counts.decrement(category);
    }

    /// Admission check.
    ///
    /// `Critical` and `Important` requests are always admitted; the rest only
    /// while the category is strictly below its budget.
    #[must_use]
    pub fn can_admit(&self, category: EffectCategory, priority: Priority) -> bool {
        priority.bypasses_budget() || self.counts.get(category) < self.budget.limit(category)
    }

    /// Feeds one telemetry sample and runs the decision loop.
    pub fn observe(&mut self, timestamp_ms: f64, frame_rate: f64, memory_bytes: Option<u64>) -> QualityDecision {
        if !frame_rate.is_finite() || frame_rate < 0.0 {
            tracing::debug!("ignoring frame rate sample {}", frame_rate);
            return QualityDecision::Unchanged;
        }
        self.now_ms = self.now_ms.max(timestamp_ms);

        if frame_rate < self.config.emergency_fps {
            return self.emergency(frame_rate);
        }

        if let Some(last) = self.last_sample_ms {
            if timestamp_ms - last < self.config.sampling_interval_ms {
                return QualityDecision::Unchanged;
            }
        }
        self.samples.push(PerformanceSample {
            timestamp_ms,
            frame_rate,
            memory_bytes,
        });
        self.last_sample_ms = Some(timestamp_ms);

        if !self.config.auto_adjust || self.in_cooldown(timestamp_ms) {
            return QualityDecision::Unchanged;
        }
        self.decide()
    }

    /// Forces the emergency path: level to `Low`, cooldown bypassed.
    pub fn trigger_emergency(&mut self, reason: &str) -> QualityDecision {
        tracing::warn!("quality emergency: {}", reason);
        let from = self.level;
        self.emergencies += 1;
        if self.level == QualityLevel::Low {
            self.last_adjust_ms = Some(self.now_ms);
        } else {
            self.change_level(QualityLevel::Low);
        }
        QualityDecision::Emergency { from }
    }

    fn emergency(&mut self, frame_rate: f64) -> QualityDecision {
        let reason = format!("frame rate {frame_rate:.1} below {:.1}", self.config.emergency_fps);
        self.trigger_emergency(&reason)
    }

    fn in_cooldown(&self, now_ms: f64) -> bool {
        self.last_adjust_ms
            .is_some_and(|last| now_ms - last < self.config.adjustment_cooldown_ms)
    }

    fn decide(&mut self) -> QualityDecision {
        let Some(mean) = self.mean_frame_rate() else {
            return QualityDecision::Unchanged;
        };
        let target = self.level.params().frame_rate_target;
        let from = self.level;

        if mean < target * self.config.downgrade_ratio && from != QualityLevel::Low {
            let to = from.step_down();
            tracing::info!("quality downgrade {} -> {} (mean {:.1} fps, target {:.0})", from, to, mean, target);
            self.change_level(to);
            return QualityDecision::Downgraded { from, to };
        }

        let floor = target * self.config.upgrade_sample_ratio;
        let steady = self.samples.is_full() && self.samples.iter().all(|s| s.frame_rate > floor);
        if steady && mean > target * self.config.upgrade_mean_ratio && from != QualityLevel::Ultra {
            let to = from.step_up();
            tracing::info!("quality upgrade {} -> {} (mean {:.1} fps, target {:.0})", from, to, mean, target);
            self.change_level(to);
            return QualityDecision::Upgraded { from, to };
        }

        QualityDecision::Unchanged
    }

    fn change_level(&mut self, level: QualityLevel) {
        self.level = level;
        self.budget = EffectBudget::from_params(&level.params());
        self.last_adjust_ms = Some(self.now_ms);
        self.samples.clear();
        self.last_sample_ms = None;
        self.adjustments += 1;
    }

    /// Mean frame rate over the window.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_frame_rate(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.frame_rate).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Mean memory over the samples that carried a reading.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_memory_bytes(&self) -> Option<f64> {
        let (sum, n) = self
            .samples
            .iter()
            .filter_map(|s| s.memory_bytes)
            .fold((0.0_f64, 0_u32), |(sum, n), m| (sum + m as f64, n + 1));
        (n > 0).then(|| sum / f64::from(n))
    }

    /// Samples in the window, oldest first.
    #[must_use]
    pub fn samples(&self) -> Vec<PerformanceSample> {
        self.samples.to_vec()
    }

    /// Level changes so far (manual, automatic and emergency).
    #[must_use]
    pub const fn adjustments(&self) -> u32 {
        self.adjustments
    }

    /// Emergency activations so far.
    #[must_use]
    pub const fn emergencies(&self) -> u32 {
        self.emergencies
    }

    /// Time of the last level change.
    #[must_use]
    pub const fn last_adjust_ms(&self) -> Option<f64> {
        self.last_adjust_ms
    }
}

impl Default for QualityController {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}
