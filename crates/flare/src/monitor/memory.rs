//! Coarse-interval memory watch.

use flare_core::SampleRing;

/// What a memory check concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryVerdict {
    /// Not due yet, or no reading available.
    Skipped,
    /// Below the high-water mark.
    Normal,
    /// Crossed the high-water mark since the last check: warn and sweep.
    HighWater,
    /// Still above the high-water mark from an earlier check.
    Elevated,
    /// Above the critical mark while the frame rate is also failing.
    Critical,
}

/// Thresholds for [`MemoryWatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryThresholds {
    /// Spacing between checks (ms).
    pub interval_ms: f64,
    /// Warning threshold.
    pub high_water_bytes: u64,
    /// Emergency threshold (combined with `critical_fps`).
    pub critical_bytes: u64,
    /// Frame rate under which critical memory is an emergency.
    pub critical_fps: f64,
}

/// Samples memory at most once per interval and classifies it.
#[derive(Debug, Clone)]
pub struct MemoryWatch {
    thresholds: MemoryThresholds,
    samples: SampleRing<u64>,
    last_check_ms: Option<f64>,
    high_water_crossings: u32,
    above_high_water: bool,
}

impl MemoryWatch {
    /// Creates a watch keeping `capacity` samples.
    #[must_use]
    pub fn new(thresholds: MemoryThresholds, capacity: usize) -> Self {
        Self {
            thresholds,
            samples: SampleRing::new(capacity),
            last_check_ms: None,
            high_water_crossings: 0,
            above_high_water: false,
        }
    }

    /// Replaces the thresholds.
    pub fn set_thresholds(&mut self, thresholds: MemoryThresholds) {
        self.thresholds = thresholds;
    }

    /// Checks memory if the interval has passed.
    pub fn check(&mut self, now_ms: f64, memory_bytes: Option<u64>, fps: Option<f64>) -> MemoryVerdict {
        let Some(bytes) = memory_bytes else {
            return MemoryVerdict::Skipped;
        };
        if let Some(last) = self.last_check_ms {
            if now_ms - last < self.thresholds.interval_ms {
                return MemoryVerdict::Skipped;
            }
        }
        self.last_check_ms = Some(now_ms);
        self.samples.push(bytes);

        let failing = fps.is_some_and(|fps| fps < self.thresholds.critical_fps);
        let was_above = std::mem::replace(&mut self.above_high_water, bytes >= self.thresholds.high_water_bytes);
        if bytes >= self.thresholds.critical_bytes && failing {
            tracing::error!(
                "memory critical: {} MB at {:.1} fps",
                bytes / (1024 * 1024),
                fps.unwrap_or_default()
            );
            MemoryVerdict::Critical
        } else if self.above_high_water && was_above {
            MemoryVerdict::Elevated
        } else if self.above_high_water {
            self.high_water_crossings += 1;
            tracing::warn!(
                "memory above high-water mark: {} MB (limit {} MB)",
                bytes / (1024 * 1024),
                self.thresholds.high_water_bytes / (1024 * 1024)
            );
            MemoryVerdict::HighWater
        } else {
            MemoryVerdict::Normal
        }
    }

    /// Mean over the retained samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_bytes(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|b| b as f64).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Retained samples, oldest first.
    #[must_use]
    pub fn samples(&self) -> Vec<u64> {
        self.samples.to_vec()
    }

    /// How many times memory rose above the high-water mark.
    #[must_use]
    pub const fn high_water_crossings(&self) -> u32 {
        self.high_water_crossings
    }
}
