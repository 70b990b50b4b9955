//! # Performance Monitor
//!
//! Per-frame telemetry and housekeeping around the composer:
//!
//! - `FrameRateMeter` - smoothed fps from frame start timestamps
//! - `ViewportCuller` - margin tightened by the current quality level
//! - `CleanupQueue` - TTL/mark reclamation of pooled scratch buffers
//! - `MemoryWatch` - coarse high-water / critical checks

mod cleanup;
mod frame_rate;
mod memory;

pub use cleanup::{CleanupQueue, PoolUsage, ReleaseReason, ReleasedResource, ScratchBuffer};
pub use frame_rate::FrameRateMeter;
pub use memory::{MemoryThresholds, MemoryVerdict, MemoryWatch};

use flare_core::{EffectCategory, EffectId, Priority};
use flare_quality::QualityLevel;
use flare_rendering::{Bounded, CullStats, RenderStatKind, RenderStats, Viewport, ViewportCuller};

use crate::config::MonitorConfig;

fn thresholds(config: &MonitorConfig) -> MemoryThresholds {
    MemoryThresholds {
        interval_ms: config.memory_check_interval_ms,
        high_water_bytes: config.memory_high_water_bytes,
        critical_bytes: config.memory_critical_bytes,
        critical_fps: config.memory_critical_fps,
    }
}

/// Frame timing, culling, cleanup and memory watch.
pub struct PerformanceMonitor {
    config: MonitorConfig,
    frame_rate: FrameRateMeter,
    cleanup: CleanupQueue,
    memory: MemoryWatch,
    culler: ViewportCuller,
    /// Stats for the frame in progress.
    render_stats: RenderStats,
    /// Stats of the last completed frame.
    last_render_stats: RenderStats,
    last_frame_start_ms: Option<f64>,
    frames: u64,
}

impl PerformanceMonitor {
    /// Creates a monitor from a settings snapshot.
    #[must_use]
    pub fn new(config: &MonitorConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            frame_rate: FrameRateMeter::new(config.frame_sample_capacity),
            cleanup: CleanupQueue::new(config.cleanup_ttl_ms, config.pool_capacity),
            memory: MemoryWatch::new(thresholds(&config), config.memory_sample_capacity),
            culler: ViewportCuller::new(),
            render_stats: RenderStats::default(),
            last_render_stats: RenderStats::default(),
            last_frame_start_ms: None,
            frames: 0,
            config,
        }
    }

    /// Re-applies settings. Sample windows and pools are kept.
    pub fn apply_configuration(&mut self, config: &MonitorConfig) {
        self.cleanup.set_ttl(config.cleanup_ttl_ms);
        self.memory.set_thresholds(thresholds(config));
        self.config = config.clone();
    }

    /// Marks the start of a frame.
    pub fn start_frame(&mut self, now_ms: f64) {
        self.frame_rate.start_frame(now_ms);
        self.last_render_stats = self.render_stats;
        #[allow(clippy::cast_possible_truncation)]
        let frame_time_ms = self.last_frame_start_ms.map_or(0.0, |last| (now_ms - last) as f32);
        self.render_stats = RenderStats {
            frame_time_ms,
            ..RenderStats::default()
        };
        self.last_frame_start_ms = Some(now_ms);
        self.frames += 1;
    }

    /// Adds to a render counter for the current frame.
    pub fn record_render_stat(&mut self, kind: RenderStatKind, count: u32) {
        self.render_stats.record(kind, count);
    }

    /// Stats for the frame in progress.
    pub fn render_stats_mut(&mut self) -> &mut RenderStats {
        &mut self.render_stats
    }

    /// Stats of the last completed frame.
    #[must_use]
    pub const fn last_render_stats(&self) -> RenderStats {
        self.last_render_stats
    }

    /// Cull margin for `level`: the configured margin, capped per level.
    #[must_use]
    pub fn cull_margin(&self, level: QualityLevel) -> f32 {
        self.config.cull_margin.min(level.params().cull_margin_cap).max(0.0)
    }

    /// Visible subset of `items` at the margin `level` allows.
    pub fn cull<'a, T: Bounded>(&mut self, items: &'a [T], viewport: &Viewport, level: QualityLevel) -> Vec<&'a T> {
        let viewport = viewport.with_margin(self.cull_margin(level));
        self.culler.cull(items, &viewport)
    }

    /// Statistics from the last cull.
    #[must_use]
    pub const fn cull_stats(&self) -> CullStats {
        self.culler.stats()
    }

    /// Mutable access to the cleanup queue.
    pub fn cleanup_mut(&mut self) -> &mut CleanupQueue {
        &mut self.cleanup
    }

    /// The cleanup queue.
    #[must_use]
    pub const fn cleanup(&self) -> &CleanupQueue {
        &self.cleanup
    }

    /// Starts tracking spatial content for cleanup.
    pub fn track(&mut self, id: EffectId, category: EffectCategory, priority: Priority, now_ms: f64) -> bool {
        self.cleanup.track(id, category, priority, now_ms)
    }

    /// Starts tracking spatial content that only leaves when marked.
    pub fn track_persistent(
        &mut self,
        id: EffectId,
        category: EffectCategory,
        priority: Priority,
        now_ms: f64,
    ) -> bool {
        self.cleanup.track_persistent(id, category, priority, now_ms)
    }

    /// Queues content for release on the next update.
    pub fn mark_for_cleanup(&mut self, id: EffectId) -> bool {
        self.cleanup.mark(id)
    }

    /// Runs the memory watch. A high-water crossing schedules a sweep.
    pub fn check_memory(&mut self, now_ms: f64, memory_bytes: Option<u64>) -> MemoryVerdict {
        let fps = self.frame_rate.smoothed_fps();
        let verdict = self.memory.check(now_ms, memory_bytes, fps);
        if matches!(verdict, MemoryVerdict::HighWater | MemoryVerdict::Critical) {
            self.cleanup.request_sweep();
        }
        verdict
    }

    /// Requests an aggressive sweep on the next update.
    pub fn request_aggressive_cleanup(&mut self) {
        self.cleanup.request_sweep();
    }

    /// Drains the cleanup queue.
    pub fn update(&mut self, now_ms: f64) -> Vec<ReleasedResource> {
        self.cleanup.update(now_ms)
    }

    /// Smoothed frame rate.
    #[must_use]
    pub fn smoothed_fps(&self) -> Option<f64> {
        self.frame_rate.smoothed_fps()
    }

    /// Rate between the last two frames.
    #[must_use]
    pub fn instantaneous_fps(&self) -> Option<f64> {
        self.frame_rate.instantaneous_fps()
    }

    /// Frame start timestamps, oldest first.
    #[must_use]
    pub fn frame_timestamps(&self) -> Vec<f64> {
        self.frame_rate.timestamps()
    }

    /// The memory watch.
    #[must_use]
    pub const fn memory(&self) -> &MemoryWatch {
        &self.memory
    }

    /// Frames started.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_core::Rect;

    #[test]
    fn test_margin_tightens_with_level() {
        let monitor = PerformanceMonitor::new(&MonitorConfig::default());
        assert!((monitor.cull_margin(QualityLevel::Ultra) - 50.0).abs() < 1e-6);
        assert!((monitor.cull_margin(QualityLevel::Medium) - 35.0).abs() < 1e-6);
        assert!((monitor.cull_margin(QualityLevel::Low) - 20.0).abs() < 1e-6);

        let tight = PerformanceMonitor::new(&MonitorConfig {
            cull_margin: 10.0,
            ..MonitorConfig::default()
        });
        assert!((tight.cull_margin(QualityLevel::High) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_quality_culls_more() {
        let mut monitor = PerformanceMonitor::new(&MonitorConfig::default());
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let items = [Rect::new(-40.0, 0.0, 5.0, 5.0), Rect::new(10.0, 10.0, 5.0, 5.0)];
        assert_eq!(monitor.cull(&items, &viewport, QualityLevel::High).len(), 2);
        assert_eq!(monitor.cull(&items, &viewport, QualityLevel::Low).len(), 1);
        assert_eq!(monitor.cull_stats().culled, 1);
    }

    #[test]
    fn test_frame_stats_roll_over() {
        let mut monitor = PerformanceMonitor::new(&MonitorConfig::default());
        monitor.start_frame(0.0);
        monitor.record_render_stat(RenderStatKind::DrawCalls, 12);
        monitor.start_frame(20.0);
        assert_eq!(monitor.last_render_stats().draw_calls, 12);
        assert!((monitor.render_stats_mut().frame_time_ms - 20.0).abs() < 1e-6);
        assert!((monitor.smoothed_fps().unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_high_water_schedules_sweep() {
        let mut monitor = PerformanceMonitor::new(&MonitorConfig::default());
        let verdict = monitor.check_memory(0.0, Some(100 * 1024 * 1024));
        assert_eq!(verdict, MemoryVerdict::HighWater);
        assert!(monitor.cleanup().sweep_pending());
        monitor.update(16.0);

        let verdict = monitor.check_memory(2000.0, Some(100 * 1024 * 1024));
        assert_eq!(verdict, MemoryVerdict::Elevated);
        assert!(!monitor.cleanup().sweep_pending());
    }
}
