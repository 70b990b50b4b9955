//! Rendering statistics.

use serde::Serialize;

/// Counter an external renderer can report into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatKind {
    /// Draw calls issued by content renderers.
    DrawCalls,
    /// Spatial items drawn.
    SpatialDrawn,
    /// Full-surface overlays drawn.
    Overlays,
}

/// Statistics from a render frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RenderStats {
    /// Context calls issued by the hooks.
    pub commands: u32,
    /// Completed pre-passes.
    pub pre_passes: u32,
    /// Completed post-passes.
    pub post_passes: u32,
    /// Flash/tint fills.
    pub overlays_drawn: u32,
    /// Non-neutral filter chains applied.
    pub filters_applied: u32,
    /// Draw calls reported by content renderers.
    pub draw_calls: u32,
    /// Spatial items reported drawn.
    pub spatial_drawn: u32,
    /// Surface errors caught at the render boundary.
    pub surface_errors: u32,
    /// Frame time in milliseconds.
    pub frame_time_ms: f32,
}

impl RenderStats {
    /// Adds `count` to one counter.
    pub fn record(&mut self, kind: RenderStatKind, count: u32) {
        let slot = match kind {
            RenderStatKind::DrawCalls => &mut self.draw_calls,
            RenderStatKind::SpatialDrawn => &mut self.spatial_drawn,
            RenderStatKind::Overlays => &mut self.overlays_drawn,
        };
        *slot = slot.saturating_add(count);
    }

    /// Returns FPS calculated from frame time.
    #[must_use]
    pub fn fps(&self) -> f32 {
        if self.frame_time_ms > 0.0 {
            1000.0 / self.frame_time_ms
        } else {
            0.0
        }
    }

    /// Returns true if meeting `target_fps`.
    #[must_use]
    pub fn meets_target(&self, target_fps: f32) -> bool {
        self.fps() >= target_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        let stats = RenderStats {
            frame_time_ms: 20.0,
            ..RenderStats::default()
        };
        assert!((stats.fps() - 50.0).abs() < 1e-4);
        assert!(stats.meets_target(45.0));
        assert!(!stats.meets_target(60.0));
    }

    #[test]
    fn test_record_saturates() {
        let mut stats = RenderStats::default();
        stats.record(RenderStatKind::DrawCalls, u32::MAX);
        stats.record(RenderStatKind::DrawCalls, 5);
        assert_eq!(stats.draw_calls, u32::MAX);
    }
}
