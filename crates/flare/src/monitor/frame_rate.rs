//! Frame-rate measurement from frame start timestamps.

use flare_core::SampleRing;

/// Smooths frame rate over the last few frame starts.
///
/// Each consecutive pair of timestamps gives `1000 / Δt`; the reported rate
/// is the mean of those, which absorbs single-frame spikes.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    starts: SampleRing<f64>,
}

impl FrameRateMeter {
    /// Creates a meter over `capacity` timestamps.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            starts: SampleRing::new(capacity.max(2)),
        }
    }

    /// Records a frame start.
    pub fn start_frame(&mut self, now_ms: f64) {
        self.starts.push(now_ms);
    }

    /// Rate between the last two frame starts.
    #[must_use]
    pub fn instantaneous_fps(&self) -> Option<f64> {
        let previous = self.starts.iter().nth(self.starts.len().checked_sub(2)?)?;
        rate(self.starts.latest()? - previous)
    }

    /// Mean rate over the window.
    #[must_use]
    pub fn smoothed_fps(&self) -> Option<f64> {
        let (sum, count) = self
            .starts
            .iter()
            .zip(self.starts.iter().skip(1))
            .filter_map(|(earlier, later)| rate(later - earlier))
            .fold((0.0, 0_u32), |(sum, count), fps| (sum + fps, count + 1));
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Frame start timestamps, oldest first.
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        self.starts.to_vec()
    }

    /// Forgets all timestamps.
    pub fn reset(&mut self) {
        self.starts.clear();
    }
}

fn rate(delta_ms: f64) -> Option<f64> {
    (delta_ms > 0.0).then(|| 1000.0 / delta_ms)
}
