//! Axis-aligned viewport culling with a visibility margin.
//!
//! ```text
//!   ┌──────────── expanded (viewport + margin) ────────────┐
//!   │   InMargin                                            │
//!   │     ┌──────────── raw viewport ────────────┐          │
//!   │     │  OnScreen                             │          │
//!   │     └───────────────────────────────────────┘          │
//!   └───────────────────────────────────────────────────────┘
//!        Culled (everything outside the expanded rect)
//! ```

use flare_core::Rect;
use serde::Serialize;

/// Margin used when nothing tightens it.
pub const DEFAULT_CULL_MARGIN: f32 = 50.0;

/// Anything with an axis-aligned bounding box.
pub trait Bounded {
    /// Bounds in surface units.
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    #[inline]
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Visible surface region plus cull margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// The raw, unexpanded region.
    pub area: Rect,
    /// Extra distance on every side still treated as visible. Never negative.
    pub cull_margin: f32,
}

impl Viewport {
    /// Creates a viewport with the default margin.
    #[must_use]
    pub const fn new(area: Rect) -> Self {
        Self {
            area,
            cull_margin: DEFAULT_CULL_MARGIN,
        }
    }

    /// Returns a copy with a different margin (negative clamps to zero).
    #[must_use]
    pub fn with_margin(self, margin: f32) -> Self {
        Self {
            cull_margin: margin.max(0.0),
            ..self
        }
    }

    /// The rect an effect must touch to be visible.
    #[inline]
    #[must_use]
    pub fn expanded(&self) -> Rect {
        self.area.expand(self.cull_margin)
    }

    /// Classifies one bounding box.
    #[must_use]
    pub fn classify(&self, bounds: &Rect) -> CullOutcome {
        if bounds.intersects(&self.area) {
            CullOutcome::OnScreen
        } else if bounds.intersects(&self.expanded()) {
            CullOutcome::InMargin
        } else {
            CullOutcome::Culled
        }
    }
}

/// Result of classifying one bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullOutcome {
    /// Touches the raw viewport.
    OnScreen,
    /// Off-screen but inside the margin; still drawn.
    InMargin,
    /// Outside the expanded viewport; skipped.
    Culled,
}

impl CullOutcome {
    /// Returns true if the content should be drawn.
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Culled)
    }

    /// Returns true if the content misses the raw viewport.
    #[inline]
    #[must_use]
    pub const fn is_off_screen(self) -> bool {
        !matches!(self, Self::OnScreen)
    }
}

/// Culling statistics for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CullStats {
    /// Items drawn.
    pub visible: u32,
    /// Items skipped.
    pub culled: u32,
    /// Items missing the raw viewport (drawn or not).
    pub off_screen: u32,
}

impl CullStats {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: CullOutcome) {
        if outcome.is_visible() {
            self.visible += 1;
        } else {
            self.culled += 1;
        }
        if outcome.is_off_screen() {
            self.off_screen += 1;
        }
    }

    /// Items tested.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.visible + self.culled
    }

    /// Fraction of tested items that were culled.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cull_rate(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.culled as f32 / total as f32
        }
    }
}

/// Filters bounded content against a viewport.
#[derive(Debug, Default)]
pub struct ViewportCuller {
    /// Statistics from the last pass.
    stats: CullStats,
}

impl ViewportCuller {
    /// Creates a new culler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visible subset of `items`, preserving order.
    pub fn cull<'a, T: Bounded>(&mut self, items: &'a [T], viewport: &Viewport) -> Vec<&'a T> {
        self.cull_iter(items.iter(), viewport)
    }

    /// Same as [`Self::cull`] over any iterator of references.
    pub fn cull_iter<'a, T, I>(&mut self, items: I, viewport: &Viewport) -> Vec<&'a T>
    where
        T: Bounded + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut stats = CullStats::default();
        let visible = items
            .into_iter()
            .filter(|item| {
                let outcome = viewport.classify(&item.bounds());
                stats.record(outcome);
                outcome.is_visible()
            })
            .collect();
        self.stats = stats;
        visible
    }

    /// Statistics from the last pass.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> CullStats {
        self.stats
    }
}
