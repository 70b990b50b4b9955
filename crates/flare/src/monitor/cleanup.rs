//! Cleanup queue for tracked spatial content.
//!
//! Every tracked entry may hold a scratch buffer from its category's pool.
//! Entries leave when they are marked (their effect ended or was cancelled)
//! or when they outlive the TTL; the buffer goes back to its pool and the
//! caller gets the id back to decrement its counters. Persistent content
//! is exempt from the TTL and leaves only when marked. An aggressive sweep
//! reclaims decorative content early and never touches anything above it.

use flare_core::{EffectCategory, EffectId, PoolAllocator, PoolHandle, Priority, Vec2};

/// Per-effect scratch storage (trail points, sub-particle offsets).
pub type ScratchBuffer = Vec<Vec2>;

/// Why an entry left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// Explicitly marked.
    Marked,
    /// Older than the TTL.
    Expired,
    /// Decorative and older than half the TTL during an aggressive sweep.
    Swept,
}

/// An entry drained by [`CleanupQueue::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasedResource {
    /// Effect the entry belonged to.
    pub id: EffectId,
    /// Counter to decrement.
    pub category: EffectCategory,
    /// Why it was released.
    pub reason: ReleaseReason,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    id: EffectId,
    category: EffectCategory,
    priority: Priority,
    created_ms: f64,
    handle: Option<PoolHandle>,
    marked: bool,
    ttl_exempt: bool,
}

/// Pool occupancy for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PoolUsage {
    /// Category the pool serves.
    pub category: EffectCategory,
    /// Buffers handed out.
    pub acquired: usize,
    /// Pool size.
    pub capacity: usize,
    /// Acquire attempts that found the pool empty.
    pub exhausted: u64,
}

/// TTL and mark-based reclamation of tracked content.
pub struct CleanupQueue {
    ttl_ms: f64,
    tracked: Vec<Tracked>,
    pools: [PoolAllocator<ScratchBuffer>; 4],
    sweep_requested: bool,
    released_total: u64,
}

const fn pool_index(category: EffectCategory) -> usize {
    match category {
        EffectCategory::Particle => 0,
        EffectCategory::Effect => 1,
        EffectCategory::ScreenEffect => 2,
        EffectCategory::BackgroundParticle => 3,
    }
}

impl CleanupQueue {
    /// Creates a queue with `pool_capacity` scratch buffers per category.
    #[must_use]
    pub fn new(ttl_ms: f64, pool_capacity: usize) -> Self {
        Self {
            ttl_ms,
            tracked: Vec::with_capacity(pool_capacity),
            pools: std::array::from_fn(|_| PoolAllocator::new(pool_capacity)),
            sweep_requested: false,
            released_total: 0,
        }
    }

    /// Changes the TTL for entries checked from now on.
    pub fn set_ttl(&mut self, ttl_ms: f64) {
        self.ttl_ms = ttl_ms;
    }

    /// Starts tracking `id`.
    ///
    /// Returns false if the category pool is exhausted; the entry is still
    /// tracked, just without a scratch buffer.
    pub fn track(&mut self, id: EffectId, category: EffectCategory, priority: Priority, now_ms: f64) -> bool {
        self.insert(id, category, priority, now_ms, false)
    }

    /// Starts tracking content that lives until marked.
    pub fn track_persistent(
        &mut self,
        id: EffectId,
        category: EffectCategory,
        priority: Priority,
        now_ms: f64,
    ) -> bool {
        self.insert(id, category, priority, now_ms, true)
    }

    fn insert(
        &mut self,
        id: EffectId,
        category: EffectCategory,
        priority: Priority,
        now_ms: f64,
        ttl_exempt: bool,
    ) -> bool {
        let handle = self.pools[pool_index(category)].acquire();
        if handle.is_none() {
            tracing::debug!("{:?} scratch pool exhausted, tracking {} without buffer", category, id);
        }
        self.tracked.push(Tracked {
            id,
            category,
            priority,
            created_ms: now_ms,
            handle,
            marked: false,
            ttl_exempt,
        });
        handle.is_some()
    }

    /// Marks an entry for release on the next update.
    pub fn mark(&mut self, id: EffectId) -> bool {
        match self.tracked.iter_mut().find(|t| t.id == id) {
            Some(entry) => {
                entry.marked = true;
                true
            }
            None => false,
        }
    }

    /// Scratch buffer of a tracked entry.
    pub fn scratch_mut(&mut self, id: EffectId) -> Option<&mut ScratchBuffer> {
        let entry = self.tracked.iter().find(|t| t.id == id)?;
        let handle = entry.handle?;
        self.pools[pool_index(entry.category)].get_mut(handle)
    }

    /// Makes the next update also evict decorative entries older than half the TTL.
    pub fn request_sweep(&mut self) {
        self.sweep_requested = true;
    }

    /// Returns true if an aggressive sweep is pending.
    #[must_use]
    pub const fn sweep_pending(&self) -> bool {
        self.sweep_requested
    }

    /// Drains marked and expired entries, returning their buffers.
    pub fn update(&mut self, now_ms: f64) -> Vec<ReleasedResource> {
        let sweep = std::mem::take(&mut self.sweep_requested);
        let ttl = self.ttl_ms;
        let mut released = Vec::new();
        let pools = &mut self.pools;

        self.tracked.retain(|entry| {
            let age = now_ms - entry.created_ms;
            let reason = if entry.marked {
                ReleaseReason::Marked
            } else if entry.ttl_exempt {
                return true;
            } else if age >= ttl {
                ReleaseReason::Expired
            } else if sweep && entry.priority == Priority::Decorative && age >= ttl * 0.5 {
                ReleaseReason::Swept
            } else {
                return true;
            };
            if let Some(handle) = entry.handle {
                pools[pool_index(entry.category)].release(handle);
            }
            released.push(ReleasedResource {
                id: entry.id,
                category: entry.category,
                reason,
            });
            false
        });

        if sweep {
            tracing::info!("aggressive cleanup released {} entries", released.len());
        }
        self.released_total += released.len() as u64;
        released
    }

    /// Drops every entry, returning all buffers.
    pub fn clear(&mut self) -> Vec<ReleasedResource> {
        for pool in &mut self.pools {
            pool.release_all();
        }
        let released: Vec<ReleasedResource> = self
            .tracked
            .drain(..)
            .map(|entry| ReleasedResource {
                id: entry.id,
                category: entry.category,
                reason: ReleaseReason::Marked,
            })
            .collect();
        self.released_total += released.len() as u64;
        released
    }

    /// Entries currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Entries released since creation.
    #[must_use]
    pub const fn released_total(&self) -> u64 {
        self.released_total
    }

    /// Occupancy of every category pool.
    #[must_use]
    pub fn pool_usage(&self) -> Vec<PoolUsage> {
        EffectCategory::ALL
            .iter()
            .map(|&category| {
                let pool = &self.pools[pool_index(category)];
                PoolUsage {
                    category,
                    acquired: pool.acquired_count(),
                    capacity: pool.capacity(),
                    exhausted: pool.exhausted_count(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_entries_release_buffers() {
        let mut queue = CleanupQueue::new(10_000.0, 4);
        assert!(queue.track(EffectId(1), EffectCategory::Particle, Priority::Normal, 0.0));
        queue.scratch_mut(EffectId(1)).unwrap().push(Vec2::new(1.0, 2.0));
        assert!(queue.mark(EffectId(1)));
        let released = queue.update(16.0);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].reason, ReleaseReason::Marked);
        assert!(queue.is_empty());
        assert_eq!(queue.pool_usage()[0].acquired, 0);
        // The next owner gets a reset buffer.
        queue.track(EffectId(2), EffectCategory::Particle, Priority::Normal, 20.0);
        assert!(queue.scratch_mut(EffectId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_ttl_expiry() {
        let mut queue = CleanupQueue::new(10_000.0, 4);
        queue.track(EffectId(1), EffectCategory::Effect, Priority::Normal, 0.0);
        queue.track(EffectId(2), EffectCategory::Effect, Priority::Normal, 5_000.0);
        let released = queue.update(10_000.0);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].id, EffectId(1));
        assert_eq!(released[0].reason, ReleaseReason::Expired);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_aggressive_sweep_uses_half_ttl() {
        let mut queue = CleanupQueue::new(10_000.0, 4);
        queue.track(EffectId(1), EffectCategory::Effect, Priority::Decorative, 0.0);
        queue.track(EffectId(2), EffectCategory::Effect, Priority::Decorative, 4_000.0);
        queue.request_sweep();
        let released = queue.update(6_000.0);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].id, EffectId(1));
        assert_eq!(released[0].reason, ReleaseReason::Swept);
        assert!(!queue.sweep_pending());
    }

    #[test]
    fn test_sweep_spares_non_decorative_entries() {
        let mut queue = CleanupQueue::new(10_000.0, 4);
        queue.track(EffectId(1), EffectCategory::Particle, Priority::Critical, 0.0);
        queue.track(EffectId(2), EffectCategory::Particle, Priority::Normal, 0.0);
        queue.track(EffectId(3), EffectCategory::Particle, Priority::Decorative, 0.0);
        queue.request_sweep();
        let released = queue.update(9_000.0);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].id, EffectId(3));
        assert_eq!(queue.len(), 2);

        // The TTL still applies to everyone.
        assert_eq!(queue.update(10_000.0).len(), 2);
    }

    #[test]
    fn test_persistent_entries_ignore_ttl() {
        let mut queue = CleanupQueue::new(10_000.0, 4);
        queue.track_persistent(EffectId(1), EffectCategory::BackgroundParticle, Priority::Decorative, 0.0);
        queue.request_sweep();
        assert!(queue.update(60_000.0).is_empty());
        queue.mark(EffectId(1));
        assert_eq!(queue.update(60_016.0).len(), 1);
    }

    #[test]
    fn test_exhausted_pool_still_tracks() {
        let mut queue = CleanupQueue::new(10_000.0, 1);
        assert!(queue.track(EffectId(1), EffectCategory::Particle, Priority::Normal, 0.0));
        assert!(!queue.track(EffectId(2), EffectCategory::Particle, Priority::Normal, 0.0));
        assert_eq!(queue.len(), 2);
        assert!(queue.scratch_mut(EffectId(2)).is_none());
        assert_eq!(queue.pool_usage()[0].exhausted, 1);
    }
}
