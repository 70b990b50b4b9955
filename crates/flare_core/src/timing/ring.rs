//! Fixed-capacity FIFO ring for telemetry samples.

/// Ring buffer that overwrites its oldest entry once full.
///
/// Storage is allocated once; `push` never allocates.
#[derive(Clone, Debug)]
pub struct SampleRing<T: Copy> {
    /// Backing storage, grows up to `capacity` then stays fixed.
    slots: Vec<T>,
    /// Index of the oldest sample once the ring is full.
    head: usize,
    /// Maximum number of samples retained.
    capacity: usize,
}

impl<T: Copy> SampleRing<T> {
    /// Creates an empty ring.
    ///
    /// A zero capacity is bumped to one so the ring always holds the latest
    /// sample.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest when full.
    ///
    /// # Returns
    ///
    /// The evicted sample, if any.
    pub fn push(&mut self, sample: T) -> Option<T> {
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], sample);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Number of samples held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no sample has been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true once `capacity` samples are held.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Maximum number of samples retained.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        if self.slots.is_empty() {
            None
        } else if self.is_full() {
            Some(self.slots[(self.head + self.capacity - 1) % self.capacity])
        } else {
            self.slots.last().copied()
        }
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Copies the samples out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}

impl SampleRing<f64> {
    /// Arithmetic mean of the held samples, or None when empty.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.slots.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = self.slots.len() as f64;
        Some(self.slots.iter().sum::<f64>() / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut ring = SampleRing::new(3);
        assert_eq!(ring.push(1), None);
        ring.push(2);
        ring.push(3);
        assert!(ring.is_full());
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.to_vec(), vec![2, 3, 4]);
        assert_eq!(ring.latest(), Some(4));
        ring.push(5);
        assert_eq!(ring.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn test_ring_mean() {
        let mut ring = SampleRing::new(4);
        assert_eq!(ring.mean(), None);
        ring.push(10.0);
        ring.push(20.0);
        assert!((ring.mean().unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_capacity_holds_latest() {
        let mut ring = SampleRing::new(0);
        ring.push(7);
        ring.push(8);
        assert_eq!(ring.to_vec(), vec![8]);
    }
}
