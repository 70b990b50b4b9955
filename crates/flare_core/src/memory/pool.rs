//! # Pool Allocator
//!
//! Fixed-capacity pool of reusable instances.

/// An instance that can be recycled through a [`PoolAllocator`].
pub trait Poolable: Default {
    /// Clears per-use state. Called when the instance returns to the pool.
    ///
    /// Implementations should keep their heap capacity.
    fn reset(&mut self);
}

impl<T> Poolable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// A pool of pre-built instances of one resource type.
///
/// Unlike a plain allocator, released instances are kept (and reset) so
/// their heap buffers are reused by the next acquire. This is what lets the
/// cleanup queue hand particle scratch buffers back without freeing them.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by the frame tick.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: PoolAllocator<Vec<[f32; 4]>> = PoolAllocator::new(64);
///
/// let handle = pool.acquire()?;
/// pool.get_mut(handle)?.push([0.0; 4]);
///
/// // Back to the pool, buffer capacity retained
/// pool.release(handle);
/// ```
pub struct PoolAllocator<T: Poolable> {
    /// The instances, built once.
    storage: Box<[T]>,
    /// Which slots are handed out.
    in_use: Box<[bool]>,
    /// Free list - indices of available slots.
    free_list: Vec<usize>,
    /// Number of acquired instances.
    acquired_count: usize,
    /// Lifetime count of acquisitions that found the pool empty.
    exhausted_count: u64,
}

/// Handle to an acquired instance in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Index into the pool.
    index: usize,
}

impl<T: Poolable> PoolAllocator<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All instances are built upfront.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of simultaneously acquired instances
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let storage: Vec<T> = (0..capacity).map(|_| T::default()).collect();

        Self {
            storage: storage.into_boxed_slice(),
            in_use: vec![false; capacity].into_boxed_slice(),
            free_list: (0..capacity).rev().collect(),
            acquired_count: 0,
            exhausted_count: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of currently acquired instances.
    #[inline]
    #[must_use]
    pub const fn acquired_count(&self) -> usize {
        self.acquired_count
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.acquired_count
    }

    /// Returns how many acquisitions were refused because the pool was empty.
    #[inline]
    #[must_use]
    pub const fn exhausted_count(&self) -> u64 {
        self.exhausted_count
    }

    /// Takes an instance out of the pool.
    ///
    /// This is a **O(1)** operation.
    ///
    /// # Returns
    ///
    /// A handle to the acquired instance, or None if the pool is empty.
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        let Some(index) = self.free_list.pop() else {
            self.exhausted_count += 1;
            return None;
        };

        self.in_use[index] = true;
        self.acquired_count += 1;

        Some(PoolHandle { index })
    }

    /// Returns an instance to the pool, resetting it.
    ///
    /// # Returns
    ///
    /// False if the handle was invalid or already released.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match self.in_use.get(handle.index) {
            Some(true) => {}
            _ => return false,
        }

        self.storage[handle.index].reset();
        self.in_use[handle.index] = false;
        self.free_list.push(handle.index);
        self.acquired_count -= 1;

        true
    }

    /// Gets a reference to an acquired instance.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        if *self.in_use.get(handle.index)? {
            self.storage.get(handle.index)
        } else {
            None
        }
    }

    /// Gets a mutable reference to an acquired instance.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if *self.in_use.get(handle.index)? {
            self.storage.get_mut(handle.index)
        } else {
            None
        }
    }

    /// Releases every acquired instance.
    pub fn release_all(&mut self) {
        for (slot, used) in self.storage.iter_mut().zip(self.in_use.iter_mut()) {
            if *used {
                slot.reset();
                *used = false;
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.storage.len()).rev());
        self.acquired_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_acquire_release() {
        let mut pool: PoolAllocator<Vec<u32>> = PoolAllocator::new(10);

        let h1 = pool.acquire().unwrap();
        pool.get_mut(h1).unwrap().push(42);
        assert_eq!(pool.get(h1).unwrap().as_slice(), &[42]);
        assert_eq!(pool.acquired_count(), 1);

        assert!(pool.release(h1));
        assert_eq!(pool.acquired_count(), 0);
        assert!(pool.get(h1).is_none());
    }

    #[test]
    fn test_pool_exhausted() {
        let mut pool: PoolAllocator<Vec<u8>> = PoolAllocator::new(2);

        let _ = pool.acquire().unwrap();
        let _ = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());
        assert_eq!(pool.exhausted_count(), 1);
    }

    #[test]
    fn test_pool_reuse_keeps_capacity() {
        let mut pool: PoolAllocator<Vec<u32>> = PoolAllocator::new(1);

        let h1 = pool.acquire().unwrap();
        pool.get_mut(h1).unwrap().extend(0..100);
        pool.release(h1);

        let h2 = pool.acquire().unwrap();
        assert_eq!(h1.index, h2.index);
        let buf = pool.get(h2).unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 100);
    }

    #[test]
    fn test_double_release_rejected() {
        let mut pool: PoolAllocator<Vec<u32>> = PoolAllocator::new(1);
        let h = pool.acquire().unwrap();
        assert!(pool.release(h));
        assert!(!pool.release(h));
        assert_eq!(pool.acquired_count(), 0);
    }
}
