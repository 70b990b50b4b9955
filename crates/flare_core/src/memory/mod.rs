//! # Memory Management
//!
//! Pre-allocated pools for effect resources that are created and dropped
//! every few frames (particle scratch buffers, overlay staging).
//!
//! ## Design Philosophy
//!
//! Pools are sized once from the quality budget. During play:
//! - Acquire and release are O(1)
//! - Released slots are reused, never returned to the allocator
//! - An exhausted pool refuses instead of growing

mod pool;

pub use pool::{PoolAllocator, PoolHandle, Poolable};
