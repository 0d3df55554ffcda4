//! Tuning constants for the Left-Right core.
//!
//! These values fix the memory layout of the concurrency primitives at
//! compile time. They are deliberately few: the crate has no runtime
//! configuration surface.

/// Assumed size in bytes of one cache line.
///
/// The two value slots of a [`LeftRight`] container are aligned to this
/// boundary so that the copy being written never shares a line with the
/// copy being read. Registry counters are padded separately via
/// [`CachePadded`], which uses the platform's own (possibly larger)
/// line-size estimate.
///
/// [`LeftRight`]: crate::sync::LeftRight
/// [`CachePadded`]: crossbeam_utils::CachePadded
pub const CACHE_LINE_SIZE: usize = 64;

/// Default shard count of a [`ShardedRegistry`].
///
/// Sizing trades cache-line pressure on the writer's emptiness scan
/// against contention between concurrent readers: every shard is read
/// on each `empty()` call, while readers spread across shards by thread
/// identity. Sixteen shards suit machines with a few dozen cores; the
/// count must be a power of two so shard selection reduces to a mask.
///
/// [`ShardedRegistry`]: crate::sync::ShardedRegistry
pub const DEFAULT_REGISTRY_SHARDS: usize = 16;

const _: () = assert!(CACHE_LINE_SIZE.is_power_of_two());
const _: () = assert!(DEFAULT_REGISTRY_SHARDS.is_power_of_two());
