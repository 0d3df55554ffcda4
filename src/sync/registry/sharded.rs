use crossbeam_utils::CachePadded;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::consts::DEFAULT_REGISTRY_SHARDS;
use crate::loom::sync::atomic::AtomicU32;
use crate::loom::sync::atomic::Ordering;
use crate::loom::sync::atomic::fence;
use crate::sync::ReaderRegistry;
use crate::utils::ThreadId;

/// Sharded reader registry.
///
/// Spreads reader accounting across `N` cache-line-padded counters so
/// that concurrent [`arrive`]/[`depart`] calls are unlikely to contend.
/// A thread's shard is a mask of its [`ThreadId`], so the likelihood of
/// a collision depends on the number of concurrent readers relative to
/// `N`, and one thread's arrival and departure always hit the same
/// shard.
///
/// The writer-side [`empty`] scan reads all `N` counters, so larger
/// shard counts shift cost from readers to the writer.
///
/// `N` must be a power of two.
///
/// [`arrive`]: ReaderRegistry::arrive
/// [`depart`]: ReaderRegistry::depart
/// [`empty`]: ReaderRegistry::empty
pub struct ShardedRegistry<const N: usize = DEFAULT_REGISTRY_SHARDS> {
  shards: [CachePadded<AtomicU32>; N],
}

impl<const N: usize> ShardedRegistry<N> {
  /// Creates a registry with no readers.
  #[inline]
  pub fn new() -> Self {
    const {
      assert!(N.is_power_of_two(), "shard count must be a power of two");
    }

    Self {
      shards: std::array::from_fn(|_| CachePadded::new(AtomicU32::new(0))),
    }
  }

  /// Returns the counter shard of the calling thread.
  ///
  /// Threads whose identity cache is mid-destruction all fall back to
  /// shard zero; the fallback is deterministic, so their marks stay
  /// balanced.
  #[inline]
  fn shard(&self) -> &AtomicU32 {
    let index: usize = match ThreadId::current() {
      Some(id) => id.as_u32().get() as usize & (N - 1),
      None => 0,
    };

    &self.shards[index]
  }
}

impl<const N: usize> ReaderRegistry for ShardedRegistry<N> {
  #[inline]
  fn arrive(&self) {
    let _count: u32 = self.shard().fetch_add(1, Ordering::Release);
  }

  #[inline]
  fn depart(&self) {
    let _count: u32 = self.shard().fetch_sub(1, Ordering::Release);
  }

  /// # Ordering
  ///
  /// The shards are scanned with `Relaxed` loads; a single `Acquire`
  /// fence afterwards orders the whole observation before the caller's
  /// subsequent reads of the protected data, pairing with the release
  /// decrements of departing readers.
  #[inline]
  fn empty(&self) -> bool {
    let empty: bool = self
      .shards
      .iter()
      .all(|shard| shard.load(Ordering::Relaxed) == 0);

    fence(Ordering::Acquire);

    empty
  }
}

impl<const N: usize> Default for ShardedRegistry<N> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> Debug for ShardedRegistry<N> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("ShardedRegistry")
      .field("shards", &N)
      .finish_non_exhaustive()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
#[cfg(not(loom))]
mod tests {
  use std::sync::atomic::AtomicBool;
  use std::thread;

  use super::*;

  #[test]
  fn test_new_is_empty() {
    let registry: ShardedRegistry = ShardedRegistry::new();

    assert!(registry.empty());
  }

  #[test]
  fn test_arrive_depart_balance() {
    let registry: ShardedRegistry = ShardedRegistry::new();

    registry.arrive();
    assert!(!registry.empty());

    registry.depart();
    assert!(registry.empty());
  }

  #[test]
  fn test_nested_sections() {
    let registry: ShardedRegistry<4> = ShardedRegistry::new();

    registry.arrive();
    registry.arrive();
    registry.depart();
    assert!(!registry.empty());

    registry.depart();
    assert!(registry.empty());
  }

  #[test]
  fn test_depart_hits_arrive_shard() {
    // A foreign thread's marks must cancel out even though its shard
    // differs from the main thread's.
    let registry: ShardedRegistry<2> = ShardedRegistry::new();

    thread::scope(|scope| {
      scope.spawn(|| {
        registry.arrive();
        registry.depart();
      });
    });

    assert!(registry.empty());
  }

  #[test]
  fn test_empty_sees_all_shards() {
    let registry: ShardedRegistry<2> = ShardedRegistry::new();
    let release: AtomicBool = AtomicBool::new(false);

    thread::scope(|scope| {
      scope.spawn(|| {
        registry.arrive();

        while !release.load(Ordering::Acquire) {
          thread::yield_now();
        }

        registry.depart();
      });

      // Wait until the mark is visible, whichever shard it landed on.
      while registry.empty() {
        thread::yield_now();
      }

      release.store(true, Ordering::Release);
    });

    assert!(registry.empty());
  }
}
