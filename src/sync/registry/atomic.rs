use crossbeam_utils::CachePadded;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::loom::sync::atomic::AtomicU32;
use crate::loom::sync::atomic::Ordering;
use crate::sync::ReaderRegistry;

/// Single-counter reader registry.
///
/// The simplest wait-free implementation of [`ReaderRegistry`]: one
/// shared counter, padded to its own cache line. All readers contend on
/// that line, so prefer [`ShardedRegistry`] when reads are highly
/// contended.
///
/// [`ShardedRegistry`]: crate::sync::ShardedRegistry
#[repr(transparent)]
pub struct AtomicRegistry {
  count: CachePadded<AtomicU32>,
}

impl AtomicRegistry {
  /// Creates a registry with no readers.
  #[inline]
  pub fn new() -> Self {
    Self {
      count: CachePadded::new(AtomicU32::new(0)),
    }
  }
}

impl ReaderRegistry for AtomicRegistry {
  /// # Ordering
  ///
  /// `Release`, so the writer's acquiring [`empty`] load orders this
  /// increment before its re-read of the protected data.
  ///
  /// [`empty`]: ReaderRegistry::empty
  #[inline]
  fn arrive(&self) {
    let _count: u32 = self.count.fetch_add(1, Ordering::Release);
  }

  /// # Ordering
  ///
  /// `Release`, publishing every read the departing reader performed.
  #[inline]
  fn depart(&self) {
    let _count: u32 = self.count.fetch_sub(1, Ordering::Release);
  }

  /// # Ordering
  ///
  /// `Acquire`, pairing with the release increments and decrements.
  #[inline]
  fn empty(&self) -> bool {
    self.count.load(Ordering::Acquire) == 0
  }
}

impl Default for AtomicRegistry {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for AtomicRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("AtomicRegistry")
      .field("count", &self.count.load(Ordering::Relaxed))
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
