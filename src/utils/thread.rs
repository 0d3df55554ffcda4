use std::cell::Cell;
use std::num::NonZeroU32;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

thread_local! {
  static CURRENT: Cell<Option<ThreadId>> = const { Cell::new(None) };
}

/// A dense numeric identifier for the calling thread.
///
/// Identifiers are handed out from a global counter and cached in
/// thread-local storage, so repeated lookups on one thread are a single
/// `Cell` read. The sharded reader registry masks this value to pick a
/// counter shard; two calls on the same thread always agree.
///
/// The counter wraps after `u32::MAX` threads. Reuse of an identifier
/// is harmless here since it only ever selects a shard.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct ThreadId {
  inner: NonZeroU32,
}

impl ThreadId {
  /// Returns the identifier of the calling thread.
  ///
  /// Returns `None` during thread-local destruction, when the cache is
  /// no longer accessible. Callers that need determinism across a read
  /// section must map `None` to a fixed fallback.
  #[inline]
  pub(crate) fn current() -> Option<Self> {
    CURRENT
      .try_with(|thread| match thread.get() {
        Some(id) => id,
        None => {
          let id: ThreadId = next_thread_id();
          thread.set(Some(id));
          id
        }
      })
      .ok()
  }

  /// Returns this `ThreadId` as a numeric identifier.
  #[inline]
  pub(crate) fn as_u32(&self) -> NonZeroU32 {
    self.inner
  }
}

#[cold]
fn next_thread_id() -> ThreadId {
  static NEXT: AtomicU32 = AtomicU32::new(1);

  'next: loop {
    let id: u32 = NEXT.fetch_add(1, Ordering::Relaxed);

    // Skip zero when the counter wraps.
    if let Some(id) = NonZeroU32::new(id) {
      break 'next ThreadId { inner: id };
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
