use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Cookie;
use crate::core::Event;
use crate::core::EventBus;

/// A scope-bound eventbus subscription.
///
/// Holds a bus reference together with the [`Cookie`] of one
/// subscription and unsubscribes when dropped, so a subscription cannot
/// outlive the scope that created it. The holder is movable but not
/// copyable, and a default-constructed holder manages nothing and drops
/// safely.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::AtomicUsize;
/// use std::sync::atomic::Ordering;
///
/// use lateral::bus::EventBus;
/// use lateral::bus::ScopedSubscription;
/// use lateral::event;
///
/// struct Closed;
///
/// event!(Closed);
///
/// let bus = EventBus::new();
/// let calls = Arc::new(AtomicUsize::new(0));
/// let hits = Arc::clone(&calls);
///
/// {
///   let _sub = ScopedSubscription::new(&bus, move |_: &Closed| {
///     hits.fetch_add(1, Ordering::Relaxed);
///   });
///
///   bus.publish(&Closed);
/// }
///
/// // The subscription left scope with the holder.
/// bus.publish(&Closed);
/// assert_eq!(calls.load(Ordering::Relaxed), 1);
/// ```
#[derive(Default)]
pub struct ScopedSubscription<'bus> {
  inner: Option<(&'bus EventBus, Cookie)>,
}

impl<'bus> ScopedSubscription<'bus> {
  /// Creates a holder managing no subscription.
  #[inline]
  pub const fn empty() -> Self {
    Self { inner: None }
  }

  /// Subscribes `handler` on `bus` and manages the resulting cookie.
  #[inline]
  pub fn new<E, H>(bus: &'bus EventBus, handler: H) -> Self
  where
    E: Event,
    H: Fn(&E) + Send + Sync + 'static,
  {
    Self {
      inner: Some((bus, bus.subscribe(handler))),
    }
  }

  /// Replaces the managed subscription with a fresh one on `bus`.
  ///
  /// Any previously managed subscription is released first, as though
  /// [`reset`] had been called.
  ///
  /// [`reset`]: Self::reset
  #[inline]
  pub fn assign<E, H>(&mut self, bus: &'bus EventBus, handler: H)
  where
    E: Event,
    H: Fn(&E) + Send + Sync + 'static,
  {
    self.reset();
    self.inner = Some((bus, bus.subscribe(handler)));
  }

  /// Releases the managed subscription, if any.
  #[inline]
  pub fn reset(&mut self) {
    if let Some((bus, cookie)) = self.inner.take() {
      bus.unsubscribe(cookie);
    }
  }

  /// Returns the cookie of the managed subscription, if any.
  #[inline]
  pub fn cookie(&self) -> Option<Cookie> {
    self.inner.map(|(_bus, cookie)| cookie)
  }
}

impl Drop for ScopedSubscription<'_> {
  #[inline]
  fn drop(&mut self) {
    self.reset();
  }
}

impl Debug for ScopedSubscription<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("ScopedSubscription")
      .field("cookie", &self.cookie())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
#[cfg(not(loom))]
mod tests {
  use std::sync::Arc;
  use std::sync::atomic::AtomicUsize;
  use std::sync::atomic::Ordering;

  use crate::event;

  use super::*;

  struct Beat;

  event!(Beat);

  fn counting(calls: Arc<AtomicUsize>) -> impl Fn(&Beat) + Send + Sync + 'static {
    move |_: &Beat| {
      calls.fetch_add(1, Ordering::Relaxed);
    }
  }

  #[test]
  fn test_empty_drops_safely() {
    let holder: ScopedSubscription<'_> = ScopedSubscription::empty();

    assert!(holder.cookie().is_none());
  }

  #[test]
  fn test_drop_unsubscribes() {
    let bus: EventBus = EventBus::new();
    let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    {
      let _holder: ScopedSubscription<'_> =
        ScopedSubscription::new(&bus, counting(Arc::clone(&calls)));

      bus.publish(&Beat);
    }

    bus.publish(&Beat);

    assert_eq!(calls.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn test_assign_releases_previous() {
    let bus: EventBus = EventBus::new();
    let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    let mut holder: ScopedSubscription<'_> = ScopedSubscription::empty();

    holder.assign(&bus, counting(Arc::clone(&calls)));
    let first: Option<Cookie> = holder.cookie();

    holder.assign(&bus, counting(Arc::clone(&calls)));
    let second: Option<Cookie> = holder.cookie();

    assert_ne!(first, second);

    // Only the second subscription remains live.
    bus.publish(&Beat);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn test_reset_is_idempotent() {
    let bus: EventBus = EventBus::new();
    let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    let mut holder: ScopedSubscription<'_> =
      ScopedSubscription::new(&bus, counting(Arc::clone(&calls)));

    holder.reset();
    holder.reset();

    bus.publish(&Beat);

    assert_eq!(calls.load(Ordering::Relaxed), 0);
    assert!(holder.cookie().is_none());
  }

  #[test]
  fn test_moves_keep_subscription() {
    let bus: EventBus = EventBus::new();
    let calls: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    let holder: ScopedSubscription<'_> =
      ScopedSubscription::new(&bus, counting(Arc::clone(&calls)));
    let moved: ScopedSubscription<'_> = holder;

    bus.publish(&Beat);

    assert_eq!(calls.load(Ordering::Relaxed), 1);
    drop(moved);
  }
}
