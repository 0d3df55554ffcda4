//! The event bus.
//!
//! [`EventBus`] composes the subscriber table with a Left-Right
//! container: [`publish`] walks the dispatch chain under one `observe`,
//! [`subscribe`]/[`unsubscribe`] mutate the table under `modify`. The
//! read path is wait-free within the bus; the write path serializes on
//! the container's internal lock.
//!
//! # Synchronization contract
//!
//! A publish that begins after a subscribe (or unsubscribe) returns
//! observes that change: once `modify` returns, both copies of the
//! table reflect it, so any subsequent `observe` sees it whichever side
//! is active. Concurrent publishes may observe a change in either
//! order, and no ordering holds between handler executions of separate
//! publish calls.
//!
//! # Reentrancy
//!
//! Publishing from inside a handler is supported: the inner publish
//! opens a nested read section, which the counter-based registries
//! handle. Subscribing or unsubscribing from inside a handler is
//! **unsupported** - the write would wait for all readers to drain,
//! including the mark held by the very thread doing the waiting.
//!
//! [`publish`]: EventBus::publish
//! [`subscribe`]: EventBus::subscribe
//! [`unsubscribe`]: EventBus::unsubscribe

use std::any::TypeId;
use std::any::type_name;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tracing::trace;

use crate::core::Cookie;
use crate::core::Event;
use crate::core::EventRoot;
use crate::core::Subscriber;
use crate::core::SubscriberTable;
use crate::sync::LeftRight;

/// Accepts events from publishers and delivers them to subscribers.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::AtomicU32;
/// use std::sync::atomic::Ordering;
///
/// use lateral::bus::EventBus;
/// use lateral::event;
///
/// struct Opened {
///   port: u16,
/// }
///
/// event!(Opened);
///
/// let bus = EventBus::new();
/// let port = Arc::new(AtomicU32::new(0));
/// let seen = Arc::clone(&port);
///
/// let _cookie = bus.subscribe(move |opened: &Opened| {
///   seen.store(opened.port as u32, Ordering::Relaxed);
/// });
///
/// bus.publish(&Opened { port: 4222 });
///
/// assert_eq!(port.load(Ordering::Relaxed), 4222);
/// ```
pub struct EventBus {
  subscribers: LeftRight<SubscriberTable>,
}

impl EventBus {
  /// Creates a bus with no subscriptions.
  #[inline]
  pub fn new() -> Self {
    Self {
      subscribers: LeftRight::new(SubscriberTable::new()),
    }
  }

  /// Publishes an event.
  ///
  /// The value is delivered under every entry of its dispatch chain,
  /// most-derived first, to that entry's handlers in subscription
  /// order. A type with no declared lineage reaches its exact-type
  /// handlers only. Delivery is synchronous on the calling thread.
  ///
  /// The call itself never panics and never blocks; a panic unwinding
  /// out of a *handler* propagates to the publisher, leaving the bus
  /// usable.
  #[inline]
  pub fn publish<E>(&self, event: &E)
  where
    E: Event,
  {
    self.subscribers.observe(|table| deliver_chain(table, event));
  }

  /// Subscribes `handler` to events of type `E`.
  ///
  /// The handler is invoked for every published value whose dispatch
  /// chain contains `E`: exact publishes of `E`, and publishes of any
  /// event declaring `E` in its lineage. It may publish further events
  /// from inside its own invocation, but must not subscribe or
  /// unsubscribe (see the module notes on reentrancy) and should not
  /// panic.
  ///
  /// Returns a [`Cookie`] that identifies this subscription to
  /// [`unsubscribe`].
  ///
  /// [`unsubscribe`]: Self::unsubscribe
  pub fn subscribe<E, H>(&self, handler: H) -> Cookie
  where
    E: Event,
    H: Fn(&E) + Send + Sync + 'static,
  {
    let key: TypeId = TypeId::of::<E>();
    let record: Subscriber = Subscriber::new(handler);
    let cookie: Cookie = Cookie::new(record.id(), key);

    self.subscribers.modify(|table| {
      table.insert(key, record.clone());
    });

    trace!(
      target: "lateral",
      event = type_name::<E>(),
      id = ?record.id(),
      "subscribe",
    );

    cookie
  }

  /// Removes the subscription identified by `cookie`.
  ///
  /// Idempotent: unknown and stale cookies are ignored. Once this call
  /// returns, no publish that begins afterwards delivers to the
  /// removed handler.
  pub fn unsubscribe(&self, cookie: Cookie) {
    self.subscribers.modify(|table| {
      table.remove(cookie.key(), cookie.id());
    });

    trace!(
      target: "lateral",
      id = ?cookie.id(),
      "unsubscribe",
    );
  }
}

impl Default for EventBus {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for EventBus {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("EventBus")
      .field("subscriptions", &self.subscribers.observe(SubscriberTable::len))
      .finish()
  }
}

/// Delivers `event` under every entry of its dispatch chain.
///
/// Monomorphized recursion over the declared lineage: each step offers
/// the value to the bucket of its own type key, then recurses on the
/// parent borrow. The recursion stops *before* [`EventRoot`], so the
/// chain terminator is never delivered to; the stop test compares two
/// constants and folds at compile time.
fn deliver_chain<E>(table: &SubscriberTable, event: &E)
where
  E: Event,
{
  table.deliver(TypeId::of::<E>(), event);

  if TypeId::of::<E::Parent>() != TypeId::of::<EventRoot>() {
    deliver_chain(table, event.parent());
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
