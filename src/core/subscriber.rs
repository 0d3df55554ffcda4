use std::any::Any;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

use crate::core::Event;

/// Stable identity of one subscription.
///
/// Derived from the address of the heap-allocated erasure record, so it
/// is unique within the process for the record's lifetime. Both
/// Left-Right copies of the subscriber table hold clones of the same
/// record and therefore agree on the identity.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct SubscriberId {
  inner: usize,
}

/// A type-erased event handler.
///
/// Holds the subscriber's handler behind a uniform callable so records
/// for different event types can share one table. Delivery probes the
/// incoming value for the subscribed type and silently skips on a
/// mismatch; the publish walk hands each bucket a value of exactly that
/// bucket's type, so the probe is also the last line of defense against
/// a key/value disagreement.
pub(crate) struct Subscriber {
  deliver: Arc<dyn Fn(&dyn Any) + Send + Sync>,
}

impl Subscriber {
  /// Erases `handler` as a subscriber for events of type `E`.
  ///
  /// The `Arc` allocation here is the only heap allocation performed on
  /// the subscribe path.
  pub(crate) fn new<E, H>(handler: H) -> Self
  where
    E: Event,
    H: Fn(&E) + Send + Sync + 'static,
  {
    let deliver = move |event: &dyn Any| {
      if let Some(event) = event.downcast_ref::<E>() {
        handler(event);
      }
    };

    Self {
      deliver: Arc::new(deliver),
    }
  }

  /// Returns the stable identity of this record.
  #[inline]
  pub(crate) fn id(&self) -> SubscriberId {
    SubscriberId {
      inner: Arc::as_ptr(&self.deliver) as *const () as usize,
    }
  }

  /// Delivers `event` to the handler, skipping on a type mismatch.
  #[inline]
  pub(crate) fn deliver(&self, event: &dyn Any) {
    (self.deliver)(event);
  }
}

impl Clone for Subscriber {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      deliver: Arc::clone(&self.deliver),
    }
  }
}

impl Debug for Subscriber {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Subscriber").field("id", &self.id()).finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
