use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use std::any::Any;
use std::any::TypeId;

use crate::core::Subscriber;
use crate::core::SubscriberId;

/// Multi-valued map from event type key to subscriber records.
///
/// This is the value managed by the bus's Left-Right container: cheap
/// to clone (records are reference-counted) and mutated identically on
/// both copies. Records within one bucket keep insertion order, which
/// is the delivery order within a chain entry.
#[derive(Clone, Default)]
pub(crate) struct SubscriberTable {
  entries: HashMap<TypeId, Vec<Subscriber>>,
}

impl SubscriberTable {
  /// Creates an empty table.
  #[inline]
  pub(crate) fn new() -> Self {
    Self {
      entries: HashMap::new(),
    }
  }

  /// Appends `subscriber` to the bucket of `key`.
  #[inline]
  pub(crate) fn insert(&mut self, key: TypeId, subscriber: Subscriber) {
    self.entries.entry(key).or_default().push(subscriber);
  }

  /// Removes the record with identity `id` from the bucket of `key`.
  ///
  /// Does nothing if the bucket or the record is absent, which makes
  /// removal idempotent. An emptied bucket is dropped from the map.
  pub(crate) fn remove(&mut self, key: TypeId, id: SubscriberId) {
    let Entry::Occupied(mut bucket) = self.entries.entry(key) else {
      return;
    };

    if let Some(index) = bucket.get().iter().position(|sub| sub.id() == id) {
      let _removed: Subscriber = bucket.get_mut().remove(index);
    }

    if bucket.get().is_empty() {
      let _bucket: Vec<Subscriber> = bucket.remove();
    }
  }

  /// Delivers `event` to every record under `key`, in insertion order.
  #[inline]
  pub(crate) fn deliver(&self, key: TypeId, event: &dyn Any) {
    let Some(bucket) = self.entries.get(&key) else {
      return;
    };

    for subscriber in bucket {
      subscriber.deliver(event);
    }
  }

  /// Returns the total number of records across all buckets.
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.entries.values().map(Vec::len).sum()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
