mod atomic;
mod sharded;

pub use self::atomic::AtomicRegistry;
pub use self::sharded::ShardedRegistry;

/// Accounting of in-flight readers.
///
/// A registry is a logical non-negative counter. Readers bracket their
/// critical sections with [`arrive`]/[`depart`]; a writer polls
/// [`empty`] to detect quiescence before mutating state those readers
/// may still see.
///
/// # Contract
///
/// - `arrive` and `depart` are wait-free and infallible.
/// - `empty` may spuriously report `false`, but must never report
///   `true` while any reader is inside its section: every `arrive` that
///   happened before the `empty` call either has a matching `depart`
///   or forces a `false` result.
/// - Nested `arrive`/`depart` pairs from one thread must balance.
///
/// # Ordering
///
/// `arrive` and `depart` are release operations and `empty` acquires,
/// so a writer that observes emptiness also observes everything the
/// departed readers did before leaving.
///
/// [`arrive`]: Self::arrive
/// [`depart`]: Self::depart
/// [`empty`]: Self::empty
pub trait ReaderRegistry: Default {
  /// Notes the arrival of a reader.
  fn arrive(&self);

  /// Notes the departure of a reader.
  fn depart(&self);

  /// Returns `true` if every arrival has been matched by a departure.
  fn empty(&self) -> bool;
}
