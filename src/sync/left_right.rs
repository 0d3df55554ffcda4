//! Left-Right wrapping of a single-threaded value.
//!
//! # Architecture
//!
//! A [`LeftRight`] holds two full copies of the value. At any moment
//! exactly one copy is *active*: readers observe it, the writer leaves
//! it alone. A write applies the caller's mutation to the inactive
//! copy, swaps which side is active, waits for every reader of the old
//! side to leave, and then applies the same mutation to the old side.
//! Both copies are equal again once the write returns.
//!
//! Waiting for readers is delegated to two [`ReaderRegistry`]
//! instances. New readers always attach to `registries[registry_index]`;
//! the writer toggles that index between its two mutations so each
//! registry can be drained independently. Readers therefore never block
//! and never touch writer state; the writer's progress depends only on
//! readers finishing their critical sections.
//!
//! # Ordering
//!
//! | Access                       | Ordering  |
//! |------------------------------|-----------|
//! | `registry_index` load        | `Acquire` |
//! | `registry_index` store       | `Release` |
//! | `active` load in `observe`   | `Acquire` |
//! | `active` store in `modify`   | `Release` |
//! | registry arrive/depart       | `Release` |
//! | registry emptiness check     | `Acquire` |
//!
//! The `active` release/acquire pair makes the first mutation visible
//! to readers that attach after the swap. The registry release/acquire
//! pair makes the old side's readers' departures visible to the writer
//! before it mutates that side.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::mem::align_of;
use std::panic::RefUnwindSafe;
use std::panic::UnwindSafe;

use crate::consts::CACHE_LINE_SIZE;
use crate::loom::cell::UnsafeCell;
use crate::loom::sync::Mutex;
use crate::loom::sync::MutexGuard;
use crate::loom::sync::atomic::AtomicUsize;
use crate::loom::sync::atomic::Ordering;
use crate::loom::thread::yield_now;
use crate::sync::AtomicRegistry;
use crate::sync::ReaderRegistry;

// -----------------------------------------------------------------------------
// Value Slot
// -----------------------------------------------------------------------------

/// One copy of the managed value, aligned to its own cache line so the
/// side being written never shares a line with the side being read.
#[repr(align(64))]
struct Slot<T> {
  value: UnsafeCell<T>,
}

const _: () = assert!(align_of::<Slot<()>>() == CACHE_LINE_SIZE);

impl<T> Slot<T> {
  #[inline]
  fn new(value: T) -> Self {
    Self {
      value: UnsafeCell::new(value),
    }
  }
}

// -----------------------------------------------------------------------------
// Read Guard
// -----------------------------------------------------------------------------

/// Scope-bound reader mark.
///
/// Pins the registry instance chosen on entry: the departure must hit
/// the same registry even if the writer toggles `registry_index` while
/// the read is in flight, or the writer's emptiness detection is
/// unsound. Dropping on unwind keeps the mark balanced when the
/// observing closure panics.
struct ReadGuard<'read, R: ReaderRegistry> {
  registry: &'read R,
}

impl<'read, R: ReaderRegistry> ReadGuard<'read, R> {
  #[inline]
  fn new(registry: &'read R) -> Self {
    registry.arrive();
    Self { registry }
  }
}

impl<R: ReaderRegistry> Drop for ReadGuard<'_, R> {
  #[inline]
  fn drop(&mut self) {
    self.registry.depart();
  }
}

// -----------------------------------------------------------------------------
// Left-Right Container
// -----------------------------------------------------------------------------

/// Wraps a single-threaded value with Left-Right concurrency control.
///
/// Left-Right allows wait-free, population-oblivious reads and blocking
/// writes. Writers never block readers.
///
/// Instances maintain two full copies of the underlying value and every
/// modification is performed twice, so use should be limited to small
/// amounts of data where reads dominate writes.
///
/// # Reentrancy
///
/// Nested [`observe`] calls from one thread are supported. Calling
/// [`modify`] from inside an [`observe`] section of the *same*
/// container deadlocks: the writer drains all readers, including the
/// caller's own mark.
///
/// [`observe`]: Self::observe
/// [`modify`]: Self::modify
pub struct LeftRight<T, R = AtomicRegistry>
where
  R: ReaderRegistry,
{
  /// Reader accounting; `registry_index` names the attach side.
  registries: [R; 2],
  registry_index: AtomicUsize,
  /// The slot readers currently observe.
  active: AtomicUsize,
  slots: [Slot<T>; 2],
  write_lock: Mutex<()>,
}

impl<T, R> LeftRight<T, R>
where
  R: ReaderRegistry,
{
  /// Creates a container whose two copies both start as `seed`.
  #[inline]
  pub fn new(seed: T) -> Self
  where
    T: Clone,
  {
    Self {
      registries: [R::default(), R::default()],
      registry_index: AtomicUsize::new(0),
      active: AtomicUsize::new(0),
      slots: [Slot::new(seed.clone()), Slot::new(seed)],
      write_lock: Mutex::new(()),
    }
  }

  /// Observes the managed value.
  ///
  /// Wait-free provided the registry's arrive/depart are wait-free; the
  /// call never blocks on a writer regardless of how many other threads
  /// are present. The reader mark taken on entry is released when the
  /// call returns, including by unwind if `f` panics.
  ///
  /// The reference passed to `f` must not escape the closure.
  #[inline]
  pub fn observe<F, O>(&self, f: F) -> O
  where
    F: FnOnce(&T) -> O,
  {
    let index: usize = self.registry_index.load(Ordering::Acquire);
    let _read: ReadGuard<'_, R> = ReadGuard::new(&self.registries[index]);

    let active: usize = self.active.load(Ordering::Acquire);

    // SAFETY: `active` names the slot no writer is mutating: `modify`
    // only writes a slot after publishing the other one as active and
    // draining every reader mark taken before the swap. Our own mark,
    // taken above, keeps this slot off-limits until the guard drops.
    self.slots[active].value.with(|value| f(unsafe { &*value }))
  }

  /// Modifies the managed value.
  ///
  /// Blocks and is blocked by other concurrent writers; does not block
  /// concurrent readers. The functor is executed once per copy and
  /// *must* apply the exact same mutation in both cases: it would be
  /// incorrect, for example, to insert a random number calculated per
  /// invocation. The result of the second application is returned.
  ///
  /// # Requirements for `f`
  ///
  /// - **Must** produce the identical observable mutation twice
  /// - **Must not** panic (an unwind leaves the two copies diverged)
  /// - **Must not** call [`observe`] or [`modify`] on this container
  ///
  /// [`observe`]: Self::observe
  /// [`modify`]: Self::modify
  pub fn modify<F, O>(&self, mut f: F) -> O
  where
    F: FnMut(&mut T) -> O,
  {
    let _write: MutexGuard<'_, ()> = self.lock_writer();

    let active: usize = self.active.load(Ordering::Relaxed);
    let stale: usize = active ^ 1;

    // First application: the side no reader has observed since the
    // last write made both sides equal.
    //
    // SAFETY: Holding the write lock, `stale` is inactive and was
    // drained of readers by the previous `modify` (or never exposed).
    let _first: O = self.slots[stale].value.with_mut(|value| {
      f(unsafe { &mut *value })
    });

    self.active.store(stale, Ordering::Release);

    self.toggle_registries();

    // Second application: the previously active side, now quiescent.
    //
    // SAFETY: The toggle above drained every reader that attached
    // before the swap; readers attaching after it observe `stale`.
    let second: O = self.slots[active].value.with_mut(|value| {
      f(unsafe { &mut *value })
    });

    second
  }

  /// Points new readers at the other registry and drains the old one.
  ///
  /// Draining `next` first completes any previous writer's toggle;
  /// draining `current` after the index swap guarantees no reader of
  /// the previously active slot remains.
  fn toggle_registries(&self) {
    let current: usize = self.registry_index.load(Ordering::Acquire);
    let next: usize = current ^ 1;

    while !self.registries[next].empty() {
      yield_now();
    }

    self.registry_index.store(next, Ordering::Release);

    while !self.registries[current].empty() {
      yield_now();
    }
  }

  #[cfg(not(loom))]
  #[inline]
  fn lock_writer(&self) -> MutexGuard<'_, ()> {
    self.write_lock.lock()
  }

  #[cfg(loom)]
  fn lock_writer(&self) -> MutexGuard<'_, ()> {
    // The lock is never held across an unwind, so poisoning is moot.
    self.write_lock.lock().unwrap()
  }
}

impl<T, R> Default for LeftRight<T, R>
where
  T: Clone + Default,
  R: ReaderRegistry,
{
  #[inline]
  fn default() -> Self {
    Self::new(T::default())
  }
}

impl<T, R> Debug for LeftRight<T, R>
where
  R: ReaderRegistry,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("LeftRight")
      .field("active", &self.active.load(Ordering::Relaxed))
      .field("registry_index", &self.registry_index.load(Ordering::Relaxed))
      .finish_non_exhaustive()
  }
}

// SAFETY: `LeftRight<T, R>` is safe to transfer across thread
//         boundaries when its value is: dropping or consuming the
//         container touches both copies from the receiving thread.
unsafe impl<T: Send, R: ReaderRegistry + Send> Send for LeftRight<T, R> {}

// SAFETY: `LeftRight<T, R>` is safe to share between threads when `T`
//         is: `observe` hands out `&T` concurrently (requiring `Sync`)
//         and `modify` mutates `T` from whichever thread holds the
//         write lock (requiring `Send`). All control state is atomic.
unsafe impl<T: Send + Sync, R: ReaderRegistry + Sync> Sync for LeftRight<T, R> {}

impl<T, R: ReaderRegistry> RefUnwindSafe for LeftRight<T, R> {}
impl<T, R: ReaderRegistry> UnwindSafe for LeftRight<T, R> {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
