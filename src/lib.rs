//! Lateral - an in-process event bus on Left-Right concurrency control
//!
//! The crate has two layers:
//!
//! - [`sync`] wraps any single-threaded value in [`LeftRight`] concurrency
//!   control: wait-free, population-oblivious reads and blocking writes,
//!   with readers accounted for by a pluggable [`ReaderRegistry`].
//! - [`bus`] builds a publish/subscribe [`EventBus`] on top of it. A
//!   published value is delivered to every handler registered for any
//!   entry of its declared dispatch chain, most-derived first; plain
//!   event types are delivered by exact type only.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicUsize;
//! use std::sync::atomic::Ordering;
//!
//! use lateral::bus::EventBus;
//! use lateral::event;
//!
//! struct Tick;
//!
//! event!(Tick);
//!
//! let bus = EventBus::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let hits = Arc::clone(&seen);
//!
//! let cookie = bus.subscribe(move |_: &Tick| {
//!   hits.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! bus.publish(&Tick);
//! bus.unsubscribe(cookie);
//! bus.publish(&Tick);
//!
//! assert_eq!(seen.load(Ordering::Relaxed), 1);
//! ```
//!
//! [`LeftRight`]: crate::sync::LeftRight
//! [`ReaderRegistry`]: crate::sync::ReaderRegistry
//! [`EventBus`]: crate::bus::EventBus

mod core;
mod loom;
mod utils;

pub mod consts;
pub mod sync;

pub mod bus {
  //! The polymorphic publish/subscribe event bus.

  pub use crate::core::Cookie;
  pub use crate::core::Event;
  pub use crate::core::EventBus;
  pub use crate::core::EventRoot;
  pub use crate::core::ScopedSubscription;
}
