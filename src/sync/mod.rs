//! Left-Right concurrency control.
//!
//! [`LeftRight`] keeps two copies of a value so that readers always
//! observe a quiescent copy while a writer mutates the other, swaps the
//! sides, drains the old readers, and mutates again. Reads are
//! wait-free and population-oblivious; writes serialize on an internal
//! lock and never block readers.
//!
//! Readers are accounted for by a [`ReaderRegistry`]. Two registries
//! are provided: [`AtomicRegistry`], a single shared counter, and
//! [`ShardedRegistry`], which spreads readers across padded counter
//! shards keyed by thread identity.
//!
//! The scheme is described in A. Correia and P. Ramalhete, *Left-Right:
//! A Concurrency Control Technique with Wait-Free Population Oblivious
//! Reads*.

mod left_right;
mod registry;

pub use self::left_right::LeftRight;
pub use self::registry::AtomicRegistry;
pub use self::registry::ReaderRegistry;
pub use self::registry::ShardedRegistry;
