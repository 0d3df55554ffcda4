//! Loom models for the Left-Right core.
//!
//! Build with `RUSTFLAGS="--cfg loom" cargo test --test loom --release`.
#![cfg(loom)]

mod registry;
