#[cfg(not(loom))]
pub(crate) mod export {
  pub(crate) mod cell {
    pub(crate) use crate::utils::UnsafeCell;
  }

  pub(crate) mod sync {
    pub(crate) use parking_lot::Mutex;
    pub(crate) use parking_lot::MutexGuard;

    pub(crate) mod atomic {
      pub(crate) use std::sync::atomic::AtomicU32;
      pub(crate) use std::sync::atomic::AtomicUsize;
      pub(crate) use std::sync::atomic::Ordering;
      pub(crate) use std::sync::atomic::fence;
    }
  }

  pub(crate) mod thread {
    pub(crate) use std::thread::yield_now;
  }
}

#[cfg(loom)]
pub(crate) mod export {
  pub(crate) mod cell {
    pub(crate) use loom::cell::UnsafeCell;
  }

  pub(crate) mod sync {
    pub(crate) use loom::sync::Mutex;
    pub(crate) use loom::sync::MutexGuard;

    pub(crate) mod atomic {
      pub(crate) use loom::sync::atomic::AtomicU32;
      pub(crate) use loom::sync::atomic::AtomicUsize;
      pub(crate) use loom::sync::atomic::Ordering;
      pub(crate) use loom::sync::atomic::fence;
    }
  }

  pub(crate) mod thread {
    pub(crate) use loom::thread::yield_now;
  }
}

#[doc(inline)]
pub(crate) use self::export::*;
