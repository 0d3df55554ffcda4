use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;

/// Interior-mutability cell with the access shape of `loom::cell::UnsafeCell`.
///
/// Production builds compile down to a plain [`std::cell::UnsafeCell`];
/// `--cfg loom` builds swap in the loom cell (see `crate::loom`), which
/// tracks concurrent accesses during model checking. Keeping both behind
/// the closure-based `with`/`with_mut` API lets the callers stay
/// single-source.
#[repr(transparent)]
pub(crate) struct UnsafeCell<T> {
  inner: std::cell::UnsafeCell<T>,
}

impl<T> UnsafeCell<T> {
  /// Creates a new cell containing `value`.
  #[inline]
  pub(crate) const fn new(value: T) -> Self {
    Self {
      inner: std::cell::UnsafeCell::new(value),
    }
  }

  /// Calls `f` with a shared raw pointer to the contents.
  ///
  /// # Safety
  ///
  /// The pointer is only valid for the duration of `f`. The caller must
  /// uphold the aliasing rules when dereferencing it.
  #[inline]
  pub(crate) fn with<F, R>(&self, f: F) -> R
  where
    F: FnOnce(*const T) -> R,
  {
    f(self.inner.get())
  }

  /// Calls `f` with an exclusive raw pointer to the contents.
  ///
  /// # Safety
  ///
  /// The pointer is only valid for the duration of `f`. The caller must
  /// guarantee no other access overlaps the dereference.
  #[inline]
  pub(crate) fn with_mut<F, R>(&self, f: F) -> R
  where
    F: FnOnce(*mut T) -> R,
  {
    f(self.inner.get())
  }
}

impl<T> Debug for UnsafeCell<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("UnsafeCell(..)")
  }
}
