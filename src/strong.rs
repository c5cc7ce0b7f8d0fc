//! Strong references to binder objects.

use core::{fmt, hash, marker::PhantomData, mem, ptr::NonNull};

use crate::{BinderRuntime, TetherError};

/// Represents one strong refcount unit on a binder object, or nothing.
///
/// Unlike [`ScopedResource`](crate::ScopedResource) a binder has no single
/// destroy call, only paired increments and decrements, so this is its own
/// owner type:
///
/// - cloning increments the source's count and adopts the new unit,
/// - [`reset`](Self::reset) and drop decrement,
/// - null is absorbing and never reaches the runtime.
///
/// The runtime frees the object once the last unit is gone; that moment is
/// invisible here.
pub struct SpBinder<R: BinderRuntime> {
    raw: *mut R::Binder,
    _runtime: PhantomData<fn() -> R>,
}

// The external strong count is atomic, so independent owners of one binder
// may live on different threads.
unsafe impl<R: BinderRuntime> Send for SpBinder<R> where R::Binder: Send + Sync {}
unsafe impl<R: BinderRuntime> Sync for SpBinder<R> where R::Binder: Send + Sync {}

impl<R: BinderRuntime> SpBinder<R> {
    pub const fn null() -> Self {
        Self { raw: core::ptr::null_mut(), _runtime: PhantomData }
    }

    /// Takes ownership of one strong unit on `raw`. Nothing is incremented:
    /// the caller hands over a unit it already holds, e.g. one produced by a
    /// creation call.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a binder on which the caller owns one unit that
    /// nothing else will decrement.
    pub const unsafe fn from_raw(raw: *mut R::Binder) -> Self {
        Self { raw, _runtime: PhantomData }
    }

    /// Acquires a new unit on a binder someone else owns, then adopts it.
    ///
    /// This is the way to turn the value of [`as_ptr`](Self::as_ptr) back into
    /// an owner.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a binder kept alive by some other owner for the
    /// duration of this call.
    pub unsafe fn from_borrowed(raw: *mut R::Binder) -> Self {
        Self::acquire(raw);
        Self { raw, _runtime: PhantomData }
    }

    /// Builds a reference by letting an out-parameter style call populate it.
    ///
    /// ```ignore
    /// let (binder, rc) = unsafe { SpBinder::<Ndk>::fill(|slot| get_service(name, slot)) };
    /// ```
    ///
    /// # Safety
    ///
    /// Anything written into the slot must carry one strong unit, as for
    /// [`from_raw`](Self::from_raw).
    pub unsafe fn fill<F, O>(f: F) -> (Self, O)
    where
        F: FnOnce(&mut *mut R::Binder) -> O,
    {
        let mut this = Self::null();
        let out = f(&mut this.raw);
        (this, out)
    }

    /// Like [`fill`](Self::fill), on an existing reference. Fails with
    /// `SlotOccupied` without calling `f` if it is not null.
    ///
    /// # Safety
    ///
    /// Same contract as [`fill`](Self::fill).
    pub unsafe fn fill_in_place<F, O>(&mut self, f: F) -> Result<O, TetherError>
    where
        F: FnOnce(&mut *mut R::Binder) -> O,
    {
        if !self.raw.is_null() {
            tracing::debug!(addr = self.raw as usize, "refusing to fill occupied binder slot");
            return Err(TetherError::slot_occupied(self.raw as usize));
        }
        Ok(f(&mut self.raw))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// The binder for transactions.
    ///
    /// Ownership is unaffected. If the value is used to create another owning
    /// reference, that reference needs its own unit: go through
    /// [`from_borrowed`](Self::from_borrowed) or [`Clone`], never
    /// [`from_raw`](Self::from_raw).
    #[inline]
    pub fn as_ptr(&self) -> *mut R::Binder {
        self.raw
    }

    /// Decrements the current binder (if any) and adopts `raw` as an owned
    /// unit, without incrementing it.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw`](Self::from_raw).
    pub unsafe fn reset(&mut self, raw: *mut R::Binder) {
        let old = mem::replace(&mut self.raw, raw);
        unsafe { Self::release(old) }
    }

    #[inline]
    pub fn clear(&mut self) {
        unsafe { self.reset(core::ptr::null_mut()) }
    }

    /// Gives up the unit without decrementing it.
    #[must_use = "the returned unit leaks unless decremented"]
    pub fn into_raw(self) -> *mut R::Binder {
        let raw = self.raw;
        mem::forget(self);
        raw
    }

    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[inline]
    pub fn replace(&mut self, other: Self) -> Self {
        mem::replace(self, other)
    }

    fn acquire(raw: *mut R::Binder) {
        if let Some(binder) = NonNull::new(raw) {
            // Every caller holds `raw` alive through an owner of its own.
            unsafe { R::inc_strong(binder) }
        }
    }

    /// # Safety
    /// `raw` is null or carries one unit the caller owns.
    unsafe fn release(raw: *mut R::Binder) {
        if let Some(binder) = NonNull::new(raw) {
            unsafe { R::dec_strong(binder) }
        }
    }
}

impl<R: BinderRuntime> Clone for SpBinder<R> {
    fn clone(&self) -> Self {
        Self::acquire(self.raw);
        Self { raw: self.raw, _runtime: PhantomData }
    }

    /// Increment first, then release the previous binder: when both hold the
    /// same object its count never touches zero in between.
    fn clone_from(&mut self, source: &Self) {
        Self::acquire(source.raw);
        let old = mem::replace(&mut self.raw, source.raw);
        unsafe { Self::release(old) }
    }
}

impl<R: BinderRuntime> Drop for SpBinder<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<R: BinderRuntime> Default for SpBinder<R> {
    fn default() -> Self {
        Self::null()
    }
}

impl<R: BinderRuntime> PartialEq for SpBinder<R> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.raw, other.raw)
    }
}

impl<R: BinderRuntime> Eq for SpBinder<R> {}

impl<R: BinderRuntime> hash::Hash for SpBinder<R> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        (self.raw as usize).hash(state);
    }
}

impl<R: BinderRuntime> fmt::Debug for SpBinder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpBinder").field(&self.raw).finish()
    }
}
