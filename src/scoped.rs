//! Single-owner boxes around externally allocated resources.

use core::{fmt, marker::PhantomData, mem, ptr::NonNull};

use crate::{Destroy, TetherError};

/// Owns one raw handle of kind `D`, or nothing.
///
/// At most one live box considers itself the owner of a given non-null
/// handle. Replacing the handle (see [`reset`](Self::reset)) or dropping the
/// box releases the previous one through [`Destroy::destroy`]; a null handle
/// is never passed there.
///
/// The box is not `Clone`. Moving it, including plain assignment, transfers
/// the handle: `*a = b` releases what `a` held and then adopts `b`'s handle.
pub struct ScopedResource<D: Destroy> {
    pub(crate) raw: *mut D::Raw,
    _kind: PhantomData<D>,
}

// Handing ownership to another thread is fine when the raw resource allows it.
// Sharing one box between threads is not: the box is never `Sync`.
unsafe impl<D: Destroy> Send for ScopedResource<D> where D::Raw: Send {}

impl<D: Destroy> ScopedResource<D> {
    /// An empty box.
    pub const fn null() -> Self {
        Self { raw: core::ptr::null_mut(), _kind: PhantomData }
    }

    /// Takes ownership of `raw`. No validation is performed.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a handle the caller owns and that nothing else
    /// will release.
    pub const unsafe fn from_raw(raw: *mut D::Raw) -> Self {
        Self { raw, _kind: PhantomData }
    }

    /// Builds a box by letting an out-parameter style call populate it.
    ///
    /// The callback sees the storage of a fresh, empty box. Whatever pointer
    /// it leaves there is adopted.
    ///
    /// ```ignore
    /// let (status, rc) = unsafe { ScopedStatus::<Ndk>::fill(|slot| create_status(slot)) };
    /// ```
    ///
    /// # Safety
    ///
    /// Anything written into the slot must be null or an owned handle, as for
    /// [`from_raw`](Self::from_raw).
    pub unsafe fn fill<F, O>(f: F) -> (Self, O)
    where
        F: FnOnce(&mut *mut D::Raw) -> O,
    {
        let mut this = Self::null();
        let out = f(&mut this.raw);
        (this, out)
    }

    /// Like [`fill`](Self::fill), on an existing box.
    ///
    /// Fails with `SlotOccupied` without calling `f` if the box is not empty.
    ///
    /// # Safety
    ///
    /// Same contract as [`fill`](Self::fill).
    pub unsafe fn fill_in_place<F, O>(&mut self, f: F) -> Result<O, TetherError>
    where
        F: FnOnce(&mut *mut D::Raw) -> O,
    {
        if !self.raw.is_null() {
            tracing::debug!(kind = D::NAME, addr = self.raw as usize, "refusing to fill occupied slot");
            return Err(TetherError::slot_occupied(self.raw as usize));
        }
        Ok(f(&mut self.raw))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// The raw handle. Ownership is unaffected: do not release it, and do not
    /// use it past the lifetime of the box.
    #[inline]
    pub fn as_ptr(&self) -> *const D::Raw {
        self.raw
    }

    /// Mutable form of [`as_ptr`](Self::as_ptr), for calls that modify the
    /// resource.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut D::Raw {
        self.raw
    }

    /// Releases the current handle (if any) and takes ownership of `raw`.
    ///
    /// This is a transfer, not a share: nothing is incremented.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw`](Self::from_raw). `raw` must not be the
    /// handle currently held, unless it is null.
    pub unsafe fn reset(&mut self, raw: *mut D::Raw) {
        let old = mem::replace(&mut self.raw, raw);
        if let Some(old) = NonNull::new(old) {
            unsafe { D::destroy(old) }
        }
    }

    /// Releases the current handle, leaving the box empty.
    #[inline]
    pub fn clear(&mut self) {
        unsafe { self.reset(core::ptr::null_mut()) }
    }

    /// Gives up ownership without releasing. The caller becomes responsible
    /// for the returned handle.
    #[must_use = "the returned handle leaks unless released"]
    pub fn into_raw(self) -> *mut D::Raw {
        let raw = self.raw;
        mem::forget(self);
        raw
    }

    /// Moves the handle out, leaving this box empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Adopts `other`'s handle and returns the previous owner unreleased.
    #[inline]
    pub fn replace(&mut self, other: Self) -> Self {
        mem::replace(self, other)
    }
}

impl<D: Destroy> Drop for ScopedResource<D> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<D: Destroy> Default for ScopedResource<D> {
    fn default() -> Self {
        Self::null()
    }
}

impl<D: Destroy> fmt::Debug for ScopedResource<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(D::NAME).field(&self.raw).finish()
    }
}
