//! Weak references and promotion.

use core::{marker::PhantomData, ptr::NonNull};

use crate::{BinderRuntime, Destroy, ScopedResource, SpBinder, TetherError};

/// Kind marker for weak binder tokens.
pub struct WeakKind<R>(PhantomData<fn() -> R>);

unsafe impl<R: BinderRuntime> Destroy for WeakKind<R> {
    type Raw = R::Weak;
    const NAME: &'static str = "ScopedWeak";

    unsafe fn destroy(raw: NonNull<R::Weak>) {
        unsafe { R::weak_delete(raw) }
    }
}

/// Owns one weak token. Dropping it releases the weak registration.
pub type ScopedWeak<R> = ScopedResource<WeakKind<R>>;

impl<R: BinderRuntime> ScopedResource<WeakKind<R>> {
    /// Attempts to obtain a strong reference to the referent.
    ///
    /// The result is null when the referent is already gone, or when this
    /// token is null. A successful promotion already carries its own unit,
    /// so nothing extra is incremented.
    pub fn promote(&self) -> SpBinder<R> {
        let Some(weak) = NonNull::new(self.raw) else {
            return SpBinder::null();
        };
        // Promotion borrows the token; `self` keeps owning it.
        let strong = unsafe { SpBinder::from_raw(R::weak_promote(weak)) };
        if strong.is_null() {
            tracing::debug!(weak = self.raw as usize, "promotion found referent released");
        }
        strong
    }

    /// [`promote`](Self::promote), reporting a null result as `PromoteFailed`.
    pub fn try_promote(&self) -> Result<SpBinder<R>, TetherError> {
        let strong = self.promote();
        if strong.is_null() {
            return Err(TetherError::promote_failed(self.raw as usize));
        }
        Ok(strong)
    }
}
