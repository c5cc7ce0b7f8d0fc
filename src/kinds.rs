//! Kind markers for the remaining single-owner resources.

use core::{marker::PhantomData, ptr::NonNull};

use crate::{BinderRuntime, Destroy, ScopedResource, TetherError};

pub struct StatusKind<R>(PhantomData<fn() -> R>);
pub struct ParcelKind<R>(PhantomData<fn() -> R>);
pub struct DeathRecipientKind<R>(PhantomData<fn() -> R>);

unsafe impl<R: BinderRuntime> Destroy for StatusKind<R> {
    type Raw = R::Status;
    const NAME: &'static str = "ScopedStatus";

    unsafe fn destroy(raw: NonNull<R::Status>) {
        unsafe { R::status_delete(raw) }
    }
}

unsafe impl<R: BinderRuntime> Destroy for ParcelKind<R> {
    type Raw = R::Parcel;
    const NAME: &'static str = "ScopedParcel";

    unsafe fn destroy(raw: NonNull<R::Parcel>) {
        unsafe { R::parcel_delete(raw) }
    }
}

unsafe impl<R: BinderRuntime> Destroy for DeathRecipientKind<R> {
    type Raw = R::DeathRecipient;
    const NAME: &'static str = "ScopedDeathRecipient";

    unsafe fn destroy(raw: NonNull<R::DeathRecipient>) {
        unsafe { R::death_recipient_delete(raw) }
    }
}

/// Owns one transaction status.
pub type ScopedStatus<R> = ScopedResource<StatusKind<R>>;

/// Owns one message buffer.
pub type ScopedParcel<R> = ScopedResource<ParcelKind<R>>;

/// Owns one death-notification registration.
pub type ScopedDeathRecipient<R> = ScopedResource<DeathRecipientKind<R>>;

impl<R: BinderRuntime> ScopedResource<StatusKind<R>> {
    /// True iff a status is held and the runtime reports success.
    ///
    /// An empty status is an absent result, not a failure, and the runtime
    /// is not consulted.
    pub fn is_ok(&self) -> bool {
        match NonNull::new(self.raw) {
            Some(status) => unsafe { R::status_is_ok(status) },
            None => false,
        }
    }

    /// [`is_ok`](Self::is_ok) as a `Result`, distinguishing an unset status
    /// from a failed one.
    pub fn check(&self) -> Result<(), TetherError> {
        let Some(status) = NonNull::new(self.raw) else {
            return Err(TetherError::status_unset());
        };
        if unsafe { R::status_is_ok(status) } {
            Ok(())
        } else {
            Err(TetherError::status_not_ok(self.raw as usize))
        }
    }
}
