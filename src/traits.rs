//! The seams to the outside: the binder runtime, and the release operation
//! of each single-owner resource kind.
//!
//! Nothing in this crate allocates, frees, or counts a binder object itself.
//! Every effect on a handle goes through one of the associated functions
//! below, and every one of them receives a `NonNull`: the owners filter null
//! out before the runtime is ever reached.

use core::ptr::NonNull;

/// Flat handle API of a binder runtime.
///
/// The associated types are the runtime's opaque handle types; only pointers
/// to them ever cross this boundary.
///
/// # Safety
///
/// Implementors must uphold the refcounting contract the owners rely on:
///
/// - `inc_strong` adds exactly one strong unit and `dec_strong` removes
///   exactly one. Both must be safe to call concurrently from any thread on
///   the same binder.
/// - `weak_promote` returns either null or a binder carrying one fresh strong
///   unit owned by the caller. It must be atomic with respect to the last
///   `dec_strong` on the same object: a referent that has reached zero strong
///   units must never be handed out again.
/// - Each `*_delete` releases the resource it receives exactly once and the
///   pointer is not used afterwards.
pub unsafe trait BinderRuntime: 'static {
    type Binder;
    type Weak;
    type Status;
    type Parcel;
    type DeathRecipient;

    /// # Safety
    /// `binder` must point to a live binder on which the caller holds a unit.
    unsafe fn inc_strong(binder: NonNull<Self::Binder>);

    /// # Safety
    /// The caller gives up one strong unit it owns on `binder`.
    unsafe fn dec_strong(binder: NonNull<Self::Binder>);

    /// # Safety
    /// The caller gives up its ownership of `weak`.
    unsafe fn weak_delete(weak: NonNull<Self::Weak>);

    /// # Safety
    /// `weak` must be a live weak token. The token is borrowed, not consumed.
    unsafe fn weak_promote(weak: NonNull<Self::Weak>) -> *mut Self::Binder;

    /// # Safety
    /// The caller gives up its ownership of `status`.
    unsafe fn status_delete(status: NonNull<Self::Status>);

    /// # Safety
    /// `status` must be a live status.
    unsafe fn status_is_ok(status: NonNull<Self::Status>) -> bool;

    /// # Safety
    /// The caller gives up its ownership of `parcel`.
    unsafe fn parcel_delete(parcel: NonNull<Self::Parcel>);

    /// # Safety
    /// The caller gives up its ownership of `recipient`.
    unsafe fn death_recipient_delete(recipient: NonNull<Self::DeathRecipient>);
}

/// The release operation of a single-owner resource kind.
///
/// Kinds are zero-sized markers that are never constructed; they only bind a
/// raw handle type to the call that frees it. See [`ScopedResource`].
///
/// # Safety
///
/// `destroy` must release exactly the resource it is given and nothing else.
///
/// [`ScopedResource`]: crate::ScopedResource
pub unsafe trait Destroy {
    type Raw;

    /// Name used by `Debug` output of the owning box.
    const NAME: &'static str;

    /// # Safety
    /// The caller gives up its ownership of `raw`.
    unsafe fn destroy(raw: NonNull<Self::Raw>);
}
