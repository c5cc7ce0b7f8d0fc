//! The platform binder runtime, `libbinder_ndk`.
//!
//! Enabled with the `ndk` feature. Linking requires the NDK sysroot of an
//! Android target.

#![allow(non_camel_case_types, non_snake_case)]

use core::{
    marker::{PhantomData, PhantomPinned},
    ptr::NonNull,
};

use crate::{BinderRuntime, ScopedDeathRecipient, ScopedParcel, ScopedStatus, ScopedWeak, SpBinder};

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
                _marker: PhantomData<(*mut u8, PhantomPinned)>,
            }
        )*
    };
}

opaque!(AIBinder, AIBinder_Weak, AStatus, AParcel, AIBinder_DeathRecipient);

// Binder objects, weak tokens, statuses and death recipients are internally
// synchronized by libbinder_ndk. Parcels are not, and stay on their thread.
unsafe impl Send for AIBinder {}
unsafe impl Sync for AIBinder {}
unsafe impl Send for AIBinder_Weak {}
unsafe impl Sync for AIBinder_Weak {}
unsafe impl Send for AStatus {}
unsafe impl Sync for AStatus {}
unsafe impl Send for AIBinder_DeathRecipient {}
unsafe impl Sync for AIBinder_DeathRecipient {}

#[link(name = "binder_ndk")]
unsafe extern "C" {
    fn AIBinder_incStrong(binder: *mut AIBinder);
    fn AIBinder_decStrong(binder: *mut AIBinder);
    fn AIBinder_Weak_delete(weak: *mut AIBinder_Weak);
    fn AIBinder_Weak_promote(weak: *mut AIBinder_Weak) -> *mut AIBinder;
    fn AStatus_delete(status: *mut AStatus);
    fn AStatus_isOk(status: *const AStatus) -> bool;
    fn AParcel_delete(parcel: *mut AParcel);
    fn AIBinder_DeathRecipient_delete(recipient: *mut AIBinder_DeathRecipient);
}

/// `libbinder_ndk` as a [`BinderRuntime`].
pub enum Ndk {}

unsafe impl BinderRuntime for Ndk {
    type Binder = AIBinder;
    type Weak = AIBinder_Weak;
    type Status = AStatus;
    type Parcel = AParcel;
    type DeathRecipient = AIBinder_DeathRecipient;

    unsafe fn inc_strong(binder: NonNull<AIBinder>) {
        unsafe { AIBinder_incStrong(binder.as_ptr()) }
    }

    unsafe fn dec_strong(binder: NonNull<AIBinder>) {
        unsafe { AIBinder_decStrong(binder.as_ptr()) }
    }

    unsafe fn weak_delete(weak: NonNull<AIBinder_Weak>) {
        unsafe { AIBinder_Weak_delete(weak.as_ptr()) }
    }

    unsafe fn weak_promote(weak: NonNull<AIBinder_Weak>) -> *mut AIBinder {
        unsafe { AIBinder_Weak_promote(weak.as_ptr()) }
    }

    unsafe fn status_delete(status: NonNull<AStatus>) {
        unsafe { AStatus_delete(status.as_ptr()) }
    }

    unsafe fn status_is_ok(status: NonNull<AStatus>) -> bool {
        unsafe { AStatus_isOk(status.as_ptr()) }
    }

    unsafe fn parcel_delete(parcel: NonNull<AParcel>) {
        unsafe { AParcel_delete(parcel.as_ptr()) }
    }

    unsafe fn death_recipient_delete(recipient: NonNull<AIBinder_DeathRecipient>) {
        unsafe { AIBinder_DeathRecipient_delete(recipient.as_ptr()) }
    }
}

pub type SpAIBinder = SpBinder<Ndk>;
pub type ScopedAIBinder_Weak = ScopedWeak<Ndk>;
pub type ScopedAStatus = ScopedStatus<Ndk>;
pub type ScopedAParcel = ScopedParcel<Ndk>;
pub type ScopedAIBinder_DeathRecipient = ScopedDeathRecipient<Ndk>;
