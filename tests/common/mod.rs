#![allow(dead_code)]

use std::{
    ptr::NonNull,
    sync::atomic::{AtomicI64, Ordering},
};

use tether::{BinderRuntime, LedgerConfig, audit::{self, Audited}};

/// In-memory stand-in for the IPC runtime.
///
/// Objects are leaked rather than freed so that addresses stay unique for the
/// whole test and weak tokens can look at a released binder's count.
pub enum Fake {}

pub type Rt = Audited<Fake>;

pub struct FakeBinder {
    pub strong: AtomicI64,
}

pub struct FakeWeak {
    pub target: NonNull<FakeBinder>,
}

pub struct FakeStatus {
    pub ok: bool,
}

pub struct FakeParcel {
    pub len: usize,
}

pub struct FakeRecipient {
    pub cookie: u32,
}

unsafe impl BinderRuntime for Fake {
    type Binder = FakeBinder;
    type Weak = FakeWeak;
    type Status = FakeStatus;
    type Parcel = FakeParcel;
    type DeathRecipient = FakeRecipient;

    unsafe fn inc_strong(binder: NonNull<FakeBinder>) {
        let prev = unsafe { binder.as_ref() }.strong.fetch_add(1, Ordering::SeqCst);
        assert!(prev > 0, "incremented a released binder");
    }

    unsafe fn dec_strong(binder: NonNull<FakeBinder>) {
        let prev = unsafe { binder.as_ref() }.strong.fetch_sub(1, Ordering::SeqCst);
        assert!(prev > 0, "strong count underflow");
    }

    unsafe fn weak_delete(_weak: NonNull<FakeWeak>) {}

    unsafe fn weak_promote(weak: NonNull<FakeWeak>) -> *mut FakeBinder {
        let target = unsafe { weak.as_ref() }.target;
        let strong = &unsafe { target.as_ref() }.strong;
        let mut current = strong.load(Ordering::SeqCst);
        while current > 0 {
            match strong.compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return target.as_ptr(),
                Err(seen) => current = seen,
            }
        }
        std::ptr::null_mut()
    }

    unsafe fn status_delete(_status: NonNull<FakeStatus>) {}

    unsafe fn status_is_ok(status: NonNull<FakeStatus>) -> bool {
        unsafe { status.as_ref() }.ok
    }

    unsafe fn parcel_delete(_parcel: NonNull<FakeParcel>) {}

    unsafe fn death_recipient_delete(_recipient: NonNull<FakeRecipient>) {}
}

/// Fresh ledger with per-handle tracking, plus test logging.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    audit::configure(LedgerConfig { per_handle: true, ..Default::default() });
    audit::reset();
}

/// A binder carrying the one strong unit a creation call hands out.
pub fn new_binder() -> *mut FakeBinder {
    Box::into_raw(Box::new(FakeBinder { strong: AtomicI64::new(1) }))
}

pub fn strong_count(binder: *mut FakeBinder) -> i64 {
    unsafe { &*binder }.strong.load(Ordering::SeqCst)
}

pub fn new_weak(binder: *mut FakeBinder) -> *mut FakeWeak {
    let target = NonNull::new(binder).expect("weak token needs a binder");
    Box::into_raw(Box::new(FakeWeak { target }))
}

pub fn new_status(ok: bool) -> *mut FakeStatus {
    Box::into_raw(Box::new(FakeStatus { ok }))
}

pub fn new_parcel() -> *mut FakeParcel {
    Box::into_raw(Box::new(FakeParcel { len: 0 }))
}

pub fn new_recipient() -> *mut FakeRecipient {
    Box::into_raw(Box::new(FakeRecipient { cookie: 0 }))
}
