//! Call accounting for any runtime.
//!
//! [`Audited<R>`] is a [`BinderRuntime`] that forwards every call to `R` and
//! records it in a ledger. Owners built over `Audited<R>` behave exactly like
//! owners over `R`; the ledger only watches. It answers the question the
//! owners exist for: did every acquired unit get released exactly once?
//!
//! The ledger is local to the calling thread. Owners moved to another thread
//! are accounted there.
//!
//! Per-handle counts (see [`LedgerConfig::per_handle`]) are keyed by address.
//! A runtime that reuses the address of a released object makes those counts
//! span several objects.

use core::{marker::PhantomData, ptr::NonNull};
use std::{cell::RefCell, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::{BinderRuntime, LedgerConfig};

/// Forwards to `R`, recording each call.
pub struct Audited<R>(PhantomData<fn() -> R>);

/// Totals of runtime calls seen on this thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub inc_strong: u64,
    pub dec_strong: u64,
    pub promoted: u64,
    pub promote_failed: u64,
    pub status_queried: u64,
    pub weak_deleted: u64,
    pub status_deleted: u64,
    pub parcel_deleted: u64,
    pub death_recipient_deleted: u64,
}

impl LedgerSnapshot {
    /// Strong units acquired minus strong units released.
    ///
    /// Units adopted from creation calls are invisible to the runtime, so a
    /// balanced workload that only adopts reads negative by that many.
    pub fn strong_delta(&self) -> i64 {
        (self.inc_strong + self.promoted) as i64 - self.dec_strong as i64
    }

    /// Single-owner resources released, across all kinds.
    pub fn destroyed(&self) -> u64 {
        self.weak_deleted + self.status_deleted + self.parcel_deleted + self.death_recipient_deleted
    }

    /// Calls made after `earlier` was taken.
    pub fn since(&self, earlier: &Self) -> Self {
        Self {
            inc_strong: self.inc_strong.saturating_sub(earlier.inc_strong),
            dec_strong: self.dec_strong.saturating_sub(earlier.dec_strong),
            promoted: self.promoted.saturating_sub(earlier.promoted),
            promote_failed: self.promote_failed.saturating_sub(earlier.promote_failed),
            status_queried: self.status_queried.saturating_sub(earlier.status_queried),
            weak_deleted: self.weak_deleted.saturating_sub(earlier.weak_deleted),
            status_deleted: self.status_deleted.saturating_sub(earlier.status_deleted),
            parcel_deleted: self.parcel_deleted.saturating_sub(earlier.parcel_deleted),
            death_recipient_deleted: self
                .death_recipient_deleted
                .saturating_sub(earlier.death_recipient_deleted),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Call {
    IncStrong,
    DecStrong,
    Promoted,
    PromoteFailed,
    StatusQueried,
    WeakDelete,
    StatusDelete,
    ParcelDelete,
    DeathRecipientDelete,
}

impl Call {
    fn name(self) -> &'static str {
        match self {
            Self::IncStrong => "inc_strong",
            Self::DecStrong => "dec_strong",
            Self::Promoted => "promoted",
            Self::PromoteFailed => "promote_failed",
            Self::StatusQueried => "status_is_ok",
            Self::WeakDelete => "weak_delete",
            Self::StatusDelete => "status_delete",
            Self::ParcelDelete => "parcel_delete",
            Self::DeathRecipientDelete => "death_recipient_delete",
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    cfg: LedgerConfig,
    counts: LedgerSnapshot,
    strong: HashMap<usize, i64>,
    destroyed: HashMap<usize, u64>,
}

impl Ledger {
    fn record(&mut self, call: Call, addr: usize) {
        if self.cfg.trace_calls {
            tracing::trace!(call = call.name(), addr, "runtime call");
        }

        match call {
            Call::IncStrong => {
                self.counts.inc_strong += 1;
                self.adjust_strong(addr, 1);
            }
            Call::DecStrong => {
                self.counts.dec_strong += 1;
                self.adjust_strong(addr, -1);
            }
            Call::Promoted => {
                self.counts.promoted += 1;
                self.adjust_strong(addr, 1);
            }
            Call::PromoteFailed => self.counts.promote_failed += 1,
            Call::StatusQueried => self.counts.status_queried += 1,
            Call::WeakDelete => {
                self.counts.weak_deleted += 1;
                self.note_destroyed(call, addr);
            }
            Call::StatusDelete => {
                self.counts.status_deleted += 1;
                self.note_destroyed(call, addr);
            }
            Call::ParcelDelete => {
                self.counts.parcel_deleted += 1;
                self.note_destroyed(call, addr);
            }
            Call::DeathRecipientDelete => {
                self.counts.death_recipient_deleted += 1;
                self.note_destroyed(call, addr);
            }
        }
    }

    fn adjust_strong(&mut self, addr: usize, by: i64) {
        if self.cfg.per_handle {
            *self.strong.entry(addr).or_default() += by;
        }
    }

    fn note_destroyed(&mut self, call: Call, addr: usize) {
        if !self.cfg.per_handle {
            return;
        }
        let count = self.destroyed.entry(addr).or_default();
        *count += 1;
        if *count > 1 {
            tracing::warn!(call = call.name(), addr, count = *count, "address released more than once");
        }
    }
}

thread_local! {
    static LEDGER: RefCell<Ledger> = RefCell::new(Ledger::default());
}

fn record(call: Call, addr: usize) {
    // Owners dropped during thread teardown may outlive the ledger.
    let _ = LEDGER.try_with(|ledger| ledger.borrow_mut().record(call, addr));
}

/// Replaces this thread's ledger configuration. Counts are kept.
pub fn configure(cfg: LedgerConfig) {
    LEDGER.with(|ledger| ledger.borrow_mut().cfg = cfg);
}

pub fn config() -> LedgerConfig {
    LEDGER.with(|ledger| ledger.borrow().cfg)
}

/// Totals recorded on this thread so far.
pub fn snapshot() -> LedgerSnapshot {
    LEDGER.with(|ledger| ledger.borrow().counts)
}

/// Clears all counts on this thread, keeping the configuration.
pub fn reset() {
    LEDGER.with(|ledger| {
        let mut ledger = ledger.borrow_mut();
        ledger.counts = LedgerSnapshot::default();
        ledger.strong.clear();
        ledger.destroyed.clear();
    });
}

/// Runs `f` and returns what it did to the runtime alongside its output.
pub fn measure<F, O>(f: F) -> (O, LedgerSnapshot)
where
    F: FnOnce() -> O,
{
    let before = snapshot();
    let out = f();
    (out, snapshot().since(&before))
}

/// Net strong units acquired on `binder` through the runtime. Always 0
/// unless per-handle tracking is on.
pub fn strong_balance<T>(binder: *const T) -> i64 {
    LEDGER.with(|ledger| ledger.borrow().strong.get(&(binder as usize)).copied().unwrap_or(0))
}

/// How many times the resource at `raw` was released. Always 0 unless
/// per-handle tracking is on.
pub fn destroy_count<T>(raw: *const T) -> u64 {
    LEDGER.with(|ledger| ledger.borrow().destroyed.get(&(raw as usize)).copied().unwrap_or(0))
}

#[inline]
fn addr<T>(raw: NonNull<T>) -> usize {
    raw.as_ptr() as usize
}

unsafe impl<R: BinderRuntime> BinderRuntime for Audited<R> {
    type Binder = R::Binder;
    type Weak = R::Weak;
    type Status = R::Status;
    type Parcel = R::Parcel;
    type DeathRecipient = R::DeathRecipient;

    unsafe fn inc_strong(binder: NonNull<R::Binder>) {
        unsafe { R::inc_strong(binder) };
        record(Call::IncStrong, addr(binder));
    }

    unsafe fn dec_strong(binder: NonNull<R::Binder>) {
        unsafe { R::dec_strong(binder) };
        record(Call::DecStrong, addr(binder));
    }

    unsafe fn weak_delete(weak: NonNull<R::Weak>) {
        unsafe { R::weak_delete(weak) };
        record(Call::WeakDelete, addr(weak));
    }

    unsafe fn weak_promote(weak: NonNull<R::Weak>) -> *mut R::Binder {
        let strong = unsafe { R::weak_promote(weak) };
        match NonNull::new(strong) {
            Some(binder) => record(Call::Promoted, addr(binder)),
            None => record(Call::PromoteFailed, addr(weak)),
        }
        strong
    }

    unsafe fn status_delete(status: NonNull<R::Status>) {
        unsafe { R::status_delete(status) };
        record(Call::StatusDelete, addr(status));
    }

    unsafe fn status_is_ok(status: NonNull<R::Status>) -> bool {
        let ok = unsafe { R::status_is_ok(status) };
        record(Call::StatusQueried, addr(status));
        ok
    }

    unsafe fn parcel_delete(parcel: NonNull<R::Parcel>) {
        unsafe { R::parcel_delete(parcel) };
        record(Call::ParcelDelete, addr(parcel));
    }

    unsafe fn death_recipient_delete(recipient: NonNull<R::DeathRecipient>) {
        unsafe { R::death_recipient_delete(recipient) };
        record(Call::DeathRecipientDelete, addr(recipient));
    }
}
