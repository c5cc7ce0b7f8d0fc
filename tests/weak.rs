mod common;

use tether::{ScopedWeak, SpBinder, TetherCode, audit};

use common::{Rt, init, new_binder, new_weak, strong_count};

#[test]
fn promoting_a_live_referent_yields_a_new_unit() {
    init();
    let raw = new_binder();
    let strong = unsafe { SpBinder::<Rt>::from_raw(raw) };
    let weak = unsafe { ScopedWeak::<Rt>::from_raw(new_weak(raw)) };

    let (promoted, calls) = audit::measure(|| weak.promote());
    assert!(!promoted.is_null());
    assert_eq!(promoted, strong);
    assert_eq!(calls.promoted, 1);
    assert_eq!(calls.inc_strong, 0);
    assert_eq!(strong_count(raw), 2);

    drop(strong);
    assert_eq!(strong_count(raw), 1);

    let again = weak.try_promote().unwrap();
    assert_eq!(strong_count(raw), 2);
    drop(again);
    drop(promoted);
    assert_eq!(strong_count(raw), 0);
}

#[test]
fn promoting_a_released_referent_yields_null() {
    init();
    let raw = new_binder();
    let weak = unsafe { ScopedWeak::<Rt>::from_raw(new_weak(raw)) };
    drop(unsafe { SpBinder::<Rt>::from_raw(raw) });
    assert_eq!(strong_count(raw), 0);

    let promoted = weak.promote();
    assert!(promoted.is_null());
    assert_eq!(audit::snapshot().promote_failed, 1);

    let e = weak.try_promote().unwrap_err();
    assert_eq!(e.code, TetherCode::PromoteFailed);
    assert!(format!("{e}").contains("Promotion failed"));

    drop(promoted);
    assert_eq!(strong_count(raw), 0);
    assert_eq!(audit::snapshot().dec_strong, 1);
}

#[test]
fn null_token_promotes_without_the_runtime() {
    init();
    let weak = ScopedWeak::<Rt>::null();

    let (promoted, calls) = audit::measure(|| weak.promote());
    assert!(promoted.is_null());
    assert_eq!(calls, audit::LedgerSnapshot::default());
}

#[test]
fn dropping_the_token_releases_it_once() {
    init();
    let raw = new_binder();
    let token = new_weak(raw);

    let mut weak = unsafe { ScopedWeak::<Rt>::from_raw(token) };
    let moved = weak.take();
    drop(weak);
    assert_eq!(audit::destroy_count(token), 0);

    drop(moved);
    assert_eq!(audit::destroy_count(token), 1);
    assert_eq!(audit::snapshot().weak_deleted, 1);

    // The token never held a strong unit.
    assert_eq!(strong_count(raw), 1);
}
