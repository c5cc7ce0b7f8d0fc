mod common;

use tether::{
    LedgerConfig, ScopedParcel, SpBinder,
    audit::{self, LedgerSnapshot},
};

use common::{Rt, new_binder, new_parcel};

#[test]
fn default_config_counts_totals_only() {
    let cfg = LedgerConfig::default();
    assert!(!cfg.per_handle);
    assert!(cfg.trace_calls);

    audit::configure(cfg);
    audit::reset();

    let raw = new_binder();
    let binder = unsafe { SpBinder::<Rt>::from_raw(raw) };
    drop(binder.clone());

    assert_eq!(audit::snapshot().inc_strong, 1);
    assert_eq!(audit::strong_balance(raw), 0);
}

#[test]
fn reset_keeps_configuration() {
    let cfg = LedgerConfig { per_handle: true, trace_calls: false };
    audit::configure(cfg);

    let raw = new_parcel();
    drop(unsafe { ScopedParcel::<Rt>::from_raw(raw) });
    assert_eq!(audit::destroy_count(raw), 1);

    audit::reset();
    assert_eq!(audit::config(), cfg);
    assert_eq!(audit::snapshot(), LedgerSnapshot::default());
    assert_eq!(audit::destroy_count(raw), 0);
}

#[test]
fn measure_only_sees_its_closure() {
    audit::reset();
    let raw = new_binder();
    let binder = unsafe { SpBinder::<Rt>::from_raw(raw) };
    let outside = binder.clone();

    let (copy, calls) = audit::measure(|| binder.clone());
    assert_eq!(calls, LedgerSnapshot { inc_strong: 1, ..Default::default() });
    assert_eq!(audit::snapshot().inc_strong, 2);

    drop((copy, outside, binder));
    assert_eq!(audit::snapshot().dec_strong, 3);
}

#[test]
fn snapshot_arithmetic() {
    let later = LedgerSnapshot {
        inc_strong: 4,
        dec_strong: 6,
        promoted: 1,
        weak_deleted: 2,
        parcel_deleted: 1,
        ..Default::default()
    };
    let earlier = LedgerSnapshot { inc_strong: 1, dec_strong: 2, ..Default::default() };

    assert_eq!(later.strong_delta(), -1);
    assert_eq!(later.destroyed(), 3);

    let delta = later.since(&earlier);
    assert_eq!(delta.inc_strong, 3);
    assert_eq!(delta.dec_strong, 4);
    assert_eq!(delta.promoted, 1);
    assert_eq!(earlier.since(&later), LedgerSnapshot::default());
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let cfg: LedgerConfig = serde_json::from_str(r#"{"per_handle":true}"#).unwrap();
    assert!(cfg.per_handle);
    assert!(cfg.trace_calls);

    let cfg: LedgerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, LedgerConfig::default());
}

#[test]
fn snapshot_survives_export() {
    let snapshot = LedgerSnapshot {
        inc_strong: 7,
        dec_strong: 5,
        promoted: 2,
        promote_failed: 1,
        status_queried: 3,
        weak_deleted: 1,
        status_deleted: 4,
        parcel_deleted: 6,
        death_recipient_deleted: 1,
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains(r#""inc_strong":7"#));

    let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert_eq!(back.strong_delta(), 4);
}

#[test]
fn repeated_release_of_one_address_is_counted() {
    audit::configure(LedgerConfig { per_handle: true, ..Default::default() });
    audit::reset();

    let raw = new_parcel();
    drop(unsafe { ScopedParcel::<Rt>::from_raw(raw) });
    drop(unsafe { ScopedParcel::<Rt>::from_raw(raw) });

    assert_eq!(audit::destroy_count(raw), 2);
    assert_eq!(audit::snapshot().parcel_deleted, 2);
}
