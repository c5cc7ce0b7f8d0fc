//! # TETHER
//! Deterministic lifetime management for reference-counted IPC handles.
//!
//! To "tether" is to hold something on a line of fixed length. This crate
//! holds binder objects and the resources around them so that every
//! acquisition is paired with exactly one release, no matter which path the
//! owning code takes out of scope.
//!
//! ## Owners
//! * [`ScopedResource`]: one single-owner handle, freed through its kind's
//!   [`Destroy`]. Specialized as [`ScopedWeak`], [`ScopedStatus`],
//!   [`ScopedParcel`] and [`ScopedDeathRecipient`].
//! * [`SpBinder`]: one strong refcount unit. Clone increments, drop
//!   decrements.
//!
//! ## Runtime
//! The IPC runtime itself stays outside: it is reached only through the
//! [`BinderRuntime`] trait. The `ndk` feature provides `libbinder_ndk`;
//! [`audit::Audited`] wraps any runtime to account for the calls it sees.
//!

pub mod audit;
pub mod error;
pub mod kinds;
#[cfg(feature = "ndk")]
pub mod ndk;
pub mod scoped;
pub mod strong;
pub mod traits;
pub mod types;
pub mod weak;

pub use error::*;
pub use kinds::*;
pub use scoped::*;
pub use strong::*;
pub use traits::*;
pub use types::*;
pub use weak::*;
