//! Precondition and assumption gating.
//!
//! Contract checks are switched by Cargo features:
//!
//! - preconditions are checked in debug builds by default, in every build with
//!   `check-preconditions`, and never with `unchecked` (unless a checking
//!   feature is also enabled);
//! - assumptions (internal invariants) are only checked with
//!   `check-assumptions`, which also turns preconditions on.
//!
//! A failed check panics immediately. Nothing is silently ignored while the
//! corresponding switch is on.
//!
//! The assumption checks have their own test target, built only with the
//! feature on:
//!
//! ```text
//! cargo test -p feed-framework --features check-assumptions
//! ```
//!
//! The `feed-example` tests also run with assumptions enabled.

use crate::error::FeedError;

/// Whether caller-facing preconditions are verified.
pub const CHECK_PRECONDITIONS: bool = cfg!(feature = "check-preconditions")
    || cfg!(feature = "check-assumptions")
    || (cfg!(debug_assertions) && !cfg!(feature = "unchecked"));

/// Whether internal invariants are verified after every mutation.
pub const CHECK_ASSUMPTIONS: bool = cfg!(feature = "check-assumptions");

/// Fails with `error` when `condition` is false and preconditions are checked.
#[inline]
#[track_caller]
pub fn precondition(condition: bool, error: FeedError) {
    if CHECK_PRECONDITIONS && !condition {
        violation("precondition", error);
    }
}

/// Same as [`precondition`] but builds the error only on failure.
#[inline]
#[track_caller]
pub(crate) fn precondition_with(condition: bool, error: impl FnOnce() -> FeedError) {
    if CHECK_PRECONDITIONS && !condition {
        violation("precondition", error());
    }
}

/// Fails with `msg` when `condition` is false and assumptions are checked.
#[inline]
#[track_caller]
pub fn assume(condition: bool, msg: &str) {
    if CHECK_ASSUMPTIONS && !condition {
        panic!("assumption violated: {}", msg);
    }
}

/// Unconditional failure for a violation detected by an always-on check.
#[cold]
#[track_caller]
pub(crate) fn violation(kind: &str, error: FeedError) -> ! {
    panic!("{} violated: {}", kind, error)
}
