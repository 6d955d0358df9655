//! Nullable infrastructure for deterministic testing.
//!
//! The approval ledger depends on an injected registry authority and reports
//! through an event bus. This crate provides test-friendly stand-ins that:
//! - Return exactly what the test configured
//! - Can be reconfigured programmatically mid-test
//! - Record what the ledger asked and emitted
//!
//! Usage: swap real implementations for nullables in tests.

pub mod authority;
pub mod events;

pub use authority::NullAuthority;
pub use events::EventRecorder;
