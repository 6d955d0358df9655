//! Shared utilities for the permit workspace.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LoggingError};
