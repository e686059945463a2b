//! Logging macros that cost nothing unless the `tracing` feature is enabled.
//!
//! With the feature on they forward to the `tracing` crate; without it they
//! expand to nothing, so the default library build carries no logging code.
//!
//! ```bash
//! RUST_LOG=search_trees=trace cargo run -- rb script.txt
//! ```

#![allow(unused_macros)]

/// Per-step structural events (rotations, borrows, merges).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Height changes and other tree-wide events.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}
