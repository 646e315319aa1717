//! Optional `tracing` integration.
//!
//! With the `tracing-integration` feature enabled this module re-exports the
//! `tracing` event macros. Without it, the macros below accept the same input
//! and expand to nothing, so instrumented code compiles either way at zero
//! cost.
//!
//! Crate code logs through this module, never through `tracing` directly:
//!
//! ```ignore
//! use crate::tracing_compat::debug;
//! debug!(round = 3, "combinator finished");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    // `warn` alone would clash with the built-in `#[warn]` attribute.
    macro_rules! warn_ {
        ($($arg:tt)*) => {};
    }

    pub(crate) use {debug, trace, warn_};
}

#[cfg(not(feature = "tracing-integration"))]
pub(crate) use noop::{debug, trace, warn_ as warn};
