//! Try-concurrently: poll-based promise combination with side obligations.
//!
//! # Overview
//!
//! A request pipeline often needs to run cross-cutting work next to the main
//! request logic: an authorization check that must pass before the response
//! counts, a metrics hook that should run but must never fail the call. This
//! crate expresses that with one primitive, [`TryConcurrently`], which drives a
//! main [`Promise`] together with side promises on a single thread, without
//! blocking and without a runtime.
//!
//! # Core Guarantees
//!
//! - **Deterministic order**: each round polls necessary-push, push, main,
//!   necessary-pull, then pull entries, in insertion order within a slot
//! - **Earliest failure wins**: a necessary failure or a main failure ends the
//!   combination immediately with that error, unchanged
//! - **Optional means optional**: push/pull outcomes never affect the result
//!   and never delay it
//! - **Exactly-once release**: resolved promises are dropped as soon as they
//!   resolve; dropping or moving the combinator never polls or double-drops
//!
//! # Module Structure
//!
//! - [`promise`]: the [`Promise`] trait, [`Poll`] and small promise helpers
//! - [`combinator`]: [`TryConcurrently`] and the side-slot categories
//! - [`pipeline`]: named filter factories assembled from configuration
//! - [`error`](mod@error): error types for the pipeline layer
//! - [`tracing_compat`]: optional tracing integration (requires `tracing-integration` feature)
//!
//! # Example
//!
//! ```
//! use try_concurrently::{Poll, Promise, never, ready, try_concurrently};
//!
//! let mut combined = try_concurrently(ready(Ok::<_, String>(42)))
//!     .necessary_push(ready(Ok::<(), String>(())))
//!     .pull(never::<()>());
//!
//! assert_eq!(combined.poll(), Poll::Ready(Ok(42)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]

pub mod combinator;
pub mod error;
pub mod pipeline;
pub mod promise;
pub mod tracing_compat;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

pub use combinator::try_concurrently::{TryConcurrently, try_concurrently};
pub use combinator::{SideCounts, Slot};
pub use error::{ConfigError, PipelineError, RegistryError, ValidationError};
pub use promise::{BoxPromise, Never, Promise, PromiseExt, Ready, TryPromise, never, ready};
pub use std::task::Poll;
