//! Combinators over poll-based promises.
//!
//! - [`try_concurrently`](mod@try_concurrently): run a main promise with
//!   necessary and optional side promises polled before or after it
//! - [`side`]: the side-slot categories and their bookkeeping

pub mod side;
pub mod try_concurrently;

pub use side::{SideCounts, Slot};
pub use self::try_concurrently::{TryConcurrently, try_concurrently};
