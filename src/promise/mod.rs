//! Poll-based promises.
//!
//! A promise is a repeatable, zero-argument computation that eventually
//! resolves exactly once:
//!
//! - each call to [`Promise::poll`] returns [`Poll::Pending`] or
//!   [`Poll::Ready`];
//! - once a promise has returned `Ready`, it must not be polled again.
//!
//! Re-polling a resolved promise is a caller bug, not a reported error. The
//! helpers in this module panic when it happens so the bug surfaces early.
//!
//! Unlike [`std::future::Future`], a promise takes no waker context. Deciding
//! *when* to poll again belongs to whoever drives the promise.
//!
//! Any `FnMut() -> Poll<T>` closure is a promise, which makes move-only
//! resources easy to attach: capture them by value and they are released
//! exactly once, when the closure is dropped.
//!
//! ```
//! use try_concurrently::{Poll, Promise};
//!
//! let mut calls = 0;
//! let mut promise = move || {
//!     calls += 1;
//!     if calls < 2 { Poll::Pending } else { Poll::Ready(calls) }
//! };
//!
//! assert_eq!(promise.poll(), Poll::Pending);
//! assert_eq!(promise.poll(), Poll::Ready(2));
//! ```

mod map;
mod ready;

pub use map::Map;
pub use ready::{Never, Ready, never, ready};

use std::task::Poll;

/// A single-resolution, poll-based computation.
#[must_use = "promises do nothing unless polled"]
pub trait Promise {
    /// The value this promise resolves to.
    type Output;

    /// Advances the promise.
    ///
    /// Must not be called again after it has returned [`Poll::Ready`].
    fn poll(&mut self) -> Poll<Self::Output>;
}

impl<F, T> Promise for F
where
    F: FnMut() -> Poll<T>,
{
    type Output = T;

    fn poll(&mut self) -> Poll<T> {
        self()
    }
}

/// An owned, type-erased promise.
pub type BoxPromise<'a, T> = Box<dyn Promise<Output = T> + 'a>;

impl<T> Promise for Box<dyn Promise<Output = T> + '_> {
    type Output = T;

    fn poll(&mut self) -> Poll<T> {
        (**self).poll()
    }
}

/// A promise resolving to a `Result`.
///
/// Blanket-implemented for every `Promise<Output = Result<T, E>>`; it exists
/// so signatures can name the success and error types separately.
pub trait TryPromise {
    /// The success type.
    type Ok;
    /// The failure type.
    type Error;

    /// Polls the promise, yielding its `Result` once resolved.
    fn try_poll(&mut self) -> Poll<Result<Self::Ok, Self::Error>>;
}

impl<P, T, E> TryPromise for P
where
    P: Promise<Output = Result<T, E>> + ?Sized,
{
    type Ok = T;
    type Error = E;

    fn try_poll(&mut self) -> Poll<Result<T, E>> {
        self.poll()
    }
}

/// Adapters available on every promise.
pub trait PromiseExt: Promise {
    /// Transforms the resolved value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnOnce(Self::Output) -> U,
        Self: Sized,
    {
        Map::new(self, f)
    }

    /// Erases the promise type behind a box.
    fn boxed<'a>(self) -> BoxPromise<'a, Self::Output>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<P: Promise + ?Sized> PromiseExt for P {}
