//! Map adapter for promises.

use super::Promise;
use std::fmt;
use std::task::Poll;

/// A promise that applies a function to the output of another promise.
///
/// Created by [`PromiseExt::map`](super::PromiseExt::map).
#[must_use = "promises do nothing unless polled"]
pub struct Map<P, F> {
    inner: P,
    f: Option<F>,
}

impl<P, F> Map<P, F> {
    pub(crate) fn new(inner: P, f: F) -> Self {
        Self { inner, f: Some(f) }
    }

    /// Returns a reference to the wrapped promise.
    pub fn get_ref(&self) -> &P {
        &self.inner
    }
}

impl<P: fmt::Debug, F> fmt::Debug for Map<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("inner", &self.inner)
            .field("done", &self.f.is_none())
            .finish()
    }
}

impl<P, F, U> Promise for Map<P, F>
where
    P: Promise,
    F: FnOnce(P::Output) -> U,
{
    type Output = U;

    fn poll(&mut self) -> Poll<U> {
        assert!(self.f.is_some(), "Map polled after completion");
        match self.inner.poll() {
            Poll::Ready(value) => {
                let f = self.f.take().expect("map function present");
                Poll::Ready(f(value))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
