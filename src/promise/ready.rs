//! Promises that resolve immediately or never.

use super::Promise;
use std::fmt;
use std::marker::PhantomData;
use std::task::Poll;

/// A promise that resolves to its value on the first poll.
///
/// Created by [`ready`].
#[derive(Debug, Clone)]
#[must_use = "promises do nothing unless polled"]
pub struct Ready<T> {
    value: Option<T>,
}

impl<T> Ready<T> {
    /// Returns the value if the promise has not been polled yet.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Promise for Ready<T> {
    type Output = T;

    fn poll(&mut self) -> Poll<T> {
        let value = self.value.take().expect("Ready polled after completion");
        Poll::Ready(value)
    }
}

/// Creates a promise that is immediately ready with `value`.
pub fn ready<T>(value: T) -> Ready<T> {
    Ready { value: Some(value) }
}

/// A promise that never resolves.
///
/// Created by [`never`].
#[must_use = "promises do nothing unless polled"]
pub struct Never<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Never<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Never")
    }
}

impl<T> Promise for Never<T> {
    type Output = T;

    fn poll(&mut self) -> Poll<T> {
        Poll::Pending
    }
}

/// Creates a promise that stays pending forever.
pub fn never<T>() -> Never<T> {
    Never {
        _output: PhantomData,
    }
}
