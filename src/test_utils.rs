//! Test helpers: logging setup, phase/assert macros, and promise fixtures.
//!
//! Available under `cfg(test)` and with the `test-internals` feature so the
//! integration tests in `tests/` can share them.

use crate::promise::Promise;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;
use std::task::Poll;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Installs a `tracing` subscriber for tests.
///
/// Honors `RUST_LOG`, defaulting to `trace` for this crate. Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("try_concurrently=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Logs the start of a test phase.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        ::tracing::info!(phase = %$name, "========== TEST PHASE ==========");
    };
}

/// Logs a section inside a test.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        ::tracing::info!(section = %$name, "---------- section ----------");
    };
}

/// Logs successful completion of a test.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        ::tracing::info!(test = %$name, "test completed");
    };
}

/// Asserts a condition, logging expected and actual values first.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let cond = $cond;
        ::tracing::debug!(
            check = %$msg,
            expected = ?$expected,
            actual = ?$actual,
            passed = cond,
            "assertion"
        );
        assert!(
            cond,
            "{}: expected {:?}, got {:?}",
            $msg, $expected, $actual
        );
    }};
}

/// Records the order in which promises are polled.
///
/// Every promise handed out owns its tag on the heap and appends it to the
/// log each time it is polled.
#[derive(Debug, Clone, Default)]
pub struct PollLog {
    order: Rc<RefCell<Vec<String>>>,
}

impl PollLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A promise that resolves to `Ok(())` on its first poll.
    pub fn ok(&self, tag: &str) -> impl Promise<Output = Result<(), String>> + 'static {
        self.after(tag, 0, Ok(()))
    }

    /// A promise that fails with its own tag as the error on its first poll.
    pub fn fail(&self, tag: &str) -> impl Promise<Output = Result<(), String>> + 'static {
        self.after(tag, 0, Err(tag.to_owned()))
    }

    /// A promise that never resolves.
    pub fn never(&self, tag: &str) -> impl Promise<Output = Result<(), String>> + 'static {
        let order = Rc::clone(&self.order);
        let tag = tag.to_owned();
        move || -> Poll<Result<(), String>> {
            order.borrow_mut().push(tag.clone());
            Poll::Pending
        }
    }

    /// A promise that stays pending for `rounds` polls, then resolves to
    /// `outcome`.
    pub fn after(
        &self,
        tag: &str,
        rounds: usize,
        outcome: Result<(), String>,
    ) -> impl Promise<Output = Result<(), String>> + 'static {
        let order = Rc::clone(&self.order);
        let tag = tag.to_owned();
        let mut remaining = rounds;
        let mut outcome = Some(outcome);
        move || -> Poll<Result<(), String>> {
            order.borrow_mut().push(tag.clone());
            if remaining > 0 {
                remaining -= 1;
                return Poll::Pending;
            }
            Poll::Ready(outcome.take().expect("promise polled after completion"))
        }
    }

    /// Returns the tags polled since the last call, clearing the log.
    pub fn finish(&self) -> Vec<String> {
        std::mem::take(&mut *self.order.borrow_mut())
    }
}

/// Counts live resources so tests can check exactly-once release.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    acquired: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl ResourceLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a new tracked resource.
    #[must_use]
    pub fn acquire(&self) -> Tracked {
        self.acquired.set(self.acquired.get() + 1);
        Tracked {
            released: Rc::clone(&self.released),
        }
    }

    /// Resources acquired so far.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    /// Resources released so far.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Resources acquired and not yet released.
    #[must_use]
    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }
}

/// A resource registered with a [`ResourceLedger`].
///
/// Counts itself as released when dropped.
#[derive(Debug)]
pub struct Tracked {
    released: Rc<Cell<usize>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}
