//! The `TryConcurrently` combinator.
//!
//! Drives one main promise together with any number of side promises. Each
//! side promise is filed under one of four [`Slot`]s, chosen by the builder
//! call that attached it:
//!
//! | Builder            | Polled       | Failure                 |
//! |--------------------|--------------|-------------------------|
//! | `necessary_push`   | before main  | fails the combination   |
//! | `push`             | before main  | ignored                 |
//! | `necessary_pull`   | after main   | fails the combination   |
//! | `pull`             | after main   | ignored                 |
//!
//! # Rounds
//!
//! Every poll runs one round, synchronously and in this order:
//!
//! 1. `necessary_push` entries in insertion order. A failure ends the round
//!    and the combination with that error; successes are removed.
//! 2. `push` entries in insertion order; resolved entries are discarded.
//! 3. Main, if it has not resolved yet. A failure ends the combination; a
//!    success is recorded but does not finish it.
//! 4. `necessary_pull` entries, as in step 1. They run even while main is
//!    still pending.
//! 5. `pull` entries, as in step 2.
//! 6. If main has resolved and no necessary entry is left, the combination
//!    resolves to main's value and any optional entries still running are
//!    dropped.
//!
//! The first failure observed in that order wins and is returned verbatim.
//! Entries that resolve are dropped immediately, so no promise is ever polled
//! after it returned `Ready`.
//!
//! # Cancellation
//!
//! Dropping the combinator drops every promise it still owns, exactly once.
//! Moving it moves them without polling.
//!
//! # Example
//!
//! ```
//! use try_concurrently::{Poll, Promise, ready, never, try_concurrently};
//!
//! let mut checks_left = 1;
//! let mut combined = try_concurrently(ready(Ok::<_, String>("response")))
//!     .necessary_push(ready(Ok::<(), String>(())))
//!     .necessary_pull(move || {
//!         if checks_left == 0 {
//!             return Poll::Ready(Ok::<(), String>(()));
//!         }
//!         checks_left -= 1;
//!         Poll::Pending
//!     })
//!     .pull(never::<()>());
//!
//! assert_eq!(combined.poll(), Poll::Pending);
//! assert_eq!(combined.poll(), Poll::Ready(Ok("response")));
//! ```

use super::side::{NecessaryList, OptionalList, SideCounts, Slot};
use crate::promise::{Promise, TryPromise};
use crate::tracing_compat::{debug, trace};
use core::fmt;
use std::mem;
use std::task::Poll;

/// Progress of the main promise.
enum Main<M: TryPromise> {
    /// Still being polled.
    Running(M),
    /// Resolved successfully; waiting on necessary side promises.
    Resolved(M::Ok),
    /// The combination has produced its result.
    Done,
}

/// A main promise combined with categorized side promises.
///
/// Created by [`try_concurrently`] or [`TryConcurrently::new`]; see the
/// [module documentation](self) for the polling rules.
#[must_use = "promises do nothing unless polled"]
pub struct TryConcurrently<'a, M: TryPromise> {
    main: Main<M>,
    necessary_push: NecessaryList<'a, M::Error>,
    push: OptionalList<'a>,
    necessary_pull: NecessaryList<'a, M::Error>,
    pull: OptionalList<'a>,
    rounds: u64,
}

/// Wraps `main` in a [`TryConcurrently`] with no side promises.
pub fn try_concurrently<'a, M: TryPromise>(main: M) -> TryConcurrently<'a, M> {
    TryConcurrently::new(main)
}

impl<'a, M: TryPromise> TryConcurrently<'a, M> {
    /// Creates a combinator around `main` with no side promises.
    pub fn new(main: M) -> Self {
        Self {
            main: Main::Running(main),
            necessary_push: NecessaryList::new(Slot::NecessaryPush),
            push: OptionalList::new(Slot::Push),
            necessary_pull: NecessaryList::new(Slot::NecessaryPull),
            pull: OptionalList::new(Slot::Pull),
            rounds: 0,
        }
    }

    /// Adds a side promise polled before main that must succeed.
    pub fn necessary_push<P, U>(mut self, promise: P) -> Self
    where
        P: Promise<Output = Result<U, M::Error>> + 'a,
    {
        self.debug_assert_running();
        self.necessary_push.push(promise);
        self
    }

    /// Adds a side promise polled before main whose outcome is ignored.
    pub fn push<P>(mut self, promise: P) -> Self
    where
        P: Promise + 'a,
    {
        self.debug_assert_running();
        self.push.push(promise);
        self
    }

    /// Adds a side promise polled after main that must succeed.
    pub fn necessary_pull<P, U>(mut self, promise: P) -> Self
    where
        P: Promise<Output = Result<U, M::Error>> + 'a,
    {
        self.debug_assert_running();
        self.necessary_pull.push(promise);
        self
    }

    /// Adds a side promise polled after main whose outcome is ignored.
    pub fn pull<P>(mut self, promise: P) -> Self
    where
        P: Promise + 'a,
    {
        self.debug_assert_running();
        self.pull.push(promise);
        self
    }

    /// Returns true once the combination has produced its result.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.main, Main::Done)
    }

    /// Returns true if main has resolved successfully but the combination is
    /// still waiting on necessary side promises.
    #[must_use]
    pub fn main_resolved(&self) -> bool {
        matches!(self.main, Main::Resolved(_))
    }

    /// Number of rounds run so far.
    #[must_use]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Number of unresolved side promises in each slot.
    #[must_use]
    pub fn pending(&self) -> SideCounts {
        SideCounts {
            necessary_push: self.necessary_push.len(),
            push: self.push.len(),
            necessary_pull: self.necessary_pull.len(),
            pull: self.pull.len(),
        }
    }

    fn debug_assert_running(&self) {
        debug_assert!(
            !self.is_terminated(),
            "side promise attached to a completed TryConcurrently"
        );
    }

    /// Ends the combination with `err`, dropping everything still owned.
    fn fail(&mut self, err: M::Error) -> Poll<Result<M::Ok, M::Error>> {
        self.teardown();
        Poll::Ready(Err(err))
    }

    fn teardown(&mut self) {
        self.main = Main::Done;
        self.necessary_push.clear();
        self.push.cancel();
        self.necessary_pull.clear();
        self.pull.cancel();
    }
}

impl<M: TryPromise> Promise for TryConcurrently<'_, M> {
    type Output = Result<M::Ok, M::Error>;

    fn poll(&mut self) -> Poll<Self::Output> {
        assert!(
            !self.is_terminated(),
            "TryConcurrently polled after completion"
        );
        self.rounds += 1;
        trace!(
            round = self.rounds,
            necessary_push = self.necessary_push.len(),
            push = self.push.len(),
            necessary_pull = self.necessary_pull.len(),
            pull = self.pull.len(),
            "try_concurrently round"
        );

        if let Err(err) = self.necessary_push.poll_all() {
            debug!(slot = %Slot::NecessaryPush, round = self.rounds, "necessary side promise failed");
            return self.fail(err);
        }
        self.push.poll_all();

        if let Main::Running(main) = &mut self.main {
            match main.try_poll() {
                Poll::Ready(Ok(value)) => {
                    trace!(round = self.rounds, "main promise resolved");
                    self.main = Main::Resolved(value);
                }
                Poll::Ready(Err(err)) => {
                    debug!(round = self.rounds, "main promise failed");
                    return self.fail(err);
                }
                Poll::Pending => {}
            }
        }

        if let Err(err) = self.necessary_pull.poll_all() {
            debug!(slot = %Slot::NecessaryPull, round = self.rounds, "necessary side promise failed");
            return self.fail(err);
        }
        self.pull.poll_all();

        let obligations_met = self.necessary_push.is_empty() && self.necessary_pull.is_empty();
        match mem::replace(&mut self.main, Main::Done) {
            Main::Resolved(value) if obligations_met => {
                debug!(round = self.rounds, "try_concurrently resolved");
                self.teardown();
                Poll::Ready(Ok(value))
            }
            main => {
                self.main = main;
                Poll::Pending
            }
        }
    }
}

impl<M> fmt::Debug for TryConcurrently<'_, M>
where
    M: TryPromise + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main: &dyn fmt::Debug = match &self.main {
            Main::Running(main) => main,
            Main::Resolved(_) => &"<resolved>",
            Main::Done => &"<done>",
        };
        f.debug_struct("TryConcurrently")
            .field("main", main)
            .field("pending", &self.pending())
            .field("rounds", &self.rounds)
            .finish()
    }
}
