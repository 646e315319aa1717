//! Side-slot lists for [`TryConcurrently`](super::TryConcurrently).
//!
//! Side promises are stored type-erased. A necessary entry only needs to say
//! "still running", "succeeded" or "failed with `E`", so its success payload is
//! dropped on resolution. An optional entry only needs to say whether it has
//! resolved at all.

use crate::promise::Promise;
use crate::tracing_compat::trace;
use core::fmt;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::task::Poll;

/// The four side-promise categories, named after the builder call that fills
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Polled before main; failure fails the combination.
    NecessaryPush,
    /// Polled before main; outcome discarded.
    Push,
    /// Polled after main; failure fails the combination.
    NecessaryPull,
    /// Polled after main; outcome discarded.
    Pull,
}

impl Slot {
    /// All slots, in the order a round visits them.
    pub const ALL: [Self; 4] = [
        Self::NecessaryPush,
        Self::Push,
        Self::NecessaryPull,
        Self::Pull,
    ];

    /// Returns true if a failure in this slot fails the combination.
    #[must_use]
    pub const fn is_necessary(self) -> bool {
        matches!(self, Self::NecessaryPush | Self::NecessaryPull)
    }

    /// Returns true if this slot is polled before main.
    #[must_use]
    pub const fn is_push(self) -> bool {
        matches!(self, Self::NecessaryPush | Self::Push)
    }

    /// Returns the slot name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NecessaryPush => "necessary_push",
            Self::Push => "push",
            Self::NecessaryPull => "necessary_pull",
            Self::Pull => "pull",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of unresolved side promises per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideCounts {
    /// Unresolved `necessary_push` entries.
    pub necessary_push: usize,
    /// Unresolved `push` entries.
    pub push: usize,
    /// Unresolved `necessary_pull` entries.
    pub necessary_pull: usize,
    /// Unresolved `pull` entries.
    pub pull: usize,
}

impl SideCounts {
    /// Returns the count for one slot.
    #[must_use]
    pub const fn get(&self, slot: Slot) -> usize {
        match slot {
            Slot::NecessaryPush => self.necessary_push,
            Slot::Push => self.push,
            Slot::NecessaryPull => self.necessary_pull,
            Slot::Pull => self.pull,
        }
    }

    /// Total unresolved side promises.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.necessary_push + self.push + self.necessary_pull + self.pull
    }
}

/// A side promise whose failure matters and whose success does not.
trait NecessarySide<E> {
    fn poll_side(&mut self) -> Poll<Result<(), E>>;
}

impl<P, U, E> NecessarySide<E> for P
where
    P: Promise<Output = Result<U, E>>,
{
    fn poll_side(&mut self) -> Poll<Result<(), E>> {
        match self.poll() {
            Poll::Ready(result) => Poll::Ready(result.map(drop)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// A side promise whose outcome is discarded.
trait DetachedSide {
    fn poll_detached(&mut self) -> Poll<()>;
}

impl<P: Promise> DetachedSide for P {
    fn poll_detached(&mut self) -> Poll<()> {
        match self.poll() {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Unresolved necessary entries of one slot, in insertion order.
pub(crate) struct NecessaryList<'a, E> {
    slot: Slot,
    entries: SmallVec<[Box<dyn NecessarySide<E> + 'a>; 2]>,
}

impl<'a, E> NecessaryList<'a, E> {
    pub(crate) fn new(slot: Slot) -> Self {
        debug_assert!(slot.is_necessary());
        Self {
            slot,
            entries: SmallVec::new(),
        }
    }

    pub(crate) fn push<P, U>(&mut self, promise: P)
    where
        P: Promise<Output = Result<U, E>> + 'a,
    {
        self.entries.push(Box::new(promise));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Polls every entry in order, removing the ones that succeed.
    ///
    /// Stops at the first failure and returns it; entries after the failing
    /// one are not polled. Pending entries do not stop the scan.
    pub(crate) fn poll_all(&mut self) -> Result<(), E> {
        let mut failure = None;
        self.entries.retain(|entry| {
            if failure.is_some() {
                return true;
            }
            match entry.poll_side() {
                Poll::Ready(Ok(())) => {
                    trace!(slot = %self.slot, "necessary side promise resolved");
                    false
                }
                Poll::Ready(Err(err)) => {
                    failure = Some(err);
                    true
                }
                Poll::Pending => true,
            }
        });
        failure.map_or(Ok(()), Err)
    }
}

/// Unresolved optional entries of one slot, in insertion order.
pub(crate) struct OptionalList<'a> {
    slot: Slot,
    entries: SmallVec<[Box<dyn DetachedSide + 'a>; 2]>,
}

impl<'a> OptionalList<'a> {
    pub(crate) fn new(slot: Slot) -> Self {
        debug_assert!(!slot.is_necessary());
        Self {
            slot,
            entries: SmallVec::new(),
        }
    }

    pub(crate) fn push<P>(&mut self, promise: P)
    where
        P: Promise + 'a,
    {
        self.entries.push(Box::new(promise));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops every unresolved entry without polling it.
    pub(crate) fn cancel(&mut self) {
        if !self.entries.is_empty() {
            trace!(
                slot = %self.slot,
                cancelled = self.entries.len(),
                "cancelling unresolved optional side promises"
            );
        }
        self.entries.clear();
    }

    /// Polls every entry in order, discarding the ones that resolve.
    pub(crate) fn poll_all(&mut self) {
        self.entries.retain(|entry| match entry.poll_detached() {
            Poll::Ready(()) => {
                trace!(slot = %self.slot, "optional side promise resolved, outcome discarded");
                false
            }
            Poll::Pending => true,
        });
    }
}
