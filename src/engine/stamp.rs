//! engine::stamp
//!
//! Identity and time for new commits.
//!
//! Transitions take a [`Stamper`] instead of reaching for randomness or the
//! clock, so the same inputs always produce the same graph under test.

use crate::core::types::{CommitId, UtcTimestamp};

/// Source of fresh commit ids and creation instants.
pub trait Stamper {
    /// A commit id never returned before by this stamper.
    fn next_id(&mut self) -> CommitId;

    /// The creation instant for the next commit.
    fn now(&mut self) -> UtcTimestamp;
}

/// Random UUID v4 ids and wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemStamper;

impl Stamper for SystemStamper {
    fn next_id(&mut self) -> CommitId {
        CommitId::random()
    }

    fn now(&mut self) -> UtcTimestamp {
        UtcTimestamp::now()
    }
}

/// Deterministic ids (`c0000001`, `c0000002`, ...) and a clock that ticks
/// one second per commit from the Unix epoch.
///
/// # Example
///
/// ```
/// use gitquest::engine::{SequentialStamper, Stamper};
///
/// let mut stamper = SequentialStamper::default();
/// assert_eq!(stamper.next_id().as_str(), "c0000001");
/// assert_eq!(stamper.next_id().as_str(), "c0000002");
/// ```
#[derive(Debug, Default, Clone)]
pub struct SequentialStamper {
    issued: u64,
    ticks: i64,
}

impl SequentialStamper {
    /// Continue numbering after `issued` ids.
    pub fn starting_after(issued: u64) -> Self {
        Self {
            issued,
            ticks: 0,
        }
    }
}

impl Stamper for SequentialStamper {
    fn next_id(&mut self) -> CommitId {
        self.issued += 1;
        CommitId::new(format!("c{:07}", self.issued))
            .unwrap_or_else(|_| CommitId::random())
    }

    fn now(&mut self) -> UtcTimestamp {
        self.ticks += 1;
        UtcTimestamp::from_millis(self.ticks * 1000).unwrap_or_else(|_| UtcTimestamp::now())
    }
}
