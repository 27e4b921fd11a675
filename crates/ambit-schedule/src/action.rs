//! Queue entries.

use std::cmp::Ordering;

use ambit_core::{AgentKey, Epoch};

/// One scheduled invocation of an agent.
///
/// Actions order by `(time, order, seq)`, where `seq` is the insertion
/// sequence number the schedule assigned: lower sorts first, and equal
/// `(time, order)` pairs run in the order they were enqueued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    /// Epoch at which the action fires.
    pub time: Epoch,
    /// Priority within one epoch; lower runs first.
    pub order: u64,
    /// Epochs between repetitions; `0` for a one-shot action.
    pub interval: u64,
    /// The agent to run.
    pub agent: AgentKey,
    seq: u64,
}

impl Action {
    pub(crate) fn new(agent: AgentKey, time: Epoch, order: u64, interval: u64, seq: u64) -> Self {
        Self {
            time,
            order,
            interval,
            agent,
            seq,
        }
    }

    /// Whether the action is rescheduled after it runs.
    pub fn is_repeating(&self) -> bool {
        self.interval != 0
    }

    /// Insertion sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The next occurrence of a repeating action, fired `interval` epochs
    /// after `now`.
    pub(crate) fn repeat(&self, now: Epoch, seq: u64) -> Self {
        Self {
            time: now.offset(self.interval),
            seq,
            ..*self
        }
    }

    fn sort_key(&self) -> (Epoch, u64, u64) {
        (self.time, self.order, self.seq)
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
