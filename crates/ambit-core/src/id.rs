//! Strongly-typed identifiers and the [`Epoch`] time counter.

use std::fmt;

slotmap::new_key_type! {
    /// Generational handle to an agent stored in a [`Population`](crate::Population).
    ///
    /// Keys stay valid while the agent is alive and are never reused for a
    /// different agent: once the agent is removed, every outstanding copy
    /// of its key stops resolving.
    pub struct AgentKey;

    /// Generational handle to a node stored in a network.
    pub struct NodeKey;
}

/// Discrete simulation time tracked by the scheduler.
///
/// Monotonically non-decreasing over a run. Not necessarily advanced by
/// one per step: the scheduler jumps straight to the next non-empty time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch every schedule starts at.
    pub const ZERO: Epoch = Epoch(0);

    /// The epoch `interval` units after this one, saturating at `u64::MAX`.
    pub fn offset(self, interval: u64) -> Epoch {
        Epoch(self.0.saturating_add(interval))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Epoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<Epoch> for u64 {
    fn from(e: Epoch) -> Self {
        e.0
    }
}
