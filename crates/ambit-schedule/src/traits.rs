//! Contracts between the scheduler, the model and the agents.

use ambit_core::{AgentKey, Epoch, Population};

/// Simulation state driven by a [`Schedule`](crate::Schedule).
pub trait SimState {
    /// Called at the start of every step, before any agent runs.
    fn before_step(&mut self) {}

    /// Called at the end of every step, after rescheduling.
    fn after_step(&mut self) {}

    /// Whether [`Schedule::execute`](crate::Schedule::execute) should stop
    /// at `epoch`. Checked before every step.
    fn should_end(&self, epoch: Epoch) -> bool;
}

/// A model that owns the agents the scheduler runs.
pub trait AgentHost {
    /// Agent type, usually an enum over the model's agent kinds.
    type Agent;

    /// The agents.
    fn population(&self) -> &Population<Self::Agent>;

    /// The agents, mutably.
    fn population_mut(&mut self) -> &mut Population<Self::Agent>;
}

/// An agent the scheduler can run inside model `M`.
///
/// During [`step`](Self::step) and [`advance`](Self::advance) the agent is
/// checked out of the model's population: it receives `&mut self` and
/// `&mut M` at once, and `model.population().get(key)` is `None` for it.
/// Removing `key` from the population while the agent runs discards the
/// agent once the call returns.
pub trait Schedulable<M> {
    /// Whether [`advance`](Self::advance) should be called at all. When
    /// `false` the advance phase is skipped entirely.
    const HAS_ADVANCE: bool = false;

    /// First phase: act on the model.
    fn step(&mut self, key: AgentKey, model: &mut M);

    /// Second phase, run for every agent that stepped this epoch after
    /// all of them have stepped.
    fn advance(&mut self, key: AgentKey, model: &mut M) {
        let _ = (key, model);
    }

    /// Whether the agent still takes part in the simulation. Inactive
    /// agents are neither run nor rescheduled.
    fn is_active(&self) -> bool;
}
