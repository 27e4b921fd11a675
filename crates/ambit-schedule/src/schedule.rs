//! The priority-queue scheduler.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ambit_core::{AgentKey, Epoch};
use tracing::{debug, trace};

use crate::action::Action;
use crate::traits::{AgentHost, Schedulable, SimState};

/// What one call to [`Schedule::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The epoch the step ran at.
    pub epoch: Epoch,
    /// Actions whose agent stepped.
    pub executed: usize,
    /// Actions discarded because their agent was inactive or gone.
    pub dropped: usize,
    /// Repeating actions put back on the queue.
    pub rescheduled: usize,
}

/// Discrete-event scheduler owning the simulation model.
///
/// Time starts at [`Epoch::ZERO`] and never decreases. An action whose
/// time is already in the past when it reaches the front of the queue
/// runs at the current epoch.
///
/// # Examples
///
/// ```
/// use ambit_core::{AgentKey, Epoch, Population};
/// use ambit_schedule::{AgentHost, Schedulable, Schedule, SimState};
///
/// struct Counter { hits: u32 }
///
/// struct Model { agents: Population<Counter>, total: u32 }
///
/// impl SimState for Model {
///     fn should_end(&self, epoch: Epoch) -> bool { epoch >= Epoch(3) }
/// }
///
/// impl AgentHost for Model {
///     type Agent = Counter;
///     fn population(&self) -> &Population<Counter> { &self.agents }
///     fn population_mut(&mut self) -> &mut Population<Counter> { &mut self.agents }
/// }
///
/// impl Schedulable<Model> for Counter {
///     fn step(&mut self, _key: AgentKey, model: &mut Model) {
///         self.hits += 1;
///         model.total += 1;
///     }
///     fn is_active(&self) -> bool { true }
/// }
///
/// let mut model = Model { agents: Population::new(), total: 0 };
/// let key = model.agents.insert(Counter { hits: 0 });
/// let mut schedule = Schedule::new(model);
/// schedule.schedule_repeating(key, Epoch(1), 0, 1);
///
/// assert_eq!(schedule.execute(), 3);
/// assert_eq!(schedule.model().total, 3);
/// ```
#[derive(Debug)]
pub struct Schedule<M> {
    model: M,
    queue: BinaryHeap<Reverse<Action>>,
    epoch: Epoch,
    next_seq: u64,
}

impl<M> Schedule<M> {
    /// Create a schedule at epoch zero with an empty queue.
    pub fn new(model: M) -> Self {
        Self {
            model,
            queue: BinaryHeap::new(),
            epoch: Epoch::ZERO,
            next_seq: 0,
        }
    }

    /// The model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The model, mutably. Use this to add agents between steps.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the schedule and return the model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// The current epoch.
    pub fn epochs(&self) -> Epoch {
        self.epoch
    }

    /// Number of queued actions.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether no action is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time of the earliest queued action.
    pub fn next_time(&self) -> Option<Epoch> {
        self.queue.peek().map(|Reverse(a)| a.time)
    }

    /// Drop every queued action. The epoch is kept.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Run `agent` once at `time`. Lower `order` runs first within an epoch.
    pub fn schedule_once(&mut self, agent: AgentKey, time: Epoch, order: u64) {
        self.enqueue(agent, time, order, 0);
    }

    /// Run `agent` at `time` and then every `interval` epochs while it
    /// stays active. An `interval` of zero schedules it once.
    pub fn schedule_repeating(
        &mut self,
        agent: AgentKey,
        time: Epoch,
        order: u64,
        interval: u64,
    ) {
        self.enqueue(agent, time, order, interval);
    }

    fn enqueue(&mut self, agent: AgentKey, time: Epoch, order: u64, interval: u64) {
        let seq = self.bump_seq();
        self.queue
            .push(Reverse(Action::new(agent, time, order, interval, seq)));
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<M> Schedule<M>
where
    M: SimState + AgentHost,
    M::Agent: Schedulable<M>,
{
    /// Run one epoch.
    ///
    /// 1. `before_step` on the model.
    /// 2. With an empty queue the epoch advances by one and the step ends.
    /// 3. Otherwise the epoch jumps to the earliest queued time and every
    ///    action due by then is drained, discarding inactive agents.
    /// 4. Each drained agent steps, in queue order. An agent deactivated
    ///    or removed by an earlier agent in the same epoch is skipped.
    /// 5. If the agent type has an advance phase, every agent that stepped
    ///    advances, in the same order.
    /// 6. Repeating actions whose agent is still active are requeued
    ///    `interval` epochs later.
    /// 7. `after_step` on the model.
    pub fn step(&mut self) -> StepReport {
        self.model.before_step();

        let Some(next) = self.next_time() else {
            self.epoch = self.epoch.offset(1);
            debug!(epoch = %self.epoch, "quiescent step");
            self.model.after_step();
            return StepReport {
                epoch: self.epoch,
                ..StepReport::default()
            };
        };
        self.epoch = self.epoch.max(next);
        let now = self.epoch;

        let mut report = StepReport {
            epoch: now,
            ..StepReport::default()
        };
        let mut ready = Vec::new();
        while let Some(&Reverse(action)) = self.queue.peek() {
            if action.time > now {
                break;
            }
            self.queue.pop();
            if self.is_active(action.agent) {
                trace!(agent = ?action.agent, order = action.order, seq = action.seq(), "action drained");
                ready.push(action);
            } else {
                trace!(agent = ?action.agent, "inactive action dropped");
                report.dropped += 1;
            }
        }

        let mut executed = Vec::with_capacity(ready.len());
        for action in ready {
            let ran = self.with_agent(action.agent, |agent, key, model| {
                if !agent.is_active() {
                    return false;
                }
                agent.step(key, model);
                true
            });
            if ran == Some(true) {
                executed.push(action);
            } else {
                trace!(agent = ?action.agent, "action dropped before running");
                report.dropped += 1;
            }
        }
        report.executed = executed.len();

        if <M::Agent as Schedulable<M>>::HAS_ADVANCE {
            for action in &executed {
                self.with_agent(action.agent, |agent, key, model| agent.advance(key, model));
            }
        }

        for action in executed.iter().filter(|a| a.is_repeating()) {
            if self.is_active(action.agent) {
                let seq = self.bump_seq();
                self.queue.push(Reverse(action.repeat(now, seq)));
                report.rescheduled += 1;
            }
        }

        self.model.after_step();
        debug!(
            epoch = %now,
            executed = report.executed,
            dropped = report.dropped,
            rescheduled = report.rescheduled,
            "schedule step"
        );
        report
    }

    /// Call [`step`](Self::step) until the model's `should_end` holds at
    /// the current epoch, and return the number of steps taken.
    ///
    /// Never returns if `should_end` never holds.
    pub fn execute(&mut self) -> u64 {
        let mut steps = 0;
        while !self.model.should_end(self.epoch) {
            self.step();
            steps += 1;
        }
        debug!(steps, epoch = %self.epoch, "schedule finished");
        steps
    }

    /// Whether `key` resolves to a resident, active agent.
    fn is_active(&self, key: AgentKey) -> bool {
        self.model
            .population()
            .get(key)
            .is_some_and(|agent| agent.is_active())
    }

    /// Check `key` out of the population, hand it to `f` together with the
    /// model, then check it back in. `None` if the key does not resolve.
    fn with_agent<R>(
        &mut self,
        key: AgentKey,
        f: impl FnOnce(&mut M::Agent, AgentKey, &mut M) -> R,
    ) -> Option<R> {
        let mut agent = self.model.population_mut().check_out(key)?;
        let out = f(&mut agent, key, &mut self.model);
        if self.model.population_mut().check_in(key, agent).is_err() {
            trace!(agent = ?key, "agent removed while running");
        }
        Some(out)
    }
}
