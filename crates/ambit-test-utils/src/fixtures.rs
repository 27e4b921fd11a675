//! Reusable agent and model fixtures.

use ambit_core::{AgentKey, Epoch, Point, Population, Positionable, RealPoint, RealPositionable};
use ambit_schedule::{AgentHost, Schedulable, SimState};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Grid agent with an id and nothing else.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Marker {
    pub id: u32,
    pub pos: Option<Point>,
}

impl Marker {
    pub fn new(id: u32) -> Self {
        Self { id, pos: None }
    }
}

impl Positionable for Marker {
    fn pos(&self) -> Option<Point> {
        self.pos
    }

    fn set_pos(&mut self, pos: Option<Point>) {
        self.pos = pos;
    }
}

/// Continuous-space agent with an id and nothing else.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub pos: Option<RealPoint>,
}

impl Particle {
    pub fn new(id: u32) -> Self {
        Self { id, pos: None }
    }
}

impl RealPositionable for Particle {
    fn pos(&self) -> Option<RealPoint> {
        self.pos
    }

    fn set_pos(&mut self, pos: Option<RealPoint>) {
        self.pos = pos;
    }
}

/// Which callback produced a [`HorizonModel::trace`] entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Step,
    Advance,
}

/// Model that ends at a fixed epoch and logs every agent callback.
#[derive(Debug)]
pub struct HorizonModel<A> {
    pub population: Population<A>,
    pub horizon: Epoch,
    /// `(agent id, phase)` in call order.
    pub trace: Vec<(u32, Phase)>,
    pub before: u32,
    pub after: u32,
}

impl<A> HorizonModel<A> {
    /// A model with no agents that ends once the epoch reaches `horizon`.
    pub fn new(horizon: u64) -> Self {
        Self {
            population: Population::new(),
            horizon: Epoch(horizon),
            trace: Vec::new(),
            before: 0,
            after: 0,
        }
    }

    /// Ids of the agents that stepped, in order.
    pub fn step_order(&self) -> Vec<u32> {
        self.ids_in(Phase::Step)
    }

    /// Ids of the agents that advanced, in order.
    pub fn advance_order(&self) -> Vec<u32> {
        self.ids_in(Phase::Advance)
    }

    fn ids_in(&self, phase: Phase) -> Vec<u32> {
        self.trace
            .iter()
            .filter(|(_, p)| *p == phase)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl<A> SimState for HorizonModel<A> {
    fn before_step(&mut self) {
        self.before += 1;
    }

    fn after_step(&mut self) {
        self.after += 1;
    }

    fn should_end(&self, epoch: Epoch) -> bool {
        epoch >= self.horizon
    }
}

impl<A> AgentHost for HorizonModel<A> {
    type Agent = A;

    fn population(&self) -> &Population<A> {
        &self.population
    }

    fn population_mut(&mut self) -> &mut Population<A> {
        &mut self.population
    }
}

/// Counts its own steps. Deactivates itself after `lifetime` steps when
/// one is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tally {
    pub id: u32,
    pub active: bool,
    pub steps: u32,
    pub lifetime: Option<u32>,
}

impl Tally {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            active: true,
            steps: 0,
            lifetime: None,
        }
    }

    pub fn with_lifetime(id: u32, lifetime: u32) -> Self {
        Self {
            lifetime: Some(lifetime),
            ..Self::new(id)
        }
    }
}

impl Schedulable<HorizonModel<Tally>> for Tally {
    fn step(&mut self, _key: AgentKey, model: &mut HorizonModel<Tally>) {
        self.steps += 1;
        model.trace.push((self.id, Phase::Step));
        if self.lifetime.is_some_and(|l| self.steps >= l) {
            self.active = false;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Counts steps and advances separately.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TwoPhase {
    pub id: u32,
    pub steps: u32,
    pub advances: u32,
}

impl TwoPhase {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl Schedulable<HorizonModel<TwoPhase>> for TwoPhase {
    const HAS_ADVANCE: bool = true;

    fn step(&mut self, _key: AgentKey, model: &mut HorizonModel<TwoPhase>) {
        self.steps += 1;
        model.trace.push((self.id, Phase::Step));
    }

    fn advance(&mut self, _key: AgentKey, model: &mut HorizonModel<TwoPhase>) {
        self.advances += 1;
        model.trace.push((self.id, Phase::Advance));
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Deterministic RNG for reproducible randomized scenarios.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform cell of a `width * height` grid.
pub fn random_point(rng: &mut impl Rng, width: u32, height: u32) -> Point {
    Point::new(
        rng.gen_range(0..width as i32),
        rng.gen_range(0..height as i32),
    )
}

/// Uniform point of `[0, width) x [0, height)`.
pub fn random_real_point(rng: &mut impl Rng, width: f64, height: f64) -> RealPoint {
    RealPoint::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height)
}
