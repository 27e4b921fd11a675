//! Benchmark profiles for the Ambit toolkit.
//!
//! - [`init_agent_positions`]: deterministic, collision-free placement
//! - [`grazing_profile`]: walkers on a 100x100 torus driven by a schedule
//! - [`ring_lattice`]: a network where every node links to its `k` nearest
//!   successors

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ambit_core::{AgentKey, Epoch, Point, Population, Positionable};
use ambit_schedule::{AgentHost, Schedulable, Schedule, SimState};
use ambit_space::{EdgeBehavior, MultiagentField, Neighbourhood, Network, SpaceError};

/// A grid agent doing a deterministic pseudo-random walk.
#[derive(Clone, Debug)]
pub struct Walker {
    pos: Option<Point>,
    state: u64,
    /// Neighbours seen at the last step.
    pub seen: usize,
}

impl Walker {
    /// A walker whose moves are derived from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            pos: None,
            state: seed | 1,
            seen: 0,
        }
    }

    /// xorshift64: next step offset in `-1..=1` on each axis.
    fn next_offset(&mut self) -> Point {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        Point::new((self.state % 3) as i32 - 1, ((self.state / 3) % 3) as i32 - 1)
    }
}

impl Positionable for Walker {
    fn pos(&self) -> Option<Point> {
        self.pos
    }

    fn set_pos(&mut self, pos: Option<Point>) {
        self.pos = pos;
    }
}

/// Walkers on a multi-occupancy torus.
pub struct Pasture {
    /// The walkers.
    pub population: Population<Walker>,
    /// Where they are.
    pub field: MultiagentField,
    /// Epoch at which the run stops.
    pub horizon: Epoch,
}

impl SimState for Pasture {
    fn should_end(&self, epoch: Epoch) -> bool {
        epoch >= self.horizon
    }
}

impl AgentHost for Pasture {
    type Agent = Walker;

    fn population(&self) -> &Population<Walker> {
        &self.population
    }

    fn population_mut(&mut self) -> &mut Population<Walker> {
        &mut self.population
    }
}

impl Schedulable<Pasture> for Walker {
    fn step(&mut self, key: AgentKey, model: &mut Pasture) {
        let Some(here) = self.pos else {
            return;
        };
        self.seen = model
            .field
            .neighbours(here, 1, Neighbourhood::Moore, false)
            .len();
        let to = here + self.next_offset();
        model.field.move_agent(key, self, to);
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Build a schedule of `n` walkers on a 100x100 torus, each stepping every
/// epoch until `horizon`. At most one walker starts per cell, so `n` is
/// capped at 10,000.
pub fn grazing_profile(
    n: u16,
    seed: u64,
    horizon: u64,
) -> Result<Schedule<Pasture>, SpaceError> {
    let width = 100;
    let mut field = MultiagentField::new(width, width, EdgeBehavior::Wrap)?;
    let mut population = Population::with_capacity(n as usize);
    let mut keys = Vec::with_capacity(n as usize);
    for (i, index) in init_agent_positions((width * width) as usize, n, seed) {
        let key = population.insert(Walker::new(seed ^ u64::from(i)));
        if let Some(walker) = population.get_mut(key) {
            let p = Point::new((index % 100) as i32, (index / 100) as i32);
            field.add_agent(key, walker, p);
        }
        keys.push(key);
    }
    let mut schedule = Schedule::new(Pasture {
        population,
        field,
        horizon: Epoch(horizon),
    });
    for key in keys {
        schedule.schedule_repeating(key, Epoch(1), 0, 1);
    }
    Ok(schedule)
}

/// Undirected ring of `n` nodes, each joined to its `k` successors.
pub fn ring_lattice(n: u32, k: u32) -> Network<u32> {
    let mut net = Network::undirected();
    for i in 0..n {
        for j in 1..=k {
            net.add_edge(i, (i + j) % n);
        }
    }
    net
}

/// Generate deterministic initial agent positions.
///
/// Places `n` agents at distinct flat cell indices using a simple hash of
/// the seed. Returns `(agent_id, flat_index)` pairs; fewer than `n` when
/// there are not enough cells.
pub fn init_agent_positions(cell_count: usize, n: u16, seed: u64) -> Vec<(u16, usize)> {
    let n = n.min(u16::try_from(cell_count).unwrap_or(u16::MAX));
    let mut positions = Vec::with_capacity(n as usize);
    let mut occupied = std::collections::HashSet::new();

    for i in 0..n {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(u64::from(i).wrapping_mul(1442695040888963407))
            % cell_count as u64) as usize;

        // Linear probe to avoid collisions
        while occupied.contains(&pos) {
            pos = (pos + 1) % cell_count;
        }
        occupied.insert(pos);
        positions.push((i, pos));
    }

    positions
}
