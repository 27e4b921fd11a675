//! Multi-occupancy grid.

use ambit_core::{AgentKey, Point, Population, Positionable};
use smallvec::SmallVec;

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::grid::{GridShape, Neighbourhood};

type Cell = SmallVec<[AgentKey; 4]>;

/// A grid whose cells hold any number of agents.
///
/// Agents within a cell keep insertion order. The same rules as
/// [`Field`](crate::Field) apply to coordinates and to keeping the
/// agents' own positions in sync.
#[derive(Clone, Debug)]
pub struct MultiagentField {
    shape: GridShape,
    cells: Vec<Cell>,
    len: usize,
}

impl MultiagentField {
    /// Create an empty `width * height` field.
    pub fn new(width: u32, height: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        Self::with_cell_capacity(width, height, edge, 0)
    }

    /// Create an empty field, pre-reserving room for `per_cell` agents in
    /// every cell.
    pub fn with_cell_capacity(
        width: u32,
        height: u32,
        edge: EdgeBehavior,
        per_cell: usize,
    ) -> Result<Self, SpaceError> {
        let shape = GridShape::new(width, height, edge)?;
        let cells = (0..shape.cell_count())
            .map(|_| Cell::with_capacity(per_cell))
            .collect();
        Ok(Self { shape, cells, len: 0 })
    }

    /// Grid geometry.
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.shape.width()
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.shape.height()
    }

    /// Boundary behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.shape.edge_behavior()
    }

    /// Whether the field wraps around at its edges.
    pub fn is_toroidal(&self) -> bool {
        self.shape.is_toroidal()
    }

    /// Whether `p` lies outside the grid.
    pub fn out_of_bounds(&self, p: Point) -> bool {
        self.shape.out_of_bounds(p)
    }

    /// Map `p` onto the grid as if it were a torus.
    pub fn to_toroidal(&self, p: Point) -> Point {
        self.shape.to_toroidal(p)
    }

    /// Total number of placed agents.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no agent is placed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Agents at `pos` in insertion order. Empty off the grid.
    pub fn agents(&self, pos: Point) -> &[AgentKey] {
        match self.shape.index(pos) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    /// Number of agents at `pos`.
    pub fn agent_count(&self, pos: Point) -> usize {
        self.agents(pos).len()
    }

    /// Whether `pos` is a cell of this field holding no agents.
    pub fn is_cell_empty(&self, pos: Point) -> bool {
        self.shape.index(pos).is_some_and(|i| self.cells[i].is_empty())
    }

    /// Append `agent` to the cell at `pos` and set its position.
    ///
    /// Returns `false` only when `pos` is off the grid. An agent already
    /// placed elsewhere on this field leaves its old cell.
    pub fn add_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A, pos: Point) -> bool {
        let Some(index) = self.shape.index(pos) else {
            return false;
        };
        self.vacate(key, agent);
        self.cells[index].push(key);
        self.len += 1;
        agent.set_pos(Some(self.shape.point_at(index)));
        true
    }

    /// Move `agent` to `pos`. Identical to [`add_agent`](Self::add_agent);
    /// moving onto the agent's current cell sends it to the back of that
    /// cell.
    pub fn move_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A, pos: Point) -> bool {
        self.add_agent(key, agent, pos)
    }

    /// Remove `agent` from its cell and clear its position.
    pub fn remove_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A) {
        self.vacate(key, agent);
        agent.set_pos(None);
    }

    /// Empty the cell at `pos`, clearing every former occupant's position.
    ///
    /// Returns the removed keys in insertion order.
    pub fn remove_all_at<A: Positionable>(
        &mut self,
        pos: Point,
        population: &mut Population<A>,
    ) -> Vec<AgentKey> {
        let Some(index) = self.shape.index(pos) else {
            return Vec::new();
        };
        let removed: Vec<AgentKey> = self.cells[index].drain(..).collect();
        self.len -= removed.len();
        for &key in &removed {
            if let Some(agent) = population.get_mut(key) {
                agent.set_pos(None);
            }
        }
        removed
    }

    /// Drop the first occurrence of `key` from the agent's recorded cell.
    fn vacate<A: Positionable>(&mut self, key: AgentKey, agent: &A) {
        let Some(index) = agent.pos().and_then(|p| self.shape.index(p)) else {
            return;
        };
        let cell = &mut self.cells[index];
        if let Some(i) = cell.iter().position(|&k| k == key) {
            cell.remove(i);
            self.len -= 1;
        }
    }

    /// Call `f` on every placed agent: cells row-major, insertion order
    /// within a cell.
    pub fn apply<A>(&self, population: &mut Population<A>, mut f: impl FnMut(&mut A)) {
        for key in self.cells.iter().flatten() {
            if let Some(agent) = population.get_mut(*key) {
                f(agent);
            }
        }
    }

    /// Like [`apply`](Self::apply), also passing each agent's cell.
    pub fn transform<A>(&self, population: &mut Population<A>, mut f: impl FnMut(Point, &mut A)) {
        for (index, cell) in self.cells.iter().enumerate() {
            let p = self.shape.point_at(index);
            for &key in cell {
                if let Some(agent) = population.get_mut(key) {
                    f(p, agent);
                }
            }
        }
    }

    /// Cells of the radius-`r` neighbourhood around `pos`.
    pub fn neighbourhood(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<Point> {
        self.shape.neighbourhood(pos, r, kind, center)
    }

    /// Agents in the radius-`r` neighbourhood around `pos`, the contents
    /// of each cell concatenated in enumeration order.
    pub fn neighbours(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<AgentKey> {
        let mut out = Vec::new();
        self.shape.visit_neighbourhood(pos, r, kind, center, |p| {
            out.extend_from_slice(self.agents(p));
        });
        out
    }

    /// All cells holding no agents, row-major.
    pub fn empty_cells(&self) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| self.shape.point_at(index))
            .collect()
    }
}
