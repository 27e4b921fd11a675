//! Single-occupancy grid.

use ambit_core::{AgentKey, Point, Population, Positionable};

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::grid::{GridShape, Neighbourhood};

/// A grid where every cell holds at most one agent.
///
/// Occupancy is 1:1 with the agents' own positions: an agent is
/// referenced by cell `c` exactly when its `pos()` is `c`, and no two
/// cells reference the same agent.
///
/// Coordinates passed to any method are resolved through the grid's
/// [`EdgeBehavior`]: wrapped on a torus, rejected (fail soft) otherwise.
///
/// # Examples
///
/// ```
/// use ambit_core::{Point, Population, Positionable};
/// use ambit_space::{EdgeBehavior, Field};
///
/// #[derive(Default)]
/// struct Ant { pos: Option<Point> }
/// impl Positionable for Ant {
///     fn pos(&self) -> Option<Point> { self.pos }
///     fn set_pos(&mut self, pos: Option<Point>) { self.pos = pos; }
/// }
///
/// let mut ants = Population::new();
/// let key = ants.insert(Ant::default());
/// let mut field = Field::new(4, 4, EdgeBehavior::Absorb).unwrap();
///
/// let ant = ants.get_mut(key).unwrap();
/// assert!(field.add_agent(key, ant, Point::new(1, 1)));
/// assert!(field.move_agent(key, ant, Point::new(1, 0)));
/// assert_eq!(ant.pos, Some(Point::new(1, 0)));
/// assert!(field.is_cell_empty(Point::new(1, 1)));
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    shape: GridShape,
    cells: Vec<Option<AgentKey>>,
    occupied: usize,
}

impl Field {
    /// Create an empty `width * height` field.
    pub fn new(width: u32, height: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        let shape = GridShape::new(width, height, edge)?;
        Ok(Self {
            shape,
            cells: vec![None; shape.cell_count()],
            occupied: 0,
        })
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

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// The agent occupying `pos`, if any.
    pub fn agent(&self, pos: Point) -> Option<AgentKey> {
        self.shape.index(pos).and_then(|i| self.cells[i])
    }

    /// Whether `pos` is a cell of this field with no agent in it.
    pub fn is_cell_empty(&self, pos: Point) -> bool {
        self.shape.index(pos).is_some_and(|i| self.cells[i].is_none())
    }

    /// Place `agent` at `pos` and set its position.
    ///
    /// Returns `false` without side effects if `pos` is occupied or off
    /// the grid. An agent already placed elsewhere on this field leaves
    /// its old cell.
    pub fn add_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A, pos: Point) -> bool {
        let Some(index) = self.shape.index(pos) else {
            return false;
        };
        if self.cells[index].is_some() {
            return false;
        }
        self.vacate(key, agent);
        self.cells[index] = Some(key);
        self.occupied += 1;
        agent.set_pos(Some(self.shape.point_at(index)));
        true
    }

    /// Move `agent` to `pos`, clearing its previous cell.
    ///
    /// Returns `false` without side effects if `pos` is off the grid or
    /// occupied by another agent. An unplaced agent is simply added.
    pub fn move_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A, pos: Point) -> bool {
        let Some(index) = self.shape.index(pos) else {
            return false;
        };
        match self.cells[index] {
            Some(occupant) if occupant == key => true,
            Some(_) => false,
            None => self.add_agent(key, agent, pos),
        }
    }

    /// Remove `agent` from the field and clear its position.
    ///
    /// A no-op on the grid for an unplaced agent.
    pub fn remove_agent<A: Positionable>(&mut self, key: AgentKey, agent: &mut A) {
        self.vacate(key, agent);
        agent.set_pos(None);
    }

    /// Empty the cell at `pos`, clearing the former occupant's position.
    ///
    /// Returns the key of the removed agent. The position of an agent
    /// that is checked out of `population` is left for the caller.
    pub fn remove_at<A: Positionable>(
        &mut self,
        pos: Point,
        population: &mut Population<A>,
    ) -> Option<AgentKey> {
        let index = self.shape.index(pos)?;
        let key = self.cells[index].take()?;
        self.occupied -= 1;
        if let Some(agent) = population.get_mut(key) {
            agent.set_pos(None);
        }
        Some(key)
    }

    /// Clear the cell referencing `key` at the agent's recorded position.
    fn vacate<A: Positionable>(&mut self, key: AgentKey, agent: &A) {
        let Some(index) = agent.pos().and_then(|p| self.shape.index(p)) else {
            return;
        };
        if self.cells[index] == Some(key) {
            self.cells[index] = None;
            self.occupied -= 1;
        }
    }

    /// Call `f` on every placed agent, in row-major cell order.
    pub fn apply<A>(&self, population: &mut Population<A>, mut f: impl FnMut(&mut A)) {
        for key in self.cells.iter().flatten() {
            if let Some(agent) = population.get_mut(*key) {
                f(agent);
            }
        }
    }

    /// Call `f` with the cell and agent for every placed agent, row-major.
    pub fn transform<A>(&self, population: &mut Population<A>, mut f: impl FnMut(Point, &mut A)) {
        for (index, slot) in self.cells.iter().enumerate() {
            if let Some(agent) = slot.and_then(|key| population.get_mut(key)) {
                f(self.shape.point_at(index), agent);
            }
        }
    }

    /// Occupied cells and their agents, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Point, AgentKey)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|key| (self.shape.point_at(index), key)))
    }

    /// Cells of the radius-`r` neighbourhood around `pos`.
    pub fn neighbourhood(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<Point> {
        self.shape.neighbourhood(pos, r, kind, center)
    }

    /// Agents in the radius-`r` neighbourhood around `pos`, skipping
    /// empty cells, in enumeration order.
    pub fn neighbours(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<AgentKey> {
        let mut out = Vec::with_capacity(self.shape.reservation(r, kind).min(self.occupied));
        self.shape.visit_neighbourhood(pos, r, kind, center, |p| {
            if let Some(key) = self.agent(p) {
                out.push(key);
            }
        });
        out
    }

    /// All unoccupied cells, row-major.
    pub fn empty_cells(&self) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| self.shape.point_at(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambit_test_utils::Marker;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn setup(n: u32) -> (Population<Marker>, Vec<AgentKey>) {
        let mut pop = Population::new();
        let keys = (0..n).map(|i| pop.insert(Marker::new(i))).collect();
        (pop, keys)
    }

    #[test]
    fn oversized_field_is_rejected_not_allocated() {
        let big = GridShape::MAX_DIM;
        assert!(matches!(
            Field::new(big, big, EdgeBehavior::Absorb),
            Err(SpaceError::Config(ambit_core::ConfigError::TooManyCells { .. }))
        ));
        assert!(Field::new(1 << 15, 1 << 14, EdgeBehavior::Wrap).is_err());
    }

    #[test]
    fn emptiness_of_field_and_cell() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(2, 2, EdgeBehavior::Absorb).unwrap();
        assert!(field.is_empty());
        assert!(field.is_cell_empty(p(0, 0)));
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(0, 0));
        assert!(!field.is_empty());
        assert!(!field.is_cell_empty(p(0, 0)));
        assert!(field.is_cell_empty(p(1, 1)));
        // Off-grid positions are not cells at all.
        assert!(!field.is_cell_empty(p(5, 5)));
    }

    #[test]
    fn add_sets_position() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(field.add_agent(keys[0], a, p(1, 1)));
        assert_eq!(a.pos, Some(p(1, 1)));
        assert_eq!(field.agent(p(1, 1)), Some(keys[0]));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn add_to_occupied_cell_fails_without_side_effects() {
        let (mut pop, keys) = setup(2);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        assert!(field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(0, 0)));
        let b = pop.get_mut(keys[1]).unwrap();
        assert!(!field.add_agent(keys[1], b, p(0, 0)));
        assert_eq!(b.pos, None);
        assert_eq!(field.agent(p(0, 0)), Some(keys[0]));
    }

    #[test]
    fn add_out_of_bounds_fails() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        assert!(!field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(3, 0)));
        assert!(field.is_empty());
    }

    #[test]
    fn add_on_torus_wraps() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Wrap).unwrap();
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(field.add_agent(keys[0], a, p(-1, 4)));
        assert_eq!(a.pos, Some(p(2, 1)));
    }

    #[test]
    fn move_clears_old_cell() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        let a = pop.get_mut(keys[0]).unwrap();
        field.add_agent(keys[0], a, p(1, 1));
        assert!(field.move_agent(keys[0], a, p(1, 0)));
        assert_eq!(a.pos, Some(p(1, 0)));
        assert!(field.is_cell_empty(p(1, 1)));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn move_onto_other_agent_fails() {
        let (mut pop, keys) = setup(2);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(0, 0));
        field.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), p(1, 0));
        let b = pop.get_mut(keys[1]).unwrap();
        assert!(!field.move_agent(keys[1], b, p(0, 0)));
        assert_eq!(b.pos, Some(p(1, 0)));
    }

    #[test]
    fn move_onto_own_cell_is_noop() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        let a = pop.get_mut(keys[0]).unwrap();
        field.add_agent(keys[0], a, p(2, 2));
        assert!(field.move_agent(keys[0], a, p(2, 2)));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn move_unplaced_agent_adds_it() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(field.move_agent(keys[0], a, p(0, 2)));
        assert_eq!(field.agent(p(0, 2)), Some(keys[0]));
    }

    #[test]
    fn remove_by_agent_and_by_position() {
        let (mut pop, keys) = setup(2);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(0, 0));
        field.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), p(2, 2));

        let a = pop.get_mut(keys[0]).unwrap();
        field.remove_agent(keys[0], a);
        assert_eq!(a.pos, None);
        assert!(field.is_cell_empty(p(0, 0)));

        assert_eq!(field.remove_at(p(2, 2), &mut pop), Some(keys[1]));
        assert_eq!(pop.get(keys[1]).unwrap().pos, None);
        assert!(field.is_empty());

        // Both are no-ops now.
        assert_eq!(field.remove_at(p(2, 2), &mut pop), None);
        field.remove_agent(keys[0], pop.get_mut(keys[0]).unwrap());
    }

    #[test]
    fn apply_and_transform_visit_row_major() {
        let (mut pop, keys) = setup(3);
        let mut field = Field::new(3, 3, EdgeBehavior::Absorb).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(2, 2));
        field.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), p(0, 0));
        field.add_agent(keys[2], pop.get_mut(keys[2]).unwrap(), p(1, 0));

        let mut order = Vec::new();
        field.apply(&mut pop, |m| order.push(m.id));
        assert_eq!(order, vec![1, 2, 0]);

        let mut cells = Vec::new();
        field.transform(&mut pop, |pt, m| {
            m.id += 10;
            cells.push(pt);
        });
        assert_eq!(cells, vec![p(0, 0), p(1, 0), p(2, 2)]);
        assert_eq!(pop.get(keys[0]).unwrap().id, 10);
    }

    #[test]
    fn neighbours_skip_empty_cells() {
        let (mut pop, keys) = setup(3);
        let mut field = Field::new(5, 5, EdgeBehavior::Absorb).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(2, 2));
        field.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), p(1, 1));
        field.add_agent(keys[2], pop.get_mut(keys[2]).unwrap(), p(4, 4));

        let n = field.neighbours(p(2, 2), 1, Neighbourhood::Moore, false);
        assert_eq!(n, vec![keys[1]]);
        let n = field.neighbours(p(2, 2), 1, Neighbourhood::Moore, true);
        assert_eq!(n, vec![keys[1], keys[0]]);
        let n = field.neighbours(p(2, 2), 1, Neighbourhood::VonNeumann, false);
        assert!(n.is_empty());
        assert_eq!(field.neighbourhood(p(0, 0), 1, Neighbourhood::VonNeumann, false).len(), 2);
    }

    #[test]
    fn neighbours_wrap_on_torus() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(4, 4, EdgeBehavior::Wrap).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(3, 3));
        let n = field.neighbours(p(0, 0), 1, Neighbourhood::Moore, false);
        assert_eq!(n, vec![keys[0]]);
    }

    #[test]
    fn empty_cells_row_major() {
        let (mut pop, keys) = setup(1);
        let mut field = Field::new(2, 2, EdgeBehavior::Absorb).unwrap();
        field.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), p(1, 0));
        assert_eq!(field.empty_cells(), vec![p(0, 0), p(0, 1), p(1, 1)]);
        assert_eq!(field.iter().collect::<Vec<_>>(), vec![(p(1, 0), keys[0])]);
    }

    #[test]
    fn shape_passes_grid_compliance() {
        for edge in [EdgeBehavior::Absorb, EdgeBehavior::Wrap] {
            let grid = Field::new(6, 5, edge).unwrap();
            crate::compliance::run_grid_compliance(grid.shape());
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(usize, i32, i32),
        Move(usize, i32, i32),
        Remove(usize),
        RemoveAt(i32, i32),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6, -1i32..5, -1i32..5).prop_map(|(a, x, y)| Op::Add(a, x, y)),
            (0usize..6, -1i32..5, -1i32..5).prop_map(|(a, x, y)| Op::Move(a, x, y)),
            (0usize..6).prop_map(Op::Remove),
            (0i32..4, 0i32..4).prop_map(|(x, y)| Op::RemoveAt(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn occupancy_matches_positions(
            wrap in any::<bool>(),
            ops in proptest::collection::vec(arb_op(), 0..60),
        ) {
            let edge = if wrap { EdgeBehavior::Wrap } else { EdgeBehavior::Absorb };
            let (mut pop, keys) = setup(6);
            let mut field = Field::new(4, 4, edge).unwrap();
            for op in ops {
                match op {
                    Op::Add(i, x, y) => {
                        field.add_agent(keys[i], pop.get_mut(keys[i]).unwrap(), p(x, y));
                    }
                    Op::Move(i, x, y) => {
                        field.move_agent(keys[i], pop.get_mut(keys[i]).unwrap(), p(x, y));
                    }
                    Op::Remove(i) => field.remove_agent(keys[i], pop.get_mut(keys[i]).unwrap()),
                    Op::RemoveAt(x, y) => {
                        field.remove_at(p(x, y), &mut pop);
                    }
                }
            }
            // Every agent is referenced from exactly the cell it records.
            let mut placed = 0;
            for &key in &keys {
                let agent = pop.get(key).unwrap();
                match agent.pos {
                    Some(pos) => {
                        prop_assert_eq!(field.agent(pos), Some(key));
                        placed += 1;
                    }
                    None => prop_assert!(field.iter().all(|(_, k)| k != key)),
                }
            }
            prop_assert_eq!(field.len(), placed);
            prop_assert_eq!(field.iter().count(), placed);
        }
    }
}
