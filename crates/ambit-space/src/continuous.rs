//! Continuous 2-D space bucketed into a discretization grid.
//!
//! Agents carry real-valued positions; the grid only accelerates radius
//! queries. A point `p` lives in cell `(ceil(p.x / dx), ceil(p.y / dx))`,
//! so cell `c` covers the half-open interval `((c - 1) * dx, c * dx]` on
//! each axis.

use ambit_core::{l2, AgentKey, ConfigError, Point, Population, RealPoint, RealPositionable};
use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;

/// Upper bound on the number of discretization cells.
const MAX_CELLS: usize = 1 << 28;

type Cell = SmallVec<[(AgentKey, RealPoint); 4]>;

/// Parameters of a [`ContinuousSpace`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousConfig {
    /// Extent along x. The domain is `[0, width)`.
    pub width: f64,
    /// Extent along y. The domain is `[0, height)`.
    pub height: f64,
    /// Edge length of one discretization cell.
    pub dx: f64,
    /// Boundary behavior.
    pub edge: EdgeBehavior,
}

impl ContinuousConfig {
    /// A bounded configuration.
    pub fn new(width: f64, height: f64, dx: f64) -> Self {
        Self {
            width,
            height,
            dx,
            edge: EdgeBehavior::Absorb,
        }
    }

    /// Same configuration with a different edge behavior.
    pub fn with_edge(self, edge: EdgeBehavior) -> Self {
        Self { edge, ..self }
    }

    /// Check that every extent is finite and strictly positive and that
    /// the resulting grid is of indexable size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidExtent { name, value });
            }
        }
        if !(self.dx.is_finite() && self.dx > 0.0) {
            return Err(ConfigError::InvalidDiscretization { dx: self.dx });
        }
        let (cols, rows) = self.cells_per_axis();
        match cols.checked_mul(rows) {
            Some(n) if n <= MAX_CELLS => Ok(()),
            _ => Err(ConfigError::InvalidDiscretization { dx: self.dx }),
        }
    }

    /// Discretization columns and rows: indices `0..=ceil(extent / dx)`.
    fn cells_per_axis(&self) -> (usize, usize) {
        let axis = |extent: f64| {
            let n = (extent / self.dx).ceil();
            if n < MAX_CELLS as f64 {
                n as usize + 1
            } else {
                usize::MAX
            }
        };
        (axis(self.width), axis(self.height))
    }
}

/// How [`ContinuousSpace::neighbours`] selects agents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Proximity {
    /// Exactly the agents whose distance to the query point is at most `r`.
    #[default]
    Euclidean,
    /// Every agent in any cell that touches the radius-`r` disk. A
    /// superset of the Euclidean result, with no per-agent distance test.
    Coarse,
}

/// Continuous space of real-valued agent positions.
///
/// Positions are validated against the domain `[0, width) x [0, height)`:
/// on a torus they wrap, otherwise placement outside the domain fails.
#[derive(Clone, Debug)]
pub struct ContinuousSpace {
    config: ContinuousConfig,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    len: usize,
}

impl ContinuousSpace {
    /// Create an empty space.
    pub fn new(config: ContinuousConfig) -> Result<Self, SpaceError> {
        config.validate()?;
        let (cols, rows) = config.cells_per_axis();
        Ok(Self {
            config,
            cols,
            rows,
            cells: vec![Cell::new(); cols * rows],
            len: 0,
        })
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.config.width
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.config.height
    }

    /// Discretization cell edge length.
    pub fn dx(&self) -> f64 {
        self.config.dx
    }

    /// Boundary behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.config.edge
    }

    /// Whether the space wraps around at its edges.
    pub fn is_toroidal(&self) -> bool {
        self.config.edge.is_toroidal()
    }

    /// Number of placed agents.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no agent is placed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discretization cell of `p`.
    pub fn discretize(&self, p: RealPoint) -> Point {
        let dx = self.config.dx;
        Point::new((p.x / dx).ceil() as i32, (p.y / dx).ceil() as i32)
    }

    /// Map `p` into the domain as if the space were a torus.
    pub fn to_toroidal(&self, p: RealPoint) -> RealPoint {
        RealPoint::new(
            wrap_axis(p.x, self.config.width),
            wrap_axis(p.y, self.config.height),
        )
    }

    /// Whether `p` lies outside the domain.
    pub fn out_of_bounds(&self, p: RealPoint) -> bool {
        !((0.0..self.config.width).contains(&p.x) && (0.0..self.config.height).contains(&p.y))
    }

    /// Resolve a position for placement: in bounds as is, wrapped on a
    /// torus, rejected otherwise.
    fn resolve(&self, p: RealPoint) -> Option<RealPoint> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        if !self.out_of_bounds(p) {
            return Some(p);
        }
        match self.config.edge {
            EdgeBehavior::Absorb => None,
            EdgeBehavior::Wrap => Some(self.to_toroidal(p)),
        }
    }

    fn cell_index(&self, p: RealPoint) -> usize {
        let c = self.discretize(p);
        let x = (c.x.max(0) as usize).min(self.cols - 1);
        let y = (c.y.max(0) as usize).min(self.rows - 1);
        y * self.cols + x
    }

    /// Place `agent` at `pos` and set its position.
    ///
    /// Returns `false` if `pos` is not finite or lies off a bounded
    /// domain. An agent already placed in this space is moved.
    pub fn add_agent<A: RealPositionable>(
        &mut self,
        key: AgentKey,
        agent: &mut A,
        pos: RealPoint,
    ) -> bool {
        let Some(pos) = self.resolve(pos) else {
            return false;
        };
        self.vacate(key, agent);
        let index = self.cell_index(pos);
        self.cells[index].push((key, pos));
        self.len += 1;
        agent.set_pos(Some(pos));
        true
    }

    /// Move `agent` to `pos`. Same contract as [`add_agent`](Self::add_agent).
    pub fn move_agent<A: RealPositionable>(
        &mut self,
        key: AgentKey,
        agent: &mut A,
        pos: RealPoint,
    ) -> bool {
        self.add_agent(key, agent, pos)
    }

    /// Remove `agent` from the space and clear its position.
    pub fn remove_agent<A: RealPositionable>(&mut self, key: AgentKey, agent: &mut A) {
        self.vacate(key, agent);
        agent.set_pos(None);
    }

    fn vacate<A: RealPositionable>(&mut self, key: AgentKey, agent: &A) {
        let Some(pos) = agent.pos() else {
            return;
        };
        let index = self.cell_index(pos);
        let cell = &mut self.cells[index];
        if let Some(i) = cell.iter().position(|&(k, _)| k == key) {
            cell.remove(i);
            self.len -= 1;
        }
    }

    /// Number of agents in the discretization cell containing `p`.
    pub fn agent_count(&self, p: RealPoint) -> usize {
        match self.resolve(p) {
            Some(p) => self.cells[self.cell_index(p)].len(),
            None => 0,
        }
    }

    /// Call `f` on every placed agent, cell by cell.
    pub fn apply<A>(&self, population: &mut Population<A>, mut f: impl FnMut(&mut A)) {
        for &(key, _) in self.cells.iter().flatten() {
            if let Some(agent) = population.get_mut(key) {
                f(agent);
            }
        }
    }

    /// Agents within distance `r` of `pos`.
    ///
    /// With [`Proximity::Euclidean`] an agent sitting exactly at `pos` is
    /// only reported when `center` is set. [`Proximity::Coarse`] reports
    /// whole cells and ignores `center`. On a torus distances are measured
    /// to the nearest periodic image and each agent is reported once.
    ///
    /// Returns nothing for a negative or NaN radius, or a query point off
    /// a bounded domain.
    pub fn neighbours(
        &self,
        pos: RealPoint,
        r: f64,
        proximity: Proximity,
        center: bool,
    ) -> Vec<AgentKey> {
        let Some(pos) = self.resolve(pos) else {
            return Vec::new();
        };
        if r.is_nan() || r < 0.0 {
            return Vec::new();
        }

        let mut found = IndexSet::new();
        let (w, h) = (self.config.width, self.config.height);
        let shifts: &[f64] = if self.is_toroidal() { &[0.0, -1.0, 1.0] } else { &[0.0] };
        for &sy in shifts {
            for &sx in shifts {
                let image = RealPoint::new(pos.x + sx * w, pos.y + sy * h);
                self.collect_around(image, pos, r, proximity, center, &mut found);
            }
        }
        found.into_iter().collect()
    }

    /// Gather agents near `query`, one periodic image of `origin`.
    fn collect_around(
        &self,
        query: RealPoint,
        origin: RealPoint,
        r: f64,
        proximity: Proximity,
        center: bool,
        found: &mut IndexSet<AgentKey>,
    ) {
        let Some((x0, x1)) = self.window(query.x, r, self.cols) else {
            return;
        };
        let Some((y0, y1)) = self.window(query.y, r, self.rows) else {
            return;
        };
        let dx = self.config.dx;
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                let cell = &self.cells[cy * self.cols + cx];
                if cell.is_empty() {
                    continue;
                }
                match proximity {
                    Proximity::Euclidean => {
                        for &(key, p) in cell {
                            if l2(query, p) <= r && (center || p != origin) {
                                found.insert(key);
                            }
                        }
                    }
                    Proximity::Coarse => {
                        // Cell rectangle is [(c - 1) dx, c dx] on each axis.
                        let nx = query.x.clamp((cx as f64 - 1.0) * dx, cx as f64 * dx);
                        let ny = query.y.clamp((cy as f64 - 1.0) * dx, cy as f64 * dx);
                        if l2(query, RealPoint::new(nx, ny)) <= r {
                            found.extend(cell.iter().map(|&(key, _)| key));
                        }
                    }
                }
            }
        }
    }

    /// Candidate cell range on one axis for a query at `q` with radius
    /// `r`, clamped to the grid. `None` if the range misses the grid.
    fn window(&self, q: f64, r: f64, len: usize) -> Option<(usize, usize)> {
        let dx = self.config.dx;
        let lo = ((q - r) / dx).ceil();
        let hi = ((q + r) / dx).ceil();
        let last = (len - 1) as f64;
        if hi < 0.0 || lo > last {
            return None;
        }
        Some((lo.max(0.0) as usize, hi.min(last) as usize))
    }
}

/// `rem_euclid` that never returns the extent itself.
fn wrap_axis(v: f64, extent: f64) -> f64 {
    let w = v.rem_euclid(extent);
    if w >= extent {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambit_test_utils::Particle;
    use proptest::prelude::*;

    fn rp(x: f64, y: f64) -> RealPoint {
        RealPoint::new(x, y)
    }

    fn space(w: f64, h: f64, dx: f64, edge: EdgeBehavior) -> ContinuousSpace {
        ContinuousSpace::new(ContinuousConfig::new(w, h, dx).with_edge(edge)).unwrap()
    }

    fn setup(n: u32) -> (Population<Particle>, Vec<AgentKey>) {
        let mut pop = Population::new();
        let keys = (0..n).map(|i| pop.insert(Particle::new(i))).collect();
        (pop, keys)
    }

    fn sorted(mut v: Vec<AgentKey>) -> Vec<AgentKey> {
        v.sort_unstable();
        v
    }

    #[test]
    fn config_validation() {
        assert!(ContinuousConfig::new(10.0, 10.0, 1.0).validate().is_ok());
        assert!(matches!(
            ContinuousConfig::new(0.0, 10.0, 1.0).validate(),
            Err(ConfigError::InvalidExtent { name: "width", .. })
        ));
        assert!(matches!(
            ContinuousConfig::new(10.0, f64::INFINITY, 1.0).validate(),
            Err(ConfigError::InvalidExtent { name: "height", .. })
        ));
        assert!(matches!(
            ContinuousConfig::new(10.0, 10.0, -1.0).validate(),
            Err(ConfigError::InvalidDiscretization { .. })
        ));
        assert!(matches!(
            ContinuousConfig::new(1e9, 1e9, 1e-3).validate(),
            Err(ConfigError::InvalidDiscretization { .. })
        ));
        assert!(ContinuousSpace::new(ContinuousConfig::new(10.0, 10.0, f64::NAN)).is_err());
    }

    #[test]
    fn discretize_uses_ceiling() {
        let s = space(10.0, 10.0, 2.0, EdgeBehavior::Absorb);
        assert_eq!(s.discretize(rp(0.0, 0.0)), Point::new(0, 0));
        assert_eq!(s.discretize(rp(0.5, 2.0)), Point::new(1, 1));
        assert_eq!(s.discretize(rp(2.1, 9.9)), Point::new(2, 5));
    }

    #[test]
    fn add_move_remove() {
        let (mut pop, keys) = setup(1);
        let mut s = space(10.0, 10.0, 1.0, EdgeBehavior::Absorb);
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(s.add_agent(keys[0], a, rp(1.5, 1.5)));
        assert_eq!(a.pos, Some(rp(1.5, 1.5)));
        assert_eq!(s.agent_count(rp(1.9, 1.1)), 1);

        assert!(s.move_agent(keys[0], a, rp(7.25, 3.0)));
        assert_eq!(s.agent_count(rp(1.5, 1.5)), 0);
        assert_eq!(s.agent_count(rp(7.25, 3.0)), 1);
        assert_eq!(s.len(), 1);

        s.remove_agent(keys[0], a);
        assert_eq!(a.pos, None);
        assert!(s.is_empty());
    }

    #[test]
    fn placement_outside_bounded_domain_fails() {
        let (mut pop, keys) = setup(1);
        let mut s = space(10.0, 10.0, 1.0, EdgeBehavior::Absorb);
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(!s.add_agent(keys[0], a, rp(10.0, 5.0)));
        assert!(!s.add_agent(keys[0], a, rp(-0.1, 5.0)));
        assert!(!s.add_agent(keys[0], a, rp(f64::NAN, 5.0)));
        assert_eq!(a.pos, None);
    }

    #[test]
    fn placement_on_torus_wraps() {
        let (mut pop, keys) = setup(1);
        let mut s = space(10.0, 10.0, 1.0, EdgeBehavior::Wrap);
        let a = pop.get_mut(keys[0]).unwrap();
        assert!(s.add_agent(keys[0], a, rp(12.5, -1.0)));
        assert_eq!(a.pos, Some(rp(2.5, 9.0)));
    }

    #[test]
    fn euclidean_filters_by_distance() {
        let (mut pop, keys) = setup(4);
        let mut s = space(10.0, 10.0, 1.0, EdgeBehavior::Absorb);
        s.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), rp(5.0, 5.0));
        s.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), rp(5.0, 6.5));
        s.add_agent(keys[2], pop.get_mut(keys[2]).unwrap(), rp(6.5, 6.5));
        s.add_agent(keys[3], pop.get_mut(keys[3]).unwrap(), rp(0.5, 0.5));

        let n = s.neighbours(rp(5.0, 5.0), 1.5, Proximity::Euclidean, false);
        assert_eq!(n, vec![keys[1]]);
        let n = s.neighbours(rp(5.0, 5.0), 1.5, Proximity::Euclidean, true);
        assert_eq!(sorted(n), sorted(vec![keys[0], keys[1]]));
        let n = s.neighbours(rp(5.0, 5.0), 2.2, Proximity::Euclidean, false);
        assert_eq!(sorted(n), sorted(vec![keys[1], keys[2]]));
    }

    #[test]
    fn radius_smaller_than_cell_still_finds_neighbour_across_boundary() {
        let (mut pop, keys) = setup(2);
        let mut s = space(10.0, 10.0, 2.0, EdgeBehavior::Absorb);
        s.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), rp(3.9, 3.0));
        s.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), rp(4.1, 3.0));
        let n = s.neighbours(rp(3.9, 3.0), 0.5, Proximity::Euclidean, false);
        assert_eq!(n, vec![keys[1]]);
    }

    #[test]
    fn coarse_is_superset_of_euclidean() {
        let (mut pop, keys) = setup(3);
        let mut s = space(10.0, 10.0, 2.0, EdgeBehavior::Absorb);
        s.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), rp(5.0, 5.0));
        s.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), rp(5.9, 5.9));
        s.add_agent(keys[2], pop.get_mut(keys[2]).unwrap(), rp(9.5, 9.5));

        let exact = s.neighbours(rp(5.0, 5.0), 0.5, Proximity::Euclidean, true);
        assert_eq!(exact, vec![keys[0]]);
        let coarse = s.neighbours(rp(5.0, 5.0), 0.5, Proximity::Coarse, false);
        assert_eq!(sorted(coarse), sorted(vec![keys[0], keys[1]]));
    }

    #[test]
    fn torus_queries_see_across_the_seam() {
        let (mut pop, keys) = setup(2);
        let mut s = space(10.0, 10.0, 1.0, EdgeBehavior::Wrap);
        s.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), rp(0.2, 0.2));
        s.add_agent(keys[1], pop.get_mut(keys[1]).unwrap(), rp(9.8, 9.8));
        let n = s.neighbours(rp(0.2, 0.2), 1.0, Proximity::Euclidean, false);
        assert_eq!(n, vec![keys[1]]);

        // Large radius reaches every image but reports each agent once.
        let n = s.neighbours(rp(5.0, 5.0), 100.0, Proximity::Euclidean, true);
        assert_eq!(sorted(n), sorted(keys.clone()));
    }

    #[test]
    fn degenerate_queries_are_empty() {
        let (mut pop, keys) = setup(1);
        let mut s = space(4.0, 4.0, 1.0, EdgeBehavior::Absorb);
        s.add_agent(keys[0], pop.get_mut(keys[0]).unwrap(), rp(1.0, 1.0));
        assert!(s.neighbours(rp(1.0, 1.0), -1.0, Proximity::Euclidean, true).is_empty());
        assert!(s.neighbours(rp(1.0, 1.0), f64::NAN, Proximity::Coarse, true).is_empty());
        assert!(s.neighbours(rp(-5.0, 1.0), 1.0, Proximity::Euclidean, true).is_empty());
        assert_eq!(s.neighbours(rp(1.0, 1.0), 0.0, Proximity::Euclidean, true), keys);
    }

    #[test]
    fn apply_visits_all() {
        let (mut pop, keys) = setup(3);
        let mut s = space(4.0, 4.0, 1.0, EdgeBehavior::Absorb);
        for (i, &k) in keys.iter().enumerate() {
            s.add_agent(k, pop.get_mut(k).unwrap(), rp(i as f64, 0.5));
        }
        let mut count = 0;
        s.apply(&mut pop, |_| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn to_toroidal_stays_in_domain() {
        let s = space(10.0, 5.0, 1.0, EdgeBehavior::Wrap);
        assert_eq!(s.to_toroidal(rp(-1.0, 5.0)), rp(9.0, 0.0));
        let q = s.to_toroidal(rp(-1e-18, 0.0));
        assert!(q.x >= 0.0 && q.x < 10.0);
    }

    fn torus_l2(a: RealPoint, b: RealPoint, w: f64, h: f64) -> f64 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        dx.min(w - dx).hypot(dy.min(h - dy))
    }

    proptest! {
        #[test]
        fn euclidean_matches_brute_force(
            wrap in any::<bool>(),
            dx in 0.3f64..3.0,
            pts in proptest::collection::vec((0.0f64..10.0, 0.0f64..8.0), 1..25),
            q in (0.0f64..10.0, 0.0f64..8.0),
            r in 0.0f64..6.0,
        ) {
            let edge = if wrap { EdgeBehavior::Wrap } else { EdgeBehavior::Absorb };
            let mut s = space(10.0, 8.0, dx, edge);
            let (mut pop, keys) = setup(pts.len() as u32);
            for (&k, &(x, y)) in keys.iter().zip(&pts) {
                prop_assert!(s.add_agent(k, pop.get_mut(k).unwrap(), rp(x, y)));
            }
            let q = rp(q.0, q.1);
            let got = s.neighbours(q, r, Proximity::Euclidean, true);
            for (k, &(x, y)) in keys.iter().zip(&pts) {
                let d = if wrap {
                    torus_l2(q, rp(x, y), 10.0, 8.0)
                } else {
                    l2(q, rp(x, y))
                };
                // Agents right on the radius may differ by rounding.
                if (d - r).abs() > 1e-9 {
                    prop_assert_eq!(got.contains(k), d <= r);
                }
            }
            let coarse = s.neighbours(q, r, Proximity::Coarse, true);
            for k in &got {
                prop_assert!(coarse.contains(k));
            }
        }
    }
}
