//! Grid geometry shared by the discrete spaces.
//!
//! [`GridShape`] owns the width/height/edge triple and the one
//! neighbourhood enumeration that [`Field`](crate::Field),
//! [`MultiagentField`](crate::MultiagentField) and
//! [`ValueLayer`](crate::ValueLayer) all delegate to.

use ambit_core::{ConfigError, Point};

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;

/// Shape of a grid neighbourhood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Neighbourhood {
    /// All cells within Chebyshev distance `r` (a square).
    #[default]
    Moore,
    /// All cells within Manhattan distance `r` (a diamond).
    VonNeumann,
}

impl Neighbourhood {
    /// Whether offset `(dx, dy)` lies inside a neighbourhood of radius `r`.
    ///
    /// Callers only pass offsets inside the `[-r, r]` square.
    fn admits(self, dx: i64, dy: i64, r: i64) -> bool {
        match self {
            Neighbourhood::Moore => true,
            Neighbourhood::VonNeumann => dx.abs() + dy.abs() <= r,
        }
    }

    /// Reservation size for a radius-`r` query: `(2r+1)^2` for Moore,
    /// `r^2 + (r+1)^2` for von Neumann. Not the exact result size.
    pub fn capacity_hint(self, r: u32) -> usize {
        let r = r as usize;
        match self {
            Neighbourhood::Moore => {
                let side = r.saturating_mul(2).saturating_add(1);
                side.saturating_mul(side)
            }
            Neighbourhood::VonNeumann => r
                .saturating_mul(r)
                .saturating_add((r + 1).saturating_mul(r + 1)),
        }
    }
}

/// Resolve one axis value under the given edge behavior.
/// Returns `None` for an out-of-range value on an absorbing edge.
fn resolve_axis(val: i64, len: u32, edge: EdgeBehavior) -> Option<i32> {
    let n = i64::from(len);
    if (0..n).contains(&val) {
        return Some(val as i32);
    }
    match edge {
        EdgeBehavior::Absorb => None,
        EdgeBehavior::Wrap => Some(val.rem_euclid(n) as i32),
    }
}

/// Dimensions and boundary behavior of a row-major grid.
///
/// Cell `(x, y)` is stored at flat index `y * width + x`. Both
/// dimensions are non-zero and fit in `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    width: u32,
    height: u32,
    edge: EdgeBehavior,
}

impl GridShape {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Maximum number of cells: backends allocate one slot per cell.
    pub const MAX_CELLS: usize = 1 << 28;

    /// Validate and create a grid shape.
    ///
    /// Returns `Err` if either dimension is zero or exceeds [`Self::MAX_DIM`],
    /// or if the grid has more than [`Self::MAX_CELLS`] cells.
    pub fn new(width: u32, height: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height }.into());
        }
        if width > Self::MAX_DIM {
            return Err(ConfigError::DimensionTooLarge {
                name: "width",
                value: width,
            }
            .into());
        }
        if height > Self::MAX_DIM {
            return Err(ConfigError::DimensionTooLarge {
                name: "height",
                value: height,
            }
            .into());
        }
        match (width as usize).checked_mul(height as usize) {
            Some(n) if n <= Self::MAX_CELLS => {}
            _ => {
                return Err(ConfigError::TooManyCells {
                    width,
                    height,
                    max: Self::MAX_CELLS,
                }
                .into());
            }
        }
        Ok(Self {
            width,
            height,
            edge,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Boundary behavior.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// Whether the grid wraps around at its edges.
    pub fn is_toroidal(&self) -> bool {
        self.edge.is_toroidal()
    }

    /// Whether `p` lies outside `[0, width) x [0, height)`.
    pub fn out_of_bounds(&self, p: Point) -> bool {
        p.x < 0 || p.y < 0 || p.x as u32 >= self.width || p.y as u32 >= self.height
    }

    /// Map `p` onto the grid as if it were a torus.
    ///
    /// Always lands in bounds, is the identity on in-bounds points, and is
    /// idempotent. Applied regardless of the grid's own edge behavior.
    pub fn to_toroidal(&self, p: Point) -> Point {
        Point::new(
            p.x.rem_euclid(self.width as i32),
            p.y.rem_euclid(self.height as i32),
        )
    }

    /// Resolve a coordinate for access: in-bounds points are returned as
    /// is, out-of-bounds points wrap on a torus and are rejected otherwise.
    pub fn resolve(&self, p: Point) -> Option<Point> {
        self.resolve_wide(i64::from(p.x), i64::from(p.y))
    }

    fn resolve_wide(&self, x: i64, y: i64) -> Option<Point> {
        let x = resolve_axis(x, self.width, self.edge)?;
        let y = resolve_axis(y, self.height, self.edge)?;
        Some(Point::new(x, y))
    }

    /// Flat row-major index of `p` after [`resolve`](Self::resolve).
    pub fn index(&self, p: Point) -> Option<usize> {
        self.resolve(p)
            .map(|q| q.y as usize * self.width as usize + q.x as usize)
    }

    /// Inverse of [`index`](Self::index) for in-range indices.
    pub fn point_at(&self, index: usize) -> Point {
        let w = self.width as usize;
        Point::new((index % w) as i32, (index / w) as i32)
    }

    /// All cells in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(x, y)))
    }

    /// Visit every cell of the radius-`r` neighbourhood around `pos`.
    ///
    /// Offsets are enumerated row by row from `(-r, -r)` to `(r, r)`.
    /// The zero offset is skipped unless `center` is set. Points falling
    /// off an absorbing edge are dropped silently; on a torus they are
    /// wrapped, so with `r` large relative to the grid the same cell may
    /// be visited more than once.
    pub fn visit_neighbourhood(
        &self,
        pos: Point,
        r: u32,
        kind: Neighbourhood,
        center: bool,
        mut f: impl FnMut(Point),
    ) {
        let r = i64::from(r);
        for dy in -r..=r {
            for dx in -r..=r {
                if !kind.admits(dx, dy, r) {
                    continue;
                }
                if dx == 0 && dy == 0 && !center {
                    continue;
                }
                if let Some(p) = self.resolve_wide(i64::from(pos.x) + dx, i64::from(pos.y) + dy) {
                    f(p);
                }
            }
        }
    }

    /// Collect the cells of the radius-`r` neighbourhood around `pos`.
    pub fn neighbourhood(
        &self,
        pos: Point,
        r: u32,
        kind: Neighbourhood,
        center: bool,
    ) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.reservation(r, kind));
        self.visit_neighbourhood(pos, r, kind, center, |p| out.push(p));
        out
    }

    /// Capacity hint for a radius-`r` query, capped so that huge radii on
    /// small bounded grids do not over-allocate.
    pub(crate) fn reservation(&self, r: u32, kind: Neighbourhood) -> usize {
        let hint = kind.capacity_hint(r);
        match self.edge {
            EdgeBehavior::Absorb => hint.min(self.cell_count()),
            EdgeBehavior::Wrap => hint.min(self.cell_count().saturating_mul(4)),
        }
    }
}
