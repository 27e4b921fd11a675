//! Boundary behavior for grid spaces.

/// How a grid handles coordinates that fall off its edges.
///
/// Applies both to neighbourhood enumeration and to direct cell access.
///
/// # Examples
///
/// ```
/// use ambit_core::Point;
/// use ambit_space::{EdgeBehavior, GridShape, Neighbourhood};
///
/// // Absorb: a corner has 3 Moore neighbours, an interior cell has 8.
/// let absorb = GridShape::new(4, 4, EdgeBehavior::Absorb).unwrap();
/// let corner = Point::new(0, 0);
/// let interior = Point::new(1, 1);
/// assert_eq!(absorb.neighbourhood(corner, 1, Neighbourhood::Moore, false).len(), 3);
/// assert_eq!(absorb.neighbourhood(interior, 1, Neighbourhood::Moore, false).len(), 8);
///
/// // Wrap: every cell has 8 (torus).
/// let wrap = GridShape::new(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(wrap.neighbourhood(corner, 1, Neighbourhood::Moore, false).len(), 8);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds coordinates are dropped (bounded space).
    #[default]
    Absorb,
    /// Out-of-bounds coordinates wrap to the opposite side (torus).
    Wrap,
}

impl EdgeBehavior {
    /// Whether opposite edges are adjacent.
    pub fn is_toroidal(self) -> bool {
        matches!(self, EdgeBehavior::Wrap)
    }
}
