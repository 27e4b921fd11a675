//! Double-buffered scalar raster.
//!
//! Reads see the *read* buffer, writes land in the *write* buffer, and
//! [`ValueLayer::swap`] exchanges the two in O(1). Within one phase every
//! cell observes the same snapshot, which is what diffusion-style
//! cellular updates need.

use std::mem;

use ambit_core::Point;

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::grid::{GridShape, Neighbourhood};

/// Double-buffered raster of values of type `T`.
///
/// # Examples
///
/// ```
/// use ambit_core::Point;
/// use ambit_space::{EdgeBehavior, IntValueLayer};
///
/// let mut layer = IntValueLayer::new(3, 3, EdgeBehavior::Absorb, 0).unwrap();
/// let p = Point::new(1, 1);
/// layer.set(p, 5);
/// assert_eq!(layer.get(p), Some(&0));
/// layer.swap();
/// assert_eq!(layer.get(p), Some(&5));
/// ```
#[derive(Clone, Debug)]
pub struct ValueLayer<T> {
    shape: GridShape,
    read: Vec<T>,
    write: Vec<T>,
}

/// Integer-valued layer.
pub type IntValueLayer = ValueLayer<i32>;

/// Real-valued layer.
pub type RealValueLayer = ValueLayer<f64>;

impl<T: Clone> ValueLayer<T> {
    /// Create a layer with both buffers filled with `init`.
    pub fn new(width: u32, height: u32, edge: EdgeBehavior, init: T) -> Result<Self, SpaceError> {
        let shape = GridShape::new(width, height, edge)?;
        let read = vec![init; shape.cell_count()];
        Ok(Self {
            shape,
            write: read.clone(),
            read,
        })
    }

    /// Values at the cells of the radius-`r` neighbourhood around `pos`,
    /// taken from the read buffer in enumeration order.
    pub fn neighbours(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<T> {
        let mut out = Vec::with_capacity(self.shape.reservation(r, kind));
        self.shape.visit_neighbourhood(pos, r, kind, center, |p| {
            if let Some(v) = self.get(p) {
                out.push(v.clone());
            }
        });
        out
    }
}

impl<T> ValueLayer<T> {
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

    /// Whether the layer wraps around at its edges.
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

    /// Value at `pos` in the read buffer.
    pub fn get(&self, pos: Point) -> Option<&T> {
        self.shape.index(pos).map(|i| &self.read[i])
    }

    /// Value at `pos` in the write buffer.
    pub fn get_from_write(&self, pos: Point) -> Option<&T> {
        self.shape.index(pos).map(|i| &self.write[i])
    }

    /// Store `value` at `pos` in the write buffer. Returns `false` off
    /// the grid.
    pub fn set(&mut self, pos: Point, value: T) -> bool {
        match self.shape.index(pos) {
            Some(i) => {
                self.write[i] = value;
                true
            }
            None => false,
        }
    }

    /// Store `value` at `pos` in the read buffer, visible immediately.
    pub fn set_on_read(&mut self, pos: Point, value: T) -> bool {
        match self.shape.index(pos) {
            Some(i) => {
                self.read[i] = value;
                true
            }
            None => false,
        }
    }

    /// Mutate every cell of the write buffer.
    pub fn apply(&mut self, f: impl FnMut(&mut T)) {
        self.write.iter_mut().for_each(f);
    }

    /// Mutate every cell of the write buffer, row-major, with its position.
    pub fn transform(&mut self, mut f: impl FnMut(Point, &mut T)) {
        let shape = self.shape;
        for (i, v) in self.write.iter_mut().enumerate() {
            f(shape.point_at(i), v);
        }
    }

    /// Visit every cell of the read buffer, row-major.
    pub fn for_each(&self, mut f: impl FnMut(Point, &T)) {
        for (i, v) in self.read.iter().enumerate() {
            f(self.shape.point_at(i), v);
        }
    }

    /// Cells of the radius-`r` neighbourhood around `pos`.
    pub fn neighbourhood(&self, pos: Point, r: u32, kind: Neighbourhood, center: bool) -> Vec<Point> {
        self.shape.neighbourhood(pos, r, kind, center)
    }

    /// Exchange the read and write buffers.
    pub fn swap(&mut self) {
        mem::swap(&mut self.read, &mut self.write);
    }

    /// The read buffer, row-major.
    pub fn read_buffer(&self) -> &[T] {
        &self.read
    }

    /// The write buffer, row-major.
    pub fn write_buffer(&self) -> &[T] {
        &self.write
    }
}
