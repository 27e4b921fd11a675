//! Spatial indices for Ambit simulations.
//!
//! Every index stores [`AgentKey`](ambit_core::AgentKey)s into a
//! [`Population`](ambit_core::Population) rather than the agents
//! themselves, and keeps each agent's own position field in sync with
//! the cell that references it.
//!
//! # Backends
//!
//! - [`Field`]: single-occupancy grid, at most one agent per cell
//! - [`MultiagentField`]: grid whose cells hold any number of agents
//! - [`ContinuousSpace`]: real-valued positions bucketed into a
//!   discretization grid for radius queries
//! - [`ValueLayer`]: double-buffered scalar raster
//! - [`Network`]: labelled multigraph with breadth-first neighbourhoods
//!
//! The three discrete grids share one neighbourhood enumeration,
//! [`GridShape::visit_neighbourhood`], parameterised by [`Neighbourhood`]
//! (Moore or von Neumann) and [`EdgeBehavior`] (absorb or wrap).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod continuous;
pub mod edge;
pub mod error;
pub mod field;
pub mod grid;
pub mod multi;
pub mod network;
pub mod value_layer;

#[cfg(test)]
pub(crate) mod compliance;

pub use continuous::{ContinuousConfig, ContinuousSpace, Proximity};
pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use field::Field;
pub use grid::{GridShape, Neighbourhood};
pub use multi::MultiagentField;
pub use network::{Edge, EdgeOptions, Network};
pub use value_layer::{IntValueLayer, RealValueLayer, ValueLayer};
