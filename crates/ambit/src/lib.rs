//! Ambit: an agent-based modelling toolkit.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Ambit sub-crates. For most users, adding `ambit` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ambit::prelude::*;
//!
//! // An agent that walks one cell east every epoch.
//! struct Ant {
//!     pos: Option<Point>,
//! }
//!
//! impl Positionable for Ant {
//!     fn pos(&self) -> Option<Point> { self.pos }
//!     fn set_pos(&mut self, pos: Option<Point>) { self.pos = pos; }
//! }
//!
//! struct Colony {
//!     ants: Population<Ant>,
//!     field: Field,
//! }
//!
//! impl SimState for Colony {
//!     fn should_end(&self, epoch: Epoch) -> bool { epoch >= Epoch(5) }
//! }
//!
//! impl AgentHost for Colony {
//!     type Agent = Ant;
//!     fn population(&self) -> &Population<Ant> { &self.ants }
//!     fn population_mut(&mut self) -> &mut Population<Ant> { &mut self.ants }
//! }
//!
//! impl Schedulable<Colony> for Ant {
//!     fn step(&mut self, key: AgentKey, colony: &mut Colony) {
//!         if let Some(p) = self.pos {
//!             colony.field.move_agent(key, self, p + Point::new(1, 0));
//!         }
//!     }
//!     fn is_active(&self) -> bool { true }
//! }
//!
//! // A 4x4 torus with one ant in the corner.
//! let mut field = Field::new(4, 4, EdgeBehavior::Wrap).unwrap();
//! let mut ants = Population::new();
//! let key = ants.insert(Ant { pos: None });
//! field.add_agent(key, ants.get_mut(key).unwrap(), Point::new(0, 0));
//!
//! let mut schedule = Schedule::new(Colony { ants, field });
//! schedule.schedule_repeating(key, Epoch(1), 0, 1);
//! assert_eq!(schedule.execute(), 5);
//!
//! // Five steps east on a width-4 torus.
//! let colony = schedule.model();
//! assert_eq!(colony.field.agent(Point::new(1, 0)), Some(key));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ambit-core` | Points, keys, epochs, the agent population, capability traits |
//! | [`space`] | `ambit-space` | Grids, continuous space, value layers and networks |
//! | [`schedule`] | `ambit-schedule` | Discrete-event scheduler and model traits |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`ambit-core`).
///
/// Contains [`types::Point`], [`types::RealPoint`], the generational
/// [`types::Population`] arena and the [`types::Positionable`] capability
/// traits.
pub use ambit_core as types;

/// Spatial indices (`ambit-space`).
///
/// Provides [`space::Field`], [`space::MultiagentField`],
/// [`space::ContinuousSpace`], [`space::ValueLayer`] and
/// [`space::Network`].
pub use ambit_space as space;

/// Discrete-event scheduling (`ambit-schedule`).
///
/// [`schedule::Schedule`] owns the model and runs agents implementing
/// [`schedule::Schedulable`] in `(time, order)` order.
pub use ambit_schedule as schedule;

/// Common imports for typical Ambit usage.
///
/// ```rust
/// use ambit::prelude::*;
/// ```
///
/// This imports the most frequently used types: coordinates and keys, the
/// population arena, capability traits, every spatial backend and the
/// scheduler.
pub mod prelude {
    // Core types and traits
    pub use ambit_core::{
        l2, AgentKey, Epoch, NodeKey, Point, Population, Positionable, RealPoint,
        RealPositionable,
    };

    // Errors
    pub use ambit_core::ConfigError;
    pub use ambit_space::SpaceError;

    // Space
    pub use ambit_space::{
        ContinuousConfig, ContinuousSpace, EdgeBehavior, EdgeOptions, Field, IntValueLayer,
        MultiagentField, Neighbourhood, Network, Proximity, RealValueLayer, ValueLayer,
    };

    // Scheduling
    pub use ambit_schedule::{AgentHost, Schedulable, Schedule, SimState, StepReport};
}
