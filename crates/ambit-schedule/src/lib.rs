//! Discrete-event scheduler for Ambit simulations.
//!
//! A [`Schedule`] owns the simulation model and a priority queue of
//! [`Action`]s. Each call to [`Schedule::step`] jumps to the earliest
//! pending time, runs every agent scheduled for it in `(order, insertion)`
//! order, optionally runs a second `advance` phase, and reschedules
//! repeating actions.
//!
//! The model implements [`SimState`] (step hooks and the stop predicate)
//! and [`AgentHost`] (access to the agent [`Population`](ambit_core::Population)).
//! Agents implement [`Schedulable`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod schedule;
pub mod traits;

pub use action::Action;
pub use schedule::{Schedule, StepReport};
pub use traits::{AgentHost, Schedulable, SimState};
