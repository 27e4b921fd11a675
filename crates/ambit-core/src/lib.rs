//! Core types and traits for the Ambit agent-based modelling toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Ambit workspace:
//! coordinates, identifiers, the agent [`Population`] arena, capability
//! traits and configuration errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod point;
pub mod population;
pub mod traits;

pub use error::ConfigError;
pub use id::{AgentKey, Epoch, NodeKey};
pub use point::{l2, Point, RealPoint};
pub use population::Population;
pub use traits::{Positionable, RealPositionable};
