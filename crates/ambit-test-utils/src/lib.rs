//! Fixture agents and models for Ambit development.
//!
//! - [`Marker`] and [`Particle`]: minimal positionable agents for the
//!   discrete and continuous spaces.
//! - [`HorizonModel`]: a model that stops at a fixed epoch and records
//!   the order in which its agents ran.
//! - [`Tally`] and [`TwoPhase`]: schedulable agents without and with an
//!   advance phase.
//! - [`seeded_rng`] and friends: deterministic randomness for
//!   randomized scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    random_point, random_real_point, seeded_rng, HorizonModel, Marker, Particle, Phase, Tally,
    TwoPhase,
};
