//! Capability traits for agents placed in spatial indices.
//!
//! An index never owns the agents it references. It stores
//! [`AgentKey`](crate::AgentKey)s and keeps each agent's own position
//! field in sync through these traits, so that an agent is reachable
//! from cell `c` exactly when its position is `c`.

use crate::point::{Point, RealPoint};

/// An agent that can occupy a cell of a discrete grid.
pub trait Positionable {
    /// The cell the agent occupies, or `None` when it is not placed.
    fn pos(&self) -> Option<Point>;

    /// Overwrite the agent's position. Called only by spatial indices.
    fn set_pos(&mut self, pos: Option<Point>);
}

/// An agent that can be placed in continuous space.
pub trait RealPositionable {
    /// The agent's position, or `None` when it is not placed.
    fn pos(&self) -> Option<RealPoint>;

    /// Overwrite the agent's position. Called only by spatial indices.
    fn set_pos(&mut self, pos: Option<RealPoint>);
}
