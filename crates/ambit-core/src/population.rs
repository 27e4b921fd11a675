//! Generational arena holding the agents of a simulation.
//!
//! [`Population`] is the agent collection that schedulers and spatial
//! indices refer into. It hands out [`AgentKey`]s instead of references,
//! so agents never move out from under a pending action or an index
//! cell, and a key to a removed agent fails to resolve instead of
//! dangling.
//!
//! Heterogeneous populations are expressed as one enum over the agent
//! kinds; typed retrieval is a `filter_map` over [`Population::iter`].

use slotmap::SlotMap;

use crate::id::AgentKey;

/// Arena of agents keyed by [`AgentKey`].
///
/// Besides the usual insert/get/remove, a population supports
/// *checking out* an agent: the agent is moved out of its slot while the
/// key stays reserved, then [checked back in](Population::check_in).
/// This is how the scheduler hands an agent `&mut self` alongside
/// mutable access to the model that owns the population.
#[derive(Debug, Clone)]
pub struct Population<A> {
    slots: SlotMap<AgentKey, Option<A>>,
}

impl<A> Population<A> {
    /// Create an empty population.
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    /// Create an empty population with room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Add an agent by value and return its key.
    pub fn insert(&mut self, agent: A) -> AgentKey {
        self.slots.insert(Some(agent))
    }

    /// Construct an agent that needs to know its own key.
    pub fn insert_with_key(&mut self, f: impl FnOnce(AgentKey) -> A) -> AgentKey {
        self.slots.insert_with_key(|key| Some(f(key)))
    }

    /// Remove an agent, returning it if it was present.
    ///
    /// Removing a checked-out agent releases its key and returns `None`;
    /// the agent is dropped when it is checked back in.
    pub fn remove(&mut self, key: AgentKey) -> Option<A> {
        self.slots.remove(key).flatten()
    }

    /// Whether `key` refers to a live agent (checked out or not).
    pub fn contains(&self, key: AgentKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Shared access to an agent. `None` if removed or checked out.
    pub fn get(&self, key: AgentKey) -> Option<&A> {
        self.slots.get(key).and_then(Option::as_ref)
    }

    /// Mutable access to an agent. `None` if removed or checked out.
    pub fn get_mut(&mut self, key: AgentKey) -> Option<&mut A> {
        self.slots.get_mut(key).and_then(Option::as_mut)
    }

    /// Move an agent out of its slot, keeping the key reserved.
    pub fn check_out(&mut self, key: AgentKey) -> Option<A> {
        self.slots.get_mut(key).and_then(Option::take)
    }

    /// Return a checked-out agent to its slot.
    ///
    /// Fails with the agent if the key was removed in the meantime or the
    /// slot is already occupied.
    pub fn check_in(&mut self, key: AgentKey, agent: A) -> Result<(), A> {
        match self.slots.get_mut(key) {
            Some(slot) if slot.is_none() => {
                *slot = Some(agent);
                Ok(())
            }
            _ => Err(agent),
        }
    }

    /// Number of live agents, including checked-out ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the population holds no agents.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keys of every live agent.
    pub fn keys(&self) -> impl Iterator<Item = AgentKey> + '_ {
        self.slots.keys()
    }

    /// Iterate over resident agents with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (AgentKey, &A)> {
        self.slots
            .iter()
            .filter_map(|(key, slot)| slot.as_ref().map(|agent| (key, agent)))
    }

    /// Mutably iterate over resident agents with their keys.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentKey, &mut A)> {
        self.slots
            .iter_mut()
            .filter_map(|(key, slot)| slot.as_mut().map(|agent| (key, agent)))
    }

    /// Remove every agent.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<A> Default for Population<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FromIterator<A> for Population<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        let mut population = Population::new();
        for agent in iter {
            population.insert(agent);
        }
        population
    }
}
