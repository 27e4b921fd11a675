//! Labelled graph of user values with breadth-first neighbourhoods.
//!
//! Nodes are user values `N`, deduplicated by equality: adding a value
//! equal to one already present returns the existing node. Each node owns
//! an insertion-ordered set of outgoing [`Edge`]s; two edges are the same
//! edge when their endpoints and label match, whatever their weights.
//!
//! An [undirected](Network::undirected) network stores every edge twice,
//! once per endpoint, and keeps the two copies in sync on insertion and
//! removal. A [directed](Network::directed) network stores each edge once.

use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use ambit_core::NodeKey;
use indexmap::{IndexMap, IndexSet};
use slotmap::{SecondaryMap, SlotMap};
use tracing::trace;

/// Optional attributes of a new edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeOptions<L> {
    /// Edge label. Part of the edge's identity.
    pub label: Option<L>,
    /// Edge weight. Not part of the edge's identity.
    pub weight: Option<f64>,
}

impl<L> Default for EdgeOptions<L> {
    fn default() -> Self {
        Self {
            label: None,
            weight: None,
        }
    }
}

impl<L> EdgeOptions<L> {
    /// Options carrying only a label.
    pub fn labelled(label: L) -> Self {
        Self {
            label: Some(label),
            weight: None,
        }
    }

    /// Options carrying only a weight.
    pub fn weighted(weight: f64) -> Self {
        Self {
            label: None,
            weight: Some(weight),
        }
    }
}

/// A directed edge between two nodes of a [`Network`].
///
/// Equality and hashing consider `(from, to, label)` only.
#[derive(Clone, Debug)]
pub struct Edge<L> {
    /// Source node.
    pub from: NodeKey,
    /// Target node.
    pub to: NodeKey,
    /// Optional label.
    pub label: Option<L>,
    /// Optional weight.
    pub weight: Option<f64>,
}

impl<L> Edge<L> {
    /// Create an edge from explicit options.
    pub fn new(from: NodeKey, to: NodeKey, options: EdgeOptions<L>) -> Self {
        Self {
            from,
            to,
            label: options.label,
            weight: options.weight,
        }
    }
}

impl<L: Clone> Edge<L> {
    /// The same edge traversed the other way.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            label: self.label.clone(),
            weight: self.weight,
        }
    }
}

impl<L: PartialEq> PartialEq for Edge<L> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.label == other.label
    }
}

impl<L: Eq> Eq for Edge<L> {}

impl<L: Hash> Hash for Edge<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.label.hash(state);
    }
}

/// Graph of user values of type `N` joined by edges labelled with `L`.
///
/// # Examples
///
/// ```
/// use ambit_space::Network;
///
/// let mut net: Network<u32> = Network::undirected();
/// net.add_edge(1, 2);
/// net.add_edge(2, 3);
///
/// let around: Vec<u32> = net
///     .neighbourhood(&1, 2, false)
///     .into_iter()
///     .filter_map(|k| net.node(k).copied())
///     .collect();
/// assert_eq!(around, vec![2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Network<N, L = ()> {
    nodes: SlotMap<NodeKey, N>,
    lookup: IndexMap<N, NodeKey>,
    edges: SecondaryMap<NodeKey, IndexSet<Edge<L>>>,
    directed: bool,
}

impl<N, L> Default for Network<N, L>
where
    N: Clone + Eq + Hash,
    L: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::undirected()
    }
}

impl<N, L> Network<N, L>
where
    N: Clone + Eq + Hash,
    L: Clone + Eq + Hash,
{
    fn with_direction(directed: bool) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            lookup: IndexMap::new(),
            edges: SecondaryMap::new(),
            directed,
        }
    }

    /// An empty network whose edges are mirrored at both endpoints.
    pub fn undirected() -> Self {
        Self::with_direction(false)
    }

    /// An empty network whose edges are stored at their source only.
    pub fn directed() -> Self {
        Self::with_direction(true)
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Insert `node`, or find the existing node equal to it.
    ///
    /// An existing node is never overwritten; use
    /// [`update_node`](Self::update_node) for that.
    pub fn add_node(&mut self, node: N) -> NodeKey {
        if let Some(&key) = self.lookup.get(&node) {
            return key;
        }
        let key = self.nodes.insert(node.clone());
        self.edges.insert(key, IndexSet::new());
        self.lookup.insert(node, key);
        key
    }

    /// Remove the node equal to `node` together with every edge touching it.
    ///
    /// O(degree) on an undirected network, O(V) on a directed one, which
    /// has to scan every edge set for incoming edges. The last node in
    /// [`nodes`](Self::nodes) order takes the deleted node's place.
    pub fn delete_node(&mut self, node: &N) -> Option<N> {
        let key = self.lookup.swap_remove(node)?;
        let outgoing = self.edges.remove(key).unwrap_or_default();
        let mut cascaded = 0;
        if self.directed {
            for (_, set) in self.edges.iter_mut() {
                let before = set.len();
                set.retain(|e| e.to != key);
                cascaded += before - set.len();
            }
        } else {
            for edge in &outgoing {
                if let Some(set) = self.edges.get_mut(edge.to) {
                    let before = set.len();
                    set.retain(|e| e.to != key);
                    cascaded += before - set.len();
                }
            }
        }
        trace!(
            outgoing = outgoing.len(),
            incoming = cascaded,
            "network node deleted"
        );
        self.nodes.remove(key)
    }

    /// Replace the stored value of the node equal to `node`.
    ///
    /// Returns `false` if no such node exists.
    pub fn update_node(&mut self, node: N) -> bool {
        let Some(&key) = self.lookup.get(&node) else {
            return false;
        };
        match self.nodes.get_mut(key) {
            Some(slot) => {
                *slot = node;
                true
            }
            None => false,
        }
    }

    /// Add an unlabelled, unweighted edge, creating missing endpoints.
    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_edge_with(from, to, EdgeOptions::default());
    }

    /// Add an edge with the given options, creating missing endpoints.
    ///
    /// Adding an edge equal to an existing one keeps the existing edge.
    pub fn add_edge_with(&mut self, from: N, to: N, options: EdgeOptions<L>) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.add_edge_between(from, to, options);
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns `false` if either key is stale.
    pub fn add_edge_between(&mut self, from: NodeKey, to: NodeKey, options: EdgeOptions<L>) -> bool {
        if !(self.nodes.contains_key(from) && self.nodes.contains_key(to)) {
            return false;
        }
        let edge = Edge::new(from, to, options);
        if !self.directed {
            if let Some(set) = self.edges.get_mut(to) {
                set.insert(edge.reversed());
            }
        }
        if let Some(set) = self.edges.get_mut(from) {
            set.insert(edge);
        }
        true
    }

    /// The edge from `from` to `to` carrying `label`, if present.
    pub fn edge(&self, from: &N, to: &N, label: Option<L>) -> Option<&Edge<L>> {
        let from = self.node_key(from)?;
        let to = self.node_key(to)?;
        let probe = Edge {
            from,
            to,
            label,
            weight: None,
        };
        self.edges.get(from)?.get(&probe)
    }

    /// Remove the unlabelled edge from `from` to `to`.
    pub fn remove_edge(&mut self, from: &N, to: &N) -> bool {
        let (Some(from), Some(to)) = (self.node_key(from), self.node_key(to)) else {
            return false;
        };
        self.remove_edge_exact(&Edge::new(from, to, EdgeOptions::default()))
    }

    /// Remove the edge equal to `edge`. Returns whether it was present.
    pub fn remove_edge_exact(&mut self, edge: &Edge<L>) -> bool {
        let removed = self
            .edges
            .get_mut(edge.from)
            .is_some_and(|set| set.shift_remove(edge));
        if removed && !self.directed {
            if let Some(set) = self.edges.get_mut(edge.to) {
                set.shift_remove(&edge.reversed());
            }
        }
        removed
    }

    /// Remove every outgoing edge of `node`, and on an undirected network
    /// their mirrors. Returns how many outgoing edges were removed.
    pub fn remove_edges(&mut self, node: &N) -> usize {
        let Some(key) = self.node_key(node) else {
            return 0;
        };
        let outgoing = match self.edges.get_mut(key) {
            Some(set) => std::mem::take(set),
            None => return 0,
        };
        if !self.directed {
            for edge in &outgoing {
                if let Some(set) = self.edges.get_mut(edge.to) {
                    set.retain(|e| e.to != key);
                }
            }
        }
        outgoing.len()
    }

    /// Outgoing edges of `node` in insertion order, or `None` for an
    /// unknown node.
    pub fn edges(&self, node: &N) -> Option<impl Iterator<Item = &Edge<L>>> {
        let key = self.node_key(node)?;
        self.edges.get(key).map(|set| set.iter())
    }

    /// Number of outgoing edges of `node`. Zero for an unknown node.
    pub fn out_degree(&self, node: &N) -> usize {
        self.node_key(node)
            .and_then(|key| self.edges.get(key))
            .map_or(0, IndexSet::len)
    }

    /// Nodes reachable from `node` in at most `radius` hops, in
    /// breadth-first order. Each node appears once; the start node is
    /// appended last if `center` is set.
    ///
    /// Empty for an unknown node.
    pub fn neighbourhood(&self, node: &N, radius: usize, center: bool) -> Vec<NodeKey> {
        let Some(start) = self.node_key(node) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((key, depth)) = queue.pop_front() {
            if depth == radius {
                continue;
            }
            let Some(out) = self.edges.get(key) else {
                continue;
            };
            for edge in out {
                if visited.insert(edge.to) {
                    result.push(edge.to);
                    queue.push_back((edge.to, depth + 1));
                }
            }
        }
        if center {
            result.push(start);
        }
        result
    }

    /// The value stored for `key`.
    pub fn node(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    /// Key of the node equal to `node`.
    pub fn node_key(&self, node: &N) -> Option<NodeKey> {
        self.lookup.get(node).copied()
    }

    /// Whether a node equal to `node` exists.
    pub fn has_node(&self, node: &N) -> bool {
        self.lookup.contains_key(node)
    }

    /// All nodes in insertion order, except that each deletion moves the
    /// last node into the deleted node's position.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &N)> {
        self.lookup
            .values()
            .filter_map(|&key| self.nodes.get(key).map(|n| (key, n)))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges. On an undirected network every edge
    /// between distinct nodes is counted at both endpoints.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }
}
