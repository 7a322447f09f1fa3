//! A module for modeling the contact network.
//!
//! The network is an undirected, unweighted graph over the nodes `0..node_count`, one node per
//! individual. It is stored as adjacency lists whose order is the order in which edges were
//! added, so iterating a node's neighbors is stable for a given construction sequence. The
//! simulation's neighbor scan depends on that order.

mod small_world;

pub use small_world::ContactGraphRng;

use crate::error::EpiError;

/// The underlying storage type representing an adjacency list
pub type AdjacencyList = Vec<usize>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactGraph {
    /// The backing storage vector for the adjacency lists.
    adjacency_lists: Vec<AdjacencyList>,
    edge_count: usize,
}

impl ContactGraph {
    /// Creates a graph with `node_count` nodes and no edges.
    #[must_use]
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency_lists: vec![AdjacencyList::new(); node_count],
            edge_count: 0,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency_lists.len()
    }

    /// The number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the neighbors of `node` in stable order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this graph.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency_lists[node]
    }

    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency_lists.get(node).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency_lists
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Adds the undirected edge `a`-`b`, appending each endpoint to the other's adjacency list.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError`] if `a` and `b` are the same node, if the edge already exists, or if
    /// either endpoint is not a node of this graph.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<(), EpiError> {
        if a == b {
            return Err(EpiError::CannotMakeEdgeToSelf(a));
        }
        let node_count = self.node_count();
        for node in [a, b] {
            if node >= node_count {
                return Err(EpiError::InvalidIndividual(node));
            }
        }
        if self.has_edge(a, b) {
            return Err(EpiError::EdgeAlreadyExists(a, b));
        }
        self.adjacency_lists[a].push(b);
        self.adjacency_lists[b].push(a);
        self.edge_count += 1;
        Ok(())
    }

    /// Removes the edge `a`-`b` if it exists, keeping the relative order of the remaining
    /// neighbors. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, a: usize, b: usize) -> bool {
        if !self.has_edge(a, b) {
            return false;
        }
        self.adjacency_lists[a].retain(|&neighbor| neighbor != b);
        self.adjacency_lists[b].retain(|&neighbor| neighbor != a);
        self.edge_count -= 1;
        true
    }

    /// Iterates over every undirected edge once, as `(low, high)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency_lists
            .iter()
            .enumerate()
            .flat_map(|(node, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&neighbor| node < neighbor)
                    .map(move |&neighbor| (node, neighbor))
            })
    }

}
