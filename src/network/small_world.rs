use log::{trace, warn};

use crate::define_rng;
use crate::error::EpiError;
use crate::network::ContactGraph;
use crate::random::RngStore;

define_rng!(pub ContactGraphRng);

impl ContactGraph {
    /// Builds a Watts–Strogatz small-world graph.
    ///
    /// Each of the `node_count` nodes on a ring is joined to its `neighbors / 2` nearest nodes on
    /// either side (an odd `neighbors` behaves as `neighbors - 1`). Then, for each lattice offset
    /// in turn and each node `u` in order, the edge `u`-`(u + offset)` is replaced with
    /// probability `rewiring_probability` by an edge from `u` to a uniformly chosen node that is
    /// neither `u` nor already adjacent to `u`. `neighbors == node_count` gives the complete
    /// graph.
    ///
    /// All draws come from [`ContactGraphRng`], so the graph depends only on the arguments and the
    /// store's base seed.
    ///
    /// # Errors
    ///
    /// Returns [`EpiError::InvalidParameter`] if `neighbors > node_count` or the rewiring
    /// probability is not in `[0, 1]`.
    pub fn small_world(
        node_count: usize,
        neighbors: usize,
        rewiring_probability: f64,
        rngs: &RngStore,
    ) -> Result<Self, EpiError> {
        if neighbors > node_count {
            return Err(EpiError::invalid_parameter(
                "neighbors",
                format!("{neighbors} neighbors requested for {node_count} nodes"),
            ));
        }
        if !(0.0..=1.0).contains(&rewiring_probability) {
            return Err(EpiError::invalid_parameter(
                "rewiring_probability",
                format!("{rewiring_probability} is not a probability"),
            ));
        }
        if neighbors == node_count {
            return Self::complete(node_count);
        }
        if neighbors % 2 == 1 {
            warn!(
                "odd neighbor count {neighbors}; each node is joined to {} nearest neighbors",
                neighbors - 1
            );
        }

        let half = neighbors / 2;
        let mut graph = ContactGraph::with_nodes(node_count);
        for offset in 1..=half {
            for u in 0..node_count {
                graph.add_edge(u, (u + offset) % node_count)?;
            }
        }

        let mut rewired = 0_usize;
        for offset in 1..=half {
            for u in 0..node_count {
                let v = (u + offset) % node_count;
                if rngs.sample_uniform(ContactGraphRng) >= rewiring_probability {
                    continue;
                }
                // A node adjacent to everyone has no candidate endpoint.
                if graph.degree(u) >= node_count - 1 {
                    continue;
                }
                let mut w = rngs.sample_range(ContactGraphRng, 0..node_count);
                while w == u || graph.has_edge(u, w) {
                    w = rngs.sample_range(ContactGraphRng, 0..node_count);
                }
                graph.remove_edge(u, v);
                graph.add_edge(u, w)?;
                rewired += 1;
            }
        }
        trace!(
            "built small-world graph: {node_count} nodes, {} edges, {rewired} rewired",
            graph.edge_count()
        );
        Ok(graph)
    }

    fn complete(node_count: usize) -> Result<Self, EpiError> {
        let mut graph = ContactGraph::with_nodes(node_count);
        for a in 0..node_count {
            for b in (a + 1)..node_count {
                graph.add_edge(a, b)?;
            }
        }
        Ok(graph)
    }
}
