//! k=4 case-analysis enumeration (spec §4.B). Edge `(u, v)` can only affect
//! the connectivity of a 4-set through one of seven shapes, classified by
//! how the set's other two nodes reach `u` and `v`:
//!
//! - **A1** — both extra nodes hang off the same endpoint (wedge→star,
//!   triangle→kite).
//! - **A2** — one extra node is two hops from an endpoint through the
//!   other extra node (wedge→path).
//! - **A3** — the extra nodes hang one off each endpoint, not already
//!   linked (two pairs→path).
//! - **R1** — mirror of A2 where the two-hop node is already the other
//!   endpoint's neighbor (path→square).
//! - **R2** — an extra node off one endpoint plus a node both endpoints
//!   already share (path→kite, kite→diamond).
//! - **R3** — both extra nodes are shared one-hop neighbors, linked
//!   through a further hop (star→kite).
//! - **R4** — two extra nodes already shared by both endpoints
//!   (square→diamond, diamond→clique).
//!
//! A1/A2/A3 candidates are brand-new subgraphs; R1-R4 candidates already
//! existed and only gain/lose the `(u, v)` edge.

use fnv::FnvHashSet;
use itertools::Itertools;

use crate::graph::GraphIndex;
use crate::model::Node;

fn candidate(u: Node, v: Node, a: Node, b: Node) -> Vec<Node> {
    let mut nodes = vec![u, v, a, b];
    nodes.sort_unstable();
    nodes
}

/// The brand-new-candidate half of [`addition_explore`] (A1/A2/A3 only).
/// Reservoir-backed sessions use this alone: on insertion it's the set of
/// candidates to sample from, and on deletion (run against the
/// already-mutated graph) it's exactly the set of reservoir-held subgraphs
/// that just lost connectivity, since "becomes connected by adding this
/// edge" and "was connected only because of this edge" are the same
/// predicate evaluated on opposite sides of the mutation.
pub fn new_subgraphs(graph: &GraphIndex, u: Node, v: Node) -> FnvHashSet<Vec<Node>> {
    addition_explore(graph, u, v).0
}

pub fn addition_explore(graph: &GraphIndex, u: Node, v: Node) -> (FnvHashSet<Vec<Node>>, FnvHashSet<Vec<Node>>) {
    let mut adds: FnvHashSet<Vec<Node>> = FnvHashSet::default();
    let mut reps: FnvHashSet<Vec<Node>> = FnvHashSet::default();

    let u_neighbors = graph.neighbors(u);
    let v_neighbors = graph.neighbors(v);

    let one_hop_common: FnvHashSet<Node> = u_neighbors.intersection(&v_neighbors).copied().collect();
    let u_own: FnvHashSet<Node> = u_neighbors.difference(&one_hop_common).copied().collect();
    let v_own: FnvHashSet<Node> = v_neighbors.difference(&one_hop_common).copied().collect();

    // A1: wedge to star, triangle to kite.
    if u_own.len() > 1 {
        for pair in u_own.iter().combinations(2) {
            adds.insert(candidate(u, v, *pair[0], *pair[1]));
        }
    }
    if v_own.len() > 1 {
        for pair in v_own.iter().combinations(2) {
            adds.insert(candidate(u, v, *pair[0], *pair[1]));
        }
    }

    let u_own_two_hop = graph.two_hop_neighborhood(u, Some(&u_own), &FnvHashSet::default());
    let v_own_two_hop = graph.two_hop_neighborhood(v, Some(&v_own), &FnvHashSet::default());

    // A2: wedge to path. R1: path to square (mirror case where the
    // two-hop node is already the other endpoint's own neighbor).
    if !u_own_two_hop.is_empty() {
        for (&n1, n2s) in &u_own_two_hop {
            if !v_own.contains(&n1) {
                for &n2 in n2s {
                    adds.insert(candidate(u, v, n1, n2));
                }
            } else {
                for &n2 in n2s {
                    reps.insert(candidate(u, v, n1, n2));
                }
            }
        }
    }
    if !v_own_two_hop.is_empty() {
        for (&n1, n2s) in &v_own_two_hop {
            if !u_own.contains(&n1) {
                for &n2 in n2s {
                    adds.insert(candidate(u, v, n1, n2));
                }
            } else {
                for &n2 in n2s {
                    reps.insert(candidate(u, v, n1, n2));
                }
            }
        }
    }

    // A3: two pairs, one off each endpoint, to a path.
    if !u_own.is_empty() && !v_own.is_empty() {
        for &n_u in &u_own {
            for &n_v in &v_own {
                let already_two_hop = u_own_two_hop.get(&n_v).is_some_and(|ns| ns.contains(&n_u));
                if !already_two_hop {
                    adds.insert(candidate(u, v, n_u, n_v));
                }
            }
        }
    }

    // R2: path to kite, kite to diamond.
    if !one_hop_common.is_empty() {
        if !u_own.is_empty() {
            for &n1 in &u_own {
                for &n2 in &one_hop_common {
                    reps.insert(candidate(u, v, n1, n2));
                }
            }
        }
        if !v_own.is_empty() {
            for &n1 in &v_own {
                for &n2 in &one_hop_common {
                    reps.insert(candidate(u, v, n1, n2));
                }
            }
        }
    }

    // R3: star to kite.
    let mut exclude = v_own.clone();
    exclude.insert(v);
    let two_hop_common = graph.two_hop_neighborhood(u, Some(&one_hop_common), &exclude);
    if !two_hop_common.is_empty() {
        for (&n1, n2s) in &two_hop_common {
            for &n2 in n2s {
                reps.insert(candidate(u, v, n1, n2));
            }
        }
    }

    // R4: square to diamond, diamond to clique.
    if one_hop_common.len() > 1 {
        for pair in one_hop_common.iter().combinations(2) {
            reps.insert(candidate(u, v, *pair[0], *pair[1]));
        }
    }

    (adds, reps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn n(id: u32) -> Node {
        Node::new(id, 1)
    }

    #[test]
    fn wedge_to_star_is_an_a1_addition() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        g.add_edge(Edge::new(n(1), n(4), 1));
        // u=1 has two "own" neighbors (3,4); v=2 has none yet.
        let (adds, reps) = addition_explore(&g, n(1), n(2));
        assert!(adds.contains(&candidate(n(1), n(2), n(3), n(4))));
        assert!(reps.is_empty());
    }

    #[test]
    fn square_to_diamond_is_an_r4_replacement() {
        let mut g = GraphIndex::new();
        // 3 and 4 both already adjacent to both 1 and 2: one_hop_common = {3,4}.
        g.add_edge(Edge::new(n(1), n(3), 1));
        g.add_edge(Edge::new(n(1), n(4), 1));
        g.add_edge(Edge::new(n(2), n(3), 1));
        g.add_edge(Edge::new(n(2), n(4), 1));
        let (adds, reps) = addition_explore(&g, n(1), n(2));
        assert!(reps.contains(&candidate(n(1), n(2), n(3), n(4))));
        assert!(!adds.contains(&candidate(n(1), n(2), n(3), n(4))));
    }

    #[test]
    fn two_pairs_to_path_is_an_a3_addition() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        g.add_edge(Edge::new(n(2), n(4), 1));
        let (adds, _) = addition_explore(&g, n(1), n(2));
        assert!(adds.contains(&candidate(n(1), n(2), n(3), n(4))));
    }
}
