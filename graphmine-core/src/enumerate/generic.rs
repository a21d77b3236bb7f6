//! Generic n-hop fallback enumeration, for any `k` the closed-form (k=3)
//! and case-analysis (k=4) enumerators don't cover.
//!
//! Splits the `k - 2` "other" nodes of a candidate k-set into an h-hop
//! neighborhood of `u` and a `j`-hop neighborhood of `v` (`h + j = k - 2`),
//! for every such split. A pair of neighborhoods only matters if they're
//! disjoint (their union then has exactly `k` nodes); whether the result
//! is a brand-new subgraph or an existing one gaining/losing the `(u, v)`
//! edge depends on whether any node outside `{u, v}` was already reachable
//! from both sides before this edge existed.

use fnv::FnvHashSet;

use crate::graph::GraphIndex;
use crate::model::Node;

fn flatten(hoods: &FnvHashSet<Vec<Node>>) -> FnvHashSet<Node> {
    hoods.iter().flatten().copied().collect()
}

pub fn addition_explore(graph: &GraphIndex, u: Node, v: Node, k: usize) -> (FnvHashSet<Vec<Node>>, FnvHashSet<Vec<Node>>) {
    assert!(k >= 2, "a subgraph needs at least 2 nodes");

    let mut additions: FnvHashSet<Vec<Node>> = FnvHashSet::default();
    let mut replacements: FnvHashSet<Vec<Node>> = FnvHashSet::default();

    for h in 0..=(k - 2) {
        let j = k - 2 - h;

        let u_hoods = graph.n_hop_neighborhood(u, h);
        let v_hoods = graph.n_hop_neighborhood(v, j);

        let common: FnvHashSet<Node> = if h < j {
            let u_hoods_ext = graph.n_hop_neighborhood(u, h + 1);
            flatten(&u_hoods_ext).intersection(&flatten(&v_hoods)).copied().collect()
        } else {
            flatten(&u_hoods).intersection(&flatten(&v_hoods)).copied().collect()
        };
        let common: FnvHashSet<Node> = common.into_iter().filter(|n| *n != u && *n != v).collect();

        for u_hood in &u_hoods {
            let u_set: FnvHashSet<Node> = u_hood.iter().copied().collect();
            for v_hood in &v_hoods {
                if u_set.is_disjoint(&v_hood.iter().copied().collect()) {
                    let mut neighborhood: Vec<Node> = u_hood.iter().chain(v_hood.iter()).copied().collect();
                    neighborhood.sort_unstable();
                    neighborhood.dedup();

                    if additions.contains(&neighborhood) || replacements.contains(&neighborhood) {
                        continue;
                    }

                    let touches_common = neighborhood.iter().any(|n| common.contains(n));
                    if touches_common {
                        replacements.insert(neighborhood);
                    } else {
                        additions.insert(neighborhood);
                    }
                }
            }
        }
    }

    (additions, replacements)
}

/// The brand-new-candidate half of [`addition_explore`]; see
/// `quadruplet::new_subgraphs` for why this alone is what reservoir-backed
/// sessions need on both the insertion and deletion paths.
pub fn new_subgraphs(graph: &GraphIndex, u: Node, v: Node, k: usize) -> FnvHashSet<Vec<Node>> {
    addition_explore(graph, u, v, k).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn n(id: u32) -> Node {
        Node::new(id, 1)
    }

    #[test]
    fn five_node_path_discovered_through_both_sides() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(3), n(1), 1));
        g.add_edge(Edge::new(n(2), n(4), 1));
        g.add_edge(Edge::new(n(4), n(5), 1));
        // edge (1,2) about to connect a 2-hop-from-1 chain to a 2-hop-from-2 chain.
        let (adds, _) = addition_explore(&g, n(1), n(2), 5);
        let mut found = vec![n(1), n(2), n(3), n(4), n(5)];
        found.sort_unstable();
        assert!(adds.contains(&found));
    }

    #[test]
    fn matches_triplet_enumerator_on_k_equals_3() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        let (adds, reps) = addition_explore(&g, n(1), n(2), 3);
        assert!(adds.contains(&vec![n(1), n(2), n(3)]));
        assert!(reps.is_empty());
    }
}
