//! k=3 closed-form enumeration (spec §4.B): adding or removing edge `(u, v)`
//! only changes the connectivity of triples `{u, v, w}`, and which triples
//! depends solely on whether `w` neighbors exactly one of `u`/`v` or both.

use fnv::FnvHashSet;

use crate::graph::GraphIndex;
use crate::model::Node;

fn candidate(u: Node, v: Node, w: Node) -> Vec<Node> {
    let mut nodes = vec![u, v, w];
    nodes.sort_unstable();
    nodes
}

/// Triples that become connected, or stop being connected, purely because
/// of edge `(u, v)`: `w` adjacent to exactly one of `u`, `v`.
pub fn new_subgraphs(graph: &GraphIndex, u: Node, v: Node) -> FnvHashSet<Vec<Node>> {
    let n_u = graph.neighbors(u);
    let n_v = graph.neighbors(v);

    n_u.symmetric_difference(&n_v).map(|&w| candidate(u, v, w)).collect()
}

/// Splits the k=3 candidates touched by edge `(u, v)` into brand-new
/// subgraphs (`w` adjacent to exactly one of `u`/`v` — the wedge this edge
/// just created) and existing subgraphs whose edge set changes (`w`
/// adjacent to both — a wedge becoming a triangle, or vice versa).
pub fn addition_explore(graph: &GraphIndex, u: Node, v: Node) -> (FnvHashSet<Vec<Node>>, FnvHashSet<Vec<Node>>) {
    let n_u = graph.neighbors(u);
    let n_v = graph.neighbors(v);

    let additions = n_u.symmetric_difference(&n_v).map(|&w| candidate(u, v, w)).collect();
    let replacements = n_u.intersection(&n_v).map(|&w| candidate(u, v, w)).collect();

    (additions, replacements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn n(id: u32) -> Node {
        Node::new(id, 1)
    }

    #[test]
    fn wedge_is_an_addition_when_third_node_touches_only_one_endpoint() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        // edge (1,2) about to be added; node 3 is adjacent only to 1.
        let (adds, reps) = addition_explore(&g, n(1), n(2));
        assert_eq!(adds.len(), 1);
        assert!(adds.contains(&candidate(n(1), n(2), n(3))));
        assert!(reps.is_empty());
    }

    #[test]
    fn triangle_closing_edge_is_a_replacement() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        g.add_edge(Edge::new(n(2), n(3), 1));
        // edge (1,2) about to be added; node 3 is adjacent to both already.
        let (adds, reps) = addition_explore(&g, n(1), n(2));
        assert!(adds.is_empty());
        assert_eq!(reps.len(), 1);
        assert!(reps.contains(&candidate(n(1), n(2), n(3))));
    }

    #[test]
    fn new_subgraphs_matches_addition_explore_additions() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        g.add_edge(Edge::new(n(1), n(4), 1));
        g.add_edge(Edge::new(n(2), n(5), 1));
        let (adds, _) = addition_explore(&g, n(1), n(2));
        assert_eq!(new_subgraphs(&g, n(1), n(2)), adds);
    }
}
