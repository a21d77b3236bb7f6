//! Subgraph-set enumeration dispatch (spec §4.B): given an edge event
//! `(u, v)`, which k-node vertex sets does it touch, and how.
//!
//! `addition_explore`/`new_subgraphs` always succeed, falling back to the
//! generic n-hop algorithm for any `k` the closed-form enumerators don't
//! special-case. `optimized_addition_explore` is the fast path used by the
//! optimized mining algorithms, which only support `k ∈ {3, 4}`.

pub mod generic;
pub mod quadruplet;
pub mod triplet;

use fnv::FnvHashSet;

use crate::error::MiningError;
use crate::graph::GraphIndex;
use crate::model::Node;

pub const OPTIMIZED_SUPPORTED_K: &[usize] = &[3, 4];

/// All vertex sets of size `k` touched by edge `(u, v)`, split into
/// additions (newly connected) and replacements (already connected,
/// gaining or losing this edge). Supports any `k >= 2`.
pub fn addition_explore(graph: &GraphIndex, u: Node, v: Node, k: usize) -> (FnvHashSet<Vec<Node>>, FnvHashSet<Vec<Node>>) {
    match k {
        3 => triplet::addition_explore(graph, u, v),
        4 => quadruplet::addition_explore(graph, u, v),
        _ => generic::addition_explore(graph, u, v, k),
    }
}

/// The additions-only half of [`addition_explore`]. Reservoir-backed
/// sessions use this alone on both the insertion path (candidates to
/// sample from) and the deletion path (run against the already-mutated
/// graph, it identifies which reservoir-held subgraphs just lost
/// connectivity).
pub fn new_subgraphs(graph: &GraphIndex, u: Node, v: Node, k: usize) -> FnvHashSet<Vec<Node>> {
    match k {
        3 => triplet::new_subgraphs(graph, u, v),
        4 => quadruplet::new_subgraphs(graph, u, v),
        _ => generic::new_subgraphs(graph, u, v, k),
    }
}

/// Same as [`addition_explore`], but restricted to the `k` values the
/// optimized mining algorithms support.
pub fn optimized_addition_explore(
    graph: &GraphIndex,
    u: Node,
    v: Node,
    k: usize,
) -> Result<(FnvHashSet<Vec<Node>>, FnvHashSet<Vec<Node>>), MiningError> {
    if !OPTIMIZED_SUPPORTED_K.contains(&k) {
        return Err(MiningError::UnsupportedK { k, supported: OPTIMIZED_SUPPORTED_K });
    }
    Ok(addition_explore(graph, u, v, k))
}

/// Same as [`new_subgraphs`], restricted to the optimized path's `k` values.
pub fn optimized_new_subgraphs(graph: &GraphIndex, u: Node, v: Node, k: usize) -> Result<FnvHashSet<Vec<Node>>, MiningError> {
    if !OPTIMIZED_SUPPORTED_K.contains(&k) {
        return Err(MiningError::UnsupportedK { k, supported: OPTIMIZED_SUPPORTED_K });
    }
    Ok(new_subgraphs(graph, u, v, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;

    fn n(id: u32) -> Node {
        Node::new(id, 1)
    }

    #[test]
    fn optimized_rejects_unsupported_k() {
        let g = GraphIndex::new();
        let err = optimized_addition_explore(&g, n(1), n(2), 5).unwrap_err();
        assert_eq!(err, MiningError::UnsupportedK { k: 5, supported: OPTIMIZED_SUPPORTED_K });
    }

    #[test]
    fn dispatch_routes_k3_to_triplet() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(3), 1));
        let (adds, _) = addition_explore(&g, n(1), n(2), 3);
        assert!(adds.contains(&vec![n(1), n(2), n(3)]));
    }
}
