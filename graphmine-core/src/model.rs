//! Value types for the graph stream: nodes, edges and induced subgraphs.
//!
//! Everything here is `Copy`-or-cheap-`Clone`, total-ordered where the rest
//! of the crate needs a canonical ordering, and hashed by every field that
//! participates in equality. There is no interior mutability anywhere in
//! this module; all mutation happens through the containers that own these
//! values (`GraphIndex`, `SubgraphReservoir`).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// A graph vertex, identified by `node_id` and carrying a small-alphabet
/// label. Two nodes are equal iff both fields match; a node_id is assumed
/// to carry the same label everywhere it appears in a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub node_id: u32,
    pub label: u16,
}

impl Node {
    pub fn new(node_id: u32, label: u16) -> Self {
        Node { node_id, label }
    }
}

/// A graph edge, canonicalized so that `u.node_id < v.node_id`. Carries
/// both endpoints' labels alongside the edge's own label so that an `Edge`
/// is self-describing without a graph lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub u: Node,
    pub v: Node,
    pub label: u16,
}

impl Edge {
    /// Builds an edge, swapping endpoints if necessary so `u.node_id < v.node_id`.
    ///
    /// Panics if `u.node_id == v.node_id`; self-loops are not part of this
    /// model (the spec's adjacency invariant forbids a node from
    /// neighboring itself).
    pub fn new(u: Node, v: Node, label: u16) -> Self {
        assert_ne!(u.node_id, v.node_id, "self-loops are not supported");
        if u.node_id < v.node_id {
            Edge { u, v, label }
        } else {
            Edge { u: v, v: u, label }
        }
    }

    pub fn u(&self) -> Node {
        self.u
    }

    pub fn v(&self) -> Node {
        self.v
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    /// Lexicographic on `u`, then `v`, then `label` — the total order the
    /// spec requires for edges.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.u, self.v, self.label).cmp(&(other.u, other.v, other.label))
    }
}

/// The stripped form of an edge used inside subgraph descriptors: just the
/// endpoint ids and the edge label, since vertex labels are already carried
/// by the subgraph's node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub u: u32,
    pub v: u32,
    pub label: u16,
}

impl SubgraphEdge {
    pub fn new(u: u32, v: u32, label: u16) -> Self {
        if u < v {
            SubgraphEdge { u, v, label }
        } else {
            SubgraphEdge { u: v, v: u, label }
        }
    }
}

impl From<Edge> for SubgraphEdge {
    fn from(edge: Edge) -> Self {
        // `Edge` is already canonicalized on construction, so this never
        // needs to re-sort the endpoints.
        SubgraphEdge::new(edge.u.node_id, edge.v.node_id, edge.label)
    }
}

/// k is at most 4 on the fast path (spec §1's Non-goal), so a 4-element
/// inline buffer means subgraphs never allocate on the heap for the cases
/// this crate optimizes for.
pub type NodeSet = SmallVec<[Node; 4]>;
pub type EdgeSet = SmallVec<[SubgraphEdge; 6]>;

/// An induced, connected, labeled k-node subgraph: a sorted tuple of nodes
/// and the sorted tuple of edges the graph realizes between them. Two
/// subgraphs are equal iff their sorted node and edge tuples match exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: NodeSet,
    pub edges: EdgeSet,
}

impl Subgraph {
    /// Builds a subgraph from an unordered node set and its induced edges,
    /// sorting both into canonical order.
    pub fn new(mut nodes: NodeSet, mut edges: EdgeSet) -> Self {
        nodes.sort_unstable();
        edges.sort_unstable();
        Subgraph { nodes, edges }
    }

    pub fn k(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a copy of this subgraph with `edge` added to its edge set.
    pub fn with_edge(&self, edge: Edge) -> Self {
        let mut edges = self.edges.clone();
        edges.push(edge.into());
        Subgraph::new(self.nodes.clone(), edges)
    }

    /// Returns a copy of this subgraph with `edge` removed from its edge set.
    pub fn without_edge(&self, edge: Edge) -> Self {
        let target = SubgraphEdge::from(edge);
        let edges: EdgeSet = self.edges.iter().copied().filter(|e| *e != target).collect();
        Subgraph::new(self.nodes.clone(), edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_new_canonicalizes_order() {
        let a = Node::new(5, 1);
        let b = Node::new(2, 1);
        let e = Edge::new(a, b, 9);
        assert_eq!(e.u.node_id, 2);
        assert_eq!(e.v.node_id, 5);
    }

    #[test]
    fn subgraph_edge_from_edge_is_already_canonical() {
        let e = Edge::new(Node::new(1, 1), Node::new(3, 2), 7);
        let se: SubgraphEdge = e.into();
        assert_eq!(se, SubgraphEdge::new(1, 3, 7));
    }

    #[test]
    fn subgraph_equality_ignores_construction_order() {
        let n1 = Node::new(1, 1);
        let n2 = Node::new(2, 1);
        let n3 = Node::new(3, 2);
        let e1 = SubgraphEdge::new(1, 2, 1);
        let e2 = SubgraphEdge::new(1, 3, 2);

        let a = Subgraph::new(NodeSet::from_vec(vec![n3, n1, n2]), EdgeSet::from_vec(vec![e2, e1]));
        let b = Subgraph::new(NodeSet::from_vec(vec![n1, n2, n3]), EdgeSet::from_vec(vec![e1, e2]));
        assert_eq!(a, b);
    }
}
