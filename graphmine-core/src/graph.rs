//! The streaming graph index: labeled adjacency plus incremental edge
//! insertion/deletion and the neighborhood queries the enumerator needs.

use fnv::{FnvHashMap, FnvHashSet};

use crate::model::{Edge, Node};

/// Labeled adjacency index over a stream of edge insertions/deletions.
///
/// Invariants (spec §3, §8.3): the adjacency map is symmetric; a key is
/// present in `edge_labels` iff the corresponding neighbor relation holds;
/// neighbor sets never contain the node itself.
#[derive(Default, Debug)]
pub struct GraphIndex {
    adjacency: FnvHashMap<Node, FnvHashSet<Node>>,
    edge_labels: FnvHashMap<(u32, u32), u16>,
}

fn key(u: Node, v: Node) -> (u32, u32) {
    if u.node_id < v.node_id {
        (u.node_id, v.node_id)
    } else {
        (v.node_id, u.node_id)
    }
}

impl GraphIndex {
    pub fn new() -> Self {
        GraphIndex::default()
    }

    /// Presence test keyed on `(u.node_id, v.node_id)`, per spec §4.A.
    pub fn contains(&self, edge: &Edge) -> bool {
        self.edge_labels.contains_key(&key(edge.u, edge.v))
    }

    /// Inserts `edge`. Returns `false` (no-op, no state change) if the edge
    /// is already present; the caller is responsible for treating that as
    /// a recoverable `DuplicateEdge` condition, not an error.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.contains(&edge) {
            return false;
        }
        self.adjacency.entry(edge.u).or_default().insert(edge.v);
        self.adjacency.entry(edge.v).or_default().insert(edge.u);
        self.edge_labels.insert(key(edge.u, edge.v), edge.label);
        true
    }

    /// Removes `edge`. Returns `false` if the edge is absent.
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        if !self.contains(&edge) {
            return false;
        }
        if let Some(nbrs) = self.adjacency.get_mut(&edge.u) {
            nbrs.remove(&edge.v);
        }
        if let Some(nbrs) = self.adjacency.get_mut(&edge.v) {
            nbrs.remove(&edge.u);
        }
        self.edge_labels.remove(&key(edge.u, edge.v));
        true
    }

    /// The adjacency set of `node`, empty if the node has never been seen.
    pub fn neighbors(&self, node: Node) -> FnvHashSet<Node> {
        self.adjacency.get(&node).cloned().unwrap_or_default()
    }

    /// For each node `s` reachable from `source` in exactly two hops via an
    /// intermediary in `through_nodes` (or any intermediary, if `None`),
    /// returns the set of intermediaries through which `s` is reached.
    /// Always excludes `source`, its direct neighbors, and `exclude_nodes`.
    pub fn two_hop_neighborhood(
        &self,
        source: Node,
        through_nodes: Option<&FnvHashSet<Node>>,
        exclude_nodes: &FnvHashSet<Node>,
    ) -> FnvHashMap<Node, FnvHashSet<Node>> {
        let one_hop = self.neighbors(source);

        let mut excluded = exclude_nodes.clone();
        excluded.extend(one_hop.iter().copied());
        excluded.insert(source);

        let candidates: Vec<Node> = match through_nodes {
            Some(restrict) => one_hop.intersection(restrict).copied().collect(),
            None => one_hop.iter().copied().collect(),
        };

        let mut result: FnvHashMap<Node, FnvHashSet<Node>> = FnvHashMap::default();
        for v in candidates {
            for s in self.neighbors(v) {
                if !excluded.contains(&s) {
                    result.entry(s).or_default().insert(v);
                }
            }
        }
        result
    }

    /// All edges the graph realizes between pairs drawn from `nodes`, in
    /// ascending node order (ascending `u` then `v`).
    pub fn get_induced_edges(&self, nodes: &[Node]) -> Vec<Edge> {
        let mut sorted: Vec<Node> = nodes.to_vec();
        sorted.sort_unstable();

        let mut edges = Vec::new();
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                let (u, v) = (sorted[i], sorted[j]);
                if let Some(&label) = self.edge_labels.get(&key(u, v)) {
                    edges.push(Edge::new(u, v, label));
                }
            }
        }
        edges
    }

    /// All vertex sets of size `n + 1` that form a connected subgraph
    /// containing `source` in exactly `n` hops. Used only by the generic
    /// enumerator fallback — not on the fast (k ∈ {3,4}) path.
    pub fn n_hop_neighborhood(&self, source: Node, n: usize) -> FnvHashSet<Vec<Node>> {
        if n == 0 {
            let mut only = FnvHashSet::default();
            only.insert(vec![source]);
            return only;
        }

        let mut by_hop: Vec<FnvHashSet<Vec<Node>>> = vec![FnvHashSet::default(); n + 1];
        let mut stack: Vec<(Node, FnvHashSet<Node>)> = Vec::new();
        let mut start = FnvHashSet::default();
        start.insert(source);
        stack.push((source, start));

        while let Some((u, hops)) = stack.pop() {
            let m = hops.len() - 1;
            if m > 0 {
                let mut sorted: Vec<Node> = hops.iter().copied().collect();
                sorted.sort_unstable();
                by_hop[m].insert(sorted);
            }
            if n > m {
                for v in self.neighbors(u) {
                    if !hops.contains(&v) {
                        let mut next = hops.clone();
                        next.insert(v);
                        stack.push((v, next));
                    }
                }
            }
        }

        for k in 1..n {
            let k_hoods = by_hop[k].clone();
            let one_hoods = by_hop[1].clone();
            for n_k in &k_hoods {
                for n_1 in &one_hoods {
                    let mut union: FnvHashSet<Node> = n_k.iter().copied().collect();
                    union.extend(n_1.iter().copied());
                    if union.len() == k + 2 {
                        let mut sorted: Vec<Node> = union.into_iter().collect();
                        sorted.sort_unstable();
                        by_hop[k + 1].insert(sorted);
                    }
                }
            }
        }

        by_hop.into_iter().nth(n).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u32) -> Node {
        Node::new(id, 1)
    }

    #[test]
    fn add_then_contains_is_symmetric() {
        let mut g = GraphIndex::new();
        let e = Edge::new(n(1), n(2), 5);
        assert!(g.add_edge(e));
        assert!(g.contains(&e));
        assert!(g.neighbors(n(1)).contains(&n(2)));
        assert!(g.neighbors(n(2)).contains(&n(1)));
    }

    #[test]
    fn add_existing_edge_is_noop() {
        let mut g = GraphIndex::new();
        let e = Edge::new(n(1), n(2), 5);
        assert!(g.add_edge(e));
        assert!(!g.add_edge(e));
    }

    #[test]
    fn remove_absent_edge_is_noop() {
        let mut g = GraphIndex::new();
        let e = Edge::new(n(1), n(2), 5);
        assert!(!g.remove_edge(e));
    }

    #[test]
    fn remove_clears_both_sides() {
        let mut g = GraphIndex::new();
        let e = Edge::new(n(1), n(2), 5);
        g.add_edge(e);
        assert!(g.remove_edge(e));
        assert!(!g.contains(&e));
        assert!(g.neighbors(n(1)).is_empty());
        assert!(g.neighbors(n(2)).is_empty());
    }

    #[test]
    fn unknown_node_has_empty_neighborhood() {
        let g = GraphIndex::new();
        assert!(g.neighbors(n(42)).is_empty());
    }

    #[test]
    fn two_hop_excludes_source_and_direct_neighbors() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(2), 1));
        g.add_edge(Edge::new(n(2), n(3), 1));
        g.add_edge(Edge::new(n(1), n(3), 1)); // triangle: 3 is a direct neighbor too

        let two_hop = g.two_hop_neighborhood(n(1), None, &FnvHashSet::default());
        assert!(two_hop.is_empty());
    }

    #[test]
    fn two_hop_finds_wedge_apex() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(2), 1));
        g.add_edge(Edge::new(n(2), n(3), 1));

        let two_hop = g.two_hop_neighborhood(n(1), None, &FnvHashSet::default());
        assert_eq!(two_hop.get(&n(3)).unwrap().iter().copied().collect::<Vec<_>>(), vec![n(2)]);
    }

    #[test]
    fn induced_edges_are_ascending_pairs() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(3), n(1), 7));
        g.add_edge(Edge::new(n(1), n(2), 9));
        let edges = g.get_induced_edges(&[n(3), n(2), n(1)]);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].u.node_id, 1);
        assert_eq!(edges[0].v.node_id, 2);
        assert_eq!(edges[1].u.node_id, 1);
        assert_eq!(edges[1].v.node_id, 3);
    }

    #[test]
    fn n_hop_zero_is_just_source() {
        let g = GraphIndex::new();
        let result = g.n_hop_neighborhood(n(1), 0);
        assert_eq!(result.len(), 1);
        assert!(result.contains(&vec![n(1)]));
    }

    #[test]
    fn n_hop_two_on_a_path() {
        let mut g = GraphIndex::new();
        g.add_edge(Edge::new(n(1), n(2), 1));
        g.add_edge(Edge::new(n(2), n(3), 1));
        g.add_edge(Edge::new(n(3), n(4), 1));

        // 2-hop neighborhoods containing node 1: {1,2,3}
        let result = g.n_hop_neighborhood(n(1), 2);
        let mut sorted_ids: Vec<Vec<u32>> = result
            .iter()
            .map(|set| {
                let mut ids: Vec<u32> = set.iter().map(|nd| nd.node_id).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        sorted_ids.sort();
        assert_eq!(sorted_ids, vec![vec![1, 2, 3]]);
    }
}
