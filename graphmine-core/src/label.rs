//! Canonical labeling: an isomorphism-invariant string key for an induced,
//! labeled subgraph (spec §4.C).
//!
//! The algorithm refines an initial vertex ordering (by degree, then
//! label) partition-by-partition, picking within each partition the
//! permutation that maximizes the lexicographic label string built from
//! vertex labels followed by the lower-triangular edge-label matrix. Cost
//! is O(k! · k²) worst case, which is fine for the k ≤ 5 this crate deals
//! with but would need a smarter refinement (e.g. nauty-style) at scale.

use fnv::FnvHashMap;
use itertools::Itertools;

use crate::model::{Node, Subgraph};

/// Computes the canonical label of `subgraph`. Equal for any isomorphic
/// relabeling of node ids; distinct (with overwhelming certainty for
/// k ≤ 4 and single-digit label alphabets) for non-isomorphic subgraphs.
pub fn canonical_label(subgraph: &Subgraph) -> String {
    let k = subgraph.nodes.len();

    let mut degree: FnvHashMap<u32, u32> = FnvHashMap::default();
    for node in &subgraph.nodes {
        degree.entry(node.node_id).or_insert(0);
    }
    for edge in &subgraph.edges {
        *degree.entry(edge.u).or_insert(0) += 1;
        *degree.entry(edge.v).or_insert(0) += 1;
    }

    let vertex_label: FnvHashMap<u32, u16> =
        subgraph.nodes.iter().map(|n| (n.node_id, n.label)).collect();

    let edge_label: FnvHashMap<(u32, u32), u16> =
        subgraph.edges.iter().map(|e| ((e.u, e.v), e.label)).collect();

    // Partition nodes by (degree, label), then order partitions by
    // (degree DESC, size DESC, label DESC) to get the initial vertex order.
    let mut partitions: FnvHashMap<(u32, u16), Vec<Node>> = FnvHashMap::default();
    for node in &subgraph.nodes {
        let d = degree[&node.node_id];
        partitions.entry((d, node.label)).or_default().push(*node);
    }

    let mut partition_order: Vec<(u32, u16)> = partitions.keys().copied().collect();
    partition_order.sort_by(|a, b| {
        let size_a = partitions[a].len();
        let size_b = partitions[b].len();
        (b.0, size_b, b.1).cmp(&(a.0, size_a, a.1))
    });

    let mut vertices: Vec<Node> = Vec::with_capacity(k);
    let mut sizes: Vec<usize> = Vec::with_capacity(partition_order.len());
    for key in &partition_order {
        let group = &partitions[key];
        sizes.push(group.len());
        vertices.extend(group.iter().copied());
    }

    let mut adj = build_matrix(&vertices, &edge_label);

    let mut start = 0;
    for size in sizes {
        let end = start + size;

        if size > 1 {
            let mut best_label = String::new();
            let mut best_vertices = vertices.clone();
            let mut best_adj = adj.clone();

            for perm in (start..end).permutations(size) {
                let mut cand_vertices = vertices.clone();
                for (offset, &src) in perm.iter().enumerate() {
                    cand_vertices[start + offset] = vertices[src];
                }

                let cand_adj = permute_rows_then_cols(&adj, start, &perm);

                let candidate = make_label_string(&cand_vertices, &cand_adj, &vertex_label);
                if candidate > best_label {
                    best_label = candidate;
                    best_vertices = cand_vertices;
                    best_adj = cand_adj;
                }
            }

            vertices = best_vertices;
            adj = best_adj;
        }

        start = end;
    }

    make_label_string(&vertices, &adj, &vertex_label)
}

fn build_matrix(vertices: &[Node], edge_label: &FnvHashMap<(u32, u32), u16>) -> Vec<Vec<u16>> {
    let k = vertices.len();
    let mut adj = vec![vec![0u16; k]; k];
    for i in 0..k {
        for j in 0..k {
            if i == j {
                continue;
            }
            let (a, b) = (vertices[i].node_id, vertices[j].node_id);
            let lookup = if a < b { (a, b) } else { (b, a) };
            if let Some(&label) = edge_label.get(&lookup) {
                adj[i][j] = label;
            }
        }
    }
    adj
}

/// Reorders `src`'s rows, then its columns, within `[start, start+perm.len())`
/// according to `perm` (a permutation of global indices drawn from that same
/// range). Mirrors the two sequential in-place numpy assignments of the
/// original (`A[indices,:] = A[perm,:]` then `A[:,indices] = A[:,perm]`) —
/// the column step reads from the already row-permuted matrix, not the
/// original.
fn permute_rows_then_cols(src: &[Vec<u16>], start: usize, perm: &[usize]) -> Vec<Vec<u16>> {
    let k = src.len();
    let size = perm.len();

    let mut row_permuted = src.to_vec();
    for (offset, &row_src) in perm.iter().enumerate() {
        row_permuted[start + offset] = src[row_src].clone();
    }

    let mut result = row_permuted.clone();
    for i in 0..k {
        for (offset, &col_src) in perm.iter().enumerate() {
            result[i][start + offset] = row_permuted[i][col_src];
        }
    }
    let _ = size;
    result
}

fn make_label_string(vertices: &[Node], adj: &[Vec<u16>], vertex_label: &FnvHashMap<u32, u16>) -> String {
    let k = vertices.len();
    let wide = vertices.iter().any(|n| vertex_label[&n.node_id] >= 10)
        || adj.iter().flatten().any(|&v| v >= 10);

    let mut tokens: Vec<u16> = vertices.iter().map(|n| vertex_label[&n.node_id]).collect();
    for i in 1..k {
        for j in 0..i {
            tokens.push(adj[i][j]);
        }
    }

    if wide {
        tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(",")
    } else {
        tokens.iter().map(|t| t.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeSet, NodeSet, SubgraphEdge};

    fn subgraph(nodes: Vec<(u32, u16)>, edges: Vec<(u32, u32, u16)>) -> Subgraph {
        let nodes: NodeSet = nodes.into_iter().map(|(id, l)| Node::new(id, l)).collect();
        let edges: EdgeSet = edges.into_iter().map(|(u, v, l)| SubgraphEdge::new(u, v, l)).collect();
        Subgraph::new(nodes, edges)
    }

    #[test]
    fn isomorphic_wedges_share_a_label() {
        let a = subgraph(vec![(1, 1), (2, 1), (3, 2)], vec![(1, 2, 1), (1, 3, 2)]);
        let b = subgraph(vec![(5, 2), (8, 1), (15, 1)], vec![(5, 15, 2), (8, 15, 1)]);
        assert_eq!(canonical_label(&a), canonical_label(&b));
    }

    #[test]
    fn non_isomorphic_wedges_have_distinct_labels() {
        let wedge_center_at_3 = subgraph(vec![(1, 1), (2, 1), (3, 2)], vec![(1, 3, 1), (2, 3, 1)]);
        let wedge_center_at_5 = subgraph(vec![(5, 2), (8, 1), (15, 1)], vec![(5, 8, 1), (5, 15, 2)]);
        assert_ne!(canonical_label(&wedge_center_at_3), canonical_label(&wedge_center_at_5));
    }

    #[test]
    fn relabeling_node_ids_preserves_label() {
        let a = subgraph(vec![(1, 1), (2, 1), (3, 1), (4, 1)], vec![(1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 1, 1)]);
        let b = subgraph(vec![(10, 1), (20, 1), (30, 1), (40, 1)], vec![(10, 20, 1), (20, 30, 1), (30, 40, 1), (40, 10, 1)]);
        assert_eq!(canonical_label(&a), canonical_label(&b));
    }

    #[test]
    fn wide_labels_use_a_delimiter() {
        let a = subgraph(vec![(1, 11), (2, 1), (3, 2)], vec![(1, 2, 1), (1, 3, 2)]);
        assert!(canonical_label(&a).contains(','));
    }
}
