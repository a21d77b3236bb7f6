//! `random-graph` subcommand (SPEC_FULL §7): generates labeled
//! Erdős–Rényi edge files by direct Bernoulli trial over every unordered
//! node pair.
//!
//! The topology is drawn once per `(n, p)` and reused across every
//! `(node_label_count, edge_label_count)` pair in the sweep — only the
//! labels are redrawn per pair — matching `random_graph.py`'s single
//! `fast_gnp_random_graph` call followed by repeated `label_graph` passes
//! over the same edge set, rather than redrawing the topology itself for
//! every pair (see DESIGN.md).

use std::io::Write;
use std::path::Path;

use graphmine_core::model::Node;
use rand::Rng;

use crate::error::DriverError;

fn generate_topology(n: usize, p: f64, rng: &mut impl Rng) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < p {
                edges.push((i, j));
            }
        }
    }
    edges
}

fn write_edge_file(path: &Path, topology: &[(usize, usize)], node_labels: &[Node], edge_label_count: u16, rng: &mut impl Rng) -> Result<(), DriverError> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);

    for &(i, j) in topology {
        let u = node_labels[i];
        let v = node_labels[j];
        let edge_label = rng.gen_range(1..=edge_label_count);
        let (u, v) = if u.node_id < v.node_id { (u, v) } else { (v, u) };
        writeln!(out, "{} {} {} {} {}", u.node_id, u.label, v.node_id, v.label, edge_label)?;
    }
    Ok(())
}

/// Generates one Erdős–Rényi topology for `(n, p)`, then for every
/// `(node_label_count, edge_label_count)` pair relabels and writes it to
/// `dest` under `{name}_N{n}_p{p*100}_L{l}_Q{q}_graph.edg`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    n: usize,
    p: f64,
    node_label_counts: &[u16],
    edge_label_counts: &[u16],
    name: &str,
    dest: &Path,
    rng: &mut impl Rng,
) -> Result<Vec<std::path::PathBuf>, DriverError> {
    if node_label_counts.len() != edge_label_counts.len() {
        return Err(DriverError::InvalidInput(format!(
            "node label count list (len {}) and edge label count list (len {}) must have the same length",
            node_label_counts.len(),
            edge_label_counts.len()
        )));
    }

    std::fs::create_dir_all(dest)?;
    let topology = generate_topology(n, p, rng);
    let mut written = Vec::new();

    for (&l, &q) in node_label_counts.iter().zip(edge_label_counts) {
        let node_labels: Vec<Node> = (0..n as u32).map(|id| Node::new(id, rng.gen_range(1..=l))).collect();

        let filename = format!("{name}_N{n}_p{}_L{l}_Q{q}_graph.edg", (p * 100.0) as u64);
        let path = dest.join(filename);
        write_edge_file(&path, &topology, &node_labels, q, rng)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_edge_file;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn rejects_mismatched_label_lists() {
        let mut rng = SmallRng::seed_from_u64(1);
        let dir = tempfile::tempdir().unwrap();
        let err = run(10, 0.5, &[2, 3], &[2], "ER", dir.path(), &mut rng).unwrap_err();
        assert!(matches!(err, DriverError::InvalidInput(_)));
    }

    #[test]
    fn p_one_produces_the_complete_graph() {
        let mut rng = SmallRng::seed_from_u64(2);
        let dir = tempfile::tempdir().unwrap();
        let paths = run(5, 1.0, &[2], &[2], "ER", dir.path(), &mut rng).unwrap();
        let edges = read_edge_file(&paths[0]).unwrap();
        assert_eq!(edges.len(), 5 * 4 / 2);
    }

    #[test]
    fn p_zero_produces_no_edges() {
        let mut rng = SmallRng::seed_from_u64(3);
        let dir = tempfile::tempdir().unwrap();
        let paths = run(5, 0.0, &[2], &[2], "ER", dir.path(), &mut rng).unwrap();
        let edges = read_edge_file(&paths[0]).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn label_sweep_reuses_the_same_topology() {
        let mut rng = SmallRng::seed_from_u64(4);
        let dir = tempfile::tempdir().unwrap();
        let paths = run(8, 0.5, &[2, 3], &[2, 3], "ER", dir.path(), &mut rng).unwrap();
        let first = read_edge_file(&paths[0]).unwrap();
        let second = read_edge_file(&paths[1]).unwrap();
        let ids = |edges: &[graphmine_core::model::Edge]| -> Vec<(u32, u32)> {
            let mut v: Vec<(u32, u32)> = edges.iter().map(|e| (e.u().node_id, e.v().node_id)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
