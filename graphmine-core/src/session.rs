//! The mining session: composes a [`GraphIndex`], a sampling strategy, and
//! a streaming discipline into the six algorithm variants spec §4.F names
//! (exact / naive-reservoir / optimized-reservoir, each incremental or
//! dynamic), as one type parameterized over those two axes instead of the
//! inheritance diamond the original research code used for the same
//! combinations.

use std::time::{Duration, Instant};

use fnv::{FnvHashMap, FnvHashSet};
use rand::Rng;

use crate::enumerate;
use crate::error::MiningError;
use crate::graph::GraphIndex;
use crate::label::canonical_label;
use crate::model::{Edge, Node, Subgraph};
use crate::reservoir::SubgraphReservoir;
use crate::skip::rp;
use crate::skip::rs::SkipRs;

/// Whether the session ever sees edge removals. Incremental sessions are a
/// strictly add-only stream; calling [`MiningSession::remove_edge`] on one
/// is a caller error, not a recoverable condition, since the sampling math
/// for the reservoir-backed modes assumes it never has to happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Incremental,
    Dynamic,
}

#[derive(Debug)]
enum Mode {
    Exact,
    NaiveReservoir(SubgraphReservoir),
    OptimizedReservoir { reservoir: SubgraphReservoir, skip_rs: SkipRs, s: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOp {
    Add,
    Remove,
}

#[derive(Debug, Clone)]
pub struct EventMetrics {
    pub op: EdgeOp,
    pub duration: Duration,
    /// Number of k-sets the enumerator identified as touched by this edge.
    pub candidate_count: usize,
    /// Number of those that actually changed a pattern count (inserted,
    /// evicted, or relabeled).
    pub processed_count: usize,
    pub reservoir_full: bool,
}

#[derive(Debug, Default)]
pub struct Metrics {
    pub events: Vec<EventMetrics>,
}

#[derive(Debug)]
pub struct MiningSession<R: Rng> {
    k: usize,
    stream: StreamKind,
    mode: Mode,
    graph: GraphIndex,
    patterns: FnvHashMap<String, i64>,
    metrics: Metrics,
    n_seen: u64,
    c1: u64,
    c2: u64,
    rng: R,
}

fn induced(graph: &GraphIndex, nodes: &[Node]) -> Subgraph {
    let edges = graph.get_induced_edges(nodes).into_iter().map(Into::into).collect();
    Subgraph::new(nodes.iter().copied().collect(), edges)
}

fn bump(patterns: &mut FnvHashMap<String, i64>, sg: &Subgraph, delta: i64) {
    *patterns.entry(canonical_label(sg)).or_insert(0) += delta;
}

/// Shared deletion-side bookkeeping for the two reservoir-backed modes:
/// evict reservoir-held subgraphs the edge removal disconnected, relabel
/// the ones that stay connected, and account the uncompensated-deletion
/// debt `(c1, c2)` Random Pairing spends on the insertion side.
fn reservoir_remove_edge(
    reservoir: &mut SubgraphReservoir,
    patterns: &mut FnvHashMap<String, i64>,
    c1: &mut u64,
    c2: &mut u64,
    n_seen: &mut u64,
    edge: Edge,
    removals: &FnvHashSet<Vec<Node>>,
) -> usize {
    let d = removals.len() as u64;
    let compensate = reservoir.is_full() || (*c1 + *c2) > 0;
    let mut removed_from_sample = 0u64;

    for old in reservoir.get_common_subgraphs(edge.u(), edge.v()) {
        let mut nodes: Vec<Node> = old.nodes.iter().copied().collect();
        nodes.sort_unstable();

        if removals.contains(&nodes) {
            if reservoir.remove(&old) {
                bump(patterns, &old, -1);
                removed_from_sample += 1;
            }
        } else {
            let updated = old.without_edge(edge);
            reservoir.replace(&old, updated.clone());
            bump(patterns, &old, -1);
            bump(patterns, &updated, 1);
        }
    }

    if compensate {
        *c1 += removed_from_sample;
        *c2 += d.saturating_sub(removed_from_sample);
    }
    *n_seen = n_seen.saturating_sub(d);

    removed_from_sample as usize
}

impl<R: Rng> MiningSession<R> {
    pub fn exact(k: usize, stream: StreamKind, rng: R) -> Self {
        MiningSession {
            k,
            stream,
            mode: Mode::Exact,
            graph: GraphIndex::new(),
            patterns: FnvHashMap::default(),
            metrics: Metrics::default(),
            n_seen: 0,
            c1: 0,
            c2: 0,
            rng,
        }
    }

    pub fn naive_reservoir(k: usize, capacity: usize, stream: StreamKind, rng: R) -> Self {
        MiningSession {
            k,
            stream,
            mode: Mode::NaiveReservoir(SubgraphReservoir::new(capacity)),
            graph: GraphIndex::new(),
            patterns: FnvHashMap::default(),
            metrics: Metrics::default(),
            n_seen: 0,
            c1: 0,
            c2: 0,
            rng,
        }
    }

    /// Restricted to `k ∈ {3, 4}` — the sizes with a closed-form/case-analysis
    /// enumerator, which is what makes the skip-counted sampling in this
    /// mode worth its bookkeeping over [`MiningSession::naive_reservoir`].
    pub fn optimized_reservoir(k: usize, capacity: usize, stream: StreamKind, mut rng: R) -> Result<Self, MiningError> {
        if !enumerate::OPTIMIZED_SUPPORTED_K.contains(&k) {
            return Err(MiningError::UnsupportedK { k, supported: enumerate::OPTIMIZED_SUPPORTED_K });
        }
        let skip_rs = SkipRs::new(capacity, &mut rng);
        Ok(MiningSession {
            k,
            stream,
            mode: Mode::OptimizedReservoir { reservoir: SubgraphReservoir::new(capacity), skip_rs, s: 0 },
            graph: GraphIndex::new(),
            patterns: FnvHashMap::default(),
            metrics: Metrics::default(),
            n_seen: 0,
            c1: 0,
            c2: 0,
            rng,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn graph(&self) -> &GraphIndex {
        &self.graph
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn reservoir_len(&self) -> Option<usize> {
        match &self.mode {
            Mode::Exact => None,
            Mode::NaiveReservoir(r) => Some(r.len()),
            Mode::OptimizedReservoir { reservoir, .. } => Some(reservoir.len()),
        }
    }

    fn is_reservoir_full(&self) -> bool {
        match &self.mode {
            Mode::Exact => false,
            Mode::NaiveReservoir(r) => r.is_full(),
            Mode::OptimizedReservoir { reservoir, .. } => reservoir.is_full(),
        }
    }

    /// Pattern counts, clipped at zero: transient negative counts can occur
    /// between a deletion's debit and a later insertion's compensating
    /// credit, but are never meaningful to report.
    pub fn patterns(&self) -> impl Iterator<Item = (&str, u64)> {
        self.patterns.iter().map(|(label, &count)| (label.as_str(), count.max(0) as u64))
    }

    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.graph.contains(&edge) {
            return false;
        }
        let start = Instant::now();
        let (u, v, k, stream) = (edge.u(), edge.v(), self.k, self.stream);

        let MiningSession { mode, graph, patterns, n_seen, c1, c2, rng, .. } = self;

        let (candidate_count, processed_count) = match mode {
            Mode::Exact => {
                let (adds, reps) = enumerate::addition_explore(graph, u, v, k);
                for nodes in &adds {
                    let sg = induced(graph, nodes).with_edge(edge);
                    bump(patterns, &sg, 1);
                }
                for nodes in &reps {
                    let base = induced(graph, nodes);
                    let updated = base.with_edge(edge);
                    bump(patterns, &base, -1);
                    bump(patterns, &updated, 1);
                }
                (adds.len(), adds.len() + reps.len())
            }

            Mode::NaiveReservoir(reservoir) => {
                for old in reservoir.get_common_subgraphs(u, v) {
                    let new = old.with_edge(edge);
                    reservoir.replace(&old, new.clone());
                    bump(patterns, &old, -1);
                    bump(patterns, &new, 1);
                }

                let additions = enumerate::new_subgraphs(graph, u, v, k);
                let mut included = 0usize;

                for nodes in &additions {
                    *n_seen += 1;
                    let sg = induced(graph, nodes).with_edge(edge);

                    let do_sample = match stream {
                        StreamKind::Incremental => true,
                        StreamKind::Dynamic => {
                            let debt = *c1 + *c2;
                            if debt == 0 {
                                true
                            } else if rng.gen::<f64>() < (*c1 as f64) / (debt as f64) {
                                *c1 -= 1;
                                true
                            } else {
                                *c2 -= 1;
                                false
                            }
                        }
                    };

                    if do_sample {
                        let (inserted, evicted) = reservoir.add(sg.clone(), Some(*n_seen as usize), rng);
                        if inserted {
                            bump(patterns, &sg, 1);
                            included += 1;
                        }
                        if let Some(victim) = evicted {
                            bump(patterns, &victim, -1);
                        }
                    }
                }

                (additions.len(), included)
            }

            Mode::OptimizedReservoir { reservoir, skip_rs, s } => {
                for old in reservoir.get_common_subgraphs(u, v) {
                    let new = old.with_edge(edge);
                    reservoir.replace(&old, new.clone());
                    bump(patterns, &old, -1);
                    bump(patterns, &new, 1);
                }

                let candidates: Vec<Vec<Node>> = enumerate::new_subgraphs(graph, u, v, k).into_iter().collect();
                let w = candidates.len() as u64;
                let mut included: u64 = 0;

                match stream {
                    StreamKind::Incremental => {
                        if !reservoir.is_full() {
                            let room = (reservoir.capacity() - reservoir.len()) as u64;
                            included = w.min(room);
                            *s = included;
                            *n_seen += included;
                        }
                        while *s < w {
                            included += 1;
                            let z = skip_rs.apply(*n_seen, rng);
                            *n_seen += z + 1;
                            *s += z + 1;
                        }
                        *s -= w;
                    }
                    StreamKind::Dynamic => {
                        if !reservoir.is_full() && (*c1 + *c2) == 0 {
                            let room = (reservoir.capacity() - reservoir.len()) as u64;
                            included = w.min(room);
                            *s = included;
                            *n_seen += included;
                        }

                        let mut sum_rp: u64 = 0;
                        while (*c1 + *c2) > 0 && sum_rp < w {
                            let mut num_picked: u64 = 0;
                            let mut z_rp = rp::skip_records(*c1, *c1 + *c2, rng);
                            if sum_rp + z_rp < w {
                                num_picked = u64::from(*c1 > 0);
                            } else {
                                z_rp = w - sum_rp;
                            }
                            included += num_picked;
                            *c1 = c1.saturating_sub(num_picked);
                            *c2 = c2.saturating_sub(z_rp);
                            sum_rp += z_rp + num_picked;
                        }
                        let w_remaining = w - sum_rp;

                        while *s < w_remaining {
                            included += 1;
                            let z = skip_rs.apply(*n_seen, rng);
                            *n_seen += z + 1;
                            *s += z + 1;
                        }
                        *s -= w_remaining;
                    }
                }

                let chosen: Vec<usize> = if (included as usize) < candidates.len() {
                    rand::seq::index::sample(rng, candidates.len(), included as usize).into_vec()
                } else {
                    (0..candidates.len()).collect()
                };

                let mut processed = 0usize;
                for idx in chosen {
                    let sg = induced(graph, &candidates[idx]).with_edge(edge);
                    let (inserted, evicted) = reservoir.add(sg.clone(), None, rng);
                    if inserted {
                        bump(patterns, &sg, 1);
                        processed += 1;
                    }
                    if let Some(victim) = evicted {
                        bump(patterns, &victim, -1);
                    }
                }

                (candidates.len(), processed)
            }
        };

        self.graph.add_edge(edge);

        self.metrics.events.push(EventMetrics {
            op: EdgeOp::Add,
            duration: start.elapsed(),
            candidate_count,
            processed_count,
            reservoir_full: self.is_reservoir_full(),
        });

        true
    }

    pub fn remove_edge(&mut self, edge: Edge) -> Result<bool, MiningError> {
        if self.stream == StreamKind::Incremental {
            return Err(MiningError::InvariantViolation(
                "remove_edge is not supported under incremental streaming".to_string(),
            ));
        }
        if !self.graph.contains(&edge) {
            return Ok(false);
        }

        let start = Instant::now();
        self.graph.remove_edge(edge);
        let (u, v, k) = (edge.u(), edge.v(), self.k);

        let MiningSession { mode, graph, patterns, n_seen, c1, c2, .. } = self;

        let (candidate_count, processed_count) = match mode {
            Mode::Exact => {
                let (removals, replacements) = enumerate::addition_explore(graph, u, v, k);
                for nodes in &removals {
                    let sg = induced(graph, nodes).with_edge(edge);
                    bump(patterns, &sg, -1);
                }
                for nodes in &replacements {
                    let base = induced(graph, nodes);
                    let with_edge = base.clone().with_edge(edge);
                    bump(patterns, &with_edge, -1);
                    bump(patterns, &base, 1);
                }
                (removals.len(), removals.len() + replacements.len())
            }
            Mode::NaiveReservoir(reservoir) => {
                let removals = enumerate::new_subgraphs(graph, u, v, k);
                let candidate_count = removals.len();
                let processed = reservoir_remove_edge(reservoir, patterns, c1, c2, n_seen, edge, &removals);
                (candidate_count, processed)
            }
            Mode::OptimizedReservoir { reservoir, .. } => {
                let removals = enumerate::new_subgraphs(graph, u, v, k);
                let candidate_count = removals.len();
                let processed = reservoir_remove_edge(reservoir, patterns, c1, c2, n_seen, edge, &removals);
                (candidate_count, processed)
            }
        };

        self.metrics.events.push(EventMetrics {
            op: EdgeOp::Remove,
            duration: start.elapsed(),
            candidate_count,
            processed_count,
            reservoir_full: self.is_reservoir_full(),
        });

        Ok(true)
    }
}
