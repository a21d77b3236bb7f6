//! `simulate` subcommand: mines pattern frequencies over `-t` independent,
//! reshuffled passes of an edge stream and writes the pattern + metrics
//! files (spec §6).

use std::collections::BTreeMap;
use std::path::Path;

use graphmine_core::model::Edge;
use graphmine_core::session::{MiningSession, StreamKind};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::cli::{Algorithm, StreamSetting};
use crate::error::DriverError;
use crate::io::{write_metrics_file, write_pattern_file};

pub struct SimulateOutcome {
    pub pattern_runs: Vec<BTreeMap<String, u64>>,
    pub metrics_rows: Vec<BTreeMap<String, f64>>,
}

fn stream_kind(s: StreamSetting) -> StreamKind {
    match s {
        StreamSetting::Incremental => StreamKind::Incremental,
        StreamSetting::Dynamic => StreamKind::Dynamic,
    }
}

fn run_once(
    edges: &[Edge],
    k: usize,
    stream: StreamKind,
    algorithm: Algorithm,
    reservoir_size: Option<usize>,
    rng: &mut impl Rng,
) -> Result<(BTreeMap<String, u64>, Vec<(std::time::Duration, usize, usize, bool)>), DriverError> {
    let mut shuffled = edges.to_vec();
    shuffled.shuffle(rng);
    let session_rng = SmallRng::from_rng(&mut *rng).expect("SmallRng seeding from a live RNG never fails");

    macro_rules! drive {
        ($session:expr) => {{
            let mut session = $session;
            for &edge in &shuffled {
                session.add_edge(edge);
            }
            let patterns = session.patterns().map(|(label, count)| (label.to_string(), count)).collect();
            let events = session.metrics().events.iter().map(|e| (e.duration, e.candidate_count, e.processed_count, e.reservoir_full)).collect();
            (patterns, events)
        }};
    }

    match algorithm {
        Algorithm::Exact => Ok(drive!(MiningSession::exact(k, stream, session_rng))),
        Algorithm::Naive => {
            let m = reservoir_size.ok_or_else(|| DriverError::InvalidInput("naive algorithm requires -m/--reservoir-size".to_string()))?;
            Ok(drive!(MiningSession::naive_reservoir(k, m, stream, session_rng)))
        }
        Algorithm::Optimal => {
            let m = reservoir_size.ok_or_else(|| DriverError::InvalidInput("optimal algorithm requires -m/--reservoir-size".to_string()))?;
            let session = MiningSession::optimized_reservoir(k, m, stream, session_rng)?;
            Ok(drive!(session))
        }
    }
}

pub fn run(
    edges: &[Edge],
    k: usize,
    stream_setting: StreamSetting,
    algorithm: Algorithm,
    reservoir_size: Option<usize>,
    times: usize,
    rng: &mut impl Rng,
) -> Result<SimulateOutcome, DriverError> {
    let stream = stream_kind(stream_setting);
    let mut pattern_runs = Vec::with_capacity(times);
    let mut per_run_events = Vec::with_capacity(times);

    for run_idx in 0..times {
        info!(run = run_idx, edges = edges.len(), "starting simulate run");
        let (patterns, events) = run_once(edges, k, stream, algorithm, reservoir_size, rng)?;
        pattern_runs.push(patterns);
        per_run_events.push(events);
    }

    let n_events = edges.len();
    let mut metrics_rows = Vec::with_capacity(n_events);
    for i in 0..n_events {
        let mut row = BTreeMap::new();
        let mut duration_sum = 0.0;
        let mut candidate_sum = 0.0;
        let mut processed_sum = 0.0;
        let mut full_sum = 0.0;
        let mut n = 0.0;
        for events in &per_run_events {
            if let Some(&(duration, candidates, processed, full)) = events.get(i) {
                duration_sum += duration.as_secs_f64() * 1e6;
                candidate_sum += candidates as f64;
                processed_sum += processed as f64;
                full_sum += if full { 1.0 } else { 0.0 };
                n += 1.0;
            }
        }
        if n > 0.0 {
            row.insert("duration_us".to_string(), duration_sum / n);
            row.insert("candidate_count".to_string(), candidate_sum / n);
            row.insert("processed_count".to_string(), processed_sum / n);
            row.insert("reservoir_full_frac".to_string(), full_sum / n);
        }
        metrics_rows.push(row);
    }

    Ok(SimulateOutcome { pattern_runs, metrics_rows })
}

pub fn write_outputs(output_dir: &Path, outcome: &SimulateOutcome) -> Result<(), DriverError> {
    std::fs::create_dir_all(output_dir)?;
    write_pattern_file(&output_dir.join("patterns.txt"), &outcome.pattern_runs)?;
    write_metrics_file(&output_dir.join("metrics.txt"), &outcome.metrics_rows)?;
    Ok(())
}
