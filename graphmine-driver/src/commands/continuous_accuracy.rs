//! `continuous-accuracy` subcommand (SPEC_FULL §6): runs an `Exact` and an
//! `OptimizedReservoir` session side by side over the same edge order,
//! snapshotting precision/recall/ARE after every event.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use graphmine_core::model::Edge;
use graphmine_core::session::{EventMetrics, MiningSession, StreamKind};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cli::StreamSetting;
use crate::commands::accuracy::score;
use crate::error::DriverError;
use crate::io::write_metrics_file;

const TAU: f64 = 0.001;

fn stream_kind(s: StreamSetting) -> StreamKind {
    match s {
        StreamSetting::Incremental => StreamKind::Incremental,
        StreamSetting::Dynamic => StreamKind::Dynamic,
    }
}

fn snapshot(session: &MiningSession<SmallRng>) -> BTreeMap<String, u64> {
    session.patterns().map(|(label, count)| (label.to_string(), count)).collect()
}

/// Inserts a session's `EventMetrics` into `row` under `{prefix}_duration_us`,
/// `{prefix}_candidate_count`, `{prefix}_processed_count`, and
/// `{prefix}_reservoir_full_frac` — the same columns `simulate`'s metrics
/// file carries, one set per session since `continuous-accuracy` runs two.
fn insert_event_columns(row: &mut BTreeMap<String, f64>, prefix: &str, event: &EventMetrics) {
    row.insert(format!("{prefix}_duration_us"), event.duration.as_secs_f64() * 1e6);
    row.insert(format!("{prefix}_candidate_count"), event.candidate_count as f64);
    row.insert(format!("{prefix}_processed_count"), event.processed_count as f64);
    row.insert(format!("{prefix}_reservoir_full_frac"), if event.reservoir_full { 1.0 } else { 0.0 });
}

fn run_once(
    edges: &[Edge],
    k: usize,
    stream_setting: StreamSetting,
    reservoir_size: usize,
    t_k: u64,
    window: Option<usize>,
    rng: &mut impl Rng,
) -> Result<Vec<BTreeMap<String, f64>>, DriverError> {
    let stream = stream_kind(stream_setting);
    let mut shuffled = edges.to_vec();
    shuffled.shuffle(rng);

    let mut exact = MiningSession::exact(k, stream, SmallRng::from_rng(&mut *rng).expect("seeding a fresh RNG never fails"));
    let mut sampled = MiningSession::optimized_reservoir(k, reservoir_size, stream, SmallRng::from_rng(&mut *rng).expect("seeding a fresh RNG never fails"))?;

    let mut live: VecDeque<Edge> = VecDeque::new();
    let mut rows = Vec::with_capacity(shuffled.len());

    for edge in shuffled {
        exact.add_edge(edge);
        sampled.add_edge(edge);
        let exact_event = exact.metrics().events.last().cloned().expect("add_edge always pushes a metrics event");
        let sampled_event = sampled.metrics().events.last().cloned().expect("add_edge always pushes a metrics event");

        if let (Some(w), StreamKind::Dynamic) = (window, stream) {
            live.push_back(edge);
            if live.len() > w {
                if let Some(oldest) = live.pop_front() {
                    exact.remove_edge(oldest)?;
                    sampled.remove_edge(oldest)?;
                }
            }
        }

        let report = score(&snapshot(&exact), &snapshot(&sampled), t_k, TAU);
        let mut row = BTreeMap::new();
        row.insert("precision".to_string(), report.precision);
        row.insert("recall".to_string(), report.recall);
        row.insert("are".to_string(), report.are);
        insert_event_columns(&mut row, "exact", &exact_event);
        insert_event_columns(&mut row, "sampled", &sampled_event);
        rows.push(row);
    }
    Ok(rows)
}

pub fn run(
    edges: &[Edge],
    k: usize,
    stream_setting: StreamSetting,
    reservoir_size: usize,
    t_k: u64,
    window: Option<usize>,
    times: usize,
    rng: &mut impl Rng,
) -> Result<Vec<BTreeMap<String, f64>>, DriverError> {
    let mut per_run = Vec::with_capacity(times);
    for _ in 0..times {
        per_run.push(run_once(edges, k, stream_setting, reservoir_size, t_k, window, rng)?);
    }

    let n_events = edges.len();
    let mut averaged = Vec::with_capacity(n_events);
    for i in 0..n_events {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        let mut n = 0.0;
        for run_rows in &per_run {
            if let Some(row) = run_rows.get(i) {
                for (key, value) in row {
                    *sums.entry(key.clone()).or_insert(0.0) += value;
                }
                n += 1.0;
            }
        }
        let mut row = BTreeMap::new();
        if n > 0.0 {
            for (key, sum) in sums {
                row.insert(key, sum / n);
            }
        }
        averaged.push(row);
    }
    Ok(averaged)
}

pub fn write_outputs(output_dir: &Path, rows: &[BTreeMap<String, f64>]) -> Result<(), DriverError> {
    std::fs::create_dir_all(output_dir)?;
    write_metrics_file(&output_dir.join("metrics.txt"), rows)?;
    Ok(())
}
