//! `accuracy` subcommand: precision/recall/average-relative-error between an
//! exact and a sampled pattern file (spec §6), swept across the original's
//! fixed tau-coefficient list unless `-t`/`--tau` pins a single value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::DriverError;
use crate::io::read_pattern_file;

const DEFAULT_TAU_SWEEP: &[f64] = &[0.001, 0.01, 0.1, 0.2, 1.0, 2.0, 10.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    pub tau: f64,
    pub precision: f64,
    pub recall: f64,
    pub are: f64,
}

fn relative_frequencies(counts: &BTreeMap<String, u64>) -> BTreeMap<&str, f64> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts.iter().map(|(label, &count)| (label.as_str(), count as f64 / total as f64)).collect()
}

/// Precision/recall/ARE for one `(exact, sampled)` run pair at one `tau`.
pub fn score(exact: &BTreeMap<String, u64>, sampled: &BTreeMap<String, u64>, t_k: u64, tau: f64) -> AccuracyReport {
    let p = relative_frequencies(exact);
    let q = relative_frequencies(sampled);

    let big_p: BTreeSet<&str> = p.iter().filter(|&(_, &freq)| freq >= tau).map(|(&label, _)| label).collect();
    let big_q: BTreeSet<&str> = q.iter().filter(|&(_, &freq)| freq >= tau).map(|(&label, _)| label).collect();
    let intersection = big_p.intersection(&big_q).count() as f64;

    let precision = if big_q.is_empty() { if big_p.is_empty() { 1.0 } else { 0.0 } } else { intersection / big_q.len() as f64 };
    let recall = if big_p.is_empty() { if big_q.is_empty() { 1.0 } else { 0.0 } } else { intersection / big_p.len() as f64 };

    let are = if t_k == 0 {
        0.0
    } else {
        let sum: f64 = big_p
            .iter()
            .map(|&label| {
                let p_i = p[label];
                let q_i = q.get(label).copied().unwrap_or(0.0);
                (q_i - p_i).abs() / p_i
            })
            .sum();
        sum / t_k as f64
    };

    AccuracyReport { tau, precision, recall, are }
}

/// Averages [`score`] across `runs` independent `(exact, sampled)` column
/// pairs, one report per tau in the sweep.
pub fn run(exact_file: &Path, sampled_file: &Path, t_k: u64, tau: Option<f64>, runs: usize) -> Result<Vec<AccuracyReport>, DriverError> {
    let exact_runs = read_pattern_file(exact_file)?;
    let sampled_runs = read_pattern_file(sampled_file)?;
    let exact = exact_runs.first().ok_or_else(|| DriverError::InvalidInput("exact patterns file has no run columns".to_string()))?;

    let sweep: Vec<f64> = match tau {
        Some(t) => vec![t],
        None => DEFAULT_TAU_SWEEP.to_vec(),
    };

    let mut reports = Vec::with_capacity(sweep.len());
    for tau in sweep {
        let n = runs.min(sampled_runs.len()).max(1);
        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut are_sum = 0.0;
        for sampled in sampled_runs.iter().take(n) {
            let r = score(exact, sampled, t_k, tau);
            precision_sum += r.precision;
            recall_sum += r.recall;
            are_sum += r.are;
        }
        reports.push(AccuracyReport { tau, precision: precision_sum / n as f64, recall: recall_sum / n as f64, are: are_sum / n as f64 });
    }
    Ok(reports)
}
