//! `clap` derive CLI surface, one-to-one with spec §6's four subcommands
//! (`simulate.py`, `continuous_accuracy.py`, `accuracy.py`, `random_graph.py`
//! in the original).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "graphmine", about = "Streaming frequent subgraph pattern mining over an evolving graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamSetting {
    Incremental,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Exact,
    Naive,
    Optimal,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mines pattern frequencies over an edge stream, `-t` independent
    /// runs, reshuffled between runs.
    Simulate {
        k: usize,
        stream_setting: StreamSetting,
        algorithm: Algorithm,
        edge_file: PathBuf,
        output_dir: PathBuf,
        /// Reservoir size; required unless `algorithm = exact`.
        #[arg(short = 'm', long)]
        reservoir_size: Option<usize>,
        #[arg(short = 't', long, default_value_t = 10)]
        times: usize,
    },

    /// Runs an exact and an optimized-reservoir session side by side over
    /// the same edge order, snapshotting accuracy after every event.
    ContinuousAccuracy {
        k: usize,
        stream_setting: StreamSetting,
        edge_file: PathBuf,
        output_dir: PathBuf,
        reservoir_size: usize,
        /// Pattern-space size, ARE's denominator.
        t_k: u64,
        /// Sliding window size; meaningful only when `stream_setting = dynamic`.
        #[arg(short = 'w', long)]
        window: Option<usize>,
        #[arg(short = 't', long, default_value_t = 10)]
        times: usize,
    },

    /// Computes precision/recall/ARE between an exact and a sampled pattern file.
    Accuracy {
        exact_patterns_file: PathBuf,
        sampled_patterns_file: PathBuf,
        t_k: u64,
        /// Pins a single threshold instead of sweeping the default 7-value list.
        #[arg(short = 't', long)]
        tau: Option<f64>,
        #[arg(short = 'r', long, default_value_t = 5)]
        runs: usize,
    },

    /// Generates a random labeled Erdős–Rényi edge file.
    RandomGraph {
        n: usize,
        p: f64,
        #[arg(short = 'l', long = "nodelabels", num_args = 1.., default_value = "2")]
        node_labels: Vec<u16>,
        #[arg(short = 'q', long = "edgelabels", num_args = 1.., default_value = "2")]
        edge_labels: Vec<u16>,
        /// Filename prefix for the generated edge files.
        #[arg(short = 'n', long, default_value = "ER")]
        name: String,
        #[arg(short = 'd', long, default_value = ".")]
        dest: PathBuf,
    },
}
