mod cli;
mod commands;
mod error;
mod io;
mod logging;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{error, info};

use cli::{Cli, Command};
use error::DriverError;

fn main() {
    logging::init();
    let cli = Cli::parse();

    if let Err(err) = dispatch(cli) {
        error!(%err, "graphmine exited with an error");
        std::process::exit(err.exit_code());
    }
}

fn dispatch(cli: Cli) -> Result<(), DriverError> {
    let mut rng = SmallRng::from_entropy();

    match cli.command {
        Command::Simulate { k, stream_setting, algorithm, edge_file, output_dir, reservoir_size, times } => {
            let edges = io::read_edge_file(&edge_file)?;
            info!(k, edges = edges.len(), times, "running simulate");
            let outcome = commands::simulate::run(&edges, k, stream_setting, algorithm, reservoir_size, times, &mut rng)?;
            commands::simulate::write_outputs(&output_dir, &outcome)?;
        }

        Command::ContinuousAccuracy { k, stream_setting, edge_file, output_dir, reservoir_size, t_k, window, times } => {
            let edges = io::read_edge_file(&edge_file)?;
            info!(k, edges = edges.len(), times, "running continuous-accuracy");
            let rows = commands::continuous_accuracy::run(&edges, k, stream_setting, reservoir_size, t_k, window, times, &mut rng)?;
            commands::continuous_accuracy::write_outputs(&output_dir, &rows)?;
        }

        Command::Accuracy { exact_patterns_file, sampled_patterns_file, t_k, tau, runs } => {
            let reports = commands::accuracy::run(&exact_patterns_file, &sampled_patterns_file, t_k, tau, runs)?;
            for report in reports {
                println!("tau={:.4} precision={:.4} recall={:.4} are={:.4}", report.tau, report.precision, report.recall, report.are);
            }
        }

        Command::RandomGraph { n, p, node_labels, edge_labels, name, dest } => {
            let written = commands::random_graph::run(n, p, &node_labels, &edge_labels, &name, &dest, &mut rng)?;
            for path in written {
                info!(path = %path.display(), "wrote random graph");
            }
        }
    }

    Ok(())
}
