use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use gen_config::gen_config;
use run::run;

mod gen_config;
mod run;

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default two-hop topology to a file
    GenConfig {
        /// File to write the topology to (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run a topology until every packet has reached its destination
    Run {
        /// Topology file (JSON)
        #[arg(short, long)]
        topology: PathBuf,

        /// Give up after this many steps
        #[arg(long)]
        max_steps: Option<usize>,

        /// Schedule the links of each step in parallel
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Print the network after every step and log each hop
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// File to write the trace to (JSON); printed to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Use the hopsim CLI to replay store-and-forward packet switching over a fixed topology.", long_about = None)]
struct Args {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::GenConfig { output } => gen_config(&output),
        Command::Run {
            topology,
            max_steps,
            parallel,
            verbose,
            output,
        } => run(
            &topology,
            hopsim::SimulationConfig {
                max_steps,
                parallel,
            },
            verbose,
            output.as_deref(),
        ),
    }
}
