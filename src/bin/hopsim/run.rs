use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use hopsim::{
    logging::{Logger, NothingLogger, PrintLogger},
    report::{network_table, roster_table},
    trace::Trace,
    Config, SimulationConfig, Simulator, Topology,
};

fn simulate<L: Logger>(mut sim: Simulator<L>, verbose: bool) -> Result<Trace> {
    if verbose {
        println!("{}", network_table(sim.current(), sim.roster()));
    }
    while let Some(step) = sim.step()? {
        let step = step.step;
        if verbose {
            println!("after step {step}:");
            println!("{}", network_table(sim.current(), sim.roster()));
        }
    }
    println!("{}", roster_table(sim.roster()));
    Ok(sim.into_trace())
}

pub(super) fn run(
    topology: &Path,
    config: SimulationConfig,
    verbose: bool,
    output: Option<&Path>,
) -> Result<()> {
    let topology = Topology::load(topology)
        .with_context(|| format!("Failed to load topology from {}", topology.display()))?;
    let (network, roster) = topology.build()?;

    let trace = if verbose {
        let logger = PrintLogger::new("engine".to_owned());
        simulate(Simulator::new(network, roster, config, logger), true)?
    } else {
        simulate(Simulator::new(network, roster, config, NothingLogger), false)?
    };
    if let Some(makespan) = trace.makespan() {
        println!(
            "last packet arrived at {makespan} after {} steps",
            trace.steps.len()
        );
    }

    if let Some(output) = output {
        let file = File::create(output)?;
        serde_json::to_writer_pretty(file, &trace)?;
    } else {
        println!("{}", serde_json::to_string(&trace)?);
    }
    Ok(())
}
