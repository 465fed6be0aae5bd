use serde::{Deserialize, Serialize};

use crate::{
    engine::TransferEngine,
    error::SimulationError,
    logging::Logger,
    network::Network,
    packet::Roster,
    trace::{StepRecord, Trace},
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Give up with [`SimulationError::Diverged`] once this many steps have run.
    #[serde(default)]
    pub max_steps: Option<usize>,
    /// Schedule the links of each step concurrently.
    #[serde(default)]
    pub parallel: bool,
}

/// Runs steps until every packet in the roster has arrived.
///
/// Holds two network snapshots: `current`, whose queues are drained by the
/// next step, and `next`, which collects the packets forwarded by that step.
/// They are swapped at the end of each step rather than copied.
pub struct Simulator<L> {
    current: Network,
    next: Network,
    roster: Roster,
    engine: TransferEngine,
    max_steps: Option<usize>,
    history: Vec<StepRecord>,
    logger: L,
}

impl<L> Simulator<L>
where
    L: Logger,
{
    #[must_use]
    pub fn new(network: Network, roster: Roster, config: SimulationConfig, logger: L) -> Simulator<L> {
        let mut next = network.clone();
        next.clear_queues();
        Simulator {
            current: network,
            next,
            roster,
            engine: TransferEngine::new(config.parallel),
            max_steps: config.max_steps,
            history: Vec::new(),
            logger,
        }
    }

    /// The snapshot the next step will read from.
    #[must_use]
    pub const fn current(&self) -> &Network {
        &self.current
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.roster.all_arrived()
    }

    /// Moves every queued packet by one hop. Returns `None` once all packets
    /// have arrived.
    pub fn step(&mut self) -> Result<Option<&StepRecord>, SimulationError> {
        if self.is_complete() {
            return Ok(None);
        }
        let steps = self.history.len();
        if self.max_steps.is_some_and(|max| steps >= max) {
            return Err(self.diverged());
        }

        log!(self.logger, "step {}: {} packets queued", steps + 1, self.current.queued());
        self.next.clear_queues();
        let hops = self.engine.process_step(
            &self.current,
            &mut self.next,
            &mut self.roster,
            &mut self.logger,
        )?;
        if hops.is_empty() {
            // Nothing is queued, yet some packet never arrived.
            return Err(self.diverged());
        }
        std::mem::swap(&mut self.current, &mut self.next);

        self.history.push(StepRecord {
            step: steps + 1,
            hops,
        });
        Ok(self.history.last())
    }

    pub fn run(mut self) -> Result<Trace, SimulationError> {
        while self.step()?.is_some() {}
        log!(self.logger, "all packets arrived after {} steps", self.history.len());
        Ok(self.into_trace())
    }

    #[must_use]
    pub fn into_trace(self) -> Trace {
        Trace::new(self.history, &self.roster)
    }

    fn diverged(&self) -> SimulationError {
        SimulationError::Diverged {
            steps: self.history.len(),
            pending: self.roster.pending(),
        }
    }
}
