use serde::Serialize;

use crate::{
    network::NodeId,
    packet::{PacketId, Roster},
    quantities::Time,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HopOutcome {
    /// Queued on the `from -> to` link of the following snapshot.
    Forwarded { from: NodeId, to: NodeId },
    Arrived,
}

/// One packet crossing one link.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HopRecord {
    pub packet: PacketId,
    pub from: NodeId,
    pub to: NodeId,
    /// When the packet became ready to transmit.
    pub ready: Time,
    /// When transmission started, after waiting for the packet ahead of it.
    pub start: Time,
    pub departure: Time,
    /// Departure plus propagation delay; the ready time at the next hop.
    pub arrival: Time,
    pub remaining_path: usize,
    pub outcome: HopOutcome,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub hops: Vec<HopRecord>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PacketSummary {
    pub id: PacketId,
    pub arrived: bool,
    pub arrival_time: Time,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Trace {
    pub steps: Vec<StepRecord>,
    pub packets: Vec<PacketSummary>,
}

impl Trace {
    #[must_use]
    pub fn new(steps: Vec<StepRecord>, roster: &Roster) -> Trace {
        let packets = roster
            .iter()
            .map(|p| PacketSummary {
                id: p.id().clone(),
                arrived: p.arrived(),
                arrival_time: p.arrival_time(),
            })
            .collect();
        Trace { steps, packets }
    }

    /// Arrival time of the last packet to reach its destination.
    #[must_use]
    pub fn makespan(&self) -> Option<Time> {
        self.packets
            .iter()
            .filter(|p| p.arrived)
            .map(|p| p.arrival_time)
            .max()
    }

    pub fn hops(&self) -> impl Iterator<Item = &HopRecord> {
        self.steps.iter().flat_map(|s| s.hops.iter())
    }
}
