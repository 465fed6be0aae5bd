use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    error::TopologyError,
    network::{Link, Network, Node, NodeId},
    packet::{Packet, PacketId, Roster},
    quantities::{bits, bits_per_second, seconds, Information, InformationRate, Time, TimeSpan},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PacketConfig {
    pub id: PacketId,
    pub length: Information,
    /// Every node the packet visits, starting with the one it is queued at.
    pub path: Vec<NodeId>,
    #[serde(default)]
    pub arrival_time: Time,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkConfig {
    pub to: NodeId,
    pub capacity: InformationRate,
    pub delay: TimeSpan,
    #[serde(default)]
    pub queue: Vec<PacketConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub id: NodeId,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// Nodes, their outgoing links and the packets initially queued on them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Topology {
    pub nodes: Vec<NodeConfig>,
}

impl Default for Topology {
    /// Two packets leave node 1 together, then split towards nodes 3 and 4.
    fn default() -> Topology {
        let packet = |id: &str, length, path: [u32; 3]| PacketConfig {
            id: PacketId::new(id),
            length: bits(length),
            path: path.into_iter().map(NodeId::new).collect(),
            arrival_time: Time::SIM_START,
        };
        let link = |to, capacity, delay, queue| LinkConfig {
            to: NodeId::new(to),
            capacity: bits_per_second(capacity),
            delay: seconds(delay),
            queue,
        };
        let node = |id, links| NodeConfig {
            id: NodeId::new(id),
            links,
        };
        Topology {
            nodes: vec![
                node(
                    1,
                    vec![link(
                        2,
                        100.,
                        1.,
                        vec![packet("A", 1000, [1, 2, 3]), packet("B", 500, [1, 2, 4])],
                    )],
                ),
                node(
                    2,
                    vec![link(3, 100., 3., vec![]), link(4, 1000., 4., vec![])],
                ),
                node(3, vec![]),
                node(4, vec![]),
            ],
        }
    }
}

impl Topology {
    /// Validates the topology and lays it out as a network snapshot plus the
    /// roster owning every packet.
    pub fn build(&self) -> Result<(Network, Roster), TopologyError> {
        let mut declared = FxHashSet::default();
        for node in &self.nodes {
            if !declared.insert(node.id) {
                return Err(TopologyError::DuplicateNode(node.id));
            }
        }

        let mut links = FxHashSet::default();
        let mut packet_ids = FxHashSet::default();
        let mut roster = Roster::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node_config in &self.nodes {
            let from = node_config.id;
            let mut node = Node::new(from);
            for link_config in &node_config.links {
                let to = link_config.to;
                if !links.insert((from, to)) {
                    return Err(TopologyError::DuplicateLink { from, to });
                }
                if !declared.contains(&to) {
                    return Err(TopologyError::UnknownNode { from, to });
                }
                if !link_config.capacity.is_usable() {
                    return Err(TopologyError::InvalidCapacity { from, to });
                }
                if !link_config.delay.is_finite() || link_config.delay.is_negative() {
                    return Err(TopologyError::InvalidDelay { from, to });
                }

                let mut link = Link::new(from, to, link_config.capacity, link_config.delay);
                for packet in &link_config.queue {
                    packet.validate(from, to)?;
                    if !packet_ids.insert(packet.id.clone()) {
                        return Err(TopologyError::DuplicatePacket(packet.id.clone()));
                    }
                    link.enqueue(roster.insert(Packet::new(
                        packet.id.clone(),
                        packet.length,
                        packet.path.iter().copied(),
                        packet.arrival_time,
                    )));
                }
                node.push_link(link);
            }
            nodes.push(node);
        }
        Ok((Network::new(nodes), roster))
    }
}

impl PacketConfig {
    fn validate(&self, from: NodeId, to: NodeId) -> Result<(), TopologyError> {
        if self.length == Information::ZERO {
            return Err(TopologyError::InvalidLength(self.id.clone()));
        }
        if !(self.arrival_time - Time::SIM_START).is_finite() {
            return Err(TopologyError::InvalidArrivalTime(self.id.clone()));
        }
        match self.path.as_slice() {
            [] | [_] => Err(TopologyError::PathTooShort(self.id.clone())),
            [first, second, ..] if (*first, *second) != (from, to) => {
                Err(TopologyError::PathMismatch {
                    packet: self.id.clone(),
                    from,
                    to,
                })
            }
            _ => Ok(()),
        }
    }
}
