use derive_more::Display;

use crate::{network::NodeId, packet::PacketId};

/// Reasons a topology cannot be turned into a runnable network.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TopologyError {
    #[display(fmt = "node {} is declared more than once", _0)]
    DuplicateNode(NodeId),
    #[display(fmt = "link {} -> {} is declared more than once", from, to)]
    DuplicateLink { from: NodeId, to: NodeId },
    #[display(fmt = "link {} -> {} leads to an undeclared node", from, to)]
    UnknownNode { from: NodeId, to: NodeId },
    #[display(fmt = "link {} -> {} needs a finite, positive capacity", from, to)]
    InvalidCapacity { from: NodeId, to: NodeId },
    #[display(fmt = "link {} -> {} needs a finite, non-negative delay", from, to)]
    InvalidDelay { from: NodeId, to: NodeId },
    #[display(fmt = "packet {} needs a positive length", _0)]
    InvalidLength(PacketId),
    #[display(fmt = "packet {} needs a finite arrival time", _0)]
    InvalidArrivalTime(PacketId),
    #[display(fmt = "packet {} is declared more than once", _0)]
    DuplicatePacket(PacketId),
    #[display(fmt = "packet {} needs a path of at least two nodes", _0)]
    PathTooShort(PacketId),
    #[display(fmt = "packet {} is queued on link {} -> {} but its path starts elsewhere", packet, from, to)]
    PathMismatch {
        packet: PacketId,
        from: NodeId,
        to: NodeId,
    },
}

impl std::error::Error for TopologyError {}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SimulationError {
    /// The next hop on a packet's path has no link in the network.
    #[display(fmt = "packet {} has no link for hop {} -> {}", packet, from, to)]
    MissingLink {
        packet: PacketId,
        from: NodeId,
        to: NodeId,
    },
    /// Packets were still in flight when the step bound was hit, or a step moved nothing.
    #[display(fmt = "simulation gave up after {} steps with {} packets pending", steps, pending)]
    Diverged { steps: usize, pending: usize },
    #[display(fmt = "invalid topology: {}", _0)]
    InvalidTopology(TopologyError),
}

impl From<TopologyError> for SimulationError {
    fn from(e: TopologyError) -> Self {
        SimulationError::InvalidTopology(e)
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidTopology(e) => Some(e),
            _ => None,
        }
    }
}
