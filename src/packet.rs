use std::{collections::VecDeque, fmt::Display, ops::Index};

use serde::{Deserialize, Serialize};

use crate::{
    network::NodeId,
    quantities::{Information, Time},
};

#[derive(PartialEq, Eq, Hash, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketId(String);

impl PacketId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> PacketId {
        PacketId(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PacketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a packet in the [`Roster`]. Link queues hold these instead of packets.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct PacketIndex(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    id: PacketId,
    length: Information,
    remaining_path: VecDeque<NodeId>,
    arrival_time: Time,
    departure_time: Time,
    arrived: bool,
}

impl Packet {
    /// Creates a packet sitting at the head of `path`, ready to transmit at `arrival_time`.
    #[must_use]
    pub fn new(
        id: PacketId,
        length: Information,
        path: impl IntoIterator<Item = NodeId>,
        arrival_time: Time,
    ) -> Packet {
        Packet {
            id,
            length,
            remaining_path: path.into_iter().collect(),
            arrival_time,
            departure_time: arrival_time,
            arrived: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PacketId {
        &self.id
    }

    #[must_use]
    pub const fn length(&self) -> Information {
        self.length
    }

    #[must_use]
    pub const fn remaining_path(&self) -> &VecDeque<NodeId> {
        &self.remaining_path
    }

    /// Time the packet is ready to transmit on its current link, or its final arrival time.
    #[must_use]
    pub const fn arrival_time(&self) -> Time {
        self.arrival_time
    }

    /// Time the last transmission of this packet completed.
    #[must_use]
    pub const fn departure_time(&self) -> Time {
        self.departure_time
    }

    #[must_use]
    pub const fn arrived(&self) -> bool {
        self.arrived
    }

    /// The `(source, destination)` pair of the link the packet is waiting on.
    #[must_use]
    pub fn current_hop(&self) -> Option<(NodeId, NodeId)> {
        match (self.remaining_path.front(), self.remaining_path.get(1)) {
            (Some(&from), Some(&to)) => Some((from, to)),
            _ => None,
        }
    }

    /// The hop the packet takes after its current one, if it has another.
    #[must_use]
    pub fn hop_after_current(&self) -> Option<(NodeId, NodeId)> {
        match (self.remaining_path.get(1), self.remaining_path.get(2)) {
            (Some(&from), Some(&to)) => Some((from, to)),
            _ => None,
        }
    }

    pub(crate) fn leave_current_node(&mut self) {
        self.remaining_path.pop_front();
    }

    pub(crate) fn transmitted(&mut self, departure_time: Time, next_arrival_time: Time) {
        self.departure_time = departure_time;
        self.arrival_time = next_arrival_time;
    }

    /// Only the destination is left once the path holds a single node.
    #[must_use]
    pub fn at_destination(&self) -> bool {
        self.remaining_path.len() <= 1
    }

    pub(crate) fn mark_arrived(&mut self) {
        self.arrived = true;
    }
}

/// Every packet in the system, owned once and addressed by [`PacketIndex`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    packets: Vec<Packet>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Roster {
        Roster::default()
    }

    pub fn insert(&mut self, packet: Packet) -> PacketIndex {
        self.packets.push(packet);
        PacketIndex(self.packets.len() - 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter()
    }

    #[must_use]
    pub fn find(&self, id: &PacketId) -> Option<&Packet> {
        self.packets.iter().find(|p| &p.id == id)
    }

    /// Vacuously true for an empty roster.
    #[must_use]
    pub fn all_arrived(&self) -> bool {
        self.packets.iter().all(Packet::arrived)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.packets.iter().filter(|p| !p.arrived).count()
    }

    pub(crate) fn get_mut(&mut self, index: PacketIndex) -> &mut Packet {
        &mut self.packets[index.0]
    }
}

impl Index<PacketIndex> for Roster {
    type Output = Packet;

    fn index(&self, index: PacketIndex) -> &Self::Output {
        &self.packets[index.0]
    }
}
