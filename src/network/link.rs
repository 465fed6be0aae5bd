use crate::{
    packet::PacketIndex,
    quantities::{Information, InformationRate, TimeSpan},
};

use super::NodeId;

/// A directed edge. The endpoints, capacity and delay are fixed; the queue is
/// refilled every step.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    from: NodeId,
    to: NodeId,
    capacity: InformationRate,
    delay: TimeSpan,
    queue: Vec<PacketIndex>,
}

impl Link {
    #[must_use]
    pub const fn new(
        from: NodeId,
        to: NodeId,
        capacity: InformationRate,
        delay: TimeSpan,
    ) -> Link {
        Link {
            from,
            to,
            capacity,
            delay,
            queue: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from(&self) -> NodeId {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> NodeId {
        self.to
    }

    #[must_use]
    pub const fn capacity(&self) -> InformationRate {
        self.capacity
    }

    #[must_use]
    pub const fn delay(&self) -> TimeSpan {
        self.delay
    }

    /// Packets waiting on this link, in the order they were enqueued.
    #[must_use]
    pub fn queue(&self) -> &[PacketIndex] {
        &self.queue
    }

    #[must_use]
    pub fn transmission_time(&self, length: Information) -> TimeSpan {
        length / self.capacity
    }

    pub(crate) fn enqueue(&mut self, packet: PacketIndex) {
        self.queue.push(packet);
    }

    pub(crate) fn clear_queue(&mut self) {
        self.queue.clear();
    }
}
