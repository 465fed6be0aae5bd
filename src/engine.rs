//! Moves every queued packet across exactly one link.
//!
//! A step reads the queues of the `current` snapshot and writes forwarded
//! packets into the queues of `next`, so a packet forwarded onto a link is
//! never picked up again within the same step.

use itertools::Itertools;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    error::SimulationError,
    logging::Logger,
    network::{Link, LinkIndex, Network},
    packet::{Packet, PacketIndex, Roster},
    quantities::Time,
    trace::{HopOutcome, HopRecord},
};

/// Timing of one packet's transmission over a link, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transmission {
    packet: PacketIndex,
    ready: Time,
    start: Time,
    departure: Time,
    arrival: Time,
}

/// Orders a link's queue by ready time and serializes the transmissions.
///
/// The sort is stable, so packets that became ready at the same time keep
/// their queue order. A packet cannot start before the one ahead of it has
/// departed.
fn schedule(link: &Link, roster: &Roster) -> Vec<Transmission> {
    let mut busy_until: Option<Time> = None;
    link.queue()
        .iter()
        .copied()
        .sorted_by_key(|&p| roster[p].arrival_time())
        .map(|packet| {
            let ready = roster[packet].arrival_time();
            let start = match busy_until {
                Some(free) if ready < free => free,
                _ => ready,
            };
            let departure = start + link.transmission_time(roster[packet].length());
            busy_until = Some(departure);
            Transmission {
                packet,
                ready,
                start,
                departure,
                arrival: departure + link.delay(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferEngine {
    parallel: bool,
}

impl TransferEngine {
    /// With `parallel`, links are scheduled concurrently. Forwarding is still
    /// applied one link at a time in network order, so results do not change.
    #[must_use]
    pub const fn new(parallel: bool) -> TransferEngine {
        TransferEngine { parallel }
    }

    /// Advances every packet queued in `current` by one hop.
    ///
    /// Packets that reach their destination are marked arrived in `roster`;
    /// the rest are appended to the matching link queue in `next`. Fails with
    /// [`SimulationError::MissingLink`] if any path names a hop that `next`
    /// has no link for, in which case neither `roster` nor `next` is changed.
    pub fn process_step<L: Logger>(
        &self,
        current: &Network,
        next: &mut Network,
        roster: &mut Roster,
        logger: &mut L,
    ) -> Result<Vec<HopRecord>, SimulationError> {
        let busy = current
            .links()
            .map(|(_, link)| link)
            .filter(|link| !link.queue().is_empty())
            .collect_vec();
        let schedules = {
            let roster = &*roster;
            if self.parallel {
                busy.into_par_iter()
                    .map(|link| (link, schedule(link, roster)))
                    .collect::<Vec<_>>()
            } else {
                busy.into_iter()
                    .map(|link| (link, schedule(link, roster)))
                    .collect_vec()
            }
        };

        // Every onward link is resolved before any packet moves, so a missing
        // link leaves the roster and `next` untouched.
        let targets = schedules
            .iter()
            .flat_map(|(_, transmissions)| transmissions)
            .map(|t| resolve(&roster[t.packet], next))
            .collect::<Result<Vec<_>, _>>()?;

        let mut targets = targets.into_iter();
        let mut hops = Vec::new();
        for (link, transmissions) in schedules {
            for (t, target) in transmissions.into_iter().zip(targets.by_ref()) {
                hops.push(forward(link, t, target, next, roster, logger));
            }
        }
        Ok(hops)
    }
}

/// The link a packet joins once it crosses its current one, or `None` if that
/// crossing brings it to its destination.
fn resolve(packet: &Packet, next: &Network) -> Result<Option<LinkIndex>, SimulationError> {
    match packet.hop_after_current() {
        None => Ok(None),
        Some((from, to)) => next
            .link_index(from, to)
            .map(Some)
            .ok_or_else(|| SimulationError::MissingLink {
                packet: packet.id().clone(),
                from,
                to,
            }),
    }
}

fn forward<L: Logger>(
    link: &Link,
    t: Transmission,
    target: Option<LinkIndex>,
    next: &mut Network,
    roster: &mut Roster,
    logger: &mut L,
) -> HopRecord {
    let packet = roster.get_mut(t.packet);
    packet.leave_current_node();
    packet.transmitted(t.departure, t.arrival);
    log!(
        logger,
        "packet {} on {} -> {}: start {}, departure {}, path [{}]",
        packet.id(),
        link.from(),
        link.to(),
        t.start,
        t.departure,
        packet.remaining_path().iter().join(", ")
    );

    let outcome = match target {
        None => {
            packet.mark_arrived();
            log!(logger, "packet {} reached its destination at {}", packet.id(), t.arrival);
            HopOutcome::Arrived
        }
        Some(index) => {
            let onward = next.link_at_mut(index);
            onward.enqueue(t.packet);
            let (from, to) = (onward.from(), onward.to());
            log!(logger, "packet {} queued on {} -> {} for {}", packet.id(), from, to, t.arrival);
            HopOutcome::Forwarded { from, to }
        }
    };

    HopRecord {
        packet: packet.id().clone(),
        from: link.from(),
        to: link.to(),
        ready: t.ready,
        start: t.start,
        departure: t.departure,
        arrival: t.arrival,
        remaining_path: packet.remaining_path().len(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::SimulationError,
        logging::{MemoryLogger, NothingLogger},
        network::{Link, Network, Node, NodeId},
        packet::{Packet, PacketId, Roster},
        quantities::{bits, bits_per_second, seconds, Time},
        trace::HopOutcome,
    };

    use super::TransferEngine;

    fn at(s: f64) -> Time {
        Time::from_sim_start(seconds(s))
    }

    /// A single `1 -> 2` link with capacity 100 and delay 1, holding the given packets.
    fn single_link(packets: &[(&str, u64, f64)]) -> (Network, Roster) {
        let mut roster = Roster::new();
        let mut link = Link::new(
            NodeId::new(1),
            NodeId::new(2),
            bits_per_second(100.),
            seconds(1.),
        );
        for &(id, length, ready) in packets {
            link.enqueue(roster.insert(Packet::new(
                PacketId::new(id),
                bits(length),
                [NodeId::new(1), NodeId::new(2)],
                at(ready),
            )));
        }
        let mut node = Node::new(NodeId::new(1));
        node.push_link(link);
        (Network::new(vec![node, Node::new(NodeId::new(2))]), roster)
    }

    fn step(network: &Network, roster: &mut Roster) -> Vec<crate::trace::HopRecord> {
        let mut next = network.clone();
        next.clear_queues();
        TransferEngine::default()
            .process_step(network, &mut next, roster, &mut NothingLogger)
            .unwrap()
    }

    #[test]
    fn single_packet_timing() {
        let (network, mut roster) = single_link(&[("A", 1000, 0.)]);
        let hops = step(&network, &mut roster);
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].start, at(0.));
        assert_eq!(hops[0].departure, at(10.));
        assert_eq!(hops[0].arrival, at(11.));
        assert_eq!(hops[0].outcome, HopOutcome::Arrived);
        let a = roster.find(&PacketId::new("A")).unwrap();
        assert!(a.arrived());
        assert_eq!(a.departure_time(), at(10.));
        assert_eq!(a.arrival_time(), at(11.));
    }

    #[test]
    fn queued_packets_wait_for_previous_departure() {
        let (network, mut roster) = single_link(&[("A", 1000, 0.), ("B", 500, 2.), ("C", 100, 30.)]);
        let hops = step(&network, &mut roster);
        let timings = hops
            .iter()
            .map(|h| (h.packet.as_str(), h.ready, h.start, h.departure))
            .collect::<Vec<_>>();
        assert_eq!(
            timings,
            vec![
                ("A", at(0.), at(0.), at(10.)),
                ("B", at(2.), at(10.), at(15.)),
                ("C", at(30.), at(30.), at(31.)),
            ]
        );
    }

    #[test]
    fn queue_is_sorted_by_ready_time_with_stable_ties() {
        let (network, mut roster) =
            single_link(&[("late", 100, 5.), ("first", 100, 1.), ("second", 100, 1.)]);
        let order = step(&network, &mut roster)
            .into_iter()
            .map(|h| h.packet)
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                PacketId::new("first"),
                PacketId::new("second"),
                PacketId::new("late")
            ]
        );
    }

    #[test]
    fn departures_never_overlap() {
        let (network, mut roster) = single_link(&[
            ("A", 300, 4.),
            ("B", 700, 0.),
            ("C", 100, 0.5),
            ("D", 900, 12.),
            ("E", 50, 12.),
        ]);
        let hops = step(&network, &mut roster);
        for (previous, hop) in hops.iter().zip(hops.iter().skip(1)) {
            assert!(hop.ready >= previous.ready);
            assert!(hop.start >= previous.departure);
            assert!(hop.departure >= previous.departure);
        }
        for hop in &hops {
            assert!(hop.departure >= hop.start);
            assert!(hop.start >= hop.ready);
        }
    }

    #[test]
    fn missing_next_link_is_an_error() {
        let mut roster = Roster::new();
        let mut link = Link::new(
            NodeId::new(1),
            NodeId::new(2),
            bits_per_second(100.),
            seconds(1.),
        );
        link.enqueue(roster.insert(Packet::new(
            PacketId::new("lost"),
            bits(100),
            [NodeId::new(1), NodeId::new(2), NodeId::new(9)],
            Time::SIM_START,
        )));
        link.enqueue(roster.insert(Packet::new(
            PacketId::new("done"),
            bits(100),
            [NodeId::new(1), NodeId::new(2)],
            Time::SIM_START,
        )));
        let mut node = Node::new(NodeId::new(1));
        node.push_link(link);
        let network = Network::new(vec![node, Node::new(NodeId::new(2))]);
        let mut next = network.clone();
        next.clear_queues();
        let before = (roster.clone(), next.clone());

        let result =
            TransferEngine::default().process_step(&network, &mut next, &mut roster, &mut NothingLogger);
        assert_eq!(
            result,
            Err(SimulationError::MissingLink {
                packet: PacketId::new("lost"),
                from: NodeId::new(2),
                to: NodeId::new(9),
            })
        );
        // "done" alone would arrive, but the step is rejected whole.
        assert_eq!((roster, next), before);
    }

    #[test]
    fn logs_each_hop() {
        let (network, mut roster) = single_link(&[("A", 1000, 0.)]);
        let mut next = network.clone();
        next.clear_queues();
        let mut logger = MemoryLogger::new();
        TransferEngine::default()
            .process_step(&network, &mut next, &mut roster, &mut logger)
            .unwrap();
        insta::assert_snapshot!(logger.lines().join("\n"), @r"
        packet A on 1 -> 2: start 0.0000t, departure 10.0000t, path [2]
        packet A reached its destination at 11.0000t
        ");
    }
}
