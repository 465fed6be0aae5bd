use itertools::Itertools;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    network::Network,
    packet::{Packet, Roster},
};

#[derive(Tabled)]
struct LinkRow {
    node: String,
    link: String,
    capacity: String,
    delay: String,
    queue: String,
}

#[derive(Tabled)]
struct PacketRow {
    #[tabled(rename = "packet")]
    id: String,
    length: String,
    path: String,
    arrival: String,
    departure: String,
    arrived: bool,
}

impl From<&Packet> for PacketRow {
    fn from(packet: &Packet) -> PacketRow {
        PacketRow {
            id: packet.id().to_string(),
            length: packet.length().to_string(),
            path: format!("[{}]", packet.remaining_path().iter().join(", ")),
            arrival: packet.arrival_time().to_string(),
            departure: packet.departure_time().to_string(),
            arrived: packet.arrived(),
        }
    }
}

/// One row per link, or a bare row for nodes without outgoing links.
#[must_use]
pub fn network_table(network: &Network, roster: &Roster) -> String {
    let rows = network.nodes().iter().flat_map(|node| {
        let links = node
            .links()
            .iter()
            .map(|link| LinkRow {
                node: node.id().to_string(),
                link: format!("{} -> {}", link.from(), link.to()),
                capacity: link.capacity().to_string(),
                delay: link.delay().to_string(),
                queue: link.queue().iter().map(|&p| roster[p].id()).join(", "),
            })
            .collect_vec();
        if links.is_empty() {
            vec![LinkRow {
                node: node.id().to_string(),
                link: "-".to_owned(),
                capacity: String::new(),
                delay: String::new(),
                queue: String::new(),
            }]
        } else {
            links
        }
    });
    Table::new(rows).with(Style::sharp()).to_string()
}

#[must_use]
pub fn roster_table(roster: &Roster) -> String {
    Table::new(roster.iter().map(PacketRow::from))
        .with(Style::sharp())
        .to_string()
}

#[cfg(test)]
mod tests {
    use crate::{logging::NothingLogger, simulation::Simulator, topology::Topology};

    use super::{network_table, roster_table};

    #[test]
    fn tables_list_every_link_and_packet() {
        let (network, roster) = Topology::default().build().unwrap();
        let table = network_table(&network, &roster);
        for expected in ["1 -> 2", "2 -> 3", "2 -> 4", "A, B"] {
            assert!(table.contains(expected), "missing {expected:?} in\n{table}");
        }
        assert_eq!(table.lines().filter(|l| l.contains(" - ")).count(), 2);

        let mut sim = Simulator::new(network, roster, Default::default(), NothingLogger);
        sim.step().unwrap();
        let table = network_table(sim.current(), sim.roster());
        assert!(!table.contains("A, B"));

        let packets = roster_table(sim.roster());
        assert!(packets.contains("[2, 3]"));
        assert!(packets.contains("[2, 4]"));
        assert!(packets.contains("false"));
    }
}
