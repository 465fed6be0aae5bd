use std::fmt::Display;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub use self::link::Link;

pub mod link;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn new(id: u32) -> NodeId {
        NodeId(id)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    links: Vec<Link>,
}

impl Node {
    #[must_use]
    pub const fn new(id: NodeId) -> Node {
        Node {
            id,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Outgoing links, in declaration order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub(crate) fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }
}

/// Position of a link inside a [`Network`]: the owning node, then the link within it.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct LinkIndex {
    node: usize,
    link: usize,
}

/// One snapshot of the node/link/queue graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    nodes: Vec<Node>,
    lookup: FxHashMap<(NodeId, NodeId), LinkIndex>,
}

impl Network {
    /// Links sharing a `(from, to)` pair are shadowed by the last one; topologies
    /// are validated against that before they get here.
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Network {
        let lookup = nodes
            .iter()
            .enumerate()
            .flat_map(|(node, n)| {
                n.links
                    .iter()
                    .enumerate()
                    .map(move |(link, l)| ((l.from(), l.to()), LinkIndex { node, link }))
            })
            .collect();
        Network { nodes, lookup }
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkIndex, &Link)> {
        self.nodes.iter().enumerate().flat_map(|(node, n)| {
            n.links
                .iter()
                .enumerate()
                .map(move |(link, l)| (LinkIndex { node, link }, l))
        })
    }

    #[must_use]
    pub fn link_index(&self, from: NodeId, to: NodeId) -> Option<LinkIndex> {
        self.lookup.get(&(from, to)).copied()
    }

    #[must_use]
    pub fn link(&self, from: NodeId, to: NodeId) -> Option<&Link> {
        self.link_index(from, to).map(|index| self.link_at(index))
    }

    #[must_use]
    pub fn link_at(&self, LinkIndex { node, link }: LinkIndex) -> &Link {
        &self.nodes[node].links[link]
    }

    pub(crate) fn link_at_mut(&mut self, LinkIndex { node, link }: LinkIndex) -> &mut Link {
        &mut self.nodes[node].links[link]
    }

    /// Total number of packets waiting across every link.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.links().map(|(_, l)| l.queue().len()).sum()
    }

    pub(crate) fn clear_queues(&mut self) {
        self.nodes
            .iter_mut()
            .flat_map(|n| n.links.iter_mut())
            .for_each(Link::clear_queue);
    }
}

#[cfg(test)]
mod tests {
    use crate::quantities::{bits_per_second, seconds};

    use super::{Link, Network, Node, NodeId};

    fn line() -> Network {
        let mut first = Node::new(NodeId::new(1));
        first.push_link(Link::new(
            NodeId::new(1),
            NodeId::new(2),
            bits_per_second(100.),
            seconds(1.),
        ));
        let mut second = Node::new(NodeId::new(2));
        second.push_link(Link::new(
            NodeId::new(2),
            NodeId::new(3),
            bits_per_second(10.),
            seconds(3.),
        ));
        Network::new(vec![first, second, Node::new(NodeId::new(3))])
    }

    #[test]
    fn lookup_by_endpoints() {
        let network = line();
        let link = network.link(NodeId::new(2), NodeId::new(3)).unwrap();
        assert_eq!(link.capacity(), bits_per_second(10.));
        assert_eq!(link.delay(), seconds(3.));
        assert!(network.link(NodeId::new(3), NodeId::new(2)).is_none());
        assert!(network.link(NodeId::new(1), NodeId::new(3)).is_none());
    }

    #[test]
    fn links_follow_declaration_order() {
        let endpoints = line()
            .links()
            .map(|(_, l)| (l.from(), l.to()))
            .collect::<Vec<_>>();
        assert_eq!(
            endpoints,
            vec![
                (NodeId::new(1), NodeId::new(2)),
                (NodeId::new(2), NodeId::new(3))
            ]
        );
    }
}
