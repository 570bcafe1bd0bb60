// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and connections from a [`PowerGraph`].

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::iterators::{Connections, Nodes};
use crate::{Edge, Error, PowerGraph, PowerNode};

use super::Link;

/// `PowerNode` and `Connection` retrieval.
impl<E> PowerGraph<E>
where
    E: Edge,
{
    /// Returns the node with the given `id`, if it exists.
    pub fn node(&self, id: &str) -> Result<&PowerNode, Error> {
        self.index(id).map(|i| &self.graph[i])
    }

    /// Returns an iterator over the nodes in the graph, in the order they
    /// were first seen in the connections.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the connections the graph was built from,
    /// excluding the ones that were skipped.
    pub fn connections(&self) -> Connections<'_, E> {
        Connections {
            iter: self.connections.iter(),
        }
    }

    /// Returns the node fed by the node with the given `id`.
    ///
    /// Returns an error if the given `id` does not exist.
    pub fn sink(&self, id: &str) -> Result<Option<&PowerNode>, Error> {
        let index = self.index(id)?;
        Ok(self.sink_link(index).map(|l| &self.graph[l.node]))
    }

    /// Returns the node feeding the node with the given `id`.
    ///
    /// Returns an error if the given `id` does not exist.
    pub fn source(&self, id: &str) -> Result<Option<&PowerNode>, Error> {
        let index = self.index(id)?;
        Ok(self.graph[index].source.map(|l| &self.graph[l.node]))
    }

    /// Returns the connection through which the node with the given `id`
    /// feeds its sink.
    pub fn sink_connection(&self, id: &str) -> Result<Option<&E>, Error> {
        let index = self.index(id)?;
        Ok(self
            .sink_link(index)
            .and_then(|l| self.connections.get(l.connection)))
    }

    /// Returns the connection through which the node with the given `id` is
    /// fed by its source.
    pub fn source_connection(&self, id: &str) -> Result<Option<&E>, Error> {
        let index = self.index(id)?;
        Ok(self.graph[index]
            .source
            .and_then(|l| self.connections.get(l.connection)))
    }

    pub(crate) fn index(&self, id: &str) -> Result<NodeIndex, Error> {
        self.node_indices
            .get(id)
            .copied()
            .ok_or_else(|| Error::entity_not_found(format!("Node with id {id} not found.")))
    }

    pub(crate) fn sink_link(&self, index: NodeIndex) -> Option<Link> {
        self.graph
            .edges_directed(index, petgraph::Direction::Outgoing)
            .next()
            .map(|e| Link {
                node: e.target(),
                connection: *e.weight(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::TestConnection;
    use crate::NodeType;

    fn connections() -> Vec<TestConnection> {
        vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "b1", NodeType::Battery, "l1", NodeType::Load),
            TestConnection::new("c3", "s2", NodeType::Solar, "b2", NodeType::Battery),
        ]
    }

    #[test]
    fn test_node() -> Result<(), Error> {
        let graph = PowerGraph::new(connections());

        let node = graph.node("b1")?;
        assert_eq!(node.id(), "b1");
        assert_eq!(node.node_type(), NodeType::Battery);
        assert_eq!(
            graph.node("x"),
            Err(Error::entity_not_found("Node with id x not found."))
        );

        Ok(())
    }

    #[test]
    fn test_nodes_and_connections() {
        let graph = PowerGraph::new(connections());

        assert!(graph
            .nodes()
            .map(|n| n.id())
            .eq(["s1", "b1", "l1", "s2", "b2"]));
        assert!(graph
            .nodes()
            .filter(|n| n.node_type().is_battery())
            .map(|n| n.id())
            .eq(["b1", "b2"]));
        assert!(graph.connections().eq(&connections()));
    }

    #[test]
    fn test_neighbors_of_missing_node() {
        let graph = PowerGraph::new(connections());

        assert!(graph
            .sink("x")
            .is_err_and(|e| e == Error::entity_not_found("Node with id x not found.")));
        assert!(graph
            .source("x")
            .is_err_and(|e| e == Error::entity_not_found("Node with id x not found.")));
        assert!(graph.sink_connection("x").is_err());
        assert!(graph.source_connection("x").is_err());
    }
}
