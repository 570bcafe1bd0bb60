// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`PowerGraph`] instances from given connections.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::{Edge, NodeType};

use super::{Link, NodeIndexMap, PowerGraph, PowerNode};

/// `PowerGraph` instantiation.
impl<E> PowerGraph<E>
where
    E: Edge,
{
    /// Creates a new [`PowerGraph`] from the given connections.
    ///
    /// Connections with an empty endpoint id or an unknown endpoint type are
    /// skipped.  Entity ids are assumed to be unique across entity types: if
    /// the same id shows up with two different types, the type it was first
    /// seen with is kept.
    ///
    /// The graph is not checked for cycles here.  Use
    /// [`has_cycle`][PowerGraph::has_cycle] or
    /// [`validate_acyclicity`][PowerGraph::validate_acyclicity] for that,
    /// which [`visit_sinks_first`][PowerGraph::visit_sinks_first] also does
    /// before visiting anything.
    pub fn new(connections: impl IntoIterator<Item = E>) -> Self {
        let mut pg = Self {
            graph: DiGraph::new(),
            node_indices: NodeIndexMap::new(),
            connections: Vec::new(),
        };

        for connection in connections {
            let (Some(source_type), Some(sink_type)) =
                (connection.source_type(), connection.sink_type())
            else {
                tracing::debug!(
                    "Skipping connection {}: endpoint type missing.",
                    connection.connection_id()
                );
                continue;
            };
            if connection.source_id().is_empty() || connection.sink_id().is_empty() {
                tracing::debug!(
                    "Skipping connection {}: endpoint id missing.",
                    connection.connection_id()
                );
                continue;
            }

            let source_idx = pg.get_or_add_node(connection.source_id(), source_type);
            let sink_idx = pg.get_or_add_node(connection.sink_id(), sink_type);

            let position = pg.connections.len();
            pg.connections.push(connection);
            pg.link(source_idx, sink_idx, position);
        }

        pg
    }

    fn get_or_add_node(&mut self, id: &str, node_type: NodeType) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            let existing = self.graph[idx].node_type;
            if existing != node_type {
                tracing::warn!(
                    "Entity id {id} used as both {existing} and {node_type}. Keeping {existing}."
                );
            }
            return idx;
        }

        let idx = self.graph.add_node(PowerNode {
            id: id.to_string(),
            node_type,
            source: None,
        });
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Makes `sink_idx` the sink of `source_idx`, and `source_idx` the source
    /// of `sink_idx`, replacing any previous links.
    fn link(&mut self, source_idx: NodeIndex, sink_idx: NodeIndex, connection: usize) {
        let previous_sink = self
            .graph
            .edges_directed(source_idx, petgraph::Direction::Outgoing)
            .next()
            .map(|e| e.id());
        if let Some(edge) = previous_sink {
            self.graph.remove_edge(edge);
        }
        self.graph.add_edge(source_idx, sink_idx, connection);

        self.graph[sink_idx].source = Some(Link {
            node: source_idx,
            connection,
        });
    }
}
