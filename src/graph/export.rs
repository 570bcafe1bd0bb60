// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A flattened view of a [`PowerGraph`], for handing out to clients.

use serde::Serialize;

use crate::{Edge, Error, PowerGraph};

/// A node of the graph along with the ids and types of its neighbors.
///
/// Missing neighbors are represented by empty strings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub source_type: String,
    pub source_id: String,
    pub sink_type: String,
    pub sink_id: String,
}

impl<E> PowerGraph<E>
where
    E: Edge,
{
    /// Returns all nodes of the graph in sinks-first order, flattened into
    /// [`ExportedNode`]s.
    ///
    /// Returns an error if the graph has a cycle.
    pub fn export(&self) -> Result<Vec<ExportedNode>, Error> {
        self.validate_acyclicity()?;

        let mut nodes = Vec::with_capacity(self.graph.node_count());
        for node in self.sinks_first_order() {
            let source = self.source(node.id())?;
            let sink = self.sink(node.id())?;
            nodes.push(ExportedNode {
                id: node.id().to_string(),
                node_type: node.node_type().to_string(),
                source_type: source.map(|n| n.node_type().to_string()).unwrap_or_default(),
                source_id: source.map(|n| n.id().to_string()).unwrap_or_default(),
                sink_type: sink.map(|n| n.node_type().to_string()).unwrap_or_default(),
                sink_id: sink.map(|n| n.id().to_string()).unwrap_or_default(),
            });
        }
        Ok(nodes)
    }
}
