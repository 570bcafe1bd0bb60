// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the entities of a power network, and the
//! connections through which energy flows between them.

mod creation;
mod export;
mod retrieval;
mod traversal;
mod validation;

pub mod iterators;

#[cfg(test)]
mod test_utils;

pub use export::ExportedNode;

use crate::{Edge, NodeType};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// `PowerNode`s stored in a `DiGraph` instance can be addressed with
/// `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any entity id, so
/// that nodes in the `DiGraph` can be retrieved from their ids.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// A reference from one node to a neighbor, along with the position of the
/// connection that created the link in [`PowerGraph::connections`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Link {
    pub(crate) node: NodeIndex,
    pub(crate) connection: usize,
}

/// An entity in the power network, as seen by the graph.
///
/// Every node has at most one *source*, the node that feeds it, and at most
/// one *sink*, the node it feeds.  When several connections share an
/// endpoint, the connection that comes last wins.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerNode {
    id: String,
    node_type: NodeType,
    source: Option<Link>,
}

impl PowerNode {
    /// Returns the id of the entity represented by this node.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the type of the entity represented by this node.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }
}

/// A graph of the entities of a power network and the connections between
/// them.
///
/// The graph owns all its nodes.  Sink links are stored as the edges of the
/// underlying `DiGraph`, so every node has at most one outgoing edge, whose
/// weight is the position of the originating connection.  Source links are
/// stored on the nodes themselves.
pub struct PowerGraph<E>
where
    E: Edge,
{
    graph: DiGraph<PowerNode, usize>,
    node_indices: NodeIndexMap,
    connections: Vec<E>,
}
