// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Creation of connections, and access to the graph they form.

use crate::{Connection, Error, ExportedNode, NodeType, PowerGraph, TransferSession};

use super::{log_event, Stores};

/// Controls the connections between solar arrays, batteries and loads.
#[derive(Clone)]
pub struct ConnectionController {
    stores: Stores,
}

impl ConnectionController {
    pub(crate) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Creates a new connection through which `source_id` feeds `sink_id`.
    ///
    /// Returns an error if an endpoint doesn't exist, or if both endpoints
    /// are the same entity.
    pub fn new_connection(
        &self,
        source_type: NodeType,
        source_id: &str,
        sink_type: NodeType,
        sink_id: &str,
    ) -> Result<Connection, Error> {
        if source_id == sink_id {
            return Err(Error::invalid_connection(format!(
                "Connection:({source_id}, {sink_id}) Can't connect an entity to itself."
            )));
        }
        for (node_type, id) in [(source_type, source_id), (sink_type, sink_id)] {
            if !self.entity_exists(node_type, id)? {
                return Err(Error::invalid_connection(format!(
                    "Connection:({source_id}, {sink_id}) Can't find a {node_type} with ID {id}"
                )));
            }
        }

        let connections = &self.stores.connections;
        let id = connections.create()?;
        connections.update(&id, &|c| {
            c.id = id.clone();
            c.source_id = source_id.to_string();
            c.source_type = Some(source_type);
            c.sink_id = sink_id.to_string();
            c.sink_type = Some(sink_type);
        })?;
        log_event(
            &*self.stores.event_log,
            format!(
                "CREATED new connection with ID {id} with source {source_type} {source_id} \
                 and sink {sink_type} {sink_id}"
            ),
        );
        self.connection(&id)
    }

    /// Returns the connection with the given `id`.
    pub fn connection(&self, id: &str) -> Result<Connection, Error> {
        self.stores.connections.read(id)?.ok_or_else(|| {
            Error::connection_not_found(format!("Connection with id {id} not found."))
        })
    }

    /// Replaces the transfer session stored on the connection.
    pub fn update_session(&self, id: &str, session: &TransferSession) -> Result<(), Error> {
        self.connection(id)?;
        self.stores
            .connections
            .update(id, &|c| c.transfer_session = Some(session.clone()))
    }

    /// Builds a graph from all connections in the store.
    pub fn graph(&self) -> Result<PowerGraph<Connection>, Error> {
        Ok(PowerGraph::new(self.stores.connections.read_all()?))
    }

    /// Returns all entities that are part of a connection, in sinks-first
    /// order.
    pub fn export_graph(&self) -> Result<Vec<ExportedNode>, Error> {
        self.graph()?.export()
    }

    fn entity_exists(&self, node_type: NodeType, id: &str) -> Result<bool, Error> {
        Ok(match node_type {
            NodeType::Battery => self.stores.batteries.read(id)?.is_some(),
            NodeType::Solar => self.stores.solar_arrays.read(id)?.is_some(),
            NodeType::Load => self.stores.loads.read(id)?.is_some(),
        })
    }
}
