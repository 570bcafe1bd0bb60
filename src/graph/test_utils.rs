// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains the
//! `TestConnection` type, which implements the `Edge` trait and is shared by
//! all tests of the `graph` module.

use crate::{Edge, NodeType};

#[derive(Clone, Debug, PartialEq)]
pub(super) struct TestConnection {
    id: String,
    source: (String, Option<NodeType>),
    sink: (String, Option<NodeType>),
}

impl TestConnection {
    pub(super) fn new(
        id: &str,
        source_id: &str,
        source_type: NodeType,
        sink_id: &str,
        sink_type: NodeType,
    ) -> Self {
        TestConnection {
            id: id.to_string(),
            source: (source_id.to_string(), Some(source_type)),
            sink: (sink_id.to_string(), Some(sink_type)),
        }
    }

    /// Creates a connection whose endpoints have no type.
    pub(super) fn untyped(id: &str, source_id: &str, sink_id: &str) -> Self {
        TestConnection {
            id: id.to_string(),
            source: (source_id.to_string(), None),
            sink: (sink_id.to_string(), None),
        }
    }
}

impl Edge for TestConnection {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn source_id(&self) -> &str {
        &self.source.0
    }

    fn source_type(&self) -> Option<NodeType> {
        self.source.1
    }

    fn sink_id(&self) -> &str {
        &self.sink.0
    }

    fn sink_type(&self) -> Option<NodeType> {
        self.sink.1
    }
}
