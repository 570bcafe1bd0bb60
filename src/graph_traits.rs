// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the trait that needs to be implemented by the type
//! that represents a connection between two entities.

use crate::node_type::NodeType;

/**
This trait needs to be implemented by the type that represents a connection.

The graph only needs the identifiers and types of both endpoints, so any
connection record can be used to build a [`PowerGraph`][crate::PowerGraph].
Endpoints that are not populated are reported as empty ids or `None` types,
and connections with any missing endpoint field are skipped by the graph
builder.

<details>
<summary>Example implementation for a flat record type:</summary>

```ignore
impl power_connection_graph::Edge for MyConnectionRow {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn source_id(&self) -> &str {
        self.source_id.as_deref().unwrap_or_default()
    }

    fn source_type(&self) -> Option<NodeType> {
        self.source_type.as_deref().and_then(|t| t.parse().ok())
    }

    fn sink_id(&self) -> &str {
        self.sink_id.as_deref().unwrap_or_default()
    }

    fn sink_type(&self) -> Option<NodeType> {
        self.sink_type.as_deref().and_then(|t| t.parse().ok())
    }
}
```

</details>
*/
pub trait Edge {
    /// Returns the id of the connection.
    fn connection_id(&self) -> &str;
    /// Returns the id of the entity supplying energy.
    fn source_id(&self) -> &str;
    /// Returns the type of the entity supplying energy.
    fn source_type(&self) -> Option<NodeType>;
    /// Returns the id of the entity receiving energy.
    fn sink_id(&self) -> &str;
    /// Returns the type of the entity receiving energy.
    fn sink_type(&self) -> Option<NodeType>;
}
