// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `NodeType` enum, which represents the kind of
//! entity at either end of a connection.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Represents the kind of an entity in the power network.
///
/// The string representation (`"BATTERY"`, `"SOLAR"`, `"LOAD"`) is the one
/// stored on connection records and exposed by the graph export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Battery,
    Solar,
    Load,
}

impl NodeType {
    pub fn is_battery(&self) -> bool {
        *self == NodeType::Battery
    }

    pub fn is_solar(&self) -> bool {
        *self == NodeType::Solar
    }

    pub fn is_load(&self) -> bool {
        *self == NodeType::Load
    }

    /// Returns the wire name of the node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Battery => "BATTERY",
            NodeType::Solar => "SOLAR",
            NodeType::Load => "LOAD",
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BATTERY" => Ok(NodeType::Battery),
            "SOLAR" => Ok(NodeType::Solar),
            "LOAD" => Ok(NodeType::Load),
            _ => Err(Error::invalid_parameter(format!(
                "Unknown node type: {s}. Expected one of BATTERY, SOLAR, LOAD."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for ty in [NodeType::Battery, NodeType::Solar, NodeType::Load] {
            assert_eq!(ty.to_string().parse::<NodeType>(), Ok(ty));
        }
        assert_eq!(
            "battery".parse::<NodeType>(),
            Err(Error::invalid_parameter(
                "Unknown node type: battery. Expected one of BATTERY, SOLAR, LOAD."
            ))
        );
    }

    #[test]
    fn test_predicates() {
        assert!(NodeType::Battery.is_battery());
        assert!(!NodeType::Battery.is_load());
        assert!(NodeType::Solar.is_solar());
        assert!(NodeType::Load.is_load());
    }
}
