// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for checking that a [`PowerGraph`] is free of cycles.
//!
//! Every connection is recorded on both of its endpoints, so a cycle along
//! the sink links is also a cycle along the source links.  Checking the
//! sink direction is enough.

use petgraph::graph::NodeIndex;

use crate::{Edge, Error, PowerGraph};

impl<E> PowerGraph<E>
where
    E: Edge,
{
    /// Returns true if following sink links from any node leads back to a
    /// node that was already passed.
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Validates that there are no cycles in the graph.
    ///
    /// If a cycle is detected, an error is returned, that lists the nodes in
    /// the cycle.
    pub fn validate_acyclicity(&self) -> Result<(), Error> {
        let Some(cycle) = self.find_cycle() else {
            return Ok(());
        };
        Err(Error::invalid_graph(format!(
            "Cycle detected: {}",
            cycle
                .iter()
                .map(|i| self.graph[*i].id.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        )))
    }

    /// Walks the sink chain of every node, and returns the first cycle
    /// found, with its first node repeated at the end.
    fn find_cycle(&self) -> Option<Vec<NodeIndex>> {
        for start in self.graph.node_indices() {
            let mut chain = vec![];
            let mut current = Some(start);
            while let Some(index) = current {
                if let Some(first_occurance) = chain.iter().position(|i| *i == index) {
                    let mut cycle = chain.split_off(first_occurance);
                    cycle.push(index);
                    return Some(cycle);
                }
                chain.push(index);
                current = self.sink_link(index).map(|l| l.node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::TestConnection;
    use crate::NodeType;

    fn dag() -> Vec<TestConnection> {
        vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "b1", NodeType::Battery, "l1", NodeType::Load),
            TestConnection::new("c3", "s2", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c4", "b2", NodeType::Battery, "l1", NodeType::Load),
        ]
    }

    #[test]
    fn test_dag_has_no_cycle() {
        let graph = PowerGraph::new(dag());
        assert!(!graph.has_cycle());
        assert_eq!(graph.validate_acyclicity(), Ok(()));

        let empty = PowerGraph::<TestConnection>::new(vec![]);
        assert!(!empty.has_cycle());
    }

    #[test]
    fn test_acyclicity_validation() {
        let mut connections = dag();

        connections.push(TestConnection::new(
            "c5",
            "l1",
            NodeType::Load,
            "b1",
            NodeType::Battery,
        ));
        let graph = PowerGraph::new(connections.clone());
        assert!(graph.has_cycle());
        assert_eq!(
            graph.validate_acyclicity(),
            Err(Error::invalid_graph("Cycle detected: b1 -> l1 -> b1"))
        );

        connections.pop();
        connections.push(TestConnection::new(
            "c5",
            "l1",
            NodeType::Load,
            "s1",
            NodeType::Solar,
        ));
        let graph = PowerGraph::new(connections.clone());
        assert_eq!(
            graph.validate_acyclicity(),
            Err(Error::invalid_graph("Cycle detected: s1 -> b1 -> l1 -> s1"))
        );

        connections.pop();
        assert!(!PowerGraph::new(connections).has_cycle());
    }

    #[test]
    fn test_two_node_loop() {
        let graph = PowerGraph::new(vec![
            TestConnection::new("c1", "a", NodeType::Battery, "b", NodeType::Battery),
            TestConnection::new("c2", "b", NodeType::Battery, "a", NodeType::Battery),
        ]);
        assert!(graph.has_cycle());
        assert_eq!(
            graph.validate_acyclicity(),
            Err(Error::invalid_graph("Cycle detected: a -> b -> a"))
        );
    }

    #[test]
    fn test_self_loop() {
        let graph = PowerGraph::new(vec![TestConnection::new(
            "c1",
            "a",
            NodeType::Battery,
            "a",
            NodeType::Battery,
        )]);
        assert!(graph.has_cycle());
        assert_eq!(
            graph.validate_acyclicity(),
            Err(Error::invalid_graph("Cycle detected: a -> a"))
        );
    }

    #[test]
    fn test_matches_petgraph_cycle_check() {
        // Sink links are the only edges of the underlying graph, so the
        // chain walk agrees with a general purpose cycle check.
        let mut connections = dag();
        let graph = PowerGraph::new(connections.clone());
        assert_eq!(
            graph.has_cycle(),
            petgraph::algo::is_cyclic_directed(&graph.graph)
        );

        connections.push(TestConnection::new(
            "c5",
            "l1",
            NodeType::Load,
            "s2",
            NodeType::Solar,
        ));
        let graph = PowerGraph::new(connections);
        assert!(graph.has_cycle());
        assert!(petgraph::algo::is_cyclic_directed(&graph.graph));
    }
}
