// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the sinks-first traversal of a [`PowerGraph`].

use std::collections::{HashSet, VecDeque};

use crate::{Edge, PowerGraph, PowerNode};

/// Traversal methods.
impl<E> PowerGraph<E>
where
    E: Edge,
{
    /// Calls `visit` once for every node, visiting each node only after its
    /// sink has been visited.
    ///
    /// Returns true if all visits returned true.  A visit that returns false
    /// doesn't stop the traversal of the remaining nodes.
    ///
    /// If the graph has a cycle, no node is visited and false is returned.
    pub fn visit_sinks_first<'a>(
        &'a self,
        mut visit: impl FnMut(&'a PowerNode) -> bool,
    ) -> bool {
        if let Err(err) = self.validate_acyclicity() {
            tracing::error!("Found unexpected cycle in graph. {err}");
            return false;
        }

        let mut visited = HashSet::new();
        let mut queue: VecDeque<_> = self.graph.node_indices().collect();
        let mut all_success = true;

        // Every deferred node waits on a sink that is further down an
        // acyclic chain, so the queue always drains.
        while let Some(index) = queue.pop_front() {
            if visited.contains(&index) {
                continue;
            }
            if let Some(sink) = self.sink_link(index) {
                if !visited.contains(&sink.node) {
                    queue.push_back(index);
                    continue;
                }
            }
            visited.insert(index);
            let success = visit(&self.graph[index]);
            all_success = all_success && success;
        }

        all_success
    }

    /// Returns the nodes of the graph in sinks-first order.
    ///
    /// Returns an empty list if the graph has a cycle.
    pub fn sinks_first_order(&self) -> Vec<&PowerNode> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        self.visit_sinks_first(|node| {
            order.push(node);
            true
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::TestConnection;
    use crate::NodeType;

    fn position(order: &[&str], id: &str) -> usize {
        order.iter().position(|x| *x == id).unwrap()
    }

    #[test]
    fn test_chain_visits_sinks_first() {
        let graph = PowerGraph::new(vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "b1", NodeType::Battery, "l1", NodeType::Load),
        ]);

        let mut order = vec![];
        let all_success = graph.visit_sinks_first(|node| {
            order.push(node.id().to_string());
            true
        });

        assert!(all_success);
        assert_eq!(order, ["l1", "b1", "s1"]);
    }

    #[test]
    fn test_every_node_after_its_sink() {
        let graph = PowerGraph::new(vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "s2", NodeType::Solar, "b2", NodeType::Battery),
            TestConnection::new("c3", "b2", NodeType::Battery, "l2", NodeType::Load),
            TestConnection::new("c4", "b1", NodeType::Battery, "l1", NodeType::Load),
            TestConnection::new("c5", "s3", NodeType::Solar, "b1", NodeType::Battery),
        ]);

        let order = graph
            .sinks_first_order()
            .into_iter()
            .map(|n| n.id())
            .collect::<Vec<_>>();
        assert_eq!(order.len(), 7);

        for node in graph.nodes() {
            if let Some(sink) = graph.sink(node.id()).unwrap() {
                assert!(
                    position(&order, sink.id()) < position(&order, node.id()),
                    "{} visited before its sink {}: {:?}",
                    node.id(),
                    sink.id(),
                    order
                );
            }
        }
    }

    #[test]
    fn test_failed_visits_dont_stop_traversal() {
        let graph = PowerGraph::new(vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "b1", NodeType::Battery, "l1", NodeType::Load),
        ]);

        let mut visits = 0;
        let all_success = graph.visit_sinks_first(|node| {
            visits += 1;
            !node.node_type().is_battery()
        });

        assert!(!all_success);
        assert_eq!(visits, 3);
    }

    #[test]
    fn test_cycle_aborts_traversal() {
        let graph = PowerGraph::new(vec![
            TestConnection::new("c1", "s1", NodeType::Solar, "b1", NodeType::Battery),
            TestConnection::new("c2", "b1", NodeType::Battery, "l1", NodeType::Load),
            TestConnection::new("c3", "l1", NodeType::Load, "b1", NodeType::Battery),
        ]);

        let mut visits = 0;
        let all_success = graph.visit_sinks_first(|_| {
            visits += 1;
            true
        });

        assert!(!all_success);
        assert_eq!(visits, 0);
        assert!(graph.sinks_first_order().is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let graph = PowerGraph::<TestConnection>::new(vec![]);
        assert!(graph.visit_sinks_first(|_| false));
    }
}
