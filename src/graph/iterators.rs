// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over nodes and connections in a `PowerGraph`.

use crate::{Edge, PowerNode};

/// An iterator over the nodes in a `PowerGraph`.
pub struct Nodes<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<PowerNode>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a PowerNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the connections in a `PowerGraph`.
pub struct Connections<'a, E>
where
    E: Edge,
{
    pub(crate) iter: std::slice::Iter<'a, E>,
}

impl<'a, E> Iterator for Connections<'a, E>
where
    E: Edge,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
