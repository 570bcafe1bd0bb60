// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Power Connection Graph

This is a library for simulating a small power network of solar arrays,
batteries and loads, and the delivery of energy between them over
connections.

## The connection graph

Connections are directed: a *source* feeds a *sink*.  A [`PowerGraph`] is
built from any collection of connection records, which only need to
implement the [`Edge`] trait.  Each node in the graph has at most one source
and at most one sink, and when several connections share an endpoint, the
one that comes last wins.

The graph can be checked for cycles with
[`validate_acyclicity`][PowerGraph::validate_acyclicity], and visited in
*sinks-first* order with
[`visit_sinks_first`][PowerGraph::visit_sinks_first], in which a node is
only visited after the node it feeds.

## Energy transfer

Energy moves over a connection in token-gated steps, calculated by
[`calculate_transfer`].  Each step is credited with the energy the source
could deliver since the previous step, and hands out a new token that
authorizes the next one.  Tokens expire after
[`session_window_seconds`][GridConfig::session_window_seconds].

## Controllers

A [`PowerGrid`] ties together the [`Store`][store::Store]s holding the
records, an event log, and a [`Clock`], and hands out controllers for the
batteries, solar arrays, loads and connections.  Its
[`DeliveryController`] runs sweeps over the whole network with
[`deliver_all`][DeliveryController::deliver_all], or single steps over one
connection with [`take_power`][DeliveryController::take_power].

With the `api` feature, the `api` module exposes all of this over HTTP.
*/

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod config;
pub use config::{
    GridConfig, ServerConfig, DEFAULT_SESSION_WINDOW_SECONDS, DEFAULT_SWEEP_INTERVAL_SECONDS,
};

mod controller;
pub use controller::{
    BatteryController, ChargeResult, ConnectionController, DeliveryController, LoadController,
    PowerGrid, PowerStats, SetActivePowerResult, SolarArrayController, Stores, TakePowerResult,
};

mod error;
pub use error::{Error, ErrorKind};

mod graph;
pub use graph::{iterators, ExportedNode, PowerGraph, PowerNode};

mod graph_traits;
pub use graph_traits::Edge;

mod node_type;
pub use node_type::NodeType;

mod records;
pub use records::{Battery, Connection, Load, SolarArray, TransferSession};

pub mod store;

mod transfer;
pub use transfer::{calculate_transfer, EnergyTransfer, TransferCapacity, TransferNote};

#[cfg(feature = "api")]
pub mod api;
