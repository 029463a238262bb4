//! Whole-project call graph

pub mod builder;
pub mod nodes;

pub use builder::CallGraphBuilder;
pub use nodes::{CallEdge, CallGraphNode};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Unique identifier for a node in the call graph
pub type NodeId = NodeIndex;

/// Directed graph of function entities and the calls between them.
///
/// Nodes live in a petgraph arena and are addressed by their `file:name`
/// key through `node_index`; edges never own nodes, so recursive and
/// mutually recursive call chains are plain cycles in the arena.
///
/// Caller and callee lists are both read off the same edge set, which makes
/// them symmetric by construction. They are reported in edge insertion
/// order, so a graph rebuilt from the same files lists them identically.
///
/// Only [`CallGraphBuilder`] mutates a graph; once built it is read-only and
/// can be shared across threads for concurrent queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallGraph {
    /// The underlying directed graph; edges point from caller to callee
    graph: DiGraph<CallGraphNode, CallEdge>,

    /// Index for node lookup by `file:name` key
    node_index: HashMap<String, NodeId>,
}

impl CallGraph {
    /// Create a new empty call graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node that already has the same key.
    ///
    /// The replaced node keeps its arena slot and edges. Returns the node id
    /// and the replaced node, if any.
    pub(crate) fn insert_node(&mut self, node: CallGraphNode) -> (NodeId, Option<CallGraphNode>) {
        if let Some(&id) = self.node_index.get(node.key()) {
            let previous = std::mem::replace(&mut self.graph[id], node);
            return (id, Some(previous));
        }

        let key = node.key().to_string();
        let id = self.graph.add_node(node);
        self.node_index.insert(key, id);
        (id, None)
    }

    /// Add a caller -> callee edge unless one already exists.
    ///
    /// Returns `true` when a new edge was created.
    pub(crate) fn link(&mut self, caller: NodeId, callee: NodeId, line: usize) -> bool {
        if self.graph.find_edge(caller, callee).is_some() {
            return false;
        }
        self.graph.add_edge(caller, callee, CallEdge { line });
        true
    }

    /// Look up a node id by key
    pub fn index_of(&self, key: &str) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    /// Get a node by its key
    pub fn node(&self, key: &str) -> Option<&CallGraphNode> {
        self.index_of(key).and_then(|id| self.graph.node_weight(id))
    }

    /// Get a node by its arena id
    pub fn node_by_id(&self, id: NodeId) -> Option<&CallGraphNode> {
        self.graph.node_weight(id)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.node_index.contains_key(key)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of distinct call edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &CallGraphNode> {
        self.graph.node_indices().map(move |id| &self.graph[id])
    }

    /// All nodes defined in `file`, in insertion order
    pub fn nodes_in_file<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a CallGraphNode> {
        self.nodes().filter(move |node| node.file() == file)
    }

    /// All edges as `(caller, callee, edge)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &CallEdge)> {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].key(),
                self.graph[edge.target()].key(),
                edge.weight(),
            )
        })
    }

    /// Keys of the functions calling `key`, in discovery order
    pub fn callers(&self, key: &str) -> Vec<&str> {
        self.index_of(key)
            .map(|id| self.caller_ids(id))
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.graph[id].key())
            .collect()
    }

    /// Keys of the functions `key` calls, in discovery order
    pub fn callees(&self, key: &str) -> Vec<&str> {
        self.index_of(key)
            .map(|id| self.neighbors_ordered(id, Direction::Outgoing))
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.graph[id].key())
            .collect()
    }

    /// Caller node ids of `id`, in discovery order
    pub fn caller_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors_ordered(id, Direction::Incoming)
    }

    /// Petgraph walks adjacency lists newest-first; edge indices are handed
    /// out sequentially and never reused here, so sorting by them restores
    /// insertion order.
    fn neighbors_ordered(&self, id: NodeId, direction: Direction) -> Vec<NodeId> {
        let mut edges: Vec<(EdgeIndex, NodeId)> = self
            .graph
            .edges_directed(id, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge_id, _)| *edge_id);
        edges.into_iter().map(|(_, other)| other).collect()
    }
}
