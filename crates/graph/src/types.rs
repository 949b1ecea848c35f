use crate::error::{GraphError, Result};
use depscope_protocol::{DiscoveryMethod, Scope, ServiceType};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a dependency reaches its consumer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InjectionType {
    #[default]
    Constructor,
}

/// Node in the dependency graph: one per unique (name, type) identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceNode {
    /// Unique node id (the service name, suffixed on collision)
    pub id: String,

    /// Service name as discovered
    pub name: String,

    #[serde(rename = "type")]
    pub service_type: ServiceType,

    pub scope: Scope,

    /// Number of declared dependencies, internal and external
    pub dependency_count: usize,

    pub discovery_method: DiscoveryMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,
}

/// Edge in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Consumer node id
    pub source: String,

    /// Node id, or the unresolved dependency name when `external`
    pub target: String,

    pub injection_type: InjectionType,

    pub weight: u32,

    /// True iff `target` is not a node id
    pub external: bool,
}

/// Service dependency graph.
///
/// Nodes and internal edges live in a petgraph `DiGraph`; the edge weight is
/// the position of the edge in `edges`, which also holds external edges in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub(crate) graph: DiGraph<ServiceNode, usize>,

    /// Node id -> NodeIndex mapping for fast lookup
    pub(crate) node_index: HashMap<String, NodeIndex>,

    pub(crate) edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add node to graph; ids must be unique
    pub fn add_node(&mut self, node: ServiceNode) -> Result<NodeIndex> {
        if self.node_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(idx)
    }

    /// Add a dependency from `source` to `target`.
    ///
    /// The edge is internal when `target` names a node, external otherwise.
    pub fn add_dependency(&mut self, source: &str, target: &str) -> Result<&DependencyEdge> {
        let from = self
            .find_node(source)
            .ok_or_else(|| GraphError::NodeNotFound(source.to_string()))?;
        let to = self.find_node(target);

        let position = self.edges.len();
        self.edges.push(DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
            injection_type: InjectionType::Constructor,
            weight: 1,
            external: to.is_none(),
        });

        if let Some(to) = to {
            self.graph.add_edge(from, to, position);
        }

        Ok(&self.edges[position])
    }

    /// Find node by id
    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&ServiceNode> {
        self.graph.node_weight(idx)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &ServiceNode> {
        self.graph.node_weights()
    }

    /// Edges in declaration order, internal and external
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn external_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.external).count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
