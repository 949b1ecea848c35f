use crate::types::DependencyGraph;
use depscope_protocol::{Scope, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INTERNAL_EDGE_COLOR: &str = "#546e7a";
const EXTERNAL_EDGE_COLOR: &str = "#bdbdbd";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub size: usize,
    pub color: String,
    pub opacity: f64,
    pub cluster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub source: String,
    pub target: String,
    pub color: String,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub key: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub scope: Scope,
    pub members: Vec<String>,
}

/// Render-friendly projection of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub clusters: Vec<Cluster>,
}

pub fn node_size(dependency_count: usize) -> usize {
    (dependency_count * 3 + 10).max(10)
}

pub fn palette(service_type: ServiceType, scope: Scope) -> &'static str {
    match (service_type, scope) {
        (ServiceType::BuiltIn, Scope::Root) => "#1565c0",
        (ServiceType::BuiltIn, Scope::Module) => "#1e88e5",
        (ServiceType::BuiltIn, Scope::Component) => "#42a5f5",
        (ServiceType::BuiltIn, Scope::Unknown) => "#90caf9",
        (ServiceType::Custom, Scope::Root) => "#2e7d32",
        (ServiceType::Custom, Scope::Module) => "#43a047",
        (ServiceType::Custom, Scope::Component) => "#66bb6a",
        (ServiceType::Custom, Scope::Unknown) => "#a5d6a7",
        (ServiceType::Unknown, Scope::Root) => "#616161",
        (ServiceType::Unknown, Scope::Module) => "#757575",
        (ServiceType::Unknown, Scope::Component) => "#9e9e9e",
        (ServiceType::Unknown, Scope::Unknown) => "#bdbdbd",
    }
}

/// Percent reduction in coverage per scope tier
pub fn scope_fade(scope: Scope) -> u32 {
    match scope {
        Scope::Root => 0,
        Scope::Module => 20,
        Scope::Component => 40,
        Scope::Unknown => 60,
    }
}

fn cluster_key(service_type: ServiceType, scope: Scope) -> String {
    format!("{service_type}/{scope}")
}

impl DependencyGraph {
    /// Project the graph for rendering. Never feeds back into scoring.
    pub fn visualize(&self) -> Visualization {
        let mut clusters: BTreeMap<(ServiceType, Scope), Vec<String>> = BTreeMap::new();

        let nodes = self
            .nodes()
            .map(|node| {
                clusters
                    .entry((node.service_type, node.scope))
                    .or_default()
                    .push(node.id.clone());

                VisualNode {
                    id: node.id.clone(),
                    label: node.name.clone(),
                    size: node_size(node.dependency_count),
                    color: palette(node.service_type, node.scope).to_string(),
                    opacity: f64::from(100 - scope_fade(node.scope)) / 100.0,
                    cluster: cluster_key(node.service_type, node.scope),
                }
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|edge| VisualEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                color: if edge.external {
                    EXTERNAL_EDGE_COLOR
                } else {
                    INTERNAL_EDGE_COLOR
                }
                .to_string(),
                dashed: edge.external,
            })
            .collect();

        let clusters = clusters
            .into_iter()
            .map(|((service_type, scope), members)| Cluster {
                key: cluster_key(service_type, scope),
                service_type,
                scope,
                members,
            })
            .collect();

        Visualization {
            nodes,
            edges,
            clusters,
        }
    }
}
