use crate::graph::Hub;
use crate::types::{DependencyEdge, DependencyGraph, InjectionType, ServiceNode};
use depscope_protocol::{Scope, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate metrics, always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub external_edges: usize,
    pub average_dependencies: f64,
    pub max_depth: usize,
    /// True when `max_depth` is the component-level upper bound
    pub max_depth_estimated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyBucket {
    /// No dependencies
    None,
    /// 1-2
    Low,
    /// 3-5
    Medium,
    /// More than 5
    High,
}

impl DependencyBucket {
    pub const ALL: [DependencyBucket; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    pub fn for_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTier {
    Light,
    Moderate,
    Heavy,
}

impl WeightTier {
    pub const ALL: [WeightTier; 3] = [Self::Light, Self::Moderate, Self::Heavy];

    pub fn for_weight(weight: u32) -> Self {
        match weight {
            0..=1 => Self::Light,
            2..=3 => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub level: ComplexityLevel,
    pub maintainability: u32,
}

impl Complexity {
    /// Fixed breakpoints on node and edge counts
    pub fn classify(nodes: usize, edges: usize) -> Self {
        let (level, maintainability) = if nodes <= 10 && edges <= 15 {
            (ComplexityLevel::Low, 90)
        } else if nodes <= 25 && edges <= 40 {
            (ComplexityLevel::Medium, 70)
        } else {
            (ComplexityLevel::High, 50)
        };
        Self {
            level,
            maintainability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDistribution {
    pub by_type: BTreeMap<ServiceType, usize>,
    pub by_scope: BTreeMap<Scope, usize>,
    pub by_dependency_count: BTreeMap<DependencyBucket, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDistribution {
    pub by_injection_type: BTreeMap<InjectionType, usize>,
    pub by_weight: BTreeMap<WeightTier, usize>,
    pub internal: usize,
    pub external: usize,
    /// external / total, 0 when there are no edges
    pub external_ratio: f64,
}

/// Distribution + complexity sub-report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedMetrics {
    pub node_distribution: NodeDistribution,
    pub edge_distribution: EdgeDistribution,
    pub density: f64,
    pub complexity: Complexity,
    pub hubs: Vec<Hub>,
}

/// Serializable view of the graph for the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphReport {
    pub nodes: Vec<ServiceNode>,
    pub edges: Vec<DependencyEdge>,
    pub metrics: GraphMetrics,
    pub detailed: Option<DetailedMetrics>,
}

/// edges / (n * (n - 1)); 0 when n <= 1
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes <= 1 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let possible = (nodes * (nodes - 1)) as f64;
    #[allow(clippy::cast_precision_loss)]
    let ratio = edges as f64 / possible;
    ratio
}

impl DependencyGraph {
    pub fn metrics(&self) -> GraphMetrics {
        let depth = self.max_depth();
        GraphMetrics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            external_edges: self.external_edge_count(),
            average_dependencies: self.average_dependencies(),
            max_depth: depth.depth,
            max_depth_estimated: depth.estimated,
        }
    }

    pub fn detailed_metrics(&self) -> DetailedMetrics {
        DetailedMetrics {
            node_distribution: self.node_distribution(),
            edge_distribution: self.edge_distribution(),
            density: density(self.node_count(), self.edge_count()),
            complexity: Complexity::classify(self.node_count(), self.edge_count()),
            hubs: self.hubs(),
        }
    }

    pub fn report(&self, detailed: bool) -> GraphReport {
        GraphReport {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges.clone(),
            metrics: self.metrics(),
            detailed: detailed.then(|| self.detailed_metrics()),
        }
    }

    fn node_distribution(&self) -> NodeDistribution {
        let mut by_type: BTreeMap<_, _> = ServiceType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_scope: BTreeMap<_, _> = Scope::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_dependency_count: BTreeMap<_, _> =
            DependencyBucket::ALL.iter().map(|b| (*b, 0)).collect();

        for node in self.nodes() {
            *by_type.entry(node.service_type).or_insert(0) += 1;
            *by_scope.entry(node.scope).or_insert(0) += 1;
            *by_dependency_count
                .entry(DependencyBucket::for_count(node.dependency_count))
                .or_insert(0) += 1;
        }

        NodeDistribution {
            by_type,
            by_scope,
            by_dependency_count,
        }
    }

    fn edge_distribution(&self) -> EdgeDistribution {
        let mut by_injection_type = BTreeMap::new();
        let mut by_weight: BTreeMap<_, _> = WeightTier::ALL.iter().map(|w| (*w, 0)).collect();

        for edge in &self.edges {
            *by_injection_type.entry(edge.injection_type).or_insert(0) += 1;
            *by_weight
                .entry(WeightTier::for_weight(edge.weight))
                .or_insert(0) += 1;
        }

        let external = self.external_edge_count();
        let total = self.edge_count();
        #[allow(clippy::cast_precision_loss)]
        let external_ratio = if total == 0 {
            0.0
        } else {
            external as f64 / total as f64
        };

        EdgeDistribution {
            by_injection_type,
            by_weight,
            internal: total - external,
            external,
            external_ratio,
        }
    }
}
