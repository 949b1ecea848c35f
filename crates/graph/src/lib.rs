//! # depscope graph
//!
//! Service dependency graph: construction, structural metrics, cycle
//! detection and a render-friendly projection.
//!
//! ## Architecture
//!
//! ```text
//! ServiceRecord[]
//!     │
//!     ├──> Graph Builder
//!     │      ├─ One node per record (id = name)
//!     │      └─ Edge per declared dependency (internal | external)
//!     │
//!     ├──> Dependency Graph (petgraph)
//!     │      ├─ Aggregate metrics (counts, average, max depth)
//!     │      └─ Detailed metrics (distributions, density, complexity)
//!     │
//!     ├──> Cycle Detector (explicit-stack DFS)
//!     │
//!     └──> Visualization (nodes, edges, clusters)
//! ```

mod builder;
mod cycles;
mod error;
mod graph;
mod metrics;
mod types;
mod visualization;

pub use builder::GraphBuilder;
pub use cycles::{CycleDetector, CycleReport, CycleSeverity};
pub use error::{GraphError, Result};
pub use graph::{ChainDepth, Hub};
pub use metrics::{
    density, Complexity, ComplexityLevel, DependencyBucket, DetailedMetrics, EdgeDistribution,
    GraphMetrics, GraphReport, NodeDistribution, WeightTier,
};
pub use types::{DependencyEdge, DependencyGraph, InjectionType, ServiceNode};
pub use visualization::{Cluster, VisualEdge, VisualNode, Visualization};
