use depscope_graph::DependencyGraph;
use depscope_protocol::{Scope, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ROOT_HEAVY_PERCENT: usize = 80;
const UNKNOWN_HEAVY_PERCENT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    pub count: usize,
    /// Share of all nodes, 0..=100 (0 for an empty graph)
    pub percentage: f64,
}

impl BucketShare {
    fn new(count: usize, total: usize) -> Self {
        Self {
            count,
            percentage: percentage(count, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    ScopeOptimization,
    Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeInsight {
    pub kind: InsightKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeAnalysis {
    pub total: usize,
    pub by_scope: BTreeMap<Scope, BucketShare>,
    pub by_type: BTreeMap<ServiceType, BucketShare>,
    pub insights: Vec<ScopeInsight>,
}

impl ScopeAnalysis {
    pub fn analyze(graph: &DependencyGraph) -> Self {
        let total = graph.node_count();
        let mut scopes: BTreeMap<Scope, usize> = Scope::ALL.iter().map(|s| (*s, 0)).collect();
        let mut types: BTreeMap<ServiceType, usize> =
            ServiceType::ALL.iter().map(|t| (*t, 0)).collect();

        for node in graph.nodes() {
            *scopes.entry(node.scope).or_insert(0) += 1;
            *types.entry(node.service_type).or_insert(0) += 1;
        }

        let mut insights = Vec::new();
        if exceeds_share(scopes[&Scope::Root], total, ROOT_HEAVY_PERCENT) {
            insights.push(ScopeInsight {
                kind: InsightKind::ScopeOptimization,
                message: "Scope optimization opportunity: over 80% of services are root-scoped; \
                          move feature-specific services to module or component scope"
                    .to_string(),
            });
        }
        if exceeds_share(scopes[&Scope::Unknown], total, UNKNOWN_HEAVY_PERCENT) {
            insights.push(ScopeInsight {
                kind: InsightKind::Visibility,
                message: "Visibility issue: over 30% of services have an unknown scope; \
                          deepen introspection to resolve provider scopes"
                    .to_string(),
            });
        }

        Self {
            total,
            by_scope: scopes
                .into_iter()
                .map(|(k, count)| (k, BucketShare::new(count, total)))
                .collect(),
            by_type: types
                .into_iter()
                .map(|(k, count)| (k, BucketShare::new(count, total)))
                .collect(),
            insights,
        }
    }

    pub fn count(&self, scope: Scope) -> usize {
        self.by_scope.get(&scope).map_or(0, |b| b.count)
    }

    /// Whether the root-scoped share is strictly above `percent`
    pub fn root_share_exceeds(&self, percent: usize) -> bool {
        exceeds_share(self.count(Scope::Root), self.total, percent)
    }
}

/// `count / total > percent / 100`, in integers. Always false when `total` is 0.
pub(crate) fn exceeds_share(count: usize, total: usize, percent: usize) -> bool {
    total > 0 && count * 100 > total * percent
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}
