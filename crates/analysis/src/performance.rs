use crate::scope::ScopeAnalysis;
use depscope_graph::{CycleReport, GraphMetrics};
use serde::{Deserialize, Serialize};

const ROOT_HEAVY_PERCENT: usize = 80;
const ROOT_MAJORITY_PERCENT: usize = 50;
const EDGE_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    Low,
    Medium,
    High,
}

/// One deduction from the performance score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactFactor {
    pub factor: String,
    pub penalty: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub area: String,
    pub description: String,
    pub estimated_benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceAssessment {
    pub overall_score: u32,
    pub impact_factors: Vec<ImpactFactor>,
    pub memory_impact: ImpactTier,
    pub startup_impact: ImpactTier,
    pub optimization_opportunities: Vec<Opportunity>,
}

impl PerformanceAssessment {
    pub fn assess(scopes: &ScopeAnalysis, metrics: &GraphMetrics, cycles: &CycleReport) -> Self {
        let mut factors = Vec::new();
        let mut opportunities = Vec::new();

        let memory_impact = if scopes.root_share_exceeds(ROOT_HEAVY_PERCENT) {
            factors.push(factor(
                "root_scope_concentration",
                15,
                "More than 80% of services are root singletons kept alive for the whole session",
            ));
            opportunities.push(opportunity(
                "scope",
                "Provide feature services in lazy-loaded modules or components",
                "Significant memory reduction",
            ));
            ImpactTier::High
        } else if scopes.root_share_exceeds(ROOT_MAJORITY_PERCENT) {
            factors.push(factor(
                "root_scope_majority",
                5,
                "More than half of the services are root singletons",
            ));
            opportunities.push(opportunity(
                "scope",
                "Review root-provided services that are used by a single feature",
                "Moderate memory reduction",
            ));
            ImpactTier::Medium
        } else {
            ImpactTier::Low
        };

        let startup_impact = if metrics.total_edges > EDGE_LIMIT {
            factors.push(factor(
                "dependency_volume",
                10,
                "More than 20 injections must be resolved while bootstrapping",
            ));
            opportunities.push(opportunity(
                "startup",
                "Defer rarely used dependencies with lazy injection or dynamic imports",
                "Faster application startup",
            ));
            ImpactTier::Medium
        } else {
            ImpactTier::Low
        };

        if cycles.count > 0 {
            let penalty = u32::try_from(cycles.count.saturating_mul(10)).unwrap_or(u32::MAX);
            factors.push(factor(
                "circular_dependencies",
                penalty,
                "Each cycle forces eager instantiation of every service on it",
            ));
            opportunities.push(opportunity(
                "cycles",
                "Break circular dependencies so services can be created on demand",
                "Lower instantiation cost and clearer initialization order",
            ));
        }

        let deducted = factors
            .iter()
            .fold(0i64, |acc, f| acc.saturating_add(i64::from(f.penalty)));
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let overall_score = (100i64.saturating_sub(deducted)).clamp(0, 100) as u32;

        Self {
            overall_score,
            impact_factors: factors,
            memory_impact,
            startup_impact,
            optimization_opportunities: opportunities,
        }
    }
}

fn factor(name: &str, penalty: u32, description: &str) -> ImpactFactor {
    ImpactFactor {
        factor: name.to_string(),
        penalty,
        description: description.to_string(),
    }
}

fn opportunity(area: &str, description: &str, benefit: &str) -> Opportunity {
    Opportunity {
        area: area.to_string(),
        description: description.to_string(),
        estimated_benefit: benefit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depscope_graph::{CycleSeverity, DependencyGraph, GraphBuilder};
    use depscope_protocol::{DiscoveryMethod, Scope, ServiceRecord, ServiceType};
    use pretty_assertions::assert_eq;

    fn graph(root: usize, module: usize) -> DependencyGraph {
        let records: Vec<ServiceRecord> = (0..root + module)
            .map(|i| {
                let scope = if i < root { Scope::Root } else { Scope::Module };
                ServiceRecord::new(
                    format!("S{i}"),
                    ServiceType::Custom,
                    scope,
                    DiscoveryMethod::Introspection,
                )
            })
            .collect();
        GraphBuilder::new().build(&records).unwrap()
    }

    fn cycles(count: usize) -> CycleReport {
        CycleReport {
            has_cycles: count > 0,
            count,
            severity: CycleSeverity::from_count(count),
            cycles: Vec::new(),
            affected_services: Vec::new(),
            self_references: Vec::new(),
            strongly_connected: Vec::new(),
        }
    }

    fn metrics_with_edges(graph: &DependencyGraph, edges: usize) -> GraphMetrics {
        GraphMetrics {
            total_edges: edges,
            ..graph.metrics()
        }
    }

    #[test]
    fn test_balanced_graph_scores_full() {
        let g = graph(1, 3);
        let scopes = ScopeAnalysis::analyze(&g);
        let assessment = PerformanceAssessment::assess(&scopes, &g.metrics(), &cycles(0));

        assert_eq!(assessment.overall_score, 100);
        assert_eq!(assessment.memory_impact, ImpactTier::Low);
        assert_eq!(assessment.startup_impact, ImpactTier::Low);
        assert!(assessment.impact_factors.is_empty());
        assert!(assessment.optimization_opportunities.is_empty());
    }

    #[test]
    fn test_root_tiers() {
        let g = graph(3, 2);
        let medium =
            PerformanceAssessment::assess(&ScopeAnalysis::analyze(&g), &g.metrics(), &cycles(0));
        assert_eq!(medium.overall_score, 95);
        assert_eq!(medium.memory_impact, ImpactTier::Medium);

        let g = graph(5, 0);
        let high =
            PerformanceAssessment::assess(&ScopeAnalysis::analyze(&g), &g.metrics(), &cycles(0));
        assert_eq!(high.overall_score, 85);
        assert_eq!(high.memory_impact, ImpactTier::High);
        assert_eq!(high.impact_factors.len(), 1);
    }

    #[test]
    fn test_edges_and_cycles_stack() {
        let g = graph(1, 3);
        let scopes = ScopeAnalysis::analyze(&g);
        let assessment =
            PerformanceAssessment::assess(&scopes, &metrics_with_edges(&g, 21), &cycles(2));

        assert_eq!(assessment.overall_score, 70);
        assert_eq!(assessment.startup_impact, ImpactTier::Medium);
        assert_eq!(assessment.impact_factors[1].penalty, 20);
        assert_eq!(assessment.optimization_opportunities.len(), 2);
        let deducted: u32 = assessment.impact_factors.iter().map(|f| f.penalty).sum();
        assert_eq!(deducted, 30);
    }

    #[test]
    fn test_score_clamps() {
        let g = graph(5, 0);
        let scopes = ScopeAnalysis::analyze(&g);
        let assessment =
            PerformanceAssessment::assess(&scopes, &metrics_with_edges(&g, 100), &cycles(50));
        assert_eq!(assessment.overall_score, 0);
    }
}
