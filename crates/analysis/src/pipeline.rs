use crate::architecture::ArchitectureReport;
use crate::error::{AnalysisError, Result};
use crate::performance::PerformanceAssessment;
use crate::providers::ProviderAnalysis;
use crate::recommendations::{generate_recommendations, RecommendationInput};
use crate::report::{AnalysisOutcome, AnalysisReport, AnalysisSections, AnalysisSummary};
use crate::scope::ScopeAnalysis;
use depscope_discovery::{deduplicate, EnvironmentDetector, RuntimeHandle, ServiceDiscovery};
use depscope_graph::{CycleDetector, GraphBuilder};
use depscope_protocol::{AnalysisOptions, ServiceRecord};
use std::time::Instant;

/// Runs detection, discovery and every analysis stage for one invocation
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Never fails: any error becomes the compact failure shape
    pub async fn run(&self, runtime: &dyn RuntimeHandle) -> AnalysisOutcome {
        match self.execute(runtime).await {
            Ok(report) => AnalysisOutcome::Report(Box::new(report)),
            Err(err) => {
                log::error!("Analysis failed: {err}");
                AnalysisOutcome::failure(err.envelope())
            }
        }
    }

    async fn execute(&self, runtime: &dyn RuntimeHandle) -> Result<AnalysisReport> {
        let started = Instant::now();
        self.options.validate().map_err(AnalysisError::InvalidOptions)?;

        let environment = EnvironmentDetector::new(self.options.framework.clone())
            .detect(runtime)
            .await?;

        let discovery = ServiceDiscovery::with_default_strategies(self.options.max_services)
            .discover(runtime)
            .await?;

        let sections = analyze_services(&discovery.services, &self.options)?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let summary = AnalysisSummary::new(&sections, duration_ms);

        log::info!(
            "Analysis finished in {}ms: {} services, {} cycles, health {}, performance {}",
            summary.duration_ms,
            summary.total_services,
            summary.cycles,
            summary.health_score,
            summary.performance_score
        );

        Ok(AnalysisReport {
            success: true,
            environment,
            discovery: discovery.summary(),
            sections,
            summary,
        })
    }
}

/// Graph build through recommendations over already-discovered records.
///
/// Records are deduplicated by (name, type) and capped at
/// `options.max_services` first, so direct callers get the same node set
/// discovery would have produced.
pub fn analyze_services(
    records: &[ServiceRecord],
    options: &AnalysisOptions,
) -> Result<AnalysisSections> {
    let mut records = deduplicate(records.to_vec());
    records.truncate(options.max_services);

    let graph = GraphBuilder::new().build(&records)?;
    let cycles = CycleDetector::new().detect(&graph);
    let scopes = ScopeAnalysis::analyze(&graph);
    let providers = options
        .analyze_providers
        .then(|| ProviderAnalysis::analyze(&graph));

    let metrics = graph.metrics();
    let architecture = ArchitectureReport::score(&metrics, &cycles);
    let performance = PerformanceAssessment::assess(&scopes, &metrics, &cycles);
    let recommendations = generate_recommendations(RecommendationInput {
        cycles: &cycles,
        architecture: &architecture,
        performance: &performance,
        service_count: graph.node_count(),
    });
    let visualization = options.generate_visualization.then(|| graph.visualize());

    Ok(AnalysisSections {
        graph: graph.report(options.include_detailed_analysis),
        cycles,
        providers,
        scopes,
        visualization,
        architecture,
        performance,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use depscope_graph::CycleSeverity;
    use depscope_protocol::{DiscoveryMethod, Scope, ServiceType};
    use pretty_assertions::assert_eq;

    fn service(name: &str, deps: &[&str]) -> ServiceRecord {
        ServiceRecord::new(name, ServiceType::Custom, Scope::Root, DiscoveryMethod::Introspection)
            .with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_mutual_dependency() {
        let records = [service("A", &["B"]), service("B", &["A"])];
        let sections = analyze_services(&records, &AnalysisOptions::default()).unwrap();

        assert_eq!(sections.graph.metrics.total_nodes, 2);
        assert_eq!(sections.graph.metrics.total_edges, 2);
        assert!(sections.graph.edges.iter().all(|e| !e.external));
        assert_eq!(sections.cycles.count, 1);
        assert_eq!(sections.cycles.severity, CycleSeverity::Low);
        assert_eq!(sections.cycles.affected_services, vec!["A", "B"]);
        assert_eq!(sections.architecture.health_score, 85);
    }

    #[test]
    fn test_empty_input() {
        let sections = analyze_services(&[], &AnalysisOptions::default()).unwrap();

        assert_eq!(sections.graph.metrics.total_nodes, 0);
        assert_eq!(sections.graph.metrics.total_edges, 0);
        assert_eq!(sections.cycles.count, 0);
        assert_eq!(sections.architecture.health_score, 80);
        assert!(sections.recommendations.iter().any(|r| r.category == "discovery"));
    }

    #[test]
    fn test_optional_sections_follow_options() {
        let records = [service("A", &["HttpClient"])];

        let full = analyze_services(&records, &AnalysisOptions::default()).unwrap();
        assert!(full.providers.is_some());
        assert!(full.visualization.is_some());
        assert!(full.graph.detailed.is_some());

        let minimal = analyze_services(&records, &AnalysisOptions::minimal()).unwrap();
        assert!(minimal.providers.is_none());
        assert!(minimal.visualization.is_none());
        assert!(minimal.graph.detailed.is_none());
    }

    #[test]
    fn test_records_capped_and_deduplicated() {
        let records = [
            service("A", &[]),
            service("A", &[]),
            service("B", &[]),
            service("C", &[]),
        ];
        let options = AnalysisOptions {
            max_services: 2,
            ..AnalysisOptions::default()
        };

        let sections = analyze_services(&records, &options).unwrap();
        let ids: Vec<&str> = sections.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
