use crate::architecture::ArchitectureReport;
use crate::performance::PerformanceAssessment;
use crate::providers::ProviderAnalysis;
use crate::recommendations::{Priority, Recommendation};
use crate::scope::ScopeAnalysis;
use depscope_discovery::{DiscoverySummary, EnvironmentSummary};
use depscope_graph::{CycleReport, GraphReport, Visualization};
use depscope_protocol::ErrorEnvelope;
use serde::{Deserialize, Serialize};

/// Everything derived from the discovered services. Deterministic for a
/// given input and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub graph: GraphReport,
    pub cycles: CycleReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<ProviderAnalysis>,
    pub scopes: ScopeAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
    pub architecture: ArchitectureReport,
    pub performance: PerformanceAssessment,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub duration_ms: u64,
    pub total_services: usize,
    pub total_dependencies: usize,
    pub external_dependencies: usize,
    pub cycles: usize,
    pub health_score: u32,
    pub performance_score: u32,
    pub recommendations: usize,
    pub critical_recommendations: usize,
}

impl AnalysisSummary {
    pub fn new(sections: &AnalysisSections, duration_ms: u64) -> Self {
        let metrics = &sections.graph.metrics;
        Self {
            duration_ms,
            total_services: metrics.total_nodes,
            total_dependencies: metrics.total_edges,
            external_dependencies: metrics.external_edges,
            cycles: sections.cycles.count,
            health_score: sections.architecture.health_score,
            performance_score: sections.performance.overall_score,
            recommendations: sections.recommendations.len(),
            critical_recommendations: sections
                .recommendations
                .iter()
                .filter(|r| r.priority == Priority::Critical)
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub environment: EnvironmentSummary,
    pub discovery: DiscoverySummary,
    #[serde(flatten)]
    pub sections: AnalysisSections,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub success: bool,
    pub error: ErrorEnvelope,
}

/// Either a full report or a compact failure, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Report(Box<AnalysisReport>),
    Failure(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn failure(error: ErrorEnvelope) -> Self {
        Self::Failure(AnalysisFailure {
            success: false,
            error,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Report(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Report(_) => None,
            Self::Failure(failure) => Some(&failure.error),
        }
    }
}
