//! Architecture health scoring.
//!
//! Starts at 100 and subtracts:
//! - 15 per detected cycle
//! - 5 per whole unit by which the average dependency count exceeds 5
//! - 20 when fewer than 3 services were found and none of them has an
//!   internal dependency (discovery most likely saw too little)
//!
//! The result is clamped to 0..=100.

use depscope_graph::{CycleReport, GraphMetrics};
use serde::{Deserialize, Serialize};

const CYCLE_PENALTY: i64 = 15;
const COUPLING_PENALTY: i64 = 5;
const COUPLING_LIMIT: f64 = 5.0;
const SPARSE_DISCOVERY_PENALTY: i64 = 20;
const MIN_SERVICES: usize = 3;
const LOW_COUPLING_LIMIT: f64 = 2.0;
const SERVICE_ORIENTED_MIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitecturePattern {
    LowCoupling,
    AcyclicDependencies,
    ServiceOriented,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub key: String,
    pub description: String,
}

impl Finding {
    fn new(key: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureReport {
    pub health_score: u32,
    pub patterns: Vec<ArchitecturePattern>,
    pub concerns: Vec<Finding>,
    pub strengths: Vec<Finding>,
    /// One short action per concern
    pub recommendations: Vec<String>,
}

impl ArchitectureReport {
    pub fn score(metrics: &GraphMetrics, cycles: &CycleReport) -> Self {
        let average = metrics.average_dependencies;
        let internal_edges = metrics.total_edges.saturating_sub(metrics.external_edges);
        let sparse = metrics.total_nodes < MIN_SERVICES && internal_edges == 0;

        let mut score: i64 = 100;
        score = score.saturating_sub(CYCLE_PENALTY.saturating_mul(saturating_i64(cycles.count)));
        if average > COUPLING_LIMIT {
            #[allow(clippy::cast_possible_truncation)]
            let excess = (average - COUPLING_LIMIT).floor() as i64;
            score = score.saturating_sub(COUPLING_PENALTY.saturating_mul(excess));
        }
        if sparse {
            score = score.saturating_sub(SPARSE_DISCOVERY_PENALTY);
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let health_score = score.clamp(0, 100) as u32;

        let mut patterns = Vec::new();
        if average <= LOW_COUPLING_LIMIT {
            patterns.push(ArchitecturePattern::LowCoupling);
        }
        if cycles.count == 0 {
            patterns.push(ArchitecturePattern::AcyclicDependencies);
        }
        if metrics.total_nodes >= SERVICE_ORIENTED_MIN {
            patterns.push(ArchitecturePattern::ServiceOriented);
        }

        let mut concerns = Vec::new();
        let mut recommendations = Vec::new();
        if cycles.has_cycles {
            concerns.push(Finding::new(
                "circular_dependencies",
                "Circular dependencies make services hard to construct, test and lazy-load",
            ));
            recommendations
                .push("Break each cycle by extracting shared logic into a new service".to_string());
        }
        if average > COUPLING_LIMIT {
            concerns.push(Finding::new(
                "high_coupling",
                "Services inject more than 5 dependencies on average",
            ));
            recommendations
                .push("Split services with many dependencies into focused collaborators".to_string());
        }
        if sparse {
            concerns.push(Finding::new(
                "limited_discovery",
                "Fewer than 3 services were discovered; the graph may be incomplete",
            ));
            recommendations
                .push("Run the analysis in development mode to expose more providers".to_string());
        }

        let strengths = patterns
            .iter()
            .map(|pattern| match pattern {
                ArchitecturePattern::LowCoupling => Finding::new(
                    "low_coupling",
                    "Services depend on few collaborators (2 or fewer on average)",
                ),
                ArchitecturePattern::AcyclicDependencies => Finding::new(
                    "acyclic_dependencies",
                    "No circular dependencies between services",
                ),
                ArchitecturePattern::ServiceOriented => Finding::new(
                    "service_oriented",
                    "Behaviour is spread across 5 or more injectable services",
                ),
            })
            .collect();

        log::debug!("Architecture health score {health_score} ({} concerns)", concerns.len());

        Self {
            health_score,
            patterns,
            concerns,
            strengths,
            recommendations,
        }
    }
}

fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
