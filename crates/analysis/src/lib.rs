//! # depscope analysis
//!
//! Turns discovered services into a scored, prioritized report.
//!
//! ```text
//! RuntimeHandle ──> Environment Detector ──> Service Discovery
//!                                                 │
//!                                                 v
//!                                          Graph Builder
//!                                                 │
//!                     ┌───────────────────────────┼──────────────────────┐
//!                     v                           v                      v
//!              Cycle Detector          Scope / Provider Analyzer   Visualization
//!                     │                           │
//!                     └──────────┬────────────────┘
//!                                v
//!                   Architecture Scorer ──> Performance Assessor
//!                                │
//!                                v
//!                     Recommendation Generator ──> AnalysisOutcome
//! ```
//!
//! [`Analyzer::run`] is the boundary: it always returns an
//! [`AnalysisOutcome`], either the full report or `{success: false, error}`.

mod architecture;
mod error;
mod performance;
mod pipeline;
mod providers;
mod recommendations;
mod report;
mod scope;

pub use architecture::{ArchitecturePattern, ArchitectureReport, Finding};
pub use error::{AnalysisError, Result};
pub use performance::{ImpactFactor, ImpactTier, Opportunity, PerformanceAssessment};
pub use pipeline::{analyze_services, Analyzer};
pub use providers::ProviderAnalysis;
pub use recommendations::{generate_recommendations, Priority, Recommendation, RecommendationInput};
pub use report::{
    AnalysisFailure, AnalysisOutcome, AnalysisReport, AnalysisSections, AnalysisSummary,
};
pub use scope::{BucketShare, InsightKind, ScopeAnalysis, ScopeInsight};
