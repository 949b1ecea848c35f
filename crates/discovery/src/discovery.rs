use crate::error::{DiscoveryError, Result};
use crate::runtime::RuntimeHandle;
use crate::strategies::{BuiltinEnumerationStrategy, IntrospectionStrategy, TextualPatternStrategy};
use crate::strategy::DiscoveryStrategy;
use depscope_protocol::{ServiceRecord, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Contributed,
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub strategy: String,
    pub status: StrategyStatus,
    pub found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Discovery counters without the records themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub strategies_used: Vec<StrategyOutcome>,
    /// Raw count across all strategies, before deduplication
    pub total_found: usize,
    /// Count after (name, type) deduplication, before truncation
    pub deduplicated: usize,
    /// Count handed to the graph builder
    pub returned: usize,
    pub truncated: bool,
    /// True iff no strategy failed
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub services: Vec<ServiceRecord>,
    pub strategies_used: Vec<StrategyOutcome>,
    pub total_found: usize,
    pub deduplicated: usize,
    pub truncated: bool,
    pub complete: bool,
}

impl DiscoveryResult {
    pub fn summary(&self) -> DiscoverySummary {
        DiscoverySummary {
            strategies_used: self.strategies_used.clone(),
            total_found: self.total_found,
            deduplicated: self.deduplicated,
            returned: self.services.len(),
            truncated: self.truncated,
            complete: self.complete,
        }
    }
}

/// Runs independent strategies and merges their output
pub struct ServiceDiscovery {
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
    max_services: usize,
}

impl ServiceDiscovery {
    /// Discovery with no strategies registered
    pub fn new(max_services: usize) -> Self {
        Self {
            strategies: Vec::new(),
            max_services,
        }
    }

    /// introspection, textual pattern, built-in enumeration, in that order
    pub fn with_default_strategies(max_services: usize) -> Self {
        Self::new(max_services)
            .with_strategy(IntrospectionStrategy)
            .with_strategy(TextualPatternStrategy)
            .with_strategy(BuiltinEnumerationStrategy)
    }

    pub fn with_strategy(mut self, strategy: impl DiscoveryStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Run every strategy, then concatenate, deduplicate and truncate.
    ///
    /// A failing strategy contributes nothing; only when all of them fail is
    /// an error returned.
    pub async fn discover(&self, runtime: &dyn RuntimeHandle) -> Result<DiscoveryResult> {
        let mut raw = Vec::new();
        let mut outcomes = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let outcome = match strategy.discover(runtime).await {
                Ok(records) => {
                    let found = records.len();
                    raw.extend(records);
                    StrategyOutcome {
                        strategy: strategy.name().to_string(),
                        status: if found > 0 {
                            StrategyStatus::Contributed
                        } else {
                            StrategyStatus::Empty
                        },
                        found,
                        error: None,
                    }
                }
                Err(err) => {
                    log::warn!("Discovery strategy {} failed: {err}", strategy.name());
                    StrategyOutcome {
                        strategy: strategy.name().to_string(),
                        status: StrategyStatus::Failed,
                        found: 0,
                        error: Some(err.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let failed = outcomes
            .iter()
            .filter(|o| o.status == StrategyStatus::Failed)
            .count();
        if !outcomes.is_empty() && failed == outcomes.len() {
            return Err(DiscoveryError::AllStrategiesFailed(failed));
        }

        let total_found = raw.len();
        let mut services = deduplicate(raw);
        let deduplicated = services.len();
        let truncated = deduplicated > self.max_services;
        services.truncate(self.max_services);

        log::info!(
            "Discovered {} services ({} raw, {} unique, {} strategies failed)",
            services.len(),
            total_found,
            deduplicated,
            failed
        );

        Ok(DiscoveryResult {
            services,
            strategies_used: outcomes,
            total_found,
            deduplicated,
            truncated,
            complete: failed == 0,
        })
    }
}

/// Keep the first record for every (name, type) identity
pub fn deduplicate(records: Vec<ServiceRecord>) -> Vec<ServiceRecord> {
    let mut seen: HashSet<(String, ServiceType)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let (name, service_type) = r.identity();
            seen.insert((name.to_owned(), service_type))
        })
        .collect()
}
