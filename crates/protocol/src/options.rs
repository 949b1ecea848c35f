use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SERVICES: usize = 50;

/// Knobs for one analysis invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Caps discovered/graph node count
    pub max_services: usize,

    /// Adds distribution + complexity sub-report to the graph
    pub include_detailed_analysis: bool,

    /// Adds the provider-pattern section
    pub analyze_providers: bool,

    /// Adds the visualization projection section
    pub generate_visualization: bool,

    /// Required framework name (case-insensitive); `None` accepts any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_services: DEFAULT_MAX_SERVICES,
            include_detailed_analysis: true,
            analyze_providers: true,
            generate_visualization: true,
            framework: None,
        }
    }
}

impl AnalysisOptions {
    /// Options for a quick pass: graph, cycles and scores only
    pub fn minimal() -> Self {
        Self {
            include_detailed_analysis: false,
            analyze_providers: false,
            generate_visualization: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_services == 0 {
            return Err("max_services must be > 0".to_string());
        }

        if let Some(name) = &self.framework {
            if name.trim().is_empty() {
                return Err("framework must not be blank when set".to_string());
            }
        }

        Ok(())
    }
}
