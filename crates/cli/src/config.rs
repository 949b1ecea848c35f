use anyhow::{Context, Result};
use depscope_protocol::AnalysisOptions;
use std::path::Path;

/// Flag values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub(crate) struct OptionOverrides {
    pub max_services: Option<usize>,
    pub no_detailed: bool,
    pub no_providers: bool,
    pub no_visualization: bool,
    pub framework: Option<String>,
}

pub(crate) fn load_options(path: Option<&Path>) -> Result<AnalysisOptions> {
    let Some(path) = path else {
        return Ok(AnalysisOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_options(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

pub(crate) fn parse_options(raw: &str) -> Result<AnalysisOptions> {
    Ok(toml::from_str(raw)?)
}

impl OptionOverrides {
    pub(crate) fn apply(self, mut options: AnalysisOptions) -> AnalysisOptions {
        if let Some(max) = self.max_services {
            options.max_services = max;
        }
        if self.no_detailed {
            options.include_detailed_analysis = false;
        }
        if self.no_providers {
            options.analyze_providers = false;
        }
        if self.no_visualization {
            options.generate_visualization = false;
        }
        if self.framework.is_some() {
            options.framework = self.framework;
        }
        options
    }
}
