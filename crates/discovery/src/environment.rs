use crate::error::{DiscoveryError, Result};
use crate::runtime::RuntimeHandle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub detected: bool,
    pub framework: String,
    pub version: Option<String>,
    pub dev_mode: bool,
}

/// Confirms the target framework is present before any analysis runs
#[derive(Debug, Clone, Default)]
pub struct EnvironmentDetector {
    required: Option<String>,
}

impl EnvironmentDetector {
    pub fn new(required: Option<String>) -> Self {
        Self { required }
    }

    pub async fn detect(&self, runtime: &dyn RuntimeHandle) -> Result<EnvironmentSummary> {
        let info = runtime
            .framework()
            .await
            .map_err(|err| DiscoveryError::RuntimeUnavailable(err.to_string()))?
            .ok_or_else(|| {
                DiscoveryError::EnvironmentNotDetected(
                    "no framework found in the running application".to_string(),
                )
            })?;

        if let Some(required) = &self.required {
            if !info.name.eq_ignore_ascii_case(required.trim()) {
                return Err(DiscoveryError::EnvironmentNotDetected(format!(
                    "expected {required}, found {}",
                    info.name
                )));
            }
        }

        log::info!(
            "Detected {} {}",
            info.name,
            info.version.as_deref().unwrap_or("(unknown version)")
        );

        Ok(EnvironmentSummary {
            detected: true,
            framework: info.name,
            version: info.version,
            dev_mode: info.dev_mode,
        })
    }
}
