use depscope_discovery::DiscoveryError;
use depscope_graph::GraphError;
use depscope_protocol::ErrorEnvelope;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

impl AnalysisError {
    /// Stable machine-readable code for the failure envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "invalid_options",
            Self::Discovery(DiscoveryError::EnvironmentNotDetected(_)) => "environment_not_detected",
            Self::Discovery(DiscoveryError::RuntimeUnavailable(_)) => "runtime_unavailable",
            Self::Discovery(DiscoveryError::AllStrategiesFailed(_)) => "discovery_failed",
            Self::Discovery(DiscoveryError::InvalidSnapshot(_)) => "invalid_snapshot",
            Self::Discovery(DiscoveryError::IoError(_)) => "snapshot_unreadable",
            Self::Graph(_) => "graph_error",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        let hint = match self {
            Self::InvalidOptions(_) => "Check max_services (>= 1) and the framework name.",
            Self::Discovery(DiscoveryError::EnvironmentNotDetected(_)) => {
                "Make sure the application is loaded and the framework is bootstrapped before analysing."
            }
            Self::Discovery(DiscoveryError::RuntimeUnavailable(_)) => {
                "The runtime handle did not answer; reconnect to the application and retry."
            }
            Self::Discovery(DiscoveryError::AllStrategiesFailed(_)) => {
                "Every discovery strategy failed; run with --verbose to see each strategy error."
            }
            Self::Discovery(DiscoveryError::InvalidSnapshot(_)) => {
                "The runtime snapshot is not valid JSON; see `depscope schema` for the expected shape."
            }
            Self::Discovery(DiscoveryError::IoError(_)) => {
                "Check that the snapshot path exists and is readable."
            }
            Self::Graph(_) => return None,
        };
        Some(hint)
    }

    /// Failure envelope carrying the original message
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.code().to_string(),
            message: self.to_string(),
            hint: self.hint().map(str::to_string),
        }
    }
}
