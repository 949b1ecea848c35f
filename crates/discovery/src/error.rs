use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Target framework not detected: {0}")]
    EnvironmentNotDetected(String),

    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("All {0} discovery strategies failed")]
    AllStrategiesFailed(usize),

    #[error("Invalid runtime snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
