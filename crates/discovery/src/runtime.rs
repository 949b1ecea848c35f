use crate::error::Result;
use async_trait::async_trait;
use depscope_protocol::{FrameworkInfo, InjectorEntry, RuntimeSnapshot, ScriptSource};
use std::path::Path;

/// Capability over a live, already-initialized application.
///
/// Owned by the session collaborator; discovery only borrows it for the
/// duration of one analysis.
#[async_trait]
pub trait RuntimeHandle: Send + Sync {
    /// Framework presence/version, `None` when the framework is absent
    async fn framework(&self) -> Result<Option<FrameworkInfo>>;

    /// Providers registered in the live injector
    async fn injector_entries(&self) -> Result<Vec<InjectorEntry>>;

    /// Script text observable in the runtime
    async fn script_sources(&self) -> Result<Vec<ScriptSource>>;

    /// Whether the root injector can resolve `token`
    async fn is_provided(&self, token: &str) -> Result<bool>;
}

/// `RuntimeHandle` over a captured snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotRuntime {
    snapshot: RuntimeSnapshot,
}

impl SnapshotRuntime {
    pub fn new(snapshot: RuntimeSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }
}

#[async_trait]
impl RuntimeHandle for SnapshotRuntime {
    async fn framework(&self) -> Result<Option<FrameworkInfo>> {
        Ok(self.snapshot.framework.clone())
    }

    async fn injector_entries(&self) -> Result<Vec<InjectorEntry>> {
        Ok(self.snapshot.injector.clone())
    }

    async fn script_sources(&self) -> Result<Vec<ScriptSource>> {
        Ok(self.snapshot.scripts.clone())
    }

    async fn is_provided(&self, token: &str) -> Result<bool> {
        Ok(self.snapshot.provided_tokens.iter().any(|t| t == token)
            || self.snapshot.injector.iter().any(|e| e.token == token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_is_provided_checks_tokens_and_injector() {
        let runtime = SnapshotRuntime::from_json(
            r#"{"injector":[{"token":"Router"}],"provided_tokens":["HttpClient"]}"#,
        )
        .unwrap();

        assert!(runtime.is_provided("HttpClient").await.unwrap());
        assert!(runtime.is_provided("Router").await.unwrap());
        assert!(!runtime.is_provided("Title").await.unwrap());
        assert!(runtime.framework().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"framework":{{"name":"angular","version":"17.0.0"}}}}"#).unwrap();

        let runtime = SnapshotRuntime::load(file.path()).await.unwrap();
        let framework = runtime.framework().await.unwrap().unwrap();
        assert_eq!(framework.version.as_deref(), Some("17.0.0"));
    }

    #[test]
    fn test_invalid_snapshot_rejected() {
        assert!(SnapshotRuntime::from_json("{not json").is_err());
    }
}
