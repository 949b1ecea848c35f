use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Framework presence as reported by the live runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameworkInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dev_mode: bool,
}

/// One provider registered in the live injector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InjectorEntry {
    /// Injection token, usually the class name
    pub token: String,

    /// `providedIn` value or the owning injector (`root`, `SomeModule`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provided_in: Option<String>,

    /// Constructor signature text, when the runtime could stringify it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<String>,

    /// Dependencies resolved by the runtime itself; wins over `constructor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

/// Inlined or loaded script text observable in the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: String,
}

/// Captured state of a live application, as handed over by the session owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RuntimeSnapshot {
    pub framework: Option<FrameworkInfo>,
    pub injector: Vec<InjectorEntry>,
    pub scripts: Vec<ScriptSource>,
    /// Tokens the root injector can resolve
    pub provided_tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_parses() {
        let snapshot: RuntimeSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.framework.is_none());
        assert!(snapshot.injector.is_empty());
        assert!(snapshot.scripts.is_empty());
    }

    #[test]
    fn test_snapshot_parses_injector_entries() {
        let raw = r#"{
            "framework": {"name": "angular", "version": "17.3.0"},
            "injector": [{"token": "UserService", "provided_in": "root",
                          "constructor": "constructor(private http: HttpClient)"}],
            "provided_tokens": ["HttpClient"]
        }"#;
        let snapshot: RuntimeSnapshot = serde_json::from_str(raw).unwrap();

        let framework = snapshot.framework.unwrap();
        assert_eq!(framework.name, "angular");
        assert!(!framework.dev_mode);
        assert_eq!(snapshot.injector[0].provided_in.as_deref(), Some("root"));
        assert!(snapshot.injector[0].dependencies.is_none());
        assert_eq!(snapshot.provided_tokens, vec!["HttpClient".to_string()]);
    }
}
