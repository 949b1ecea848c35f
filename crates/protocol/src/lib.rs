//! Wire types shared by every depscope crate.
//!
//! Everything that crosses a crate boundary or leaves the process lives here:
//! discovered service records, analysis options, the runtime snapshot input
//! format and the compact failure envelope.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

mod options;
mod snapshot;

pub use options::AnalysisOptions;
pub use snapshot::{FrameworkInfo, InjectorEntry, RuntimeSnapshot, ScriptSource};

/// Classification of a discovered service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Supplied by the framework itself
    #[serde(rename = "built-in")]
    BuiltIn,
    /// Declared by the application
    Custom,
    Unknown,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [Self::BuiltIn, Self::Custom, Self::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuiltIn => "built-in",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime/visibility tier at which one service instance is shared.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Root,
    Module,
    Component,
    Unknown,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Self::Root, Self::Module, Self::Component, Self::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Module => "module",
            Self::Component => "component",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which discovery strategy produced a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    /// Live injector introspection
    Introspection,
    /// Regex scan over script sources
    TextualPattern,
    /// Probe of well-known framework services
    BuiltinEnumeration,
}

impl DiscoveryMethod {
    pub const ALL: [DiscoveryMethod; 3] = [
        Self::Introspection,
        Self::TextualPattern,
        Self::BuiltinEnumeration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Introspection => "introspection",
            Self::TextualPattern => "textual_pattern",
            Self::BuiltinEnumeration => "builtin_enumeration",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered service. Produced fresh per analysis, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub service_type: ServiceType,

    pub scope: Scope,

    pub discovery_method: DiscoveryMethod,

    /// Declared dependency names, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Where the record came from (script url, injector token, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,
}

impl ServiceRecord {
    pub fn new(
        name: impl Into<String>,
        service_type: ServiceType,
        scope: Scope,
        discovery_method: DiscoveryMethod,
    ) -> Self {
        Self {
            name: name.into(),
            service_type,
            scope,
            discovery_method,
            dependencies: Vec::new(),
            source_hint: None,
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Identity used for deduplication: (name, type).
    pub fn identity(&self) -> (&str, ServiceType) {
        (self.name.as_str(), self.service_type)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(raw)
}
