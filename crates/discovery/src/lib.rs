//! # depscope discovery
//!
//! Finds the services registered in a running application.
//!
//! ```text
//! RuntimeHandle
//!     │
//!     ├──> Environment Detector (framework present? version? dev mode?)
//!     │
//!     └──> Service Discovery
//!            ├─ introspection        (live injector entries)
//!            ├─ textual_pattern      (script text, decorators + compiled output)
//!            ├─ builtin_enumeration  (probe well-known framework services)
//!            │
//!            └─ merge: concatenate → dedup by (name, type) → truncate
//! ```
//!
//! Every strategy is isolated: a failure is logged and recorded in the
//! outcome list, and the remaining strategies still contribute.

mod discovery;
mod environment;
mod error;
pub mod extract;
mod runtime;
mod strategies;
mod strategy;

pub use discovery::{
    deduplicate, DiscoveryResult, DiscoverySummary, ServiceDiscovery, StrategyOutcome,
    StrategyStatus,
};
pub use environment::{EnvironmentDetector, EnvironmentSummary};
pub use error::{DiscoveryError, Result};
pub use runtime::{RuntimeHandle, SnapshotRuntime};
pub use strategies::{
    scan_source, BuiltinEnumerationStrategy, IntrospectionStrategy, TextualPatternStrategy,
};
pub use strategy::{classify_scope, classify_type, DiscoveryStrategy, BUILTIN_SERVICES};
