use crate::error::Result;
use crate::extract::constructor_dependencies;
use crate::runtime::RuntimeHandle;
use crate::strategy::{classify_scope, classify_type, DiscoveryStrategy};
use async_trait::async_trait;
use depscope_protocol::{DiscoveryMethod, InjectorEntry, ServiceRecord};

/// Reads providers straight from the live injector
#[derive(Debug, Clone, Default)]
pub struct IntrospectionStrategy;

#[async_trait]
impl DiscoveryStrategy for IntrospectionStrategy {
    fn name(&self) -> &'static str {
        "introspection"
    }

    async fn discover(&self, runtime: &dyn RuntimeHandle) -> Result<Vec<ServiceRecord>> {
        let entries = runtime.injector_entries().await?;
        Ok(entries.iter().map(record_for_entry).collect())
    }
}

fn record_for_entry(entry: &InjectorEntry) -> ServiceRecord {
    let mut record = ServiceRecord::new(
        entry.token.trim(),
        classify_type(&entry.token),
        classify_scope(entry.provided_in.as_deref()),
        DiscoveryMethod::Introspection,
    );

    record.dependencies = match (&entry.dependencies, &entry.constructor) {
        (Some(deps), _) => deps.clone(),
        (None, Some(signature)) => constructor_dependencies(signature).unwrap_or_else(|err| {
            log::debug!("Dependency extraction failed for {}: {err}", entry.token);
            Vec::new()
        }),
        (None, None) => Vec::new(),
    };
    record.source_hint = entry.provided_in.clone();
    record
}
