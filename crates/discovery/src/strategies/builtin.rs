use crate::error::Result;
use crate::runtime::RuntimeHandle;
use crate::strategy::{DiscoveryStrategy, BUILTIN_SERVICES};
use async_trait::async_trait;
use depscope_protocol::{DiscoveryMethod, Scope, ServiceRecord, ServiceType};

/// Probes the root injector for well-known framework services
#[derive(Debug, Clone, Default)]
pub struct BuiltinEnumerationStrategy;

#[async_trait]
impl DiscoveryStrategy for BuiltinEnumerationStrategy {
    fn name(&self) -> &'static str {
        "builtin_enumeration"
    }

    async fn discover(&self, runtime: &dyn RuntimeHandle) -> Result<Vec<ServiceRecord>> {
        let mut records = Vec::new();
        for token in BUILTIN_SERVICES {
            if runtime.is_provided(token).await? {
                records.push(ServiceRecord::new(
                    token,
                    ServiceType::BuiltIn,
                    Scope::Root,
                    DiscoveryMethod::BuiltinEnumeration,
                ));
            }
        }
        Ok(records)
    }
}
