use depscope_graph::{DependencyGraph, Hub};
use depscope_protocol::{DiscoveryMethod, Scope, ServiceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How services are provided and consumed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAnalysis {
    pub by_discovery_method: BTreeMap<DiscoveryMethod, usize>,
    pub built_in: usize,
    pub custom: usize,
    pub unknown: usize,
    /// Services with the most internal dependents
    pub most_injected: Vec<Hub>,
    /// Custom root singletons nothing in the graph depends on
    pub unused_root_singletons: Vec<String>,
    pub insights: Vec<String>,
}

impl ProviderAnalysis {
    pub fn analyze(graph: &DependencyGraph) -> Self {
        let mut by_discovery_method: BTreeMap<DiscoveryMethod, usize> =
            DiscoveryMethod::ALL.iter().map(|m| (*m, 0)).collect();
        let (mut built_in, mut custom, mut unknown) = (0, 0, 0);
        let mut unused_root_singletons = Vec::new();

        for node in graph.nodes() {
            *by_discovery_method.entry(node.discovery_method).or_insert(0) += 1;
            match node.service_type {
                ServiceType::BuiltIn => built_in += 1,
                ServiceType::Custom => custom += 1,
                ServiceType::Unknown => unknown += 1,
            }

            if node.service_type == ServiceType::Custom && node.scope == Scope::Root {
                let dependents = graph.find_node(&node.id).map_or(0, |idx| graph.dependents(idx));
                if dependents == 0 {
                    unused_root_singletons.push(node.id.clone());
                }
            }
        }
        unused_root_singletons.sort();

        let most_injected = graph.hubs();

        let mut insights = Vec::new();
        if let Some(top) = most_injected.first() {
            insights.push(format!(
                "{} is the most injected service ({} dependents)",
                top.id, top.dependents
            ));
        }
        if built_in > 0 && custom == 0 {
            insights.push(
                "Only framework services were discovered; application services may be hidden from introspection"
                    .to_string(),
            );
        }
        if !unused_root_singletons.is_empty() {
            insights.push(format!(
                "{} root-provided service(s) have no dependents in the discovered graph",
                unused_root_singletons.len()
            ));
        }

        Self {
            by_discovery_method,
            built_in,
            custom,
            unknown,
            most_injected,
            unused_root_singletons,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depscope_graph::GraphBuilder;
    use depscope_protocol::ServiceRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_provider_breakdown() {
        let records = vec![
            ServiceRecord::new(
                "UserService",
                ServiceType::Custom,
                Scope::Root,
                DiscoveryMethod::Introspection,
            )
            .with_dependencies(["HttpClient", "AuthService"]),
            ServiceRecord::new(
                "AuthService",
                ServiceType::Custom,
                Scope::Root,
                DiscoveryMethod::TextualPattern,
            )
            .with_dependencies(["HttpClient"]),
            ServiceRecord::new(
                "HttpClient",
                ServiceType::BuiltIn,
                Scope::Root,
                DiscoveryMethod::BuiltinEnumeration,
            ),
        ];
        let graph = GraphBuilder::new().build(&records).unwrap();
        let analysis = ProviderAnalysis::analyze(&graph);

        assert_eq!(analysis.by_discovery_method[&DiscoveryMethod::Introspection], 1);
        assert_eq!(analysis.by_discovery_method[&DiscoveryMethod::TextualPattern], 1);
        assert_eq!(analysis.built_in, 1);
        assert_eq!(analysis.custom, 2);
        assert_eq!(analysis.most_injected[0].id, "HttpClient");
        assert_eq!(analysis.most_injected[0].dependents, 2);
        assert_eq!(analysis.unused_root_singletons, vec!["UserService"]);
        assert_eq!(analysis.insights.len(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let analysis = ProviderAnalysis::analyze(&DependencyGraph::new());
        assert_eq!(analysis.by_discovery_method.len(), 3);
        assert!(analysis.most_injected.is_empty());
        assert!(analysis.insights.is_empty());
    }
}
