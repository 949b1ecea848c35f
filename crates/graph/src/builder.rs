use crate::error::Result;
use crate::types::{DependencyGraph, ServiceNode};
use depscope_protocol::ServiceRecord;

/// Build a dependency graph from discovered service records
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build graph from records.
    ///
    /// Records are expected to be deduplicated by (name, type) already. Node
    /// ids are names; a name seen again with another type gets `name#type`.
    pub fn build(&self, records: &[ServiceRecord]) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new();

        // Phase 1: one node per record
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = unique_id(&graph, record);
            if id != record.name {
                log::debug!(
                    "Node id collision for {} ({}), using {}",
                    record.name,
                    record.service_type,
                    id
                );
            }

            graph.add_node(ServiceNode {
                id: id.clone(),
                name: record.name.clone(),
                service_type: record.service_type,
                scope: record.scope,
                dependency_count: record.dependencies.len(),
                discovery_method: record.discovery_method,
                source_hint: record.source_hint.clone(),
            })?;
            ids.push(id);
        }

        // Phase 2: edges, internal when the dependency names a node
        for (record, id) in records.iter().zip(&ids) {
            for dependency in &record.dependencies {
                graph.add_dependency(id, dependency)?;
            }
        }

        log::info!(
            "Built dependency graph: {} nodes, {} edges ({} external)",
            graph.node_count(),
            graph.edge_count(),
            graph.external_edge_count()
        );

        Ok(graph)
    }
}

fn unique_id(graph: &DependencyGraph, record: &ServiceRecord) -> String {
    if !graph.contains(&record.name) {
        return record.name.clone();
    }

    let base = format!("{}#{}", record.name, record.service_type);
    let mut candidate = base.clone();
    let mut counter = 2;
    while graph.contains(&candidate) {
        candidate = format!("{base}#{counter}");
        counter += 1;
    }
    candidate
}
