use crate::types::DependencyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Step function of the number of reported cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleSeverity {
    None,
    Low,
    Medium,
    High,
}

impl CycleSeverity {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Circular-dependency detection result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub has_cycles: bool,
    pub count: usize,
    pub severity: CycleSeverity,
    /// Each cycle is closed: first id == last id
    pub cycles: Vec<Vec<String>>,
    /// Union of ids in any cycle, first-appearance order
    pub affected_services: Vec<String>,
    /// Services that declare themselves as a dependency
    pub self_references: Vec<String>,
    /// Strongly connected components with more than one node
    pub strongly_connected: Vec<Vec<String>>,
}

#[derive(Debug)]
struct Frame {
    node: usize,
    next: usize,
}

/// Depth-first cycle detection over internal edges.
#[derive(Debug, Clone, Default)]
pub struct CycleDetector;

impl CycleDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, graph: &DependencyGraph) -> CycleReport {
        let adjacency: Vec<Vec<usize>> = graph
            .graph
            .node_indices()
            .map(|idx| {
                graph
                    .internal_targets(idx)
                    .into_iter()
                    .map(NodeIndex::index)
                    .collect()
            })
            .collect();

        let (raw_cycles, self_loops) = find_cycles(&adjacency);

        let id = |idx: usize| -> String {
            graph
                .get_node(NodeIndex::new(idx))
                .map(|n| n.id.clone())
                .unwrap_or_default()
        };

        let mut seen = HashSet::new();
        let mut cycles = Vec::new();
        for cycle in raw_cycles {
            if seen.insert(signature(&cycle)) {
                cycles.push(cycle.into_iter().map(id).collect::<Vec<_>>());
            } else {
                log::debug!("Dropping rediscovered cycle of length {}", cycle.len() - 1);
            }
        }

        let mut affected_services: Vec<String> = Vec::new();
        for node in cycles.iter().flatten() {
            if !affected_services.contains(node) {
                affected_services.push(node.clone());
            }
        }

        let self_references = self_loops.into_iter().map(id).collect();

        let mut strongly_connected: Vec<Vec<String>> = tarjan_scc(&graph.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<String> =
                    component.into_iter().map(|idx| id(idx.index())).collect();
                ids.sort();
                ids
            })
            .collect();
        strongly_connected.sort();

        let count = cycles.len();
        if count > 0 {
            log::info!(
                "Detected {} circular dependencies across {} services",
                count,
                affected_services.len()
            );
        }

        CycleReport {
            has_cycles: count > 0,
            count,
            severity: CycleSeverity::from_count(count),
            cycles,
            affected_services,
            self_references,
            strongly_connected,
        }
    }
}

/// Returns closed cycles (as node indices) and self-looping nodes.
///
/// Global visited set, per-root recursion stack, explicit frames instead of
/// call-stack recursion.
fn find_cycles(adjacency: &[Vec<usize>]) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut visited = vec![false; adjacency.len()];
    let mut on_stack = vec![false; adjacency.len()];
    let mut cycles = Vec::new();
    let mut self_loops = Vec::new();

    for root in 0..adjacency.len() {
        if visited[root] {
            continue;
        }

        visited[root] = true;
        on_stack[root] = true;
        let mut frames = vec![Frame { node: root, next: 0 }];

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            let Some(&target) = adjacency[node].get(frame.next) else {
                on_stack[node] = false;
                frames.pop();
                continue;
            };
            frame.next += 1;

            if target == node {
                if !self_loops.contains(&node) {
                    self_loops.push(node);
                }
            } else if on_stack[target] {
                if let Some(start) = frames.iter().position(|f| f.node == target) {
                    let mut cycle: Vec<usize> = frames[start..].iter().map(|f| f.node).collect();
                    cycle.push(target);
                    cycles.push(cycle);
                }
            } else if !visited[target] {
                visited[target] = true;
                on_stack[target] = true;
                frames.push(Frame {
                    node: target,
                    next: 0,
                });
            }
        }
    }

    (cycles, self_loops)
}

/// Rotation-invariant key: the open cycle rotated to start at its smallest index
fn signature(cycle: &[usize]) -> Vec<usize> {
    let body = &cycle[..cycle.len().saturating_sub(1)];
    let Some(start) = body
        .iter()
        .enumerate()
        .min_by_key(|(_, idx)| **idx)
        .map(|(pos, _)| pos)
    else {
        return Vec::new();
    };
    body[start..].iter().chain(&body[..start]).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use depscope_protocol::{DiscoveryMethod, Scope, ServiceRecord, ServiceType};
    use pretty_assertions::assert_eq;

    fn svc(name: &str, deps: &[&str]) -> ServiceRecord {
        ServiceRecord::new(
            name,
            ServiceType::Custom,
            Scope::Root,
            DiscoveryMethod::Introspection,
        )
        .with_dependencies(deps.iter().copied())
    }

    fn detect(records: &[ServiceRecord]) -> CycleReport {
        let graph = GraphBuilder::new().build(records).unwrap();
        CycleDetector::new().detect(&graph)
    }

    #[test]
    fn test_two_node_cycle() {
        let report = detect(&[svc("A", &["B"]), svc("B", &["A"])]);

        assert!(report.has_cycles);
        assert_eq!(report.count, 1);
        assert_eq!(report.severity, CycleSeverity::Low);
        assert_eq!(report.cycles, vec![vec!["A", "B", "A"]]);
        assert_eq!(report.affected_services, vec!["A", "B"]);
        assert_eq!(report.strongly_connected, vec![vec!["A", "B"]]);
    }

    #[test]
    fn test_acyclic_graph() {
        let report = detect(&[svc("A", &["B", "C"]), svc("B", &["C"]), svc("C", &[])]);

        assert!(!report.has_cycles);
        assert_eq!(report.severity, CycleSeverity::None);
        assert!(report.cycles.is_empty());
        assert!(report.affected_services.is_empty());
        assert!(report.strongly_connected.is_empty());
    }

    #[test]
    fn test_cycle_path_starts_at_reentry_point() {
        let report = detect(&[
            svc("Entry", &["A"]),
            svc("A", &["B"]),
            svc("B", &["C"]),
            svc("C", &["A"]),
        ]);

        assert_eq!(report.cycles, vec![vec!["A", "B", "C", "A"]]);
        assert_eq!(report.affected_services, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repeated_dependency_reports_cycle_once() {
        // Both B -> A edges close the same cycle
        let records = [svc("A", &["B"]), svc("B", &["A", "A"])];
        let graph = GraphBuilder::new().build(&records).unwrap();
        assert_eq!(graph.edges().len(), 3);

        let report = CycleDetector::new().detect(&graph);
        assert_eq!(report.count, 1);
        assert_eq!(report.severity, CycleSeverity::Low);
        assert_eq!(report.cycles, vec![vec!["A", "B", "A"]]);
        assert_eq!(report.affected_services, vec!["A", "B"]);
    }

    #[test]
    fn test_raw_walk_finds_repeated_cycle_twice() {
        let (raw, self_loops) = find_cycles(&[vec![1], vec![0, 0]]);

        assert_eq!(raw, vec![vec![0, 1, 0], vec![0, 1, 0]]);
        assert!(self_loops.is_empty());
    }

    #[test]
    fn test_cycles_share_no_internal_duplicates() {
        let report = detect(&[
            svc("A", &["B", "C"]),
            svc("B", &["A", "C"]),
            svc("C", &["A"]),
        ]);

        assert!(report.count >= 2);
        for cycle in &report.cycles {
            assert_eq!(cycle.first(), cycle.last());
            let body = &cycle[..cycle.len() - 1];
            let unique: HashSet<_> = body.iter().collect();
            assert_eq!(unique.len(), body.len());
            assert!(body.len() >= 2);
        }
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let report = detect(&[svc("A", &["A", "B"]), svc("B", &[])]);

        assert!(!report.has_cycles);
        assert_eq!(report.self_references, vec!["A"]);
    }

    #[test]
    fn test_external_edges_ignored() {
        let report = detect(&[svc("A", &["HttpClient"]), svc("B", &["HttpClient"])]);
        assert_eq!(report.count, 0);
    }

    #[test]
    fn test_severity_steps() {
        let expected = [
            (0, CycleSeverity::None),
            (1, CycleSeverity::Low),
            (2, CycleSeverity::Low),
            (3, CycleSeverity::Medium),
            (5, CycleSeverity::Medium),
            (6, CycleSeverity::High),
            (40, CycleSeverity::High),
        ];
        for (count, severity) in expected {
            assert_eq!(CycleSeverity::from_count(count), severity, "count={count}");
        }
    }

    #[test]
    fn test_signature_is_rotation_invariant() {
        assert_eq!(signature(&[2, 0, 1, 2]), signature(&[0, 1, 2, 0]));
        assert_eq!(signature(&[1, 2, 0, 1]), vec![0, 1, 2]);
        assert_ne!(signature(&[0, 2, 1, 0]), signature(&[0, 1, 2, 0]));
    }
}
