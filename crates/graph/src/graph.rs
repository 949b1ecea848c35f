use crate::types::DependencyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

const MAX_HUBS: usize = 5;

/// Adjacency entries the exact depth walk may scan before giving up
const DEPTH_STEP_BUDGET: usize = 1_000_000;

/// Outgoing step used by the depth walk
#[derive(Debug, Clone, Copy)]
enum Step {
    Node(usize),
    External,
}

#[derive(Debug)]
struct DepthFrame {
    node: usize,
    next: usize,
    best: usize,
    /// Set when the subtree touched a node on the current path
    truncated: bool,
}

impl DepthFrame {
    fn new(node: usize) -> Self {
        Self {
            node,
            next: 0,
            best: 0,
            truncated: false,
        }
    }
}

/// Longest dependency chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDepth {
    pub depth: usize,
    /// Set when the exact walk ran out of budget and `depth` is the
    /// component-level upper bound instead
    pub estimated: bool,
}

/// Most-depended-upon node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub id: String,
    pub dependents: usize,
}

impl DependencyGraph {
    /// Internal targets of `node`, in declaration order
    pub fn internal_targets(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<_> = self.graph.edges(node).collect();
        out.sort_by_key(|e| *e.weight());
        out.into_iter().map(|e| e.target()).collect()
    }

    /// Number of internal edges pointing at `node`
    pub fn dependents(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    /// Average declared dependency count per node (0 for an empty graph)
    pub fn average_dependencies(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let avg = self.edge_count() as f64 / self.node_count() as f64;
        avg
    }

    /// Longest dependency chain.
    ///
    /// Each root is walked depth-first; a node already on the current path
    /// contributes 0, so cyclic graphs still produce a finite value. External
    /// edges are leaves at depth 1. Depths of nodes whose walk never met the
    /// current path do not depend on the path and are reused across roots.
    ///
    /// Inside large strongly connected components the walk enumerates every
    /// simple path, so it runs under a step budget. Once that is spent the
    /// result falls back to an upper bound over the component condensation.
    pub fn max_depth(&self) -> ChainDepth {
        let adjacency = self.depth_adjacency();
        let mut memo: Vec<Option<usize>> = vec![None; adjacency.len()];
        let mut budget = DEPTH_STEP_BUDGET;

        let mut depth = 0;
        for root in 0..adjacency.len() {
            match depth_from(root, &adjacency, &mut memo, &mut budget) {
                Some(found) => depth = depth.max(found),
                None => {
                    log::warn!(
                        "Dependency depth walk exceeded {DEPTH_STEP_BUDGET} steps over {} services, estimating",
                        adjacency.len()
                    );
                    return ChainDepth {
                        depth: self.condensed_depth(&adjacency),
                        estimated: true,
                    };
                }
            }
        }

        ChainDepth {
            depth,
            estimated: false,
        }
    }

    /// Upper bound on the longest chain, linear in the graph size.
    ///
    /// Strongly connected components are collapsed; a component of `k` nodes
    /// counts as `k - 1` internal steps and each edge between components as
    /// one more. Never exceeds the node count.
    fn condensed_depth(&self, adjacency: &[Vec<Step>]) -> usize {
        // Sinks come first, so successors are always resolved before use
        let components = tarjan_scc(&self.graph);
        let mut component_of = vec![0; adjacency.len()];
        for (position, component) in components.iter().enumerate() {
            for idx in component {
                component_of[idx.index()] = position;
            }
        }

        let mut best = vec![0usize; components.len()];
        for (position, component) in components.iter().enumerate() {
            let mut tail = 0;
            for idx in component {
                for step in &adjacency[idx.index()] {
                    match *step {
                        Step::External => tail = tail.max(1),
                        Step::Node(target) if component_of[target] == position => {}
                        Step::Node(target) => tail = tail.max(best[component_of[target]] + 1),
                    }
                }
            }
            best[position] = component.len() - 1 + tail;
        }

        best.into_iter().max().unwrap_or(0)
    }

    /// Nodes with the most internal dependents, ties broken by id
    pub fn hubs(&self) -> Vec<Hub> {
        let mut hubs: Vec<Hub> = self
            .graph
            .node_indices()
            .filter_map(|idx| {
                let dependents = self.dependents(idx);
                let node = self.get_node(idx)?;
                (dependents > 0).then(|| Hub {
                    id: node.id.clone(),
                    dependents,
                })
            })
            .collect();

        hubs.sort_by(|a, b| b.dependents.cmp(&a.dependents).then_with(|| a.id.cmp(&b.id)));
        hubs.truncate(MAX_HUBS);
        hubs
    }

    fn depth_adjacency(&self) -> Vec<Vec<Step>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for edge in &self.edges {
            let Some(from) = self.find_node(&edge.source) else {
                continue;
            };
            let step = match self.find_node(&edge.target) {
                Some(to) => Step::Node(to.index()),
                None => Step::External,
            };
            adjacency[from.index()].push(step);
        }
        adjacency
    }
}

/// Longest chain from `root`, or `None` once `budget` is spent
fn depth_from(
    root: usize,
    adjacency: &[Vec<Step>],
    memo: &mut [Option<usize>],
    budget: &mut usize,
) -> Option<usize> {
    if let Some(depth) = memo[root] {
        return Some(depth);
    }

    let mut on_path = vec![false; adjacency.len()];
    let mut stack = vec![DepthFrame::new(root)];
    on_path[root] = true;

    while let Some(frame) = stack.last_mut() {
        if let Some(&step) = adjacency[frame.node].get(frame.next) {
            *budget = budget.checked_sub(1)?;
            frame.next += 1;
            match step {
                Step::External => frame.best = frame.best.max(1),
                Step::Node(target) if on_path[target] => frame.truncated = true,
                Step::Node(target) => match memo[target] {
                    Some(depth) => frame.best = frame.best.max(depth + 1),
                    None => {
                        on_path[target] = true;
                        stack.push(DepthFrame::new(target));
                    }
                },
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        on_path[done.node] = false;
        if !done.truncated {
            memo[done.node] = Some(done.best);
        }
        match stack.last_mut() {
            Some(parent) => {
                parent.best = parent.best.max(done.best + 1);
                parent.truncated |= done.truncated;
            }
            None => return Some(done.best),
        }
    }

    Some(0)
}

#[cfg(test)]
mod tests {
    use super::{depth_from, ChainDepth, DEPTH_STEP_BUDGET};
    use crate::builder::GraphBuilder;
    use depscope_protocol::{DiscoveryMethod, Scope, ServiceRecord, ServiceType};

    fn svc(name: &str, deps: &[&str]) -> ServiceRecord {
        ServiceRecord::new(
            name,
            ServiceType::Custom,
            Scope::Root,
            DiscoveryMethod::Introspection,
        )
        .with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_depth_of_chain() {
        let graph = GraphBuilder::new()
            .build(&[svc("A", &["B"]), svc("B", &["C"]), svc("C", &[])])
            .unwrap();
        assert_eq!(graph.max_depth().depth, 2);
    }

    #[test]
    fn test_depth_counts_external_leaf() {
        let graph = GraphBuilder::new()
            .build(&[svc("A", &["B"]), svc("B", &["HttpClient"])])
            .unwrap();
        assert_eq!(graph.max_depth().depth, 2);
    }

    #[test]
    fn test_depth_is_finite_on_cycles() {
        let graph = GraphBuilder::new()
            .build(&[svc("A", &["B"]), svc("B", &["A"])])
            .unwrap();
        assert_eq!(graph.max_depth().depth, 1);

        let graph = GraphBuilder::new()
            .build(&[svc("A", &["B"]), svc("B", &["C"]), svc("C", &["A"])])
            .unwrap();
        assert_eq!(graph.max_depth().depth, 2);
    }

    #[test]
    fn test_depth_path_dependent_nodes_not_reused() {
        // C is reached first through A -> B -> C, where C -> B is cut short.
        // Seen from D, C can still reach B and go one step deeper.
        let graph = GraphBuilder::new()
            .build(&[
                svc("A", &["B"]),
                svc("B", &["C"]),
                svc("C", &["B"]),
                svc("D", &["C"]),
            ])
            .unwrap();
        let adjacency = graph.depth_adjacency();
        let mut memo = vec![None; adjacency.len()];
        let mut budget = DEPTH_STEP_BUDGET;

        assert_eq!(depth_from(0, &adjacency, &mut memo, &mut budget), Some(2));
        assert!(memo.iter().all(Option::is_none));
        assert_eq!(depth_from(3, &adjacency, &mut memo, &mut budget), Some(2));
        assert_eq!(graph.max_depth().depth, 2);
    }

    #[test]
    fn test_depth_memo_reused_on_dags() {
        let graph = GraphBuilder::new()
            .build(&[svc("A", &["C"]), svc("B", &["C"]), svc("C", &["D"]), svc("D", &[])])
            .unwrap();
        let adjacency = graph.depth_adjacency();
        let mut memo = vec![None; adjacency.len()];
        let mut budget = DEPTH_STEP_BUDGET;

        assert_eq!(depth_from(0, &adjacency, &mut memo, &mut budget), Some(2));
        assert_eq!(memo[2], Some(1));
        assert_eq!(memo[3], Some(0));
        assert_eq!(depth_from(1, &adjacency, &mut memo, &mut budget), Some(2));
    }

    #[test]
    fn test_depth_walk_stops_when_budget_spent() {
        let graph = GraphBuilder::new()
            .build(&[svc("A", &["B"]), svc("B", &["C"]), svc("C", &[])])
            .unwrap();
        let adjacency = graph.depth_adjacency();
        let mut memo = vec![None; adjacency.len()];
        let mut budget = 1;

        assert_eq!(depth_from(0, &adjacency, &mut memo, &mut budget), None);
        assert_eq!(budget, 0);
    }

    #[test]
    fn test_condensed_depth_bounds_exact_depth() {
        let graph = GraphBuilder::new()
            .build(&[
                svc("Entry", &["A"]),
                svc("A", &["B"]),
                svc("B", &["C", "A"]),
                svc("C", &["A", "Sink"]),
                svc("Sink", &["HttpClient"]),
            ])
            .unwrap();
        let adjacency = graph.depth_adjacency();

        let exact = graph.max_depth();
        assert!(!exact.estimated);
        assert_eq!(exact.depth, 5);
        assert_eq!(graph.condensed_depth(&adjacency), 5);
    }

    #[test]
    fn test_dense_cycle_falls_back_to_estimate() {
        let names: Vec<String> = (0..20).map(|i| format!("Service{i}")).collect();
        let records: Vec<ServiceRecord> = names
            .iter()
            .map(|name| {
                let deps: Vec<&str> = names
                    .iter()
                    .filter(|other| *other != name)
                    .map(String::as_str)
                    .collect();
                svc(name, &deps)
            })
            .collect();
        let graph = GraphBuilder::new().build(&records).unwrap();

        let started = std::time::Instant::now();
        let depth = graph.max_depth();
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert_eq!(
            depth,
            ChainDepth {
                depth: 19,
                estimated: true
            }
        );

        let metrics = graph.metrics();
        assert_eq!(metrics.max_depth, 19);
        assert!(metrics.max_depth_estimated);
    }

    #[test]
    fn test_empty_graph_metrics() {
        let graph = GraphBuilder::new().build(&[]).unwrap();
        assert_eq!(graph.max_depth().depth, 0);
        assert_eq!(graph.average_dependencies(), 0.0);
        assert!(graph.hubs().is_empty());
    }

    #[test]
    fn test_hubs_sorted_by_dependents() {
        let graph = GraphBuilder::new()
            .build(&[
                svc("A", &["Log", "Api"]),
                svc("B", &["Log"]),
                svc("Api", &["Log"]),
                svc("Log", &[]),
            ])
            .unwrap();

        let hubs = graph.hubs();
        assert_eq!(hubs[0].id, "Log");
        assert_eq!(hubs[0].dependents, 3);
        assert_eq!(hubs[1].id, "Api");
        assert_eq!(hubs.len(), 2);
    }
}
