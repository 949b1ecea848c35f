use crate::architecture::ArchitectureReport;
use crate::performance::PerformanceAssessment;
use depscope_graph::CycleReport;
use serde::{Deserialize, Serialize};

const HEALTH_THRESHOLD: u32 = 70;
const DISCOVERY_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    pub benefit: String,
}

impl Recommendation {
    fn new(
        priority: Priority,
        category: &str,
        title: &str,
        description: &str,
        benefit: &str,
    ) -> Self {
        Self {
            priority,
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            steps: Vec::new(),
            benefit: benefit.to_string(),
        }
    }

    fn with_steps(mut self, steps: &[&str]) -> Self {
        self.steps = steps.iter().map(|s| (*s).to_string()).collect();
        self
    }
}

/// Inputs the generator reads; everything is borrowed from earlier stages
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub cycles: &'a CycleReport,
    pub architecture: &'a ArchitectureReport,
    pub performance: &'a PerformanceAssessment,
    pub service_count: usize,
}

/// Prioritized actions, ordered critical first and stable within a priority
pub fn generate_recommendations(input: RecommendationInput<'_>) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if input.cycles.count > 0 {
        let mut rec = Recommendation::new(
            Priority::Critical,
            "architecture",
            "Resolve circular dependencies",
            &format!(
                "{} circular dependency chain(s) involve: {}",
                input.cycles.count,
                input.cycles.affected_services.join(", ")
            ),
            "Services can be constructed, tested and lazy-loaded independently",
        )
        .with_steps(&[
            "Identify the shared responsibility that ties the services together",
            "Extract it into a new service both sides can depend on",
            "Replace direct back-references with events or an injection token",
            "Re-run the analysis to confirm the cycle is gone",
        ]);
        if !input.cycles.self_references.is_empty() {
            rec.steps.push(format!(
                "Remove self-injection from: {}",
                input.cycles.self_references.join(", ")
            ));
        }
        out.push(rec);
    }

    if input.architecture.health_score < HEALTH_THRESHOLD {
        let mut steps: Vec<&str> = input
            .architecture
            .recommendations
            .iter()
            .map(String::as_str)
            .collect();
        if steps.is_empty() {
            steps.push("Review the concerns listed in the architecture section");
        }
        out.push(
            Recommendation::new(
                Priority::High,
                "architecture",
                "Improve architecture health",
                &format!(
                    "Architecture health score is {} (below {HEALTH_THRESHOLD})",
                    input.architecture.health_score
                ),
                "Lower coupling and easier maintenance",
            )
            .with_steps(&steps),
        );
    }

    if input.service_count < DISCOVERY_THRESHOLD {
        out.push(
            Recommendation::new(
                Priority::Medium,
                "discovery",
                "Enable deeper discovery",
                &format!(
                    "Only {} service(s) were discovered; the dependency picture is likely incomplete",
                    input.service_count
                ),
                "More accurate graph, cycle and scope analysis",
            )
            .with_steps(&[
                "Run the application in development mode so the injector can be introspected",
                "Include the application bundles in the captured script sources",
            ]),
        );
    }

    for opportunity in &input.performance.optimization_opportunities {
        out.push(Recommendation::new(
            Priority::Medium,
            "performance",
            &format!("Optimize {}", opportunity.area),
            &opportunity.description,
            &opportunity.estimated_benefit,
        ));
    }

    out.extend(fixed_guidance());
    out.sort_by_key(|r| r.priority);
    out
}

fn fixed_guidance() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            Priority::Low,
            "best_practice",
            "Prefer tree-shakable providers",
            "Declare providedIn on injectable services instead of listing them in module providers",
            "Unused services are dropped from production bundles",
        ),
        Recommendation::new(
            Priority::Low,
            "best_practice",
            "Keep constructors small",
            "Inject only what a service uses directly and keep construction free of side effects",
            "Predictable instantiation order and simpler tests",
        ),
        Recommendation::new(
            Priority::Low,
            "tooling",
            "Inspect the injector tree with framework devtools",
            "Browser devtools extensions show provider hierarchies and resolution paths at runtime",
            "Faster diagnosis of scope and resolution problems",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeAnalysis;
    use depscope_graph::{CycleDetector, GraphBuilder};
    use depscope_protocol::{DiscoveryMethod, Scope, ServiceRecord, ServiceType};
    use pretty_assertions::assert_eq;

    fn run(records: &[ServiceRecord]) -> Vec<Recommendation> {
        let graph = GraphBuilder::new().build(records).unwrap();
        let cycles = CycleDetector::new().detect(&graph);
        let metrics = graph.metrics();
        let architecture = ArchitectureReport::score(&metrics, &cycles);
        let performance =
            PerformanceAssessment::assess(&ScopeAnalysis::analyze(&graph), &metrics, &cycles);
        generate_recommendations(RecommendationInput {
            cycles: &cycles,
            architecture: &architecture,
            performance: &performance,
            service_count: graph.node_count(),
        })
    }

    fn service(name: &str, deps: &[&str]) -> ServiceRecord {
        ServiceRecord::new(name, ServiceType::Custom, Scope::Module, DiscoveryMethod::Introspection)
            .with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_empty_input_asks_for_discovery() {
        let recs = run(&[]);

        assert_eq!(recs[0].priority, Priority::Medium);
        assert_eq!(recs[0].category, "discovery");
        assert!(recs.iter().any(|r| r.category == "best_practice"));
        assert!(recs.iter().any(|r| r.category == "tooling"));
    }

    #[test]
    fn test_cycle_is_critical_and_first() {
        let recs = run(&[service("A", &["B"]), service("B", &["A"])]);

        assert_eq!(recs[0].priority, Priority::Critical);
        assert_eq!(recs[0].title, "Resolve circular dependencies");
        assert!(recs[0].description.contains("A, B"));
        assert_eq!(recs[0].steps.len(), 4);
    }

    #[test]
    fn test_low_health_is_high_priority() {
        let records = vec![
            service("A", &["B"]),
            service("B", &["A"]),
            service("C", &["D"]),
            service("D", &["C"]),
            service("E", &["F"]),
            service("F", &["E"]),
        ];
        let recs = run(&records);

        let priorities: Vec<Priority> = recs.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert!(recs
            .iter()
            .any(|r| r.priority == Priority::High && r.title == "Improve architecture health"));
    }

    #[test]
    fn test_fixed_guidance_always_present() {
        let records: Vec<ServiceRecord> = (0..6).map(|i| service(&format!("S{i}"), &[])).collect();
        let recs = run(&records);

        assert_eq!(recs.len(), 3);
        assert!(recs.iter().all(|r| r.priority == Priority::Low));
    }
}
