use depscope_analysis::analyze_services;
use depscope_protocol::{AnalysisOptions, DiscoveryMethod, Scope, ServiceRecord, ServiceType};
use proptest::prelude::*;

fn records_strategy() -> impl Strategy<Value = Vec<ServiceRecord>> {
    prop::collection::vec(
        (
            0usize..12,
            prop::sample::select(Scope::ALL.to_vec()),
            prop::collection::vec(0usize..15, 0..8),
        ),
        0..14,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .map(|(id, scope, deps)| {
                ServiceRecord::new(
                    format!("S{id}"),
                    ServiceType::Custom,
                    scope,
                    DiscoveryMethod::Introspection,
                )
                .with_dependencies(deps.into_iter().map(|d| format!("S{d}")))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn scores_stay_in_range(records in records_strategy()) {
        let sections = analyze_services(&records, &AnalysisOptions::default()).unwrap();

        prop_assert!(sections.architecture.health_score <= 100);
        prop_assert!(sections.performance.overall_score <= 100);
    }

    #[test]
    fn node_count_is_capped(records in records_strategy(), cap in 1usize..6) {
        let options = AnalysisOptions { max_services: cap, ..AnalysisOptions::minimal() };
        let sections = analyze_services(&records, &options).unwrap();

        let mut unique: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(sections.graph.metrics.total_nodes, unique.len().min(cap));
    }

    #[test]
    fn recommendations_sorted_and_never_empty(records in records_strategy()) {
        let sections = analyze_services(&records, &AnalysisOptions::minimal()).unwrap();

        prop_assert!(!sections.recommendations.is_empty());
        prop_assert!(sections
            .recommendations
            .windows(2)
            .all(|w| w[0].priority <= w[1].priority));
    }
}
