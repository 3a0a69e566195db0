//! Scenarios synthesized from fuzzy and clustering results.

use super::Draft;
use crate::types::{Cluster, Domain, FuzzyResult, Priority, Timeframe};

pub(crate) const UNCERTAINTY_MANAGEMENT: &str = "uncertainty_management";
pub(crate) const RAPID_IMPLEMENTATION: &str = "rapid_implementation";
pub(crate) const STRATIFIED_APPROACH: &str = "stratified_approach";
pub(crate) const TARGETED_INTERVENTION: &str = "targeted_intervention";

/// Low-confidence share above which uncertainty management is proposed.
const UNCERTAINTY_TRIGGER: u32 = 40;
/// High-confidence share above which rapid implementation is proposed.
const RAPID_TRIGGER: u32 = 70;
/// Clusters larger than this get their own targeted scenario.
const TARGETED_MIN_SIZE: usize = 20;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn from_fuzzy(domain: &Domain, fuzzy: &FuzzyResult) -> Vec<Draft> {
    let subject = domain.subject();
    let mut drafts = Vec::new();

    if fuzzy.low > UNCERTAINTY_TRIGGER {
        drafts.push(Draft {
            title: "Uncertainty Management Plan".to_string(),
            description: format!(
                "{}% of {} records have low confidence. Decisions should rely on verified data while data quality is improved.",
                fuzzy.low, subject
            ),
            category: UNCERTAINTY_MANAGEMENT.to_string(),
            priority: Priority::High,
            timeframe: Timeframe::ShortTerm,
            actions: strings(&[
                "Verify low-confidence records against their sources",
                "Use ranges instead of point estimates in reporting",
                "Schedule a follow-up data collection round",
            ]),
            indicators: strings(&[
                "Share of low-confidence records",
                "Number of verified corrections",
            ]),
            risks: strings(&[
                "Decisions delayed by verification",
                "Hidden bias in the remaining records",
            ]),
            adaptive: true,
        });
    }

    if fuzzy.high > RAPID_TRIGGER {
        drafts.push(Draft {
            title: "Rapid Implementation".to_string(),
            description: format!(
                "{}% of {} records have high confidence, which supports moving quickly from analysis to action.",
                fuzzy.high, subject
            ),
            category: RAPID_IMPLEMENTATION.to_string(),
            priority: Priority::Medium,
            timeframe: Timeframe::ShortTerm,
            actions: strings(&[
                "Launch the highest-priority measures now",
                "Set up monitoring from the first month",
            ]),
            indicators: strings(&["Time from analysis to first action"]),
            risks: strings(&["Overconfidence in a single data snapshot"]),
            adaptive: true,
        });
    }

    drafts
}

pub(crate) fn from_clusters(domain: &Domain, clusters: &[Cluster]) -> Vec<Draft> {
    if clusters.is_empty() {
        return Vec::new();
    }

    let subject = domain.subject();
    let labels: Vec<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
    let mut drafts = vec![Draft {
        title: "Stratified Approach".to_string(),
        description: format!(
            "The {} records form {} distinct groups ({}). Tailor measures to each group instead of a single program.",
            subject,
            clusters.len(),
            labels.join(", ")
        ),
        category: STRATIFIED_APPROACH.to_string(),
        priority: Priority::Medium,
        timeframe: Timeframe::MediumTerm,
        actions: strings(&[
            "Define objectives for each group",
            "Allocate resources in proportion to group size and need",
        ]),
        indicators: strings(&["Outcome gap between groups"]),
        risks: strings(&["Groups may shift as new data arrives"]),
        adaptive: true,
    }];

    drafts.extend(
        clusters
            .iter()
            .filter(|c| c.size > TARGETED_MIN_SIZE)
            .map(|cluster| Draft {
                title: format!("Targeted Program: {}", cluster.label),
                description: format!(
                    "A dedicated program for the {} {} records in the '{}' group.",
                    cluster.size, subject, cluster.label
                ),
                category: TARGETED_INTERVENTION.to_string(),
                priority: Priority::Medium,
                timeframe: Timeframe::MediumTerm,
                actions: vec![
                    format!("Survey the needs of the '{}' group", cluster.label),
                    "Design measures specific to this group".to_string(),
                ],
                indicators: vec![format!("Outcomes within the '{}' group", cluster.label)],
                risks: strings(&["Group boundaries may be imprecise"]),
                adaptive: true,
            }),
    );

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuzzy(low: u32, medium: u32, high: u32) -> FuzzyResult {
        FuzzyResult {
            low,
            medium,
            high,
            ..FuzzyResult::empty()
        }
    }

    fn cluster(id: usize, size: usize) -> Cluster {
        Cluster {
            id,
            label: format!("Group {}", id),
            size,
            center: Vec::new(),
            points: Vec::new(),
            member_indices: Vec::new(),
            avg_value: 0.0,
            quality: 0.0,
        }
    }

    #[test]
    fn test_fuzzy_triggers() {
        let drafts = from_fuzzy(&Domain::Healthcare, &fuzzy(45, 30, 25));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, UNCERTAINTY_MANAGEMENT);
        assert_eq!(drafts[0].priority, Priority::High);

        let drafts = from_fuzzy(&Domain::Healthcare, &fuzzy(5, 20, 75));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].category, RAPID_IMPLEMENTATION);

        // thresholds are strict
        assert!(from_fuzzy(&Domain::Healthcare, &fuzzy(40, 30, 30)).is_empty());
    }

    #[test]
    fn test_cluster_scenarios() {
        let clusters = vec![cluster(0, 21), cluster(1, 20), cluster(2, 50)];
        let drafts = from_clusters(&Domain::Demographic, &clusters);
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].category, STRATIFIED_APPROACH);
        assert_eq!(drafts[1].title, "Targeted Program: Group 0");
        assert_eq!(drafts[2].title, "Targeted Program: Group 2");

        assert!(from_clusters(&Domain::Demographic, &[]).is_empty());
    }
}
