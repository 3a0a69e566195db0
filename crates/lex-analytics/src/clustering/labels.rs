//! Human-readable cluster names per domain.

use crate::types::Domain;

const DEMOGRAPHIC_LABELS: &[&str] = &[
    "Young Adults",
    "Working-Age Families",
    "Middle-Aged Households",
    "Senior Residents",
    "Urban Professionals",
    "Rural Communities",
];

const HEALTHCARE_LABELS: &[&str] = &[
    "Low-Risk Patients",
    "Moderate-Risk Patients",
    "High-Risk Patients",
    "Chronic Care Group",
    "Preventive Care Group",
    "Acute Care Group",
];

const QUALITY_OF_LIFE_LABELS: &[&str] = &[
    "Thriving",
    "Stable",
    "Vulnerable",
    "Struggling",
    "Improving",
    "Declining",
];

const EDUCATIONAL_LABELS: &[&str] = &[
    "High Achievers",
    "Steady Progress",
    "Needs Support",
    "At-Risk Learners",
    "Emerging Learners",
    "Advanced Learners",
];

fn pool(domain: &Domain) -> Option<&'static [&'static str]> {
    match domain {
        Domain::Demographic => Some(DEMOGRAPHIC_LABELS),
        Domain::Healthcare => Some(HEALTHCARE_LABELS),
        Domain::QualityOfLife => Some(QUALITY_OF_LIFE_LABELS),
        Domain::Educational => Some(EDUCATIONAL_LABELS),
        Domain::Other(_) => None,
    }
}

/// Label for the cluster at `index`.
///
/// Known domains draw from their pool, numbering repeats once it runs
/// out. Other domains get `Group A`, `Group B`, and so on.
pub(crate) fn cluster_label(domain: &Domain, index: usize) -> String {
    match pool(domain) {
        Some(labels) if index < labels.len() => labels[index].to_string(),
        Some(labels) => format!(
            "{} {}",
            labels[index % labels.len()],
            index / labels.len() + 1
        ),
        None => group_label(index),
    }
}

fn group_label(index: usize) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    match LETTERS.get(index) {
        Some(letter) => format!("Group {}", *letter as char),
        None => format!("Group {}", index + 1),
    }
}
