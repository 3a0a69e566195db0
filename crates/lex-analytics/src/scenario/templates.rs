//! Static scenario tables, three per domain.

use crate::types::{Domain, Priority, Timeframe};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Template {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub priority: Priority,
    pub timeframe: Timeframe,
    pub actions: &'static [&'static str],
    pub indicators: &'static [&'static str],
    pub risks: &'static [&'static str],
}

const DEMOGRAPHIC: [Template; 3] = [
    Template {
        title: "Population Services Planning",
        description: "Align public service capacity with the age and household structure observed in the data.",
        category: "service_planning",
        priority: Priority::High,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Map service demand by age group and region",
            "Reallocate capacity toward fast-growing groups",
            "Coordinate planning with local administrations",
        ],
        indicators: &[
            "Service coverage per 1,000 residents",
            "Waiting time for public services",
        ],
        risks: &[
            "Outdated registry data",
            "Internal migration shifting demand",
        ],
    },
    Template {
        title: "Youth Employment Initiative",
        description: "Reduce outward migration of young adults through targeted employment and training programs.",
        category: "economic_development",
        priority: Priority::Medium,
        timeframe: Timeframe::LongTerm,
        actions: &[
            "Partner with employers on apprenticeship programs",
            "Fund vocational training in underserved regions",
        ],
        indicators: &[
            "Youth unemployment rate",
            "Net migration of residents aged 18-35",
        ],
        risks: &["Limited employer participation", "Funding discontinuity"],
    },
    Template {
        title: "Aging Population Support",
        description: "Prepare social and health services for a growing share of senior residents.",
        category: "social_support",
        priority: Priority::Medium,
        timeframe: Timeframe::LongTerm,
        actions: &[
            "Expand home-care programs",
            "Improve accessibility of public buildings and transport",
        ],
        indicators: &[
            "Share of seniors receiving home care",
            "Old-age dependency ratio",
        ],
        risks: &["Caregiver shortages", "Rising pension costs"],
    },
];

const HEALTHCARE: [Template; 3] = [
    Template {
        title: "Preventive Screening Program",
        description: "Detect chronic conditions earlier by extending screening to high-risk patient groups.",
        category: "prevention",
        priority: Priority::High,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Identify high-risk patients from existing records",
            "Schedule annual screenings in primary care",
            "Track follow-up completion",
        ],
        indicators: &[
            "Screening coverage in target groups",
            "Share of conditions detected at an early stage",
        ],
        risks: &["Low patient turnout", "Limited laboratory capacity"],
    },
    Template {
        title: "Chronic Care Coordination",
        description: "Reduce avoidable hospital admissions through coordinated management of chronic patients.",
        category: "care_management",
        priority: Priority::High,
        timeframe: Timeframe::LongTerm,
        actions: &[
            "Assign care coordinators to chronic patients",
            "Share treatment plans between providers",
        ],
        indicators: &[
            "Avoidable admission rate",
            "Medication adherence",
        ],
        risks: &["Fragmented health records", "Staff turnover"],
    },
    Template {
        title: "Health Literacy Campaign",
        description: "Improve patient understanding of treatment and prevention through community outreach.",
        category: "education",
        priority: Priority::Low,
        timeframe: Timeframe::ShortTerm,
        actions: &[
            "Publish plain-language guidance for common conditions",
            "Run community information sessions",
        ],
        indicators: &["Campaign reach", "Self-reported understanding of treatment"],
        risks: &["Low engagement", "Misinformation from other sources"],
    },
];

const QUALITY_OF_LIFE: [Template; 3] = [
    Template {
        title: "Community Well-being Program",
        description: "Raise reported well-being through accessible community, cultural and recreational services.",
        category: "community",
        priority: Priority::High,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Open multi-purpose community centers",
            "Subsidize cultural and sports activities",
        ],
        indicators: &[
            "Average life-satisfaction score",
            "Participation in community activities",
        ],
        risks: &["Uneven access across districts", "Maintenance costs"],
    },
    Template {
        title: "Housing Conditions Improvement",
        description: "Address the housing factors most associated with low quality-of-life scores.",
        category: "housing",
        priority: Priority::Medium,
        timeframe: Timeframe::LongTerm,
        actions: &[
            "Fund energy-efficiency renovations",
            "Prioritize households reporting poor housing conditions",
        ],
        indicators: &["Share of households in adequate housing", "Heating cost burden"],
        risks: &["Construction delays", "Rising material prices"],
    },
    Template {
        title: "Work-Life Balance Initiative",
        description: "Reduce time pressure and stress reported by working residents.",
        category: "employment",
        priority: Priority::Low,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Promote flexible working arrangements",
            "Extend childcare opening hours",
        ],
        indicators: &["Reported stress levels", "Average commuting time"],
        risks: &["Employer resistance", "Limited childcare staff"],
    },
];

const EDUCATIONAL: [Template; 3] = [
    Template {
        title: "Learning Recovery Program",
        description: "Close learning gaps for students performing below grade level.",
        category: "academic_support",
        priority: Priority::High,
        timeframe: Timeframe::ShortTerm,
        actions: &[
            "Run diagnostic assessments at the start of term",
            "Provide small-group tutoring for students below grade level",
            "Monitor progress every month",
        ],
        indicators: &[
            "Share of students at grade level",
            "Attendance in tutoring sessions",
        ],
        risks: &["Tutor availability", "Student fatigue"],
    },
    Template {
        title: "Teacher Professional Development",
        description: "Strengthen teaching quality through continuous training and peer mentoring.",
        category: "teacher_development",
        priority: Priority::Medium,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Establish peer mentoring between experienced and new teachers",
            "Offer training on formative assessment",
        ],
        indicators: &["Training hours per teacher", "Classroom observation scores"],
        risks: &["Limited time for training", "Teacher turnover"],
    },
    Template {
        title: "Digital Learning Access",
        description: "Ensure every learner can use digital learning resources at school and at home.",
        category: "infrastructure",
        priority: Priority::Medium,
        timeframe: Timeframe::LongTerm,
        actions: &[
            "Provide devices to students without access",
            "Improve school internet connectivity",
        ],
        indicators: &["Device-to-student ratio", "Use of the learning platform"],
        risks: &["Device maintenance costs", "Unequal home connectivity"],
    },
];

const GENERIC: [Template; 3] = [
    Template {
        title: "Data-Driven Improvement Plan",
        description: "Use the analysed records to set measurable improvement targets.",
        category: "planning",
        priority: Priority::Medium,
        timeframe: Timeframe::MediumTerm,
        actions: &[
            "Define baseline metrics from the current dataset",
            "Set quarterly improvement targets",
        ],
        indicators: &["Progress against baseline metrics"],
        risks: &["Targets based on incomplete data"],
    },
    Template {
        title: "Data Collection Review",
        description: "Review how records are collected to improve future analyses.",
        category: "data_governance",
        priority: Priority::Low,
        timeframe: Timeframe::ShortTerm,
        actions: &[
            "Document data sources and collection procedures",
            "Standardize field formats",
        ],
        indicators: &["Share of records passing validation"],
        risks: &["Inconsistent collection across sources"],
    },
    Template {
        title: "Stakeholder Reporting",
        description: "Share findings with stakeholders and gather feedback on priorities.",
        category: "communication",
        priority: Priority::Low,
        timeframe: Timeframe::ShortTerm,
        actions: &["Publish a summary of key findings", "Hold a feedback session"],
        indicators: &["Stakeholder feedback received"],
        risks: &["Findings misinterpreted without context"],
    },
];

/// The static scenarios for `domain`; unknown domains get a generic set.
pub(crate) fn templates_for(domain: &Domain) -> &'static [Template] {
    match domain {
        Domain::Demographic => &DEMOGRAPHIC,
        Domain::Healthcare => &HEALTHCARE,
        Domain::QualityOfLife => &QUALITY_OF_LIFE,
        Domain::Educational => &EDUCATIONAL,
        Domain::Other(_) => &GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_templates_per_domain() {
        for domain in [
            Domain::Demographic,
            Domain::Healthcare,
            Domain::QualityOfLife,
            Domain::Educational,
            Domain::Other("retail".to_string()),
        ] {
            let templates = templates_for(&domain);
            assert_eq!(templates.len(), 3, "domain {}", domain);
            assert!(templates.iter().all(|t| !t.actions.is_empty()));
        }
    }
}
