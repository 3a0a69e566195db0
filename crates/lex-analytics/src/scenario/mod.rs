//! Scenario synthesis.
//!
//! Combines the static templates of a domain with adaptive scenarios built
//! from the fuzzy distribution and the clusters, ranks them and keeps the
//! top five. Synthesis never fails toward the caller; inconsistent inputs
//! produce a single generic scenario flagged as a fallback.

mod adaptive;
mod templates;

use crate::error::{Analysis, AnalyticsError, Result, recover};
use crate::types::{
    Cluster, Domain, FuzzyResult, Priority, Scenario, ScenarioMetadata, Timeframe,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use adaptive::UNCERTAINTY_MANAGEMENT;
use templates::{Template, templates_for};

/// Maximum number of scenarios returned.
pub const MAX_SCENARIOS: usize = 5;

/// Low-confidence share above which uncertainty management ranks first among equals.
const UNCERTAINTY_PREFERENCE: u32 = 30;

/// A scenario before ranking and metadata.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub timeframe: Timeframe,
    pub actions: Vec<String>,
    pub indicators: Vec<String>,
    pub risks: Vec<String>,
    pub adaptive: bool,
}

impl From<&Template> for Draft {
    fn from(template: &Template) -> Self {
        let owned =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            title: template.title.to_string(),
            description: template.description.to_string(),
            category: template.category.to_string(),
            priority: template.priority,
            timeframe: template.timeframe,
            actions: owned(template.actions),
            indicators: owned(template.indicators),
            risks: owned(template.risks),
            adaptive: false,
        }
    }
}

impl Draft {
    fn into_scenario(self, metadata: &ScenarioMetadata) -> Scenario {
        Scenario {
            priority_text: self.priority.display_name().to_string(),
            timeframe_text: self.timeframe.display_text().to_string(),
            metadata: ScenarioMetadata {
                adaptive: self.adaptive,
                ..metadata.clone()
            },
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            timeframe: self.timeframe,
            actions: self.actions,
            indicators: self.indicators,
            risks: self.risks,
            adaptive: self.adaptive,
        }
    }
}

pub struct ScenarioSynthesizer;

impl ScenarioSynthesizer {
    /// Build at most [`MAX_SCENARIOS`] ranked scenarios.
    ///
    /// Either input may be absent when its stage was skipped.
    pub fn synthesize(
        domain: &Domain,
        fuzzy: Option<&FuzzyResult>,
        clusters: Option<&[Cluster]>,
    ) -> Analysis<Vec<Scenario>> {
        let generated_at = Utc::now();
        recover(
            "Scenario synthesis",
            Self::try_synthesize(domain, fuzzy, clusters, generated_at),
            |_| vec![fallback_scenario(domain, generated_at)],
        )
    }

    fn try_synthesize(
        domain: &Domain,
        fuzzy: Option<&FuzzyResult>,
        clusters: Option<&[Cluster]>,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<Scenario>> {
        validate_inputs(fuzzy, clusters)?;

        let mut drafts: Vec<Draft> = templates_for(domain).iter().map(Draft::from).collect();
        if let Some(fuzzy) = fuzzy {
            drafts.extend(adaptive::from_fuzzy(domain, fuzzy));
        }
        if let Some(clusters) = clusters {
            drafts.extend(adaptive::from_clusters(domain, clusters));
        }
        debug!("{} scenario candidates for {}", drafts.len(), domain);

        let prefer_uncertainty = fuzzy.is_some_and(|f| f.low > UNCERTAINTY_PREFERENCE);
        rank(&mut drafts, prefer_uncertainty);
        drafts.truncate(MAX_SCENARIOS);

        let metadata = ScenarioMetadata {
            generated_at,
            data_type: domain.as_str().to_string(),
            confidence: fuzzy.map(|f| f.high),
            uncertainty: fuzzy.map(|f| f.low),
            adaptive: false,
            fallback: false,
        };

        let scenarios: Vec<Scenario> = drafts
            .into_iter()
            .map(|d| d.into_scenario(&metadata))
            .collect();
        info!(
            "Synthesized {} scenarios ({} adaptive)",
            scenarios.len(),
            scenarios.iter().filter(|s| s.adaptive).count()
        );
        Ok(scenarios)
    }
}

fn validate_inputs(fuzzy: Option<&FuzzyResult>, clusters: Option<&[Cluster]>) -> Result<()> {
    if let Some(fuzzy) = fuzzy {
        let total = fuzzy.total();
        if total != 0 && !(99..=101).contains(&total) {
            return Err(AnalyticsError::InconsistentInput(format!(
                "confidence distribution sums to {}",
                total
            )));
        }
    }
    if let Some(bad) = clusters
        .unwrap_or_default()
        .iter()
        .find(|c| c.size != c.points.len())
    {
        return Err(AnalyticsError::InconsistentInput(format!(
            "cluster {} reports size {} but holds {} records",
            bad.id,
            bad.size,
            bad.points.len()
        )));
    }
    Ok(())
}

/// Stable sort: priority, then adaptive before static, then (optionally)
/// uncertainty management first.
fn rank(drafts: &mut [Draft], prefer_uncertainty: bool) {
    let preferred = |d: &Draft| prefer_uncertainty && d.category == UNCERTAINTY_MANAGEMENT;
    drafts.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then(b.adaptive.cmp(&a.adaptive))
            .then(preferred(b).cmp(&preferred(a)))
    });
}

fn fallback_scenario(domain: &Domain, generated_at: DateTime<Utc>) -> Scenario {
    let priority = Priority::Medium;
    let timeframe = Timeframe::MediumTerm;
    Scenario {
        title: "General Data Review".to_string(),
        description: format!(
            "Scenario generation for the {} domain could not be completed. Review the input data and re-run the analysis.",
            domain.display_name()
        ),
        category: "general".to_string(),
        priority,
        timeframe,
        actions: vec![
            "Review data completeness and consistency".to_string(),
            "Re-run the analysis after corrections".to_string(),
        ],
        indicators: vec!["Successful analysis run".to_string()],
        risks: vec!["Decisions made without analytical support".to_string()],
        adaptive: false,
        priority_text: priority.display_name().to_string(),
        timeframe_text: timeframe.display_text().to_string(),
        metadata: ScenarioMetadata {
            generated_at,
            data_type: domain.as_str().to_string(),
            confidence: None,
            uncertainty: None,
            adaptive: false,
            fallback: true,
        },
    }
}
