//! Deterministic ICP qualification.
//!
//! Each lead is scored on five independent factors (industry, company size,
//! title, location, technology). The total is the sum of the factor points and
//! the lead matches the ICP when the total reaches the configured threshold.
//! Scoring reads only the lead and the immutable rubric, so it is safe to run
//! on any number of leads in parallel.

pub(crate) mod rules;

#[cfg(test)]
mod tests;

use crate::config::IcpConfig;
use crate::workflows::leads::{EnrichedLead, QualifiedLead};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Rubric factor, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFactor {
    Industry,
    CompanySize,
    Title,
    Location,
    Technology,
}

impl ScoringFactor {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Industry,
            Self::CompanySize,
            Self::Title,
            Self::Location,
            Self::Technology,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Industry => "Industry",
            Self::CompanySize => "Company size",
            Self::Title => "Title",
            Self::Location => "Location",
            Self::Technology => "Technology",
        }
    }
}

/// Points and explanation contributed by one factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoringFactor,
    pub points: u32,
    pub note: String,
}

/// Full breakdown for a single lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    pub components: [ScoreComponent; 5],
    pub total: u32,
    pub icp_match: bool,
}

impl Scorecard {
    pub fn notes(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|component| component.note.clone())
            .collect()
    }
}

/// Result of qualifying a batch: scored leads, best first, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualificationBatch {
    pub leads: Vec<QualifiedLead>,
    pub dropped: usize,
}

impl QualificationBatch {
    pub fn passed(&self) -> usize {
        self.leads.iter().filter(|lead| lead.icp_match).count()
    }

    pub fn matching(&self) -> impl Iterator<Item = &QualifiedLead> {
        self.leads.iter().filter(|lead| lead.icp_match)
    }
}

/// Score a lead against the rubric without consuming it.
pub fn scorecard(lead: &EnrichedLead, config: &IcpConfig) -> Scorecard {
    let components = rules::score_lead(lead, config);
    let total = components.iter().map(|component| component.points).sum();

    Scorecard {
        components,
        total,
        icp_match: total >= config.min_qualification_score,
    }
}

pub fn qualify(lead: EnrichedLead, config: &IcpConfig) -> QualifiedLead {
    let card = scorecard(&lead, config);

    QualifiedLead {
        qualification_notes: card.notes(),
        qualification_score: card.total,
        icp_match: card.icp_match,
        lead,
    }
}

/// Qualify every valid lead and sort by score, highest first.
///
/// A lead that fails validation is logged and left out; it never stops the
/// rest of the batch. Ties keep their input order.
pub fn qualify_all(leads: Vec<EnrichedLead>, config: &IcpConfig) -> QualificationBatch {
    let mut batch = QualificationBatch::default();

    for lead in leads {
        if let Err(err) = lead.validate() {
            error!(contact = %lead.contact_name, error = %err, "failed to qualify lead");
            batch.dropped += 1;
            continue;
        }

        info!(
            contact = %lead.contact_name,
            company = lead.company_name.as_deref().unwrap_or("unknown"),
            "qualifying lead"
        );
        batch.leads.push(qualify(lead, config));
    }

    batch
        .leads
        .sort_by(|left, right| right.qualification_score.cmp(&left.qualification_score));

    info!(
        passed = batch.passed(),
        total = batch.leads.len(),
        "qualification complete: {}/{} leads passed ICP threshold",
        batch.passed(),
        batch.leads.len()
    );

    batch
}

/// Stateless engine bound to a shared rubric.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    config: Arc<IcpConfig>,
}

impl QualificationEngine {
    pub fn new(config: Arc<IcpConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IcpConfig {
        &self.config
    }

    pub fn scorecard(&self, lead: &EnrichedLead) -> Scorecard {
        scorecard(lead, &self.config)
    }

    pub fn qualify(&self, lead: EnrichedLead) -> QualifiedLead {
        qualify(lead, &self.config)
    }

    pub fn qualify_all(&self, leads: Vec<EnrichedLead>) -> QualificationBatch {
        qualify_all(leads, &self.config)
    }
}
