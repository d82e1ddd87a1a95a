//! Ideal-customer-profile rubric shared by discovery and qualification.
//!
//! The rubric is loaded once at startup, validated, and then handed around as
//! an `Arc<IcpConfig>`. Nothing mutates it after load.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Point value awarded per scoring factor. The five values must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub industry_match: u32,
    pub company_size_match: u32,
    pub title_match: u32,
    pub location_match: u32,
    pub technology_match: u32,
}

impl ScoringWeights {
    /// Summed in `u64` so oversized weights cannot wrap back to a valid total.
    pub fn total(&self) -> u64 {
        [
            self.industry_match,
            self.company_size_match,
            self.title_match,
            self.location_match,
            self.technology_match,
        ]
        .iter()
        .map(|weight| u64::from(*weight))
        .sum()
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            industry_match: 25,
            company_size_match: 20,
            title_match: 25,
            location_match: 15,
            technology_match: 15,
        }
    }
}

/// Target market description used to filter and score leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcpConfig {
    pub industries: Vec<String>,
    pub min_employees: u32,
    pub max_employees: u32,
    pub target_funding_stages: Vec<String>,
    pub target_titles: Vec<String>,
    pub target_locations: Vec<String>,
    pub technology_signals: Vec<String>,
    pub scoring_weights: ScoringWeights,
    pub min_qualification_score: u32,
}

impl Default for IcpConfig {
    fn default() -> Self {
        Self {
            industries: strings(&[
                "B2B SaaS",
                "Sales Technology",
                "Marketing Technology",
                "FinTech",
                "Enterprise Software",
                "Revenue Operations",
            ]),
            min_employees: 20,
            max_employees: 500,
            target_funding_stages: strings(&["Series A", "Series B", "Series C", "Bootstrapped"]),
            target_titles: strings(&[
                "VP of Sales",
                "Vice President of Sales",
                "Head of Sales",
                "Chief Revenue Officer",
                "CRO",
                "VP of Growth",
                "Vice President of Growth",
                "VP of Marketing",
                "Vice President of Marketing",
                "Director of Sales",
                "Director of Marketing",
                "Director of Product",
                "Director of Strategy",
                "Senior Director",
                "Senior Vice President",
                "CEO",
                "Co-Founder",
                "Chief of Staff",
            ]),
            target_locations: strings(&["United States", "Canada", "United Kingdom", "Australia"]),
            technology_signals: strings(&[
                "Salesforce",
                "HubSpot",
                "Outreach",
                "Salesloft",
                "ZoomInfo",
                "LinkedIn Sales Navigator",
            ]),
            scoring_weights: ScoringWeights::default(),
            min_qualification_score: 60,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl IcpConfig {
    /// Load the default rubric, or the JSON file at `path` layered over it.
    pub fn load(path: Option<&Path>) -> Result<Self, IcpConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| IcpConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_json(&raw)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, IcpConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IcpConfigError> {
        let total = self.scoring_weights.total();
        if total != 100 {
            return Err(IcpConfigError::WeightsTotal(total));
        }

        if self.min_qualification_score > 100 {
            return Err(IcpConfigError::ThresholdOutOfRange(
                self.min_qualification_score,
            ));
        }

        if self.min_employees > self.max_employees {
            return Err(IcpConfigError::EmployeeRange {
                min: self.min_employees,
                max: self.max_employees,
            });
        }

        for (list, values) in [
            ("industries", &self.industries),
            ("target_titles", &self.target_titles),
            ("target_locations", &self.target_locations),
            ("technology_signals", &self.technology_signals),
        ] {
            if values.iter().any(|value| value.trim().is_empty()) {
                return Err(IcpConfigError::EmptyPattern(list));
            }
        }

        Ok(())
    }

    /// Case-insensitive check used by discovery to keep decision makers only.
    pub fn is_target_title(&self, title: &str) -> bool {
        contains_any(title, &self.target_titles)
    }
}

/// True when `haystack` contains any of `patterns`, ignoring case.
pub(crate) fn contains_any(haystack: &str, patterns: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    patterns
        .iter()
        .any(|pattern| haystack.contains(&pattern.to_lowercase()))
}

#[derive(Debug, thiserror::Error)]
pub enum IcpConfigError {
    #[error("scoring weights must sum to 100, got {0}")]
    WeightsTotal(u64),
    #[error("min_qualification_score must be within 0..=100, got {0}")]
    ThresholdOutOfRange(u32),
    #[error("min_employees ({min}) exceeds max_employees ({max})")]
    EmployeeRange { min: u32, max: u32 },
    #[error("{0} contains an empty pattern")]
    EmptyPattern(&'static str),
    #[error("failed to read ICP config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid ICP config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
