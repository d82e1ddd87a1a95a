use serde::{Deserialize, Serialize};

/// Technology names kept per company after enrichment.
pub const MAX_TECHNOLOGIES: usize = 10;

/// Decision maker found at a company domain, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLead {
    pub contact_name: String,
    #[serde(default)]
    pub contact_title: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_linkedin: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    #[serde(default = "default_discovery_source")]
    pub data_source: String,
}

fn default_discovery_source() -> String {
    "hunter".to_string()
}

/// Contact plus firmographic signals and deliverability, ready for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedLead {
    pub contact_name: String,
    #[serde(default)]
    pub contact_title: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_linkedin: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub funding_stage: Option<String>,
    #[serde(default)]
    pub annual_revenue: Option<String>,
    #[serde(default)]
    pub technology_stack: Option<Vec<String>>,
    #[serde(default)]
    pub email_verified: bool,
}

impl EnrichedLead {
    pub fn new(contact_name: impl Into<String>) -> Self {
        Self {
            contact_name: contact_name.into(),
            ..Self::default()
        }
    }

    /// Reject shapes the scoring rubric does not accept.
    pub fn validate(&self) -> Result<(), LeadValidationError> {
        if self.contact_name.trim().is_empty() {
            return Err(LeadValidationError::MissingContactName);
        }

        if let Some(stack) = &self.technology_stack {
            if stack.len() > MAX_TECHNOLOGIES {
                return Err(LeadValidationError::TechnologyStackTooLong(stack.len()));
            }
        }

        Ok(())
    }

    /// Stable identity used to join drafts back onto leads.
    pub fn lead_key(&self) -> &str {
        present(&self.contact_email).unwrap_or(&self.contact_name)
    }
}

/// Scored lead. Carries the enriched fields through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedLead {
    #[serde(flatten)]
    pub lead: EnrichedLead,
    pub qualification_score: u32,
    pub qualification_notes: Vec<String>,
    pub icp_match: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("contact name is empty")]
    MissingContactName,
    #[error("technology stack has {0} entries, at most 10 are allowed")]
    TechnologyStackTooLong(usize),
}

/// Treat empty or whitespace-only strings as missing.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
