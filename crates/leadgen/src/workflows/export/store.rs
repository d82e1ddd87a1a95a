use crate::workflows::leads::QualifiedLead;
use crate::workflows::outreach::OutreachDraft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DATA_SOURCE: &str = "hunter+apollo";
pub const ENRICHMENT_STATUS: &str = "enriched";

/// Row persisted per lead, keyed by `contact_email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub contact_name: String,
    pub contact_title: Option<String>,
    pub contact_email: String,
    pub contact_linkedin: Option<String>,
    pub company_name: Option<String>,
    pub company_domain: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<u32>,
    pub headquarters: Option<String>,
    pub funding_stage: Option<String>,
    pub annual_revenue: Option<String>,
    pub qualification_score: u32,
    pub icp_match: bool,
    pub email_verified: bool,
    pub outreach_email_draft: Option<String>,
    pub outreach_status: String,
    pub data_source: String,
    pub enrichment_status: String,
}

impl LeadRecord {
    /// Build the stored row. Returns `None` for leads without an email address.
    pub fn from_lead(lead: &QualifiedLead, draft: Option<&OutreachDraft>) -> Option<Self> {
        let details = &lead.lead;
        let contact_email = details
            .contact_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())?
            .to_string();

        Some(Self {
            contact_name: details.contact_name.clone(),
            contact_title: details.contact_title.clone(),
            contact_email,
            contact_linkedin: details.contact_linkedin.clone(),
            company_name: details.company_name.clone(),
            company_domain: details.company_domain.clone(),
            industry: details.industry.clone(),
            employee_count: details.employee_count,
            headquarters: details.headquarters.clone(),
            funding_stage: details.funding_stage.clone(),
            annual_revenue: details.annual_revenue.clone(),
            qualification_score: lead.qualification_score,
            icp_match: lead.icp_match,
            email_verified: details.email_verified,
            outreach_email_draft: draft.map(|draft| draft.email_body.clone()),
            outreach_status: draft
                .map(|draft| draft.outreach_status.label())
                .unwrap_or("pending")
                .to_string(),
            data_source: DATA_SOURCE.to_string(),
            enrichment_status: ENRICHMENT_STATUS.to_string(),
        })
    }
}

/// Filter for listing stored leads, best scores first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadQuery {
    pub min_score: Option<u32>,
    pub limit: usize,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            min_score: None,
            limit: 50,
        }
    }
}

/// Persistence seam for exported leads.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert or replace the row with the same `contact_email`.
    async fn upsert(&self, record: LeadRecord) -> Result<(), StoreError>;
    async fn list(&self, query: LeadQuery) -> Result<Vec<LeadRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
    #[error("lead store rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
