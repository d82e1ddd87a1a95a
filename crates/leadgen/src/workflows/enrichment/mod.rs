//! Company firmographics and email deliverability for discovered leads.
//!
//! Both lookups are best effort. A company the provider does not know, or a
//! verifier that fails, degrades to an empty profile or an unverified address
//! instead of failing the lead. Only a company lookup that exhausts its
//! retries drops the lead, and then only that one lead.

use crate::providers::ProviderError;
use crate::workflows::leads::{DiscoveredLead, EnrichedLead, MAX_TECHNOLOGIES};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Firmographic signals for one company domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<u32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub funding_stage: Option<String>,
    pub annual_revenue: Option<String>,
    pub technology_names: Vec<String>,
}

impl CompanyProfile {
    pub fn headquarters(&self) -> Option<String> {
        non_blank(&self.city).or_else(|| non_blank(&self.country))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
pub trait CompanyEnricher: Send + Sync {
    /// `Ok(None)` when the provider has no usable record for the domain.
    async fn enrich_company(&self, domain: &str) -> Result<Option<CompanyProfile>, ProviderError>;
}

#[async_trait]
pub trait EmailVerifier: Send + Sync {
    /// True for deliverable or accept-all addresses. Failures report `false`.
    async fn verify_email(&self, email: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("company lookup failed for {domain}: {source}")]
    Company {
        domain: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Clone)]
pub struct EnrichmentAgent {
    companies: Arc<dyn CompanyEnricher>,
    verifier: Arc<dyn EmailVerifier>,
}

impl EnrichmentAgent {
    pub fn new(companies: Arc<dyn CompanyEnricher>, verifier: Arc<dyn EmailVerifier>) -> Self {
        Self {
            companies,
            verifier,
        }
    }

    pub async fn enrich_lead(&self, lead: DiscoveredLead) -> Result<EnrichedLead, EnrichmentError> {
        info!(
            contact = %lead.contact_name,
            domain = lead.company_domain.as_deref().unwrap_or("unknown"),
            "enriching lead"
        );

        let profile = match lead.company_domain.as_deref() {
            Some(domain) => self
                .companies
                .enrich_company(domain)
                .await
                .map_err(|source| EnrichmentError::Company {
                    domain: domain.to_string(),
                    source,
                })?
                .unwrap_or_default(),
            None => CompanyProfile::default(),
        };

        let email_verified = match lead.contact_email.as_deref() {
            Some(email) => self.verifier.verify_email(email).await,
            None => false,
        };

        Ok(merge(lead, profile, email_verified))
    }

    pub async fn enrich_all(&self, leads: Vec<DiscoveredLead>) -> Vec<EnrichedLead> {
        let total = leads.len();
        let mut enriched = Vec::with_capacity(total);

        for lead in leads {
            let contact = lead.contact_name.clone();
            match self.enrich_lead(lead).await {
                Ok(lead) => enriched.push(lead),
                Err(err) => error!(contact = %contact, error = %err, "failed to enrich lead"),
            }
        }

        info!(
            enriched = enriched.len(),
            total, "enrichment complete: {}/{} leads enriched",
            enriched.len(),
            total
        );
        enriched
    }
}

/// Combine a discovered contact with the company profile.
pub fn merge(lead: DiscoveredLead, profile: CompanyProfile, email_verified: bool) -> EnrichedLead {
    let headquarters = profile.headquarters();
    let CompanyProfile {
        name,
        industry,
        employee_count,
        funding_stage,
        annual_revenue,
        mut technology_names,
        ..
    } = profile;

    technology_names.truncate(MAX_TECHNOLOGIES);

    EnrichedLead {
        contact_name: lead.contact_name,
        contact_title: lead.contact_title,
        contact_email: lead.contact_email,
        contact_linkedin: lead.contact_linkedin,
        company_name: lead.company_name.or(name),
        company_domain: lead.company_domain,
        industry,
        // Providers report 0 when headcount is withheld.
        employee_count: employee_count.filter(|count| *count > 0),
        headquarters,
        funding_stage,
        annual_revenue,
        technology_stack: Some(technology_names),
        email_verified,
    }
}
