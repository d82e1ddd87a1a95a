//! Contact discovery: find decision makers at each target company domain.

use crate::config::IcpConfig;
use crate::providers::ProviderError;
use crate::workflows::leads::DiscoveredLead;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Raw person record as returned by the contact search provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
}

impl RawContact {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Everything the provider knows about one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainContacts {
    pub company_name: Option<String>,
    pub contacts: Vec<RawContact>,
}

/// Contact search seam; implemented by the Hunter client and by test fakes.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn search_domain(&self, domain: &str) -> Result<DomainContacts, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("contact search failed for {domain}: {source}")]
    Search {
        domain: String,
        #[source]
        source: ProviderError,
    },
}

/// Applies the ICP title filter to provider results.
#[derive(Clone)]
pub struct DiscoveryAgent {
    source: Arc<dyn ContactSource>,
    icp: Arc<IcpConfig>,
    max_leads_per_domain: Option<usize>,
}

impl DiscoveryAgent {
    pub fn new(source: Arc<dyn ContactSource>, icp: Arc<IcpConfig>) -> Self {
        Self {
            source,
            icp,
            max_leads_per_domain: None,
        }
    }

    pub fn with_max_leads_per_domain(mut self, limit: Option<usize>) -> Self {
        self.max_leads_per_domain = limit;
        self
    }

    pub async fn search_domain(&self, domain: &str) -> Result<Vec<DiscoveredLead>, DiscoveryError> {
        info!(domain, "searching contacts");
        let found = self
            .source
            .search_domain(domain)
            .await
            .map_err(|source| DiscoveryError::Search {
                domain: domain.to_string(),
                source,
            })?;
        info!(domain, contacts = found.contacts.len(), "contact search returned");

        let mut leads = decision_makers(found, domain, &self.icp);
        if let Some(limit) = self.max_leads_per_domain {
            leads.truncate(limit);
        }

        Ok(leads)
    }

    pub async fn search_multiple_domains(
        &self,
        domains: &[String],
    ) -> Result<Vec<DiscoveredLead>, DiscoveryError> {
        let mut all_leads = Vec::new();
        for domain in domains {
            let leads = self.search_domain(domain).await?;
            all_leads.extend(leads);
            info!(running_total = all_leads.len(), "discovery running total");
        }
        Ok(all_leads)
    }
}

/// Keep contacts whose position names a target title.
pub fn decision_makers(
    found: DomainContacts,
    domain: &str,
    icp: &IcpConfig,
) -> Vec<DiscoveredLead> {
    let DomainContacts {
        company_name,
        contacts,
    } = found;

    contacts
        .into_iter()
        .filter_map(|contact| {
            let title = contact
                .position
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())?;
            if !icp.is_target_title(title) {
                return None;
            }

            let contact_name = contact.full_name();
            if contact_name.is_empty() {
                warn!(domain, title, "skipping malformed contact without a name");
                return None;
            }

            Some(DiscoveredLead {
                contact_name,
                contact_title: Some(title.to_string()),
                contact_email: contact.email.clone(),
                contact_linkedin: contact.linkedin.clone(),
                company_name: company_name.clone(),
                company_domain: Some(domain.to_string()),
                data_source: "hunter".to_string(),
            })
        })
        .collect()
}
