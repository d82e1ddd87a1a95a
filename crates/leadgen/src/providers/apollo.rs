use super::{build_client, send_with_retry, trim_base_url, ProviderError, RetryPolicy};
use crate::workflows::enrichment::{CompanyEnricher, CompanyProfile};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const PROVIDER: &str = "apollo";
pub const DEFAULT_BASE_URL: &str = "https://api.apollo.io/api/v1";

/// Apollo.io organization enrichment.
#[derive(Clone)]
pub struct ApolloClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    organization: Option<ApolloOrganization>,
}

#[derive(Debug, Default, Deserialize)]
struct ApolloOrganization {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    num_employees: Option<u32>,
    #[serde(default)]
    estimated_num_employees: Option<u32>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    latest_funding_stage: Option<String>,
    #[serde(default)]
    annual_revenue_printed: Option<String>,
    #[serde(default)]
    technology_names: Option<Vec<String>>,
}

impl From<ApolloOrganization> for CompanyProfile {
    fn from(org: ApolloOrganization) -> Self {
        Self {
            name: org.name,
            industry: org.industry,
            employee_count: org.num_employees.or(org.estimated_num_employees),
            city: org.city,
            country: org.country,
            funding_stage: org.latest_funding_stage,
            annual_revenue: org.annual_revenue_printed,
            technology_names: org.technology_names.unwrap_or_default(),
        }
    }
}

impl ApolloClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client(PROVIDER)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Company profile for a domain; `None` on a non-success status or an
    /// empty organization payload.
    pub async fn enrich_organization(
        &self,
        domain: &str,
    ) -> Result<Option<CompanyProfile>, ProviderError> {
        let url = format!("{}/organizations/enrich", self.base_url);
        let response = send_with_retry(PROVIDER, &self.retry, || {
            self.http
                .get(&url)
                .header("X-Api-Key", &self.api_key)
                .query(&[("domain", domain)])
        })
        .await?;

        if !response.status().is_success() {
            warn!(domain, status = response.status().as_u16(), "organization enrichment rejected");
            return Ok(None);
        }

        let body: EnrichResponse = response
            .json()
            .await
            .map_err(ProviderError::http(PROVIDER))?;

        Ok(body.organization.map(CompanyProfile::from))
    }
}

#[async_trait]
impl CompanyEnricher for ApolloClient {
    async fn enrich_company(&self, domain: &str) -> Result<Option<CompanyProfile>, ProviderError> {
        self.enrich_organization(domain).await
    }
}
