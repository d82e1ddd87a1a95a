use super::{
    build_client, require_success, send_with_retry, trim_base_url, ProviderError, RetryPolicy,
};
use crate::workflows::discovery::{ContactSource, DomainContacts, RawContact};
use crate::workflows::enrichment::EmailVerifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const PROVIDER: &str = "hunter";
pub const DEFAULT_BASE_URL: &str = "https://api.hunter.io/v2";
pub const DOMAIN_SEARCH_LIMIT: u32 = 10;

/// Hunter.io domain search and email verification.
#[derive(Clone)]
pub struct HunterClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct DomainSearchData {
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    emails: Vec<HunterEmail>,
}

#[derive(Debug, Deserialize)]
struct HunterEmail {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    linkedin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerificationData {
    #[serde(default)]
    result: Option<String>,
}

impl HunterClient {
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

    pub async fn domain_search(
        &self,
        domain: &str,
        limit: u32,
    ) -> Result<DomainContacts, ProviderError> {
        let url = format!("{}/domain-search", self.base_url);
        let limit = limit.to_string();
        let response = send_with_retry(PROVIDER, &self.retry, || {
            self.http.get(&url).query(&[
                ("domain", domain),
                ("api_key", self.api_key.as_str()),
                ("limit", limit.as_str()),
                ("type", "personal"),
            ])
        })
        .await?;

        let envelope: Envelope<DomainSearchData> = require_success(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(ProviderError::http(PROVIDER))?;

        Ok(DomainContacts {
            company_name: envelope.data.organization,
            contacts: envelope
                .data
                .emails
                .into_iter()
                .map(|email| RawContact {
                    first_name: email.first_name,
                    last_name: email.last_name,
                    position: email.position,
                    email: email.value,
                    linkedin: email.linkedin,
                })
                .collect(),
        })
    }

    /// Deliverability check. A non-success status reports `false`.
    pub async fn check_email(&self, email: &str) -> Result<bool, ProviderError> {
        let url = format!("{}/email-verifier", self.base_url);
        let response = send_with_retry(PROVIDER, &self.retry, || {
            self.http
                .get(&url)
                .query(&[("email", email), ("api_key", self.api_key.as_str())])
        })
        .await?;

        if !response.status().is_success() {
            warn!(email, status = response.status().as_u16(), "email verification rejected");
            return Ok(false);
        }

        let envelope: Envelope<VerificationData> = response
            .json()
            .await
            .map_err(ProviderError::http(PROVIDER))?;

        Ok(matches!(
            envelope.data.result.as_deref(),
            Some("deliverable") | Some("accept_all")
        ))
    }
}

#[async_trait]
impl ContactSource for HunterClient {
    async fn search_domain(&self, domain: &str) -> Result<DomainContacts, ProviderError> {
        self.domain_search(domain, DOMAIN_SEARCH_LIMIT).await
    }
}

#[async_trait]
impl EmailVerifier for HunterClient {
    async fn verify_email(&self, email: &str) -> bool {
        match self.check_email(email).await {
            Ok(verified) => verified,
            Err(err) => {
                warn!(email, error = %err, "email verification failed");
                false
            }
        }
    }
}
