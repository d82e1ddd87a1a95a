use super::{build_client, send_with_retry, trim_base_url, ProviderError, RetryPolicy};
use crate::workflows::export::{LeadQuery, LeadRecord, LeadStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

const PROVIDER: &str = "supabase";
const TABLE: &str = "leads";

/// Lead store backed by a Supabase (PostgREST) `leads` table.
#[derive(Clone)]
pub struct SupabaseLeadStore {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl SupabaseLeadStore {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client(PROVIDER)?,
            base_url: trim_base_url(url),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl From<ProviderError> for StoreError {
    fn from(err: ProviderError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

async fn accepted(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl LeadStore for SupabaseLeadStore {
    async fn upsert(&self, record: LeadRecord) -> Result<(), StoreError> {
        let url = self.table_url();
        let rows = [record];
        let response = send_with_retry(PROVIDER, &self.retry, || {
            self.authorized(self.http.post(&url))
                .query(&[("on_conflict", "contact_email")])
                .header("Prefer", "resolution=merge-duplicates")
                .json(&rows)
        })
        .await?;

        accepted(response).await?;
        Ok(())
    }

    async fn list(&self, query: LeadQuery) -> Result<Vec<LeadRecord>, StoreError> {
        let url = self.table_url();
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "qualification_score.desc".to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(min_score) = query.min_score {
            params.push(("qualification_score", format!("gte.{min_score}")));
        }

        let response = send_with_retry(PROVIDER, &self.retry, || {
            self.authorized(self.http.get(&url)).query(&params)
        })
        .await?;

        accepted(response)
            .await?
            .json()
            .await
            .map_err(|err| StoreError::Unavailable(ProviderError::http(PROVIDER)(err).to_string()))
    }
}
