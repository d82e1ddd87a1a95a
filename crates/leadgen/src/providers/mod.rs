//! HTTP clients for the third-party services the pipeline depends on.
//!
//! Every client shares the same transport rules: a 30 second request timeout
//! and a bounded retry loop with exponential backoff for transient faults.

pub mod apollo;
pub mod hunter;
pub mod openai;
pub mod supabase;

pub use apollo::ApolloClient;
pub use hunter::HunterClient;
pub use openai::OpenAiClient;
pub use supabase::SupabaseLeadStore;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::warn;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded retry schedule for transient upstream faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub const fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Same attempt count as the default, without sleeping between attempts.
    pub const fn immediate() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        provider: &'static str,
        attempts: u32,
        last: String,
    },
    #[error("{provider} returned no content")]
    EmptyContent { provider: &'static str },
}

impl ProviderError {
    pub(crate) fn http(provider: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { provider, source }
    }
}

pub(crate) fn build_client(provider: &'static str) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(ProviderError::http(provider))
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Send a request, retrying transport errors, 429 and 5xx responses.
///
/// Any other response is returned to the caller as-is, including 4xx.
pub(crate) async fn send_with_retry<F>(
    provider: &'static str,
    policy: &RetryPolicy,
    build: F,
) -> Result<Response, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = policy.delay_for(attempt - 1);
            warn!(
                provider,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %last_error,
                "retrying provider request"
            );
            tokio::time::sleep(delay).await;
        }

        match build().send().await {
            Ok(response) if is_transient(response.status()) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                last_error = format!("status {}: {}", status.as_u16(), body);
            }
            Ok(response) => return Ok(response),
            Err(err) => last_error = err.to_string(),
        }
    }

    Err(ProviderError::RetriesExhausted {
        provider,
        attempts,
        last: last_error,
    })
}

/// Fail on any non-success status, keeping the body for diagnostics.
pub(crate) async fn require_success(
    provider: &'static str,
    response: Response,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for(40), Duration::from_secs(10));
    }

    #[test]
    fn immediate_policy_never_sleeps() {
        let policy = RetryPolicy::immediate();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(2), Duration::ZERO);
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::OK));
    }

    #[test]
    fn base_urls_drop_trailing_slashes() {
        assert_eq!(trim_base_url("http://localhost:1234/"), "http://localhost:1234");
    }
}
