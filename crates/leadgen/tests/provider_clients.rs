use httpmock::prelude::*;
use leadgen::providers::{
    ApolloClient, HunterClient, OpenAiClient, ProviderError, RetryPolicy, SupabaseLeadStore,
};
use leadgen::workflows::discovery::ContactSource;
use leadgen::workflows::enrichment::{CompanyEnricher, EmailVerifier};
use leadgen::workflows::export::{LeadQuery, LeadRecord, LeadStore, StoreError};
use leadgen::workflows::outreach::TextGenerator;
use serde_json::json;

fn hunter(server: &MockServer) -> HunterClient {
    HunterClient::new("hunter-key")
        .expect("client builds")
        .with_base_url(server.base_url())
        .with_retry(RetryPolicy::immediate())
}

#[tokio::test]
async fn hunter_domain_search_maps_personal_contacts() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/domain-search")
                .query_param("domain", "salesloft.com")
                .query_param("api_key", "hunter-key")
                .query_param("limit", "10")
                .query_param("type", "personal");
            then.status(200).json_body(json!({
                "data": {
                    "organization": "Salesloft",
                    "emails": [
                        {
                            "value": "jordan@salesloft.com",
                            "first_name": "Jordan",
                            "last_name": "Blake",
                            "position": "VP of Sales",
                            "linkedin": "https://linkedin.com/in/jordan"
                        },
                        { "value": "info@salesloft.com", "position": null }
                    ]
                }
            }));
        })
        .await;

    let found = hunter(&server)
        .search_domain("salesloft.com")
        .await
        .expect("search succeeds");

    mock.assert_async().await;
    assert_eq!(found.company_name.as_deref(), Some("Salesloft"));
    assert_eq!(found.contacts.len(), 2);
    assert_eq!(found.contacts[0].full_name(), "Jordan Blake");
    assert_eq!(found.contacts[0].email.as_deref(), Some("jordan@salesloft.com"));
    assert_eq!(found.contacts[1].position, None);
}

#[tokio::test]
async fn hunter_retries_server_errors_until_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/domain-search");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let error = hunter(&server)
        .domain_search("acme.io", 10)
        .await
        .expect_err("search fails");

    mock.assert_hits_async(3).await;
    match error {
        ProviderError::RetriesExhausted { attempts, last, .. } => {
            assert_eq!(attempts, 3);
            assert!(last.contains("503"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn hunter_client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/domain-search");
            then.status(401).body("invalid api key");
        })
        .await;

    let error = hunter(&server)
        .domain_search("acme.io", 10)
        .await
        .expect_err("search fails");

    mock.assert_hits_async(1).await;
    assert!(matches!(error, ProviderError::Status { status: 401, .. }));
}

#[tokio::test]
async fn hunter_verification_accepts_deliverable_and_accept_all() {
    let server = MockServer::start_async().await;
    for (email, result) in [
        ("ok@acme.io", "deliverable"),
        ("catch@acme.io", "accept_all"),
        ("maybe@acme.io", "risky"),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/email-verifier")
                    .query_param("email", email);
                then.status(200)
                    .json_body(json!({ "data": { "result": result } }));
            })
            .await;
    }
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/email-verifier")
                .query_param("email", "bad@acme.io");
            then.status(400).body("invalid email");
        })
        .await;

    let client = hunter(&server);
    assert!(client.verify_email("ok@acme.io").await);
    assert!(client.verify_email("catch@acme.io").await);
    assert!(!client.verify_email("maybe@acme.io").await);
    assert!(!client.verify_email("bad@acme.io").await);
}

#[tokio::test]
async fn apollo_enrichment_maps_organization_fields() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/enrich")
                .query_param("domain", "outreach.io")
                .header("x-api-key", "apollo-key");
            then.status(200).json_body(json!({
                "organization": {
                    "name": "Outreach",
                    "industry": "Computer Software",
                    "estimated_num_employees": 1200,
                    "city": "Seattle",
                    "country": "United States",
                    "latest_funding_stage": "Series G",
                    "annual_revenue_printed": "250M",
                    "technology_names": ["Salesforce", "HubSpot"]
                }
            }));
        })
        .await;

    let client = ApolloClient::new("apollo-key")
        .expect("client builds")
        .with_base_url(server.base_url())
        .with_retry(RetryPolicy::immediate());
    let profile = client
        .enrich_company("outreach.io")
        .await
        .expect("lookup succeeds")
        .expect("organization present");

    mock.assert_async().await;
    assert_eq!(profile.name.as_deref(), Some("Outreach"));
    assert_eq!(profile.employee_count, Some(1200));
    assert_eq!(profile.headquarters().as_deref(), Some("Seattle"));
    assert_eq!(profile.technology_names, vec!["Salesforce", "HubSpot"]);
}

#[tokio::test]
async fn apollo_unknown_domain_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/organizations/enrich");
            then.status(404).body("not found");
        })
        .await;

    let client = ApolloClient::new("apollo-key")
        .expect("client builds")
        .with_base_url(server.base_url())
        .with_retry(RetryPolicy::immediate());
    let profile = client
        .enrich_company("nobody.example")
        .await
        .expect("soft miss");
    assert!(profile.is_none());
}

#[tokio::test]
async fn apollo_prefers_reported_headcount_over_estimate() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/organizations/enrich");
            then.status(200).json_body(json!({
                "organization": {
                    "name": "Acme",
                    "num_employees": 120,
                    "estimated_num_employees": 130
                }
            }));
        })
        .await;

    let client = ApolloClient::new("apollo-key")
        .expect("client builds")
        .with_base_url(server.base_url())
        .with_retry(RetryPolicy::immediate());
    let profile = client
        .enrich_company("acme.io")
        .await
        .expect("both headcount keys decode")
        .expect("organization present");

    assert_eq!(profile.name.as_deref(), Some("Acme"));
    assert_eq!(profile.employee_count, Some(120));
}

#[tokio::test]
async fn openai_returns_first_choice_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer openai-key")
                .json_body_partial(r#"{"model":"gpt-4o-mini","max_tokens":400}"#);
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "  SUBJECT: Hi\nBODY: Note.  " } }
                ]
            }));
        })
        .await;

    let client = OpenAiClient::new("openai-key")
        .expect("client builds")
        .with_base_url(server.base_url());
    let text = client
        .generate("system prompt", "user prompt")
        .await
        .expect("completion succeeds");

    mock.assert_async().await;
    assert_eq!(text, "SUBJECT: Hi\nBODY: Note.");
}

#[tokio::test]
async fn openai_without_choices_is_empty_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let client = OpenAiClient::new("openai-key")
        .expect("client builds")
        .with_base_url(server.base_url());
    let error = client
        .generate("system", "prompt")
        .await
        .expect_err("no content");
    assert!(matches!(error, ProviderError::EmptyContent { .. }));
}

fn stored_record(email: &str, score: u32) -> LeadRecord {
    LeadRecord {
        contact_name: "Jordan Blake".to_string(),
        contact_title: Some("VP of Sales".to_string()),
        contact_email: email.to_string(),
        contact_linkedin: None,
        company_name: Some("Acme".to_string()),
        company_domain: Some("acme.io".to_string()),
        industry: None,
        employee_count: None,
        headquarters: None,
        funding_stage: None,
        annual_revenue: None,
        qualification_score: score,
        icp_match: score >= 60,
        email_verified: false,
        outreach_email_draft: None,
        outreach_status: "pending".to_string(),
        data_source: "hunter+apollo".to_string(),
        enrichment_status: "enriched".to_string(),
    }
}

#[tokio::test]
async fn supabase_upsert_merges_on_contact_email() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/leads")
                .query_param("on_conflict", "contact_email")
                .header("apikey", "service-key")
                .header("authorization", "Bearer service-key")
                .header("prefer", "resolution=merge-duplicates")
                .body_contains(r#""contact_email":"jordan@acme.io""#);
            then.status(201);
        })
        .await;

    let store = SupabaseLeadStore::new(server.base_url(), "service-key")
        .expect("client builds")
        .with_retry(RetryPolicy::immediate());
    store
        .upsert(stored_record("jordan@acme.io", 80))
        .await
        .expect("upsert succeeds");
    mock.assert_async().await;
}

#[tokio::test]
async fn supabase_list_filters_by_minimum_score() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/leads")
                .query_param("select", "*")
                .query_param("limit", "5")
                .query_param("qualification_score", "gte.60");
            then.status(200)
                .json_body(
                    serde_json::to_value(vec![stored_record("jordan@acme.io", 80)]).expect("json"),
                );
        })
        .await;

    let store = SupabaseLeadStore::new(server.base_url(), "service-key")
        .expect("client builds")
        .with_retry(RetryPolicy::immediate());
    let leads = store
        .list(LeadQuery {
            min_score: Some(60),
            limit: 5,
        })
        .await
        .expect("list succeeds");

    mock.assert_async().await;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].qualification_score, 80);
}

#[tokio::test]
async fn supabase_rejection_keeps_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/leads");
            then.status(400).body("bad column");
        })
        .await;

    let store = SupabaseLeadStore::new(server.base_url(), "service-key")
        .expect("client builds")
        .with_retry(RetryPolicy::immediate());
    let error = store
        .upsert(stored_record("jordan@acme.io", 80))
        .await
        .expect_err("rejected");
    assert!(matches!(error, StoreError::Rejected { status: 400, .. }));
}
