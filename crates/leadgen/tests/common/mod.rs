#![allow(dead_code)]

use async_trait::async_trait;
use leadgen::config::IcpConfig;
use leadgen::providers::ProviderError;
use leadgen::workflows::discovery::{ContactSource, DomainContacts, RawContact};
use leadgen::workflows::enrichment::{CompanyEnricher, CompanyProfile, EmailVerifier};
use leadgen::workflows::export::{LeadQuery, LeadRecord, LeadStore, StoreError};
use leadgen::workflows::outreach::TextGenerator;
use leadgen::workflows::pipeline::LeadPipeline;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct FakeContacts {
    pub domains: HashMap<String, DomainContacts>,
}

#[async_trait]
impl ContactSource for FakeContacts {
    async fn search_domain(&self, domain: &str) -> Result<DomainContacts, ProviderError> {
        self.domains
            .get(domain)
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                provider: "hunter",
                status: 401,
                body: "invalid api key".to_string(),
            })
    }
}

pub struct FakeCompanies {
    pub profiles: HashMap<String, CompanyProfile>,
}

#[async_trait]
impl CompanyEnricher for FakeCompanies {
    async fn enrich_company(&self, domain: &str) -> Result<Option<CompanyProfile>, ProviderError> {
        Ok(self.profiles.get(domain).cloned())
    }
}

pub struct AllDeliverable;

#[async_trait]
impl EmailVerifier for AllDeliverable {
    async fn verify_email(&self, _email: &str) -> bool {
        true
    }
}

#[derive(Default)]
pub struct EchoGenerator {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .expect("generator mutex poisoned")
            .push(prompt.to_string());
        Ok("SUBJECT: Pipeline idea\nBODY: Hi there,\nworth a 20-minute call?".to_string())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub rows: Mutex<HashMap<String, LeadRecord>>,
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn upsert(&self, record: LeadRecord) -> Result<(), StoreError> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .insert(record.contact_email.clone(), record);
        Ok(())
    }

    async fn list(&self, query: LeadQuery) -> Result<Vec<LeadRecord>, StoreError> {
        let rows = self.rows.lock().expect("store mutex poisoned");
        Ok(rows
            .values()
            .filter(|row| query.min_score.map_or(true, |min| row.qualification_score >= min))
            .take(query.limit)
            .cloned()
            .collect())
    }
}

pub fn contact(first: &str, last: &str, position: &str, domain: &str) -> RawContact {
    RawContact {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        position: Some(position.to_string()),
        email: Some(format!("{}@{domain}", first.to_lowercase())),
        linkedin: None,
    }
}

/// Two target domains: a strong fit (`acme.io`) and a poor one (`bigcorp.io`).
pub fn contacts() -> FakeContacts {
    let mut domains = HashMap::new();
    domains.insert(
        "acme.io".to_string(),
        DomainContacts {
            company_name: Some("Acme".to_string()),
            contacts: vec![
                contact("Jordan", "Blake", "VP of Sales", "acme.io"),
                contact("Pat", "Lee", "Software Engineer", "acme.io"),
                contact("Alex", "Kim", "Head of Sales", "acme.io"),
            ],
        },
    );
    domains.insert(
        "bigcorp.io".to_string(),
        DomainContacts {
            company_name: Some("BigCorp".to_string()),
            contacts: vec![contact("Dana", "Fox", "CEO", "bigcorp.io")],
        },
    );
    FakeContacts { domains }
}

pub fn companies() -> FakeCompanies {
    let mut profiles = HashMap::new();
    profiles.insert(
        "acme.io".to_string(),
        CompanyProfile {
            name: Some("Acme Inc".to_string()),
            industry: Some("Software".to_string()),
            employee_count: Some(150),
            city: None,
            country: Some("United States".to_string()),
            funding_stage: Some("Series B".to_string()),
            annual_revenue: Some("$20M".to_string()),
            technology_names: vec!["Salesforce".to_string(), "Slack".to_string()],
        },
    );
    profiles.insert(
        "bigcorp.io".to_string(),
        CompanyProfile {
            name: Some("BigCorp".to_string()),
            industry: Some("Retail".to_string()),
            employee_count: Some(5000),
            city: None,
            country: Some("Germany".to_string()),
            funding_stage: None,
            annual_revenue: None,
            technology_names: Vec::new(),
        },
    );
    FakeCompanies { profiles }
}

pub fn pipeline() -> LeadPipeline {
    LeadPipeline::new(
        Arc::new(contacts()),
        Arc::new(companies()),
        Arc::new(AllDeliverable),
        Arc::new(IcpConfig::default()),
    )
}
