use crate::config::IcpConfig;
use crate::workflows::leads::EnrichedLead;
use crate::workflows::qualification::QualificationEngine;
use std::sync::Arc;

pub(super) fn icp() -> IcpConfig {
    IcpConfig::default()
}

pub(super) fn engine() -> QualificationEngine {
    QualificationEngine::new(Arc::new(icp()))
}

/// Lead that satisfies every factor of the default rubric.
pub(super) fn ideal_lead() -> EnrichedLead {
    EnrichedLead {
        contact_name: "Jordan Blake".to_string(),
        contact_title: Some("VP of Sales".to_string()),
        contact_email: Some("jordan@acme.io".to_string()),
        contact_linkedin: Some("https://linkedin.com/in/jordanblake".to_string()),
        company_name: Some("Acme".to_string()),
        company_domain: Some("acme.io".to_string()),
        industry: Some("B2B SaaS".to_string()),
        employee_count: Some(150),
        headquarters: Some("San Francisco, United States".to_string()),
        funding_stage: Some("Series B".to_string()),
        annual_revenue: Some("$20M".to_string()),
        technology_stack: Some(vec!["Salesforce".to_string(), "Slack".to_string()]),
        email_verified: true,
    }
}

/// Lead with only a non-ICP title known.
pub(super) fn sparse_lead(title: &str) -> EnrichedLead {
    EnrichedLead {
        contact_title: Some(title.to_string()),
        ..EnrichedLead::new("Riley Chen")
    }
}

pub(super) fn named(name: &str, lead: EnrichedLead) -> EnrichedLead {
    EnrichedLead {
        contact_name: name.to_string(),
        ..lead
    }
}
