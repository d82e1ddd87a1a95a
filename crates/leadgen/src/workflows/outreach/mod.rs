//! Personalized cold email drafts for leads that pass the ICP threshold.

mod prompt;

use crate::providers::ProviderError;
use crate::workflows::leads::QualifiedLead;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Text generation seam; the OpenAI client implements it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachStatus {
    Drafted,
    Failed,
}

impl OutreachStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drafted => "drafted",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachDraft {
    pub contact_name: String,
    pub contact_title: Option<String>,
    pub contact_email: Option<String>,
    pub company_name: Option<String>,
    pub qualification_score: u32,
    pub email_subject: String,
    pub email_body: String,
    pub outreach_status: OutreachStatus,
}

impl OutreachDraft {
    fn for_lead(
        lead: &QualifiedLead,
        subject: String,
        body: String,
        status: OutreachStatus,
    ) -> Self {
        Self {
            contact_name: lead.lead.contact_name.clone(),
            contact_title: lead.lead.contact_title.clone(),
            contact_email: lead.lead.contact_email.clone(),
            company_name: lead.lead.company_name.clone(),
            qualification_score: lead.qualification_score,
            email_subject: subject,
            email_body: body,
            outreach_status: status,
        }
    }

    /// Same identity rule as `EnrichedLead::lead_key`.
    pub fn lead_key(&self) -> &str {
        self.contact_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(&self.contact_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutreachError {
    #[error(transparent)]
    Generation(#[from] ProviderError),
    #[error("reply did not contain both SUBJECT and BODY")]
    UnparseableReply,
}

#[derive(Clone)]
pub struct OutreachAgent {
    generator: Arc<dyn TextGenerator>,
}

impl OutreachAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Draft one email. Never fails: any fault yields an empty `Failed` draft.
    pub async fn draft_email(&self, lead: &QualifiedLead) -> OutreachDraft {
        info!(
            contact = %lead.lead.contact_name,
            company = lead.lead.company_name.as_deref().unwrap_or("unknown"),
            "drafting outreach email"
        );

        match self.try_draft(lead).await {
            Ok(parsed) => {
                OutreachDraft::for_lead(lead, parsed.subject, parsed.body, OutreachStatus::Drafted)
            }
            Err(err) => {
                error!(contact = %lead.lead.contact_name, error = %err, "failed to draft email");
                OutreachDraft::for_lead(lead, String::new(), String::new(), OutreachStatus::Failed)
            }
        }
    }

    async fn try_draft(&self, lead: &QualifiedLead) -> Result<prompt::ParsedDraft, OutreachError> {
        let reply = self
            .generator
            .generate(prompt::SYSTEM_PROMPT, &prompt::build_prompt(lead))
            .await?;
        prompt::parse_draft(&reply).ok_or(OutreachError::UnparseableReply)
    }

    /// Draft emails for the leads that match the ICP, in their given order.
    pub async fn draft_all(&self, leads: &[QualifiedLead]) -> Vec<OutreachDraft> {
        let qualified: Vec<&QualifiedLead> = leads.iter().filter(|lead| lead.icp_match).collect();
        info!(count = qualified.len(), "drafting emails for qualified leads");

        let mut drafts = Vec::with_capacity(qualified.len());
        for lead in qualified {
            drafts.push(self.draft_email(lead).await);
        }

        info!(written = drafts.len(), "outreach drafting complete");
        drafts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::leads::EnrichedLead;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, ProviderError> {
            self.replies
                .lock()
                .expect("generator mutex poisoned")
                .remove(0)
        }
    }

    fn qualified(name: &str, score: u32, icp_match: bool) -> QualifiedLead {
        QualifiedLead {
            lead: EnrichedLead {
                contact_email: Some(format!("{}@acme.io", name.to_lowercase())),
                company_name: Some("Acme".to_string()),
                ..EnrichedLead::new(name)
            },
            qualification_score: score,
            qualification_notes: Vec::new(),
            icp_match,
        }
    }

    #[tokio::test]
    async fn draft_all_skips_non_matching_leads() {
        let generator = ScriptedGenerator::new(vec![
            Ok("SUBJECT: Hi Jordan\nBODY: Short note.".to_string()),
            Err(ProviderError::EmptyContent { provider: "openai" }),
        ]);
        let agent = OutreachAgent::new(Arc::new(generator));

        let drafts = agent
            .draft_all(&[
                qualified("Jordan", 90, true),
                qualified("Pat", 30, false),
                qualified("Alex", 70, true),
            ])
            .await;

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].contact_name, "Jordan");
        assert_eq!(drafts[0].outreach_status, OutreachStatus::Drafted);
        assert_eq!(drafts[0].email_subject, "Hi Jordan");
        assert_eq!(drafts[1].contact_name, "Alex");
        assert_eq!(drafts[1].outreach_status, OutreachStatus::Failed);
        assert!(drafts[1].email_subject.is_empty() && drafts[1].email_body.is_empty());
    }

    #[tokio::test]
    async fn unparseable_reply_marks_draft_failed() {
        let generator = ScriptedGenerator::new(vec![Ok("I cannot help with that.".to_string())]);
        let draft = OutreachAgent::new(Arc::new(generator))
            .draft_email(&qualified("Jordan", 90, true))
            .await;

        assert_eq!(draft.outreach_status, OutreachStatus::Failed);
        assert_eq!(draft.qualification_score, 90);
        assert_eq!(draft.lead_key(), "jordan@acme.io");
    }
}
