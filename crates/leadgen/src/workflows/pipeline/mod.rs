//! End-to-end lead generation run: discovery, enrichment, qualification,
//! outreach drafting, export and summary, strictly in that order.
//!
//! Stages hand their output to the next through a [`PipelineRun`] value.
//! A discovery failure or an export failure aborts the run; every other
//! collaborator fault is absorbed by the stage that owns it.

pub mod summary;

pub use summary::{percentage, RunSummary, TopLead};

use crate::config::IcpConfig;
use crate::workflows::discovery::{ContactSource, DiscoveryAgent, DiscoveryError};
use crate::workflows::enrichment::{CompanyEnricher, EmailVerifier, EnrichmentAgent};
use crate::workflows::export::{ExportError, ExportLayer, ExportReport};
use crate::workflows::outreach::{OutreachAgent, OutreachDraft};
use crate::workflows::qualification::{qualify_all, QualificationBatch};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Discovery,
    Enrichment,
    Qualification,
    Outreach,
    Export,
    Summary,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::Enrichment => "Enrichment",
            Self::Qualification => "Qualification",
            Self::Outreach => "Outreach",
            Self::Export => "Export",
            Self::Summary => "Summary",
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Discovery => 1,
            Self::Enrichment => 2,
            Self::Qualification => 3,
            Self::Outreach => 4,
            Self::Export => 5,
            Self::Summary => 6,
        }
    }

    fn announce(self) {
        info!(stage = self.label(), "PIPELINE | Stage {}: {}", self.number(), self.label());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Discovery(_) => PipelineStage::Discovery,
            Self::Export(_) => PipelineStage::Export,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub max_leads_per_domain: Option<usize>,
}

/// State carried between stages.
#[derive(Debug, Clone, Default)]
pub struct PipelineRun {
    pub domains: Vec<String>,
    pub discovered: usize,
    pub enriched: usize,
    pub qualified: QualificationBatch,
    pub drafts: Vec<OutreachDraft>,
    pub export: Option<ExportReport>,
}

/// Per-domain counts reported to job tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainOutcome {
    pub leads_discovered: usize,
    pub leads_qualified: usize,
}

#[derive(Clone)]
pub struct LeadPipeline {
    contacts: Arc<dyn ContactSource>,
    companies: Arc<dyn CompanyEnricher>,
    verifier: Arc<dyn EmailVerifier>,
    icp: Arc<IcpConfig>,
    outreach: Option<OutreachAgent>,
    export: Option<ExportLayer>,
}

impl LeadPipeline {
    pub fn new(
        contacts: Arc<dyn ContactSource>,
        companies: Arc<dyn CompanyEnricher>,
        verifier: Arc<dyn EmailVerifier>,
        icp: Arc<IcpConfig>,
    ) -> Self {
        Self {
            contacts,
            companies,
            verifier,
            icp,
            outreach: None,
            export: None,
        }
    }

    pub fn with_outreach(mut self, outreach: OutreachAgent) -> Self {
        self.outreach = Some(outreach);
        self
    }

    pub fn with_export(mut self, export: ExportLayer) -> Self {
        self.export = Some(export);
        self
    }

    pub fn icp(&self) -> &IcpConfig {
        &self.icp
    }

    /// Run every configured stage and keep the full state.
    pub async fn execute(
        &self,
        domains: &[String],
        options: &RunOptions,
    ) -> Result<PipelineRun, PipelineError> {
        let mut run = PipelineRun {
            domains: domains.to_vec(),
            ..PipelineRun::default()
        };

        PipelineStage::Discovery.announce();
        let discovered = DiscoveryAgent::new(self.contacts.clone(), self.icp.clone())
            .with_max_leads_per_domain(options.max_leads_per_domain)
            .search_multiple_domains(&run.domains)
            .await?;
        run.discovered = discovered.len();
        info!("PIPELINE | Discovered {} leads", run.discovered);

        PipelineStage::Enrichment.announce();
        let enriched = EnrichmentAgent::new(self.companies.clone(), self.verifier.clone())
            .enrich_all(discovered)
            .await;
        run.enriched = enriched.len();
        info!("PIPELINE | Enriched {} leads", run.enriched);

        PipelineStage::Qualification.announce();
        run.qualified = qualify_all(enriched, &self.icp);
        info!(
            "PIPELINE | Qualified {}/{} leads",
            run.qualified.passed(),
            run.qualified.leads.len()
        );

        if let Some(outreach) = &self.outreach {
            PipelineStage::Outreach.announce();
            run.drafts = outreach.draft_all(&run.qualified.leads).await;
        }

        if let Some(export) = &self.export {
            PipelineStage::Export.announce();
            run.export = Some(export.export_all(&run.qualified.leads, &run.drafts).await?);
        }

        Ok(run)
    }

    pub async fn run(
        &self,
        domains: &[String],
        options: &RunOptions,
    ) -> Result<RunSummary, PipelineError> {
        let run = self.execute(domains, options).await?;
        PipelineStage::Summary.announce();
        Ok(RunSummary::from_run(&run))
    }

    /// Run the pipeline for a single domain and report its counts.
    pub async fn run_domain(
        &self,
        domain: &str,
        options: &RunOptions,
    ) -> Result<DomainOutcome, PipelineError> {
        let summary = self.run(&[domain.to_string()], options).await?;
        Ok(DomainOutcome {
            leads_discovered: summary.total_discovered,
            leads_qualified: summary.total_qualified,
        })
    }
}
