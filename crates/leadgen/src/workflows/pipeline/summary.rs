use super::PipelineRun;
use crate::workflows::export::ExportReport;
use crate::workflows::leads::QualifiedLead;
use serde::Serialize;

pub const TOP_LEADS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLead {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub score: u32,
}

impl From<&QualifiedLead> for TopLead {
    fn from(lead: &QualifiedLead) -> Self {
        Self {
            name: lead.lead.contact_name.clone(),
            title: lead.lead.contact_title.clone(),
            company: lead.lead.company_name.clone(),
            email: lead.lead.contact_email.clone(),
            score: lead.qualification_score,
        }
    }
}

/// Counts and highlights of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_discovered: usize,
    pub total_enriched: usize,
    /// Leads that passed the ICP threshold.
    pub total_qualified: usize,
    pub qualification_rate: String,
    pub top_leads: Vec<TopLead>,
    pub drafted_emails: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportReport>,
}

impl RunSummary {
    pub fn from_run(run: &PipelineRun) -> Self {
        let passed = run.qualified.passed();

        Self {
            total_discovered: run.discovered,
            total_enriched: run.enriched,
            total_qualified: passed,
            qualification_rate: percentage(passed, run.qualified.leads.len()),
            top_leads: run
                .qualified
                .matching()
                .take(TOP_LEADS)
                .map(TopLead::from)
                .collect(),
            drafted_emails: run.drafts.len(),
            export: run.export.clone(),
        }
    }
}

/// Whole-number percentage, ties rounded to even, `"0%"` for an empty batch.
pub fn percentage(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0%".to_string();
    }

    let scaled = part * 100;
    let mut rounded = scaled / whole;
    let twice_remainder = (scaled % whole) * 2;
    if twice_remainder > whole || (twice_remainder == whole && rounded % 2 == 1) {
        rounded += 1;
    }
    format!("{rounded}%")
}
