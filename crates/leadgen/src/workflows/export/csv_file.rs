use crate::workflows::leads::QualifiedLead;
use crate::workflows::outreach::OutreachDraft;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One CSV line; field order is the column order.
#[derive(Debug, Serialize)]
pub(crate) struct ExportRow<'a> {
    contact_name: &'a str,
    contact_title: Option<&'a str>,
    contact_email: Option<&'a str>,
    contact_linkedin: Option<&'a str>,
    company_name: Option<&'a str>,
    company_domain: Option<&'a str>,
    industry: Option<&'a str>,
    employee_count: Option<u32>,
    headquarters: Option<&'a str>,
    funding_stage: Option<&'a str>,
    annual_revenue: Option<&'a str>,
    qualification_score: u32,
    icp_match: bool,
    email_verified: bool,
    email_subject: &'a str,
    email_body: &'a str,
}

impl<'a> ExportRow<'a> {
    pub(crate) fn new(lead: &'a QualifiedLead, draft: Option<&'a OutreachDraft>) -> Self {
        let details = &lead.lead;
        Self {
            contact_name: &details.contact_name,
            contact_title: details.contact_title.as_deref(),
            contact_email: details.contact_email.as_deref(),
            contact_linkedin: details.contact_linkedin.as_deref(),
            company_name: details.company_name.as_deref(),
            company_domain: details.company_domain.as_deref(),
            industry: details.industry.as_deref(),
            employee_count: details.employee_count,
            headquarters: details.headquarters.as_deref(),
            funding_stage: details.funding_stage.as_deref(),
            annual_revenue: details.annual_revenue.as_deref(),
            qualification_score: lead.qualification_score,
            icp_match: lead.icp_match,
            email_verified: details.email_verified,
            email_subject: draft.map(|draft| draft.email_subject.as_str()).unwrap_or(""),
            email_body: draft.map(|draft| draft.email_body.as_str()).unwrap_or(""),
        }
    }
}

pub(crate) fn export_file_name(at: DateTime<Local>) -> String {
    format!("leads_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

pub(crate) fn write_rows<'a, I>(path: &Path, rows: I) -> Result<PathBuf, csv::Error>
where
    I: IntoIterator<Item = ExportRow<'a>>,
{
    let mut writer = csv::Writer::from_path(path)?;
    let mut wrote_any = false;
    for row in rows {
        writer.serialize(row)?;
        wrote_any = true;
    }
    if !wrote_any {
        writer.write_record(COLUMNS)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

pub const COLUMNS: [&str; 16] = [
    "contact_name",
    "contact_title",
    "contact_email",
    "contact_linkedin",
    "company_name",
    "company_domain",
    "industry",
    "employee_count",
    "headquarters",
    "funding_stage",
    "annual_revenue",
    "qualification_score",
    "icp_match",
    "email_verified",
    "email_subject",
    "email_body",
];
