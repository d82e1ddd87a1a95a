use crate::infra::{build_pipeline, lead_store, PipelineStages};
use clap::Args;
use leadgen::config::{AppConfig, IcpConfig};
use leadgen::error::AppError;
use leadgen::telemetry;
use leadgen::workflows::leads::EnrichedLead;
use leadgen::workflows::pipeline::{RunOptions, RunSummary};
use leadgen::workflows::qualification::{QualificationBatch, QualificationEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Company domain to prospect; repeat for several domains
    #[arg(long = "domain", required = true)]
    pub(crate) domains: Vec<String>,
    /// Keep at most this many decision makers per domain
    #[arg(long)]
    pub(crate) max_leads_per_domain: Option<usize>,
    /// Skip drafting outreach emails
    #[arg(long)]
    pub(crate) skip_outreach: bool,
    /// Skip CSV and lead store export
    #[arg(long)]
    pub(crate) skip_export: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// JSON file holding an array of enriched leads
    #[arg(long)]
    pub(crate) input: PathBuf,
}

fn load_icp(config: &AppConfig) -> Result<IcpConfig, AppError> {
    Ok(IcpConfig::load(config.icp_path.as_deref())?)
}

pub(crate) async fn run_pipeline(args: RunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let icp = Arc::new(load_icp(&config)?);
    let store = lead_store(&config)?;
    let stages = PipelineStages {
        skip_outreach: args.skip_outreach,
        skip_export: args.skip_export,
    };
    let pipeline = build_pipeline(&config, icp, store, stages)?;

    let options = RunOptions {
        max_leads_per_domain: args.max_leads_per_domain,
    };
    let summary = pipeline.run(&args.domains, &options).await?;
    render_summary(&summary);
    Ok(())
}

pub(crate) fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = QualificationEngine::new(Arc::new(load_icp(&config)?));

    let batch = qualify_file(&engine, &args.input)?;
    render_verdicts(&batch, engine.config().min_qualification_score);
    Ok(())
}

/// Score every lead in a JSON array file. Invalid leads are logged and counted.
pub(crate) fn qualify_file(
    engine: &QualificationEngine,
    input: &Path,
) -> Result<QualificationBatch, AppError> {
    let raw = std::fs::read_to_string(input)?;
    let leads: Vec<EnrichedLead> = serde_json::from_str(&raw)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    Ok(engine.qualify_all(leads))
}

pub(crate) fn show_icp() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let icp = load_icp(&config)?;
    render_icp(&icp);
    Ok(())
}

pub(crate) fn render_summary(summary: &RunSummary) {
    println!("Pipeline complete");
    println!("- Discovered: {} leads", summary.total_discovered);
    println!("- Enriched: {} leads", summary.total_enriched);
    println!("- Qualified: {} leads", summary.total_qualified);
    println!("- Pass rate: {}", summary.qualification_rate);
    println!("- Emails drafted: {}", summary.drafted_emails);

    if summary.top_leads.is_empty() {
        println!("\nTop leads: none");
    } else {
        println!("\nTop leads");
        for lead in &summary.top_leads {
            println!(
                "- {} | {} | {} | Score: {}",
                lead.name,
                lead.title.as_deref().unwrap_or("-"),
                lead.company.as_deref().unwrap_or("-"),
                lead.score
            );
        }
    }

    if let Some(export) = &summary.export {
        println!("\nExport");
        println!("- CSV file: {}", export.csv_file.display());
        println!("- Lead store: {} leads saved", export.store_saved);
        println!("- Total leads: {}", export.total_leads);
    }
}

pub(crate) fn render_verdicts(batch: &QualificationBatch, threshold: u32) {
    println!(
        "Qualified {}/{} leads at threshold {}",
        batch.passed(),
        batch.leads.len(),
        threshold
    );
    if batch.dropped > 0 {
        println!("Skipped {} invalid lead(s)", batch.dropped);
    }

    for lead in &batch.leads {
        let verdict = if lead.icp_match { "MATCH" } else { "no match" };
        println!(
            "\n{} ({}) - {}/100 {}",
            lead.lead.contact_name,
            lead.lead.company_name.as_deref().unwrap_or("unknown company"),
            lead.qualification_score,
            verdict
        );
        for note in &lead.qualification_notes {
            println!("- {}", note);
        }
    }
}

pub(crate) fn render_icp(icp: &IcpConfig) {
    println!("Ideal customer profile");
    println!("- Industries: {}", icp.industries.join(", "));
    println!(
        "- Employees: {} to {}",
        icp.min_employees, icp.max_employees
    );
    println!("- Funding stages: {}", icp.target_funding_stages.join(", "));
    println!("- Titles: {}", icp.target_titles.join(", "));
    println!("- Locations: {}", icp.target_locations.join(", "));
    println!("- Technology signals: {}", icp.technology_signals.join(", "));

    let weights = &icp.scoring_weights;
    println!("\nScoring weights");
    println!("- Industry: {}", weights.industry_match);
    println!("- Company size: {}", weights.company_size_match);
    println!("- Title: {}", weights.title_match);
    println!("- Location: {}", weights.location_match);
    println!("- Technology: {}", weights.technology_match);
    println!("\nQualification threshold: {}", icp.min_qualification_score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn engine() -> QualificationEngine {
        QualificationEngine::new(Arc::new(IcpConfig::default()))
    }

    #[test]
    fn qualify_file_scores_leads_and_counts_invalid_ones() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[
                {{ "contact_name": "Intern Ivy", "contact_title": "Intern" }},
                {{ "contact_name": "  " }},
                {{
                    "contact_name": "Jordan Blake",
                    "contact_title": "VP of Sales",
                    "industry": "B2B SaaS",
                    "employee_count": 150,
                    "headquarters": "San Francisco, United States",
                    "technology_stack": ["Salesforce", "Slack"]
                }}
            ]"#
        )
        .expect("write leads");

        let batch = qualify_file(&engine(), file.path()).expect("file qualifies");

        assert_eq!(batch.dropped, 1);
        let scores: Vec<(&str, u32)> = batch
            .leads
            .iter()
            .map(|lead| (lead.lead.contact_name.as_str(), lead.qualification_score))
            .collect();
        assert_eq!(scores, vec![("Jordan Blake", 100), ("Intern Ivy", 24)]);
        assert_eq!(batch.passed(), 1);
    }

    #[test]
    fn qualify_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");

        let error = qualify_file(&engine(), file.path()).expect_err("malformed input");
        assert!(matches!(error, AppError::Io(_)));
    }
}
