//! CSV and row-store export of scored leads with their outreach drafts.

mod csv_file;
pub mod store;

pub use csv_file::COLUMNS;
pub use store::{LeadQuery, LeadRecord, LeadStore, StoreError};

use crate::workflows::leads::QualifiedLead;
use crate::workflows::outreach::OutreachDraft;
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub csv_file: PathBuf,
    pub store_saved: usize,
    pub total_leads: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Clone)]
pub struct ExportLayer {
    export_dir: PathBuf,
    store: Arc<dyn LeadStore>,
}

impl ExportLayer {
    pub fn new(export_dir: impl Into<PathBuf>, store: Arc<dyn LeadStore>) -> Self {
        Self {
            export_dir: export_dir.into(),
            store,
        }
    }

    pub fn export_dir(&self) -> &PathBuf {
        &self.export_dir
    }

    /// Write every lead to a timestamped CSV file and return its path.
    pub fn to_csv(
        &self,
        leads: &[QualifiedLead],
        drafts: &[OutreachDraft],
    ) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.export_dir).map_err(|source| ExportError::CreateDir {
            path: self.export_dir.clone(),
            source,
        })?;

        let path = self.export_dir.join(csv_file::export_file_name(Local::now()));
        let by_key = drafts_by_key(drafts);
        let rows = leads.iter().map(|lead| {
            csv_file::ExportRow::new(lead, by_key.get(lead.lead.lead_key()).copied())
        });

        let written = csv_file::write_rows(&path, rows).map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;
        info!(file = %written.display(), rows = leads.len(), "csv exported");
        Ok(written)
    }

    /// Upsert every lead with an email. Returns how many rows were saved.
    pub async fn to_store(&self, leads: &[QualifiedLead], drafts: &[OutreachDraft]) -> usize {
        let by_key = drafts_by_key(drafts);
        let mut saved = 0;

        for lead in leads {
            let draft = by_key.get(lead.lead.lead_key()).copied();
            let Some(record) = LeadRecord::from_lead(lead, draft) else {
                warn!(
                    contact = %lead.lead.contact_name,
                    "skipping store export for lead without email"
                );
                continue;
            };

            match self.store.upsert(record).await {
                Ok(()) => saved += 1,
                Err(err) => {
                    error!(contact = %lead.lead.contact_name, error = %err, "failed to save lead");
                }
            }
        }

        info!(
            saved,
            total = leads.len(),
            "store export complete: {}/{} leads saved",
            saved,
            leads.len()
        );
        saved
    }

    pub async fn export_all(
        &self,
        leads: &[QualifiedLead],
        drafts: &[OutreachDraft],
    ) -> Result<ExportReport, ExportError> {
        info!(leads = leads.len(), drafts = drafts.len(), "starting export");
        let csv_file = self.to_csv(leads, drafts)?;
        let store_saved = self.to_store(leads, drafts).await;

        Ok(ExportReport {
            csv_file,
            store_saved,
            total_leads: leads.len(),
        })
    }
}

fn drafts_by_key(drafts: &[OutreachDraft]) -> HashMap<&str, &OutreachDraft> {
    drafts.iter().map(|draft| (draft.lead_key(), draft)).collect()
}
