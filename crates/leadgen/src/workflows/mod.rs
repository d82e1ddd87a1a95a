pub mod discovery;
pub mod enrichment;
pub mod export;
pub mod jobs;
pub mod leads;
pub mod outreach;
pub mod pipeline;
pub mod qualification;
