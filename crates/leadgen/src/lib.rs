//! Lead generation pipeline: contact discovery, firmographic enrichment,
//! deterministic ICP qualification, outreach drafting and export.

pub mod config;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod workflows;
