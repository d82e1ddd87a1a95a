//! Lead shapes passed between pipeline stages.

pub mod domain;

pub use domain::{
    DiscoveredLead, EnrichedLead, LeadValidationError, QualifiedLead, MAX_TECHNOLOGIES,
};
