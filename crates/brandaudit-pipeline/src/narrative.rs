//! Narrative collaborator contract.
//!
//! Summary generation is optional: the orchestrator runs without a
//! generator, and a generator may decline by returning `Ok(None)`.

use async_trait::async_trait;
use brandaudit_core::AuditRun;

use crate::error::NarrativeError;
use crate::store::LinkedInfluencer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub executive_summary: Option<String>,
    pub recommendations: Vec<String>,
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Summarize a scored audit run.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError`] when generation fails; the pipeline logs
    /// the failure and completes without a narrative.
    async fn generate(
        &self,
        audit: &AuditRun,
        influencers: &[LinkedInfluencer],
    ) -> Result<Option<Narrative>, NarrativeError>;
}
