//! Audit run lifecycle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Status of an audit run.
///
/// Runs move strictly forward through the pipeline states; `Failed` is
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pending,
    ScrapingBrand,
    DiscoveringInfluencers,
    AnalyzingInfluencers,
    Scoring,
    GeneratingNarrative,
    Completed,
    Failed,
}

impl AuditStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::ScrapingBrand => "scraping_brand",
            AuditStatus::DiscoveringInfluencers => "discovering_influencers",
            AuditStatus::AnalyzingInfluencers => "analyzing_influencers",
            AuditStatus::Scoring => "scoring",
            AuditStatus::GeneratingNarrative => "generating_narrative",
            AuditStatus::Completed => "completed",
            AuditStatus::Failed => "failed",
        }
    }

    /// The only state a run may advance to from `self`, if any.
    #[must_use]
    pub fn next(self) -> Option<AuditStatus> {
        match self {
            AuditStatus::Pending => Some(AuditStatus::ScrapingBrand),
            AuditStatus::ScrapingBrand => Some(AuditStatus::DiscoveringInfluencers),
            AuditStatus::DiscoveringInfluencers => Some(AuditStatus::AnalyzingInfluencers),
            AuditStatus::AnalyzingInfluencers => Some(AuditStatus::Scoring),
            AuditStatus::Scoring => Some(AuditStatus::GeneratingNarrative),
            AuditStatus::GeneratingNarrative => Some(AuditStatus::Completed),
            AuditStatus::Completed | AuditStatus::Failed => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, AuditStatus::Completed | AuditStatus::Failed)
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "pending" => AuditStatus::Pending,
            "scraping_brand" => AuditStatus::ScrapingBrand,
            "discovering_influencers" => AuditStatus::DiscoveringInfluencers,
            "analyzing_influencers" => AuditStatus::AnalyzingInfluencers,
            "scoring" => AuditStatus::Scoring,
            "generating_narrative" => AuditStatus::GeneratingNarrative,
            "completed" => AuditStatus::Completed,
            "failed" => AuditStatus::Failed,
            other => return Err(CoreError::UnknownStatus(other.to_string())),
        };
        Ok(status)
    }
}

/// One end-to-end execution of the audit pipeline for a brand handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRun {
    pub id: Uuid,
    pub brand_handle: String,
    pub status: AuditStatus,
    /// Percentage in `[0, 100]`.
    pub progress: u8,
    pub current_step: Option<String>,
    pub language: String,
    /// Aggregate score in `[0, 100]`, set by the scoring step.
    pub health_score: Option<f64>,
    pub executive_summary: Option<String>,
    pub recommendations: Vec<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AuditRun {
    /// Creates a run in `pending` with zero progress.
    #[must_use]
    pub fn new(brand_handle: &str, language: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand_handle: brand_handle.to_string(),
            status: AuditStatus::Pending,
            progress: 0,
            current_step: None,
            language: language.to_string(),
            health_score: None,
            executive_summary: None,
            recommendations: Vec::new(),
            error_message: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Moves the run into `status`, which must be the direct successor of
    /// the current status.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] for skipped, repeated, or
    /// backward transitions, and for any transition out of a terminal state.
    pub fn advance(
        &mut self,
        status: AuditStatus,
        progress: u8,
        label: &str,
    ) -> Result<(), CoreError> {
        if self.status.next() != Some(status) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.progress = progress.min(100);
        self.current_step = Some(label.to_string());
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the run as failed: zero progress, no current step, error recorded.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if the run already finished.
    pub fn fail(&mut self, error_message: &str) -> Result<(), CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: AuditStatus::Failed,
            });
        }
        self.status = AuditStatus::Failed;
        self.progress = 0;
        self.current_step = None;
        self.error_message = Some(error_message.to_string());
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
