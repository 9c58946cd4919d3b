//! The fixed pipeline step table.

use brandaudit_core::AuditStatus;

/// One row of the pipeline: the status a run enters, the label shown while
/// it is there, and the progress percentage persisted on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStep {
    pub status: AuditStatus,
    pub label: &'static str,
    pub progress: u8,
}

pub const PIPELINE_STEPS: [PipelineStep; 6] = [
    PipelineStep {
        status: AuditStatus::ScrapingBrand,
        label: "Scraping brand profile",
        progress: 15,
    },
    PipelineStep {
        status: AuditStatus::DiscoveringInfluencers,
        label: "Discovering associated influencers",
        progress: 30,
    },
    PipelineStep {
        status: AuditStatus::AnalyzingInfluencers,
        label: "Analyzing influencer profiles",
        progress: 55,
    },
    PipelineStep {
        status: AuditStatus::Scoring,
        label: "Calculating scores and metrics",
        progress: 75,
    },
    PipelineStep {
        status: AuditStatus::GeneratingNarrative,
        label: "Generating audit narrative",
        progress: 90,
    },
    PipelineStep {
        status: AuditStatus::Completed,
        label: "Audit complete",
        progress: 100,
    },
];
