//! Audit pipeline: collaborator contracts, the discovery aggregator, the
//! step orchestrator, and the bundled profile sources and store.

pub mod discovery;
pub mod error;
pub mod fixtures;
pub mod memory_store;
pub mod mock;
pub mod narrative;
pub mod orchestrator;
pub mod provider;
pub mod report;
pub mod source;
pub mod steps;
pub mod store;

pub use discovery::{discover_influencers, extract_hashtags, DiscoverySettings};
pub use error::{NarrativeError, PipelineError, SourceError, StoreError};
pub use fixtures::FixtureProfileSource;
pub use memory_store::InMemoryStore;
pub use mock::MockProfileSource;
pub use narrative::{Narrative, NarrativeGenerator};
pub use orchestrator::{normalize_handle, submit_audit, AuditOrchestrator, PipelineSettings};
pub use report::{load_audit_report, AuditReport, BrandOverview, InfluencerAnalysis, OverlapEntry};
pub use source::{DiscoveryQuery, ProfileSource};
pub use steps::{PipelineStep, PIPELINE_STEPS};
pub use store::{
    AuditInfluencerRecord, AuditStore, BrandRecord, InfluencerRecord, LinkedInfluencer,
    OverlapRecord, StepCommit,
};
