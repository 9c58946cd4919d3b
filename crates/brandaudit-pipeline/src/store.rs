//! Storage collaborator contract and the records it persists.

use async_trait::async_trait;
use brandaudit_core::{
    AuditRun, BrandProfile, DiscoveredCandidate, DiscoverySource, InfluencerProfile,
};
use brandaudit_scoring::{AuditScores, EngagementMetrics, OverlapEstimate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A brand account, keyed by handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: Uuid,
    pub handle: String,
    pub display_name: Option<String>,
    pub followers_count: Option<u64>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
    pub profile_data: Option<serde_json::Value>,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BrandRecord {
    #[must_use]
    pub fn new(handle: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle: handle.to_string(),
            display_name: None,
            followers_count: None,
            bio: None,
            profile_pic_url: None,
            profile_data: None,
            last_scraped_at: None,
            created_at: Utc::now(),
        }
    }

    /// Overwrite scraped fields from a fresh snapshot.
    pub fn apply_profile(&mut self, profile: &BrandProfile, scraped_at: DateTime<Utc>) {
        self.display_name.clone_from(&profile.full_name);
        self.followers_count = profile.followers_count;
        self.bio.clone_from(&profile.biography);
        self.profile_pic_url.clone_from(&profile.profile_pic_url);
        self.profile_data = Some(profile.raw_data.clone());
        self.last_scraped_at = Some(scraped_at);
    }
}

/// An influencer account, keyed by handle and shared across audit runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerRecord {
    pub id: Uuid,
    pub handle: String,
    pub display_name: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
    pub profile_data: Option<serde_json::Value>,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InfluencerRecord {
    /// Seed a record from a discovery hit; only the follower count is known.
    #[must_use]
    pub fn from_candidate(candidate: &DiscoveredCandidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle: candidate.username.clone(),
            display_name: None,
            followers_count: candidate.followers_count,
            following_count: None,
            posts_count: None,
            bio: None,
            profile_pic_url: None,
            profile_data: None,
            last_scraped_at: None,
            created_at: Utc::now(),
        }
    }

    /// Overwrite scraped fields from a fresh snapshot.
    pub fn apply_profile(&mut self, profile: &InfluencerProfile, scraped_at: DateTime<Utc>) {
        self.display_name.clone_from(&profile.full_name);
        self.followers_count = profile.followers_count;
        self.following_count = profile.following_count;
        self.posts_count = profile.posts_count;
        self.bio.clone_from(&profile.biography);
        self.profile_pic_url.clone_from(&profile.profile_pic_url);
        self.profile_data = Some(profile.raw_data.clone());
        self.last_scraped_at = Some(scraped_at);
    }
}

/// Links one audit run to one influencer, carrying that run's metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfluencerRecord {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub influencer_id: Uuid,
    pub discovery_source: DiscoverySource,
    /// Set by the analysis step.
    pub engagement: Option<EngagementMetrics>,
    /// Set by the scoring step.
    pub scores: Option<AuditScores>,
    pub created_at: DateTime<Utc>,
}

impl AuditInfluencerRecord {
    #[must_use]
    pub fn new(audit_id: Uuid, influencer_id: Uuid, discovery_source: DiscoverySource) -> Self {
        Self {
            id: Uuid::new_v4(),
            audit_id,
            influencer_id,
            discovery_source,
            engagement: None,
            scores: None,
            created_at: Utc::now(),
        }
    }
}

/// Estimated overlap between two influencers within one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapRecord {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub influencer_a_id: Uuid,
    pub influencer_b_id: Uuid,
    pub estimate: OverlapEstimate,
    pub created_at: DateTime<Utc>,
}

impl OverlapRecord {
    #[must_use]
    pub fn new(
        audit_id: Uuid,
        influencer_a_id: Uuid,
        influencer_b_id: Uuid,
        estimate: OverlapEstimate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            audit_id,
            influencer_a_id,
            influencer_b_id,
            estimate,
            created_at: Utc::now(),
        }
    }
}

/// A join row together with the influencer it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedInfluencer {
    pub link: AuditInfluencerRecord,
    pub influencer: InfluencerRecord,
}

/// All writes of one pipeline step. A store applies a commit atomically:
/// either every record lands or none does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepCommit {
    /// Replaces the stored audit run with the same id.
    pub audit: Option<AuditRun>,
    /// Upserted by handle.
    pub brands: Vec<BrandRecord>,
    /// Upserted by id; handles must stay unique.
    pub influencers: Vec<InfluencerRecord>,
    /// Upserted by id.
    pub audit_influencers: Vec<AuditInfluencerRecord>,
    /// Appended.
    pub overlaps: Vec<OverlapRecord>,
}

impl StepCommit {
    /// A commit carrying only an audit-run update.
    #[must_use]
    pub fn audit(audit: AuditRun) -> Self {
        Self {
            audit: Some(audit),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AuditStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no run has this id.
    async fn load_audit(&self, id: Uuid) -> Result<AuditRun, StoreError>;

    /// Persist a newly submitted run.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a run with this id already exists.
    async fn create_audit(&self, audit: &AuditRun) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no brand has this handle.
    async fn load_brand(&self, handle: &str) -> Result<BrandRecord, StoreError>;

    /// Bulk lookup by exact, case-sensitive handle. Unknown handles are
    /// simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage failure.
    async fn find_influencers_by_handles(
        &self,
        handles: &[String],
    ) -> Result<Vec<InfluencerRecord>, StoreError>;

    /// Every influencer linked to the run, in link order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage failure.
    async fn list_audit_influencers(
        &self,
        audit_id: Uuid,
    ) -> Result<Vec<LinkedInfluencer>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on storage failure.
    async fn list_overlaps(&self, audit_id: Uuid) -> Result<Vec<OverlapRecord>, StoreError>;

    /// Apply every write in `commit` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::Conflict`] when the
    /// commit references missing rows or breaks handle uniqueness; nothing
    /// is written in that case.
    async fn commit(&self, commit: StepCommit) -> Result<(), StoreError>;
}
