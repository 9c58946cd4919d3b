//! Profile collaborator contract.

use async_trait::async_trait;
use brandaudit_core::{BrandProfile, DiscoveredCandidate, DiscoverySource, InfluencerProfile};

use crate::error::SourceError;

/// Inputs shared by every discovery method for one brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryQuery {
    pub brand_handle: String,
    pub brand_bio: Option<String>,
    /// Search hashtags derived from the handle and bio; only the hashtag
    /// method reads these.
    pub hashtags: Vec<String>,
}

/// Supplies profile snapshots and discovery candidates.
///
/// Implementations own their network timeouts and rate limits; every call
/// is independently failable.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch the brand account snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NoData`] when the provider returns nothing.
    async fn fetch_brand_profile(&self, handle: &str) -> Result<BrandProfile, SourceError>;

    /// Fetch an influencer snapshot with recent posts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NoData`] when the provider returns nothing.
    async fn fetch_influencer_profile(
        &self,
        handle: &str,
    ) -> Result<InfluencerProfile, SourceError>;

    /// Run one discovery method.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the method fails; the aggregator records
    /// the failure and moves on.
    async fn discover_candidates(
        &self,
        method: DiscoverySource,
        query: &DiscoveryQuery,
    ) -> Result<Vec<DiscoveredCandidate>, SourceError>;
}
