//! Influencer discovery result types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the independent methods used to find influencers around a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    TaggedPosts,
    RelatedProfiles,
    HashtagSearch,
}

impl DiscoverySource {
    /// Every source, in the order the aggregator runs and merges them.
    pub const ALL: [DiscoverySource; 3] = [
        DiscoverySource::TaggedPosts,
        DiscoverySource::RelatedProfiles,
        DiscoverySource::HashtagSearch,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiscoverySource::TaggedPosts => "tagged_posts",
            DiscoverySource::RelatedProfiles => "related_profiles",
            DiscoverySource::HashtagSearch => "hashtag_search",
        }
    }
}

impl std::fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoverySource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiscoverySource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSource(s.to_string()))
    }
}

/// An influencer account surfaced by one discovery source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredCandidate {
    pub username: String,
    pub followers_count: Option<u64>,
    pub discovery_source: DiscoverySource,
    /// Free-text note on how the candidate was found.
    pub discovery_context: String,
}

/// Outcome of one discovery run across all sources.
///
/// `sources_attempted` is always the disjoint union of `sources_succeeded`
/// and `sources_failed`; `errors` lines up one-to-one with `sources_failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRunResult {
    pub influencers: Vec<DiscoveredCandidate>,
    pub sources_attempted: Vec<DiscoverySource>,
    pub sources_succeeded: Vec<DiscoverySource>,
    pub sources_failed: Vec<DiscoverySource>,
    pub errors: Vec<String>,
}

impl DiscoveryRunResult {
    /// Usernames of all candidates, in discovery order.
    #[must_use]
    pub fn usernames(&self) -> Vec<&str> {
        self.influencers.iter().map(|c| c.username.as_str()).collect()
    }
}
