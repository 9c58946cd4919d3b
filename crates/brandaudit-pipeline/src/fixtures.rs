//! Profile source backed by provider payloads saved on disk.
//!
//! Layout under the fixture directory:
//!
//! - `<handle>.json`: a profile-scraper item for a brand or influencer.
//! - `<brand>.discovery.json`: `{ "tagged_posts": [post items],
//!   "related_profiles": [related entries], "hashtag_search": { "<tag>": [post items] } }`.
//!   Missing keys read as empty, except `related_profiles`: without it the
//!   brand's own `relatedProfiles` list in `<brand>.json` is used.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brandaudit_core::{
    is_valid_handle, BrandProfile, DiscoveredCandidate, DiscoverySource, InfluencerProfile,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;
use crate::provider::{
    parse_brand_profile, parse_influencer_profile, parse_post_owners, parse_related_entries,
    parse_related_profiles,
};
use crate::source::{DiscoveryQuery, ProfileSource};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DiscoveryFixture {
    tagged_posts: Vec<Value>,
    related_profiles: Option<Vec<Value>>,
    hashtag_search: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct FixtureProfileSource {
    dir: PathBuf,
    recent_posts_limit: usize,
}

impl FixtureProfileSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, recent_posts_limit: usize) -> Self {
        Self {
            dir: dir.into(),
            recent_posts_limit,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and decode `<dir>/<handle><suffix>`; a missing file is `NoData`.
    /// Handles that could leave the fixture directory are rejected unread.
    async fn read_json(&self, handle: &str, suffix: &str) -> Result<Value, SourceError> {
        if !is_valid_handle(handle) {
            return Err(SourceError::InvalidHandle(handle.to_string()));
        }
        let path = self.dir.join(format!("{handle}{suffix}"));
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NoData {
                    handle: handle.to_string(),
                });
            }
            Err(source) => {
                return Err(SourceError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| SourceError::Deserialize {
            context: path.display().to_string(),
            source,
        })
    }

    async fn discovery_fixture(&self, brand_handle: &str) -> Result<DiscoveryFixture, SourceError> {
        let value = self
            .read_json(brand_handle, ".discovery.json")
            .await?;
        serde_json::from_value(value).map_err(|source| SourceError::Deserialize {
            context: format!("discovery fixture for @{brand_handle}"),
            source,
        })
    }
}

#[async_trait]
impl ProfileSource for FixtureProfileSource {
    fn name(&self) -> &str {
        "fixtures"
    }

    async fn fetch_brand_profile(&self, handle: &str) -> Result<BrandProfile, SourceError> {
        let payload = self.read_json(handle, ".json").await?;
        parse_brand_profile(&payload)
    }

    async fn fetch_influencer_profile(
        &self,
        handle: &str,
    ) -> Result<InfluencerProfile, SourceError> {
        let payload = self.read_json(handle, ".json").await?;
        parse_influencer_profile(&payload, self.recent_posts_limit)
    }

    async fn discover_candidates(
        &self,
        method: DiscoverySource,
        query: &DiscoveryQuery,
    ) -> Result<Vec<DiscoveredCandidate>, SourceError> {
        let brand = query.brand_handle.as_str();
        let fixture = self.discovery_fixture(brand).await?;

        let found = match method {
            DiscoverySource::TaggedPosts => {
                parse_post_owners(&fixture.tagged_posts, method, || {
                    format!("Tagged @{brand} in post")
                })
            }
            DiscoverySource::RelatedProfiles => match &fixture.related_profiles {
                Some(entries) => parse_related_entries(entries, brand),
                None => {
                    let payload = self.read_json(brand, ".json").await?;
                    parse_related_profiles(&payload, brand)
                }
            },
            DiscoverySource::HashtagSearch => {
                // Searched in extraction order; an owner keeps the first tag
                // they were found under.
                let mut seen = HashSet::new();
                query
                    .hashtags
                    .iter()
                    .filter_map(|tag| fixture.hashtag_search.get(tag).map(|items| (tag, items)))
                    .flat_map(|(tag, items)| {
                        parse_post_owners(items, method, || format!("Found via #{tag}"))
                    })
                    .filter(|c| seen.insert(c.username.clone()))
                    .collect()
            }
        };
        Ok(found)
    }
}
