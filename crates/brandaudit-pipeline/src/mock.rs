//! Deterministic stand-in for the scraping provider.
//!
//! Every value is drawn from an RNG seeded with a SHA-256 of the handle, so
//! the same handle always yields the same snapshot. Used when no provider
//! key or fixture directory is configured.

use async_trait::async_trait;
use brandaudit_core::{
    BrandProfile, DiscoveredCandidate, DiscoverySource, InfluencerProfile, Post, PostType,
};
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::SourceError;
use crate::source::{DiscoveryQuery, ProfileSource};

const TAGGED_POOL: &[&str] = &[
    "lifestyle.anna",
    "fitcoach_mike",
    "beauty.daily.pl",
    "travel.kate",
    "foodie_adventures",
    "style.with.emma",
    "wellness_guru",
    "tech.reviews.pl",
    "home.inspo.daily",
    "mama.blogger.cz",
];

const RELATED_POOL: &[&str] = &[
    "brand.collab.hub",
    "digital.native.ro",
    "content.creator.pl",
    "social.media.pro",
    "influencer.daily",
    "creator.economy",
    "viral.content.cz",
    "trending.now.pl",
];

const HASHTAG_POOL: &[&str] = &[
    "skincare.routine.daily",
    "ootd.polska",
    "healthyliving.cz",
    "makeup.tutorials.ro",
    "gym.motivation.pl",
    "vegan.eats.europe",
    "diy.home.decor",
    "book.club.cee",
    "pet.lovers.daily",
    "eco.living.pl",
];

const POST_TAGS: &[&str] = &[
    "lifestyle",
    "fashion",
    "beauty",
    "travel",
    "fitness",
    "food",
    "wellness",
    "skincare",
    "ootd",
    "instagood",
    "photooftheday",
    "style",
    "healthy",
    "motivation",
    "homedecor",
];

const CAPTIONS: &[&str] = &[
    "New week, new goals",
    "Morning routine that actually works for me. Sharing every step below, \
     from the first coffee to the last stretch before I head out.",
    "Obsessed with this one",
    "Partnered with some of my favourite brands this month and I cannot wait \
     to show you everything. Let me know in the comments which look you like \
     best and I will post a full breakdown on Friday.",
    "Weekend mood",
    "Three things I learned this year about slowing down, saying no, and \
     making space for the people who matter.",
];

const POST_TYPES: [PostType; 4] = [
    PostType::Image,
    PostType::Video,
    PostType::Carousel,
    PostType::Reel,
];

const MOCK_POSTS_PER_PROFILE: usize = 12;
/// 2025-06-01T12:00:00Z; newest mock post is published here.
const MOCK_ANCHOR_SECS: i64 = 1_748_779_200;

fn seeded_rng(salt: &str, handle: &str) -> StdRng {
    let digest = Sha256::digest(format!("{salt}:{handle}").as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    StdRng::seed_from_u64(u64::from_be_bytes(seed))
}

fn display_name(handle: &str) -> String {
    handle
        .split(['.', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(MOCK_ANCHOR_SECS)
}

fn pool_for(method: DiscoverySource) -> &'static [&'static str] {
    match method {
        DiscoverySource::TaggedPosts => TAGGED_POOL,
        DiscoverySource::RelatedProfiles => RELATED_POOL,
        DiscoverySource::HashtagSearch => HASHTAG_POOL,
    }
}

/// Deterministic mock profile source.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProfileSource;

impl MockProfileSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn brand_profile(handle: &str) -> BrandProfile {
        let mut rng = seeded_rng("brand", handle);
        let name = display_name(handle);
        let bios = [
            format!("Official {name} | Delivering quality since 2015"),
            format!("{name} - Your trusted partner in CEE"),
            format!("We are {name} | Innovation meets tradition"),
            format!("{name} | Premium products for everyday life"),
        ];

        BrandProfile {
            username: handle.to_string(),
            full_name: Some(name),
            followers_count: Some(rng.random_range(5_000..=500_000)),
            following_count: Some(rng.random_range(200..=2_000)),
            posts_count: Some(rng.random_range(50..=2_000)),
            biography: bios.choose(&mut rng).cloned(),
            profile_pic_url: Some(format!(
                "https://mock-cdn.example.com/profiles/{handle}.jpg"
            )),
            is_verified: rng.random_bool(0.4),
            is_business: true,
            raw_data: json!({ "source": "mock", "handle": handle }),
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn influencer_profile(handle: &str) -> InfluencerProfile {
        let mut rng = seeded_rng("influencer", handle);
        let followers: u64 = rng.random_range(1_000..=200_000);
        let base_rate: f64 = rng.random_range(0.01..0.08);
        let comment_ratio: f64 = rng.random_range(0.01..0.08);
        let type_count = rng.random_range(1..=POST_TYPES.len());

        let mut published = anchor();
        let recent_posts = (0..MOCK_POSTS_PER_PROFILE)
            .map(|i| {
                let likes = (followers as f64 * base_rate * rng.random_range(0.6_f64..1.4)) as u64;
                let comments = (likes as f64 * comment_ratio) as u64;
                let tag_count = rng.random_range(2..=10);
                let hashtags: Vec<String> = POST_TAGS
                    .choose_multiple(&mut rng, tag_count)
                    .map(|t| (*t).to_string())
                    .collect();
                let body = CAPTIONS.choose(&mut rng).copied().unwrap_or_default();
                let tags = hashtags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let post = Post {
                    post_id: format!("{handle}-{i}"),
                    post_type: POST_TYPES[rng.random_range(0..type_count)],
                    caption: format!("{body} {tags}"),
                    likes_count: likes,
                    comments_count: comments,
                    timestamp: Some(published),
                    hashtags,
                };
                published -= TimeDelta::hours(rng.random_range(12..=96));
                post
            })
            .collect();

        InfluencerProfile {
            username: handle.to_string(),
            full_name: Some(display_name(handle)),
            biography: Some(format!("Creator | {}", display_name(handle))),
            followers_count: Some(followers),
            following_count: Some(rng.random_range(100..=2_000)),
            posts_count: Some(rng.random_range(50..=3_000)),
            profile_pic_url: Some(format!(
                "https://mock-cdn.example.com/profiles/{handle}.jpg"
            )),
            is_verified: rng.random_bool(0.2),
            is_business: false,
            recent_posts,
            raw_data: json!({ "source": "mock", "handle": handle }),
        }
    }

    /// The full discovery plan for a brand: 8-15 candidates split roughly
    /// 40/30/30 across methods, each username used once.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn discovery_plan(brand_handle: &str) -> Vec<DiscoveredCandidate> {
        let mut rng = seeded_rng("discovery", brand_handle);
        let total: usize = rng.random_range(8..=15);
        let tagged = ((total as f64 * 0.4) as usize).max(2);
        let related = ((total as f64 * 0.3) as usize).max(2);
        let hashtag = total.saturating_sub(tagged + related);

        let mut plan: Vec<DiscoveredCandidate> = Vec::with_capacity(total);
        for (method, count) in DiscoverySource::ALL.into_iter().zip([tagged, related, hashtag]) {
            let available: Vec<&str> = pool_for(method)
                .iter()
                .copied()
                .filter(|u| *u != brand_handle && !plan.iter().any(|c| c.username == *u))
                .collect();
            let picked: Vec<&str> = available
                .choose_multiple(&mut rng, count)
                .copied()
                .collect();
            for username in picked {
                plan.push(DiscoveredCandidate {
                    username: username.to_string(),
                    followers_count: Some(rng.random_range(1_000..=200_000)),
                    discovery_source: method,
                    discovery_context: format!("Mock discovery via {method} for @{brand_handle}"),
                });
            }
        }
        plan
    }
}

#[async_trait]
impl ProfileSource for MockProfileSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_brand_profile(&self, handle: &str) -> Result<BrandProfile, SourceError> {
        tracing::debug!(handle, "mock brand profile");
        Ok(Self::brand_profile(handle))
    }

    async fn fetch_influencer_profile(
        &self,
        handle: &str,
    ) -> Result<InfluencerProfile, SourceError> {
        tracing::debug!(handle, "mock influencer profile");
        Ok(Self::influencer_profile(handle))
    }

    async fn discover_candidates(
        &self,
        method: DiscoverySource,
        query: &DiscoveryQuery,
    ) -> Result<Vec<DiscoveredCandidate>, SourceError> {
        Ok(Self::discovery_plan(&query.brand_handle)
            .into_iter()
            .filter(|c| c.discovery_source == method)
            .collect())
    }
}
