//! Parsers for scraper-provider JSON payloads.
//!
//! Accepts the profile-scraper item shape (`followersCount`, `latestPosts`,
//! `relatedProfiles`, ...) and the post-search item shape (`ownerUsername`,
//! `ownerFollowers`). Missing or mistyped fields degrade to `None`/0 rather
//! than failing the whole payload.

use std::sync::LazyLock;

use brandaudit_core::{
    BrandProfile, DiscoveredCandidate, DiscoverySource, InfluencerProfile, Post, PostType,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::error::SourceError;

static CAPTION_HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid regex"));

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn u64_field(item: &Value, key: &str) -> Option<u64> {
    item.get(key).and_then(Value::as_u64)
}

fn bool_field(item: &Value, key: &str) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn require_object<'v>(payload: &'v Value, what: &str) -> Result<&'v Value, SourceError> {
    if payload.is_object() {
        Ok(payload)
    } else {
        Err(SourceError::Payload(format!("{what} payload is not a JSON object")))
    }
}

fn username(item: &Value) -> Result<String, SourceError> {
    str_field(item, "username")
        .ok_or_else(|| SourceError::Payload("profile payload has no username".to_string()))
}

fn profile_pic(item: &Value) -> Option<String> {
    str_field(item, "profilePicUrl").or_else(|| str_field(item, "profilePicUrlHD"))
}

/// `Image`/`Video`/`Carousel`/`Reel`; anything else reads as an image.
#[must_use]
pub fn parse_post_type(raw: Option<&str>) -> PostType {
    match raw {
        Some("Video") => PostType::Video,
        Some("Carousel" | "Sidecar") => PostType::Carousel,
        Some("Reel") => PostType::Reel,
        _ => PostType::Image,
    }
}

/// `#word` tokens of a caption, in order, without the `#`.
#[must_use]
pub fn caption_hashtags(caption: &str) -> Vec<String> {
    CAPTION_HASHTAG_RE
        .captures_iter(caption)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// RFC 3339 timestamps, or ISO 8601 without an offset (read as UTC).
/// Anything else is treated as missing.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_post(item: &Value) -> Post {
    let caption = str_field(item, "caption").unwrap_or_default();
    Post {
        post_id: str_field(item, "id")
            .or_else(|| str_field(item, "shortCode"))
            .unwrap_or_default(),
        post_type: parse_post_type(item.get("type").and_then(Value::as_str)),
        hashtags: caption_hashtags(&caption),
        likes_count: u64_field(item, "likesCount").unwrap_or(0),
        comments_count: u64_field(item, "commentsCount").unwrap_or(0),
        timestamp: item
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        caption,
    }
}

/// Parse a profile-scraper item into a brand snapshot.
///
/// # Errors
///
/// Returns [`SourceError::Payload`] if the payload is not an object or has
/// no username.
pub fn parse_brand_profile(payload: &Value) -> Result<BrandProfile, SourceError> {
    let item = require_object(payload, "brand profile")?;
    Ok(BrandProfile {
        username: username(item)?,
        full_name: str_field(item, "fullName"),
        biography: str_field(item, "biography"),
        followers_count: u64_field(item, "followersCount"),
        following_count: u64_field(item, "followingCount"),
        posts_count: u64_field(item, "postsCount"),
        profile_pic_url: profile_pic(item),
        is_verified: bool_field(item, "verified"),
        is_business: bool_field(item, "isBusinessAccount"),
        raw_data: payload.clone(),
    })
}

/// Parse a profile-scraper item, keeping at most `recent_posts_limit` posts.
///
/// # Errors
///
/// Returns [`SourceError::Payload`] if the payload is not an object or has
/// no username.
pub fn parse_influencer_profile(
    payload: &Value,
    recent_posts_limit: usize,
) -> Result<InfluencerProfile, SourceError> {
    let item = require_object(payload, "influencer profile")?;
    let recent_posts = item
        .get("latestPosts")
        .and_then(Value::as_array)
        .map(|posts| {
            posts
                .iter()
                .filter(|p| p.is_object())
                .take(recent_posts_limit)
                .map(parse_post)
                .collect()
        })
        .unwrap_or_default();

    Ok(InfluencerProfile {
        username: username(item)?,
        full_name: str_field(item, "fullName"),
        biography: str_field(item, "biography"),
        followers_count: u64_field(item, "followersCount"),
        following_count: u64_field(item, "followingCount"),
        posts_count: u64_field(item, "postsCount"),
        profile_pic_url: profile_pic(item),
        is_verified: bool_field(item, "verified"),
        is_business: bool_field(item, "isBusinessAccount"),
        recent_posts,
        raw_data: payload.clone(),
    })
}

/// Suggested profiles listed on a brand's profile-scraper item.
#[must_use]
pub fn parse_related_profiles(payload: &Value, brand_handle: &str) -> Vec<DiscoveredCandidate> {
    payload
        .get("relatedProfiles")
        .and_then(Value::as_array)
        .map(|entries| parse_related_entries(entries, brand_handle))
        .unwrap_or_default()
}

/// `{ "username", "followersCount" }` entries; entries without a username
/// are skipped.
#[must_use]
pub fn parse_related_entries(entries: &[Value], brand_handle: &str) -> Vec<DiscoveredCandidate> {
    entries
        .iter()
        .filter_map(|related| {
            Some(DiscoveredCandidate {
                username: str_field(related, "username")?,
                followers_count: u64_field(related, "followersCount"),
                discovery_source: DiscoverySource::RelatedProfiles,
                discovery_context: format!("Suggested profile from @{brand_handle}"),
            })
        })
        .collect()
}

/// Post owners from a tag or hashtag search, one candidate per owner.
///
/// `context` builds the discovery note for each candidate.
pub fn parse_post_owners(
    items: &[Value],
    source: DiscoverySource,
    context: impl Fn() -> String,
) -> Vec<DiscoveredCandidate> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter_map(|item| {
            let owner = str_field(item, "ownerUsername").or_else(|| {
                item.get("owner")
                    .and_then(|owner| str_field(owner, "username"))
            })?;
            seen.insert(owner.clone()).then(|| DiscoveredCandidate {
                username: owner,
                followers_count: u64_field(item, "ownerFollowers"),
                discovery_source: source,
                discovery_context: context(),
            })
        })
        .collect()
}
