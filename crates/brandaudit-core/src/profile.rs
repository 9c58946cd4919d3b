//! Profile snapshots supplied by the profile collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media type of a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Image,
    Video,
    Carousel,
    Reel,
}

impl PostType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Image => "image",
            PostType::Video => "video",
            PostType::Carousel => "carousel",
            PostType::Reel => "reel",
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` for a plausible account handle: ASCII letters, digits, `.` and
/// `_`, not made of dots alone. Handles are used as storage keys and file
/// stems, so separators never get through.
#[must_use]
pub fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        && handle.chars().any(|c| c != '.')
}

/// One recent post from an influencer's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub post_type: PostType,
    pub caption: String,
    pub likes_count: u64,
    pub comments_count: u64,
    /// `None` when the source timestamp was missing or unparsable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Hashtags extracted from the caption, without the leading `#`.
    pub hashtags: Vec<String>,
}

/// Snapshot of a brand account. Replaced wholesale on re-scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub profile_pic_url: Option<String>,
    pub is_verified: bool,
    pub is_business: bool,
    /// Untouched provider payload, kept for audit trails.
    pub raw_data: serde_json::Value,
}

/// Snapshot of an influencer account with its recent posts, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerProfile {
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub profile_pic_url: Option<String>,
    pub is_verified: bool,
    pub is_business: bool,
    pub recent_posts: Vec<Post>,
    pub raw_data: serde_json::Value,
}

impl InfluencerProfile {
    /// Follower count with missing data read as zero.
    #[must_use]
    pub fn followers(&self) -> u64 {
        self.followers_count.unwrap_or(0)
    }

    /// Following count with missing data read as zero.
    #[must_use]
    pub fn following(&self) -> u64 {
        self.following_count.unwrap_or(0)
    }

    /// Timestamps of the recent posts that carry one, in feed order.
    pub fn post_timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.recent_posts.iter().filter_map(|p| p.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_allow_letters_digits_dots_and_underscores() {
        assert!(is_valid_handle("nike.poland"));
        assert!(is_valid_handle("Zara_Home.pl2"));
    }

    #[test]
    fn handles_reject_separators_and_dot_only_names() {
        for bad in ["", "../x", "a/b", "a\\b", "..", "two words", "caf\u{e9}"] {
            assert!(!is_valid_handle(bad), "{bad:?} should be rejected");
        }
    }
}
