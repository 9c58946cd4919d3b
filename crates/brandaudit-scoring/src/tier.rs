//! Follower tier buckets used to parametrize reach and CPM heuristics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowerTier {
    /// Under 10k followers.
    Nano,
    /// 10k to 50k.
    Micro,
    /// 50k to 500k.
    Mid,
    /// 500k and above.
    Macro,
}

impl FollowerTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FollowerTier::Nano => "nano",
            FollowerTier::Micro => "micro",
            FollowerTier::Mid => "mid",
            FollowerTier::Macro => "macro",
        }
    }

    /// Share of followers a typical post reaches.
    #[must_use]
    pub fn base_reach_fraction(self) -> f64 {
        match self {
            FollowerTier::Nano => 0.25,
            FollowerTier::Micro => 0.15,
            FollowerTier::Mid => 0.08,
            FollowerTier::Macro => 0.04,
        }
    }

    /// Base cost per thousand impressions, in EUR.
    #[must_use]
    pub fn base_cpm(self) -> f64 {
        match self {
            FollowerTier::Nano => 5.0,
            FollowerTier::Micro => 8.0,
            FollowerTier::Mid => 12.0,
            FollowerTier::Macro => 18.0,
        }
    }
}

impl std::fmt::Display for FollowerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a follower count into nano/micro/mid/macro.
#[must_use]
pub fn classify_follower_tier(followers: u64) -> FollowerTier {
    match followers {
        0..10_000 => FollowerTier::Nano,
        10_000..50_000 => FollowerTier::Micro,
        50_000..500_000 => FollowerTier::Mid,
        _ => FollowerTier::Macro,
    }
}
