//! Heuristic pairwise audience overlap.
//!
//! No follower graph is consulted: overlap is inferred from shared hashtags
//! and similar account size, then mapped into a plausible 5-45% band.

use std::collections::HashSet;

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

use crate::math::{round_to, unit};

pub const MIN_OVERLAP_PCT: f64 = 5.0;
pub const MAX_OVERLAP_PCT: f64 = 45.0;
const MIN_SAMPLE_SIZE: u64 = 100;
const MAX_SAMPLE_SIZE: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapEstimate {
    /// In `[5, 45]`, 1 decimal place.
    pub overlap_percentage: f64,
    /// At least 100.
    pub sample_size: u64,
}

/// Estimate how much of `a`'s audience also follows `b`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_audience_overlap(a: &InfluencerProfile, b: &InfluencerProfile) -> OverlapEstimate {
    let tags_a = hashtag_set(a);
    let tags_b = hashtag_set(b);

    let jaccard = if tags_a.is_empty() || tags_b.is_empty() {
        0.0
    } else {
        let shared = tags_a.intersection(&tags_b).count() as f64;
        let union = tags_a.union(&tags_b).count() as f64;
        shared / union
    };

    let followers_a = a.followers();
    let followers_b = b.followers();
    let size_similarity = if followers_a > 0 && followers_b > 0 {
        followers_a.min(followers_b) as f64 / followers_a.max(followers_b) as f64
    } else {
        0.0
    };

    let combined = unit(jaccard * 0.6 + size_similarity * 0.4);
    let overlap_percentage = round_to(MIN_OVERLAP_PCT + combined * 40.0, 1)
        .clamp(MIN_OVERLAP_PCT, MAX_OVERLAP_PCT);

    let sample_size = followers_a
        .min(followers_b)
        .min(MAX_SAMPLE_SIZE)
        .max(MIN_SAMPLE_SIZE);

    OverlapEstimate {
        overlap_percentage,
        sample_size,
    }
}

fn hashtag_set(profile: &InfluencerProfile) -> HashSet<&str> {
    profile
        .recent_posts
        .iter()
        .flat_map(|p| p.hashtags.iter().map(String::as_str))
        .collect()
}
