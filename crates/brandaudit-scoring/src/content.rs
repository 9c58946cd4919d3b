//! Content quality over the recent posts.

use std::collections::HashSet;

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

use crate::math::{mean, round_to, unit};

const W_CAPTION: f64 = 0.30;
const W_HASHTAGS: f64 = 0.20;
const W_CADENCE: f64 = 0.25;
const W_DIVERSITY: f64 = 0.25;

const SECONDS_PER_WEEK: f64 = 7.0 * 24.0 * 3600.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub caption_quality: f64,
    pub hashtag_usage: f64,
    pub posting_frequency: f64,
    pub media_type_diversity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentQuality {
    /// Weighted composite in `[0, 1]`, 4 decimal places.
    pub content_quality_score: f64,
    pub analysis: ContentAnalysis,
}

/// Score captions, hashtag habits, cadence, and media mix.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_content_quality(profile: &InfluencerProfile) -> ContentQuality {
    let posts = &profile.recent_posts;
    if posts.is_empty() {
        return ContentQuality::default();
    }

    let caption_lengths: Vec<f64> = posts
        .iter()
        .map(|p| p.caption.chars().count() as f64)
        .collect();
    let hashtag_counts: Vec<f64> = posts.iter().map(|p| p.hashtags.len() as f64).collect();

    let analysis = ContentAnalysis {
        caption_quality: caption_quality(mean(&caption_lengths).unwrap_or(0.0)),
        hashtag_usage: hashtag_usage(mean(&hashtag_counts).unwrap_or(0.0)),
        posting_frequency: posting_cadence(profile),
        media_type_diversity: media_type_diversity(profile),
    };

    let score = analysis.caption_quality * W_CAPTION
        + analysis.hashtag_usage * W_HASHTAGS
        + analysis.posting_frequency * W_CADENCE
        + analysis.media_type_diversity * W_DIVERSITY;

    ContentQuality {
        content_quality_score: round_to(unit(score), 4),
        analysis,
    }
}

/// Longer captions score higher, saturating around 300 characters.
fn caption_quality(avg_len: f64) -> f64 {
    if avg_len >= 100.0 {
        unit(avg_len / 300.0)
    } else if avg_len >= 30.0 {
        avg_len / 100.0
    } else {
        (avg_len / 100.0).max(0.1)
    }
}

/// Sweet spot is 5 to 15 hashtags per post.
fn hashtag_usage(avg_hashtags: f64) -> f64 {
    if (5.0..=15.0).contains(&avg_hashtags) {
        1.0
    } else if avg_hashtags < 5.0 {
        (avg_hashtags / 5.0).max(0.2)
    } else {
        (1.0 - (avg_hashtags - 15.0) / 20.0).max(0.3)
    }
}

/// Sweet spot is 2 to 7 posts per week across the timestamped span.
#[allow(clippy::cast_precision_loss)]
fn posting_cadence(profile: &InfluencerProfile) -> f64 {
    let timestamps: Vec<_> = profile.post_timestamps().collect();
    if timestamps.len() < 2 {
        return 0.3;
    }
    let (Some(earliest), Some(latest)) = (timestamps.iter().min(), timestamps.iter().max())
    else {
        return 0.3;
    };
    let span_secs = (*latest - *earliest).num_milliseconds() as f64 / 1000.0;
    let weeks = (span_secs / SECONDS_PER_WEEK).max(0.1);
    let posts_per_week = timestamps.len() as f64 / weeks;

    if (2.0..=7.0).contains(&posts_per_week) {
        1.0
    } else if posts_per_week < 2.0 {
        (posts_per_week / 2.0).max(0.2)
    } else {
        (1.0 - (posts_per_week - 7.0) / 14.0).max(0.4)
    }
}

fn media_type_diversity(profile: &InfluencerProfile) -> f64 {
    let types: HashSet<_> = profile.recent_posts.iter().map(|p| p.post_type).collect();
    match types.len() {
        0 | 1 => 0.3,
        2 => 0.7,
        _ => 1.0,
    }
}
