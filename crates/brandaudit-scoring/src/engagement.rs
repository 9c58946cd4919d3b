//! Engagement rate and per-post averages.

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

use crate::math::{mean, round_to};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// `(avg_likes + avg_comments) / followers`, 6 decimal places.
    pub engagement_rate: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
}

/// Compute engagement from the recent posts.
///
/// Profiles with no posts or no followers yield all-zero metrics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_engagement_metrics(profile: &InfluencerProfile) -> EngagementMetrics {
    let followers = profile.followers();
    if profile.recent_posts.is_empty() || followers == 0 {
        return EngagementMetrics::default();
    }

    let likes: Vec<f64> = profile
        .recent_posts
        .iter()
        .map(|p| p.likes_count as f64)
        .collect();
    let comments: Vec<f64> = profile
        .recent_posts
        .iter()
        .map(|p| p.comments_count as f64)
        .collect();

    let avg_likes = mean(&likes).unwrap_or(0.0);
    let avg_comments = mean(&comments).unwrap_or(0.0);
    let engagement_rate = (avg_likes + avg_comments) / followers as f64;

    EngagementMetrics {
        engagement_rate: round_to(engagement_rate, 6),
        avg_likes: round_to(avg_likes, 2),
        avg_comments: round_to(avg_comments, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, profile};

    #[test]
    fn no_posts_yields_zero_metrics() {
        let p = profile(10_000, 500, vec![]);
        assert_eq!(calculate_engagement_metrics(&p), EngagementMetrics::default());
    }

    #[test]
    fn zero_followers_yields_zero_metrics() {
        let p = profile(0, 500, vec![post(100, 10), post(200, 20)]);
        assert_eq!(calculate_engagement_metrics(&p), EngagementMetrics::default());
    }

    #[test]
    fn averages_and_rate() {
        let p = profile(10_000, 500, vec![post(100, 10), post(300, 30)]);
        let m = calculate_engagement_metrics(&p);
        assert_eq!(m.avg_likes, 200.0);
        assert_eq!(m.avg_comments, 20.0);
        assert_eq!(m.engagement_rate, 0.022);
    }

    #[test]
    fn rate_is_rounded_to_six_places() {
        let p = profile(3, 0, vec![post(1, 0)]);
        let m = calculate_engagement_metrics(&p);
        assert_eq!(m.engagement_rate, 0.333_333);
    }

    #[test]
    fn averages_are_rounded_to_two_places() {
        let p = profile(1_000, 0, vec![post(1, 1), post(1, 0), post(2, 0)]);
        let m = calculate_engagement_metrics(&p);
        assert_eq!(m.avg_likes, 1.33);
        assert_eq!(m.avg_comments, 0.33);
    }
}
