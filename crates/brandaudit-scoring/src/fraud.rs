//! Fraud risk from five independently bounded indicators.
//!
//! | indicator                  | weight |
//! |----------------------------|--------|
//! | follower/following ratio   | 0.20   |
//! | engagement anomaly         | 0.25   |
//! | like/comment ratio         | 0.20   |
//! | engagement consistency     | 0.20   |
//! | posting regularity         | 0.15   |
//!
//! The no-data fallbacks (0.5 for missing following counts, 0.3 for missing
//! likes or too few posts) are inherited constants with no derivation behind
//! them; keep them as they are so scores stay comparable across audits.

use std::collections::BTreeMap;

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

use crate::engagement::EngagementMetrics;
use crate::math::{coefficient_of_variation, non_negative, round_to, unit};

const W_FOLLOWER_FOLLOWING: f64 = 0.20;
const W_ENGAGEMENT_ANOMALY: f64 = 0.25;
const W_LIKE_COMMENT: f64 = 0.20;
const W_CONSISTENCY: f64 = 0.20;
const W_POSTING: f64 = 0.15;

const NO_FOLLOWING_DATA: f64 = 0.5;
const NO_FOLLOWERS: f64 = 0.5;
const NO_LIKES_DATA: f64 = 0.3;
const TOO_FEW_POSTS: f64 = 0.3;
const ZERO_MEAN_GAP: f64 = 0.5;
const TOO_REGULAR: f64 = 0.8;

/// Per-indicator fraud signals, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudIndicators {
    pub follower_following_ratio: f64,
    pub engagement_anomaly: f64,
    pub like_comment_ratio: f64,
    pub engagement_consistency: f64,
    pub posting_frequency: f64,
}

impl FraudIndicators {
    /// Indicator values keyed by name.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("follower_following_ratio", self.follower_following_ratio),
            ("engagement_anomaly", self.engagement_anomaly),
            ("like_comment_ratio", self.like_comment_ratio),
            ("engagement_consistency", self.engagement_consistency),
            ("posting_frequency", self.posting_frequency),
        ])
    }

    fn weighted_sum(&self) -> f64 {
        self.follower_following_ratio * W_FOLLOWER_FOLLOWING
            + self.engagement_anomaly * W_ENGAGEMENT_ANOMALY
            + self.like_comment_ratio * W_LIKE_COMMENT
            + self.engagement_consistency * W_CONSISTENCY
            + self.posting_frequency * W_POSTING
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    /// Weighted composite in `[0, 1]`, 4 decimal places.
    pub fraud_score: f64,
    pub indicators: FraudIndicators,
}

/// Score how likely the account's audience or engagement is inauthentic.
#[must_use]
pub fn calculate_fraud_score(
    profile: &InfluencerProfile,
    engagement: &EngagementMetrics,
) -> FraudAssessment {
    let indicators = FraudIndicators {
        follower_following_ratio: follower_following_ratio(profile),
        engagement_anomaly: engagement_anomaly(profile, engagement.engagement_rate),
        like_comment_ratio: like_comment_ratio(engagement.avg_likes, engagement.avg_comments),
        engagement_consistency: engagement_consistency(profile),
        posting_frequency: posting_regularity(profile),
    };

    FraudAssessment {
        fraud_score: round_to(unit(indicators.weighted_sum()), 4),
        indicators,
    }
}

#[allow(clippy::cast_precision_loss)]
fn follower_following_ratio(profile: &InfluencerProfile) -> f64 {
    let following = profile.following();
    if following == 0 {
        return NO_FOLLOWING_DATA;
    }
    let ratio = profile.followers() as f64 / following as f64;
    if ratio < 1.0 {
        unit(1.0 - ratio)
    } else if ratio > 100.0 {
        unit((ratio - 100.0) / 500.0)
    } else {
        0.0
    }
}

fn engagement_anomaly(profile: &InfluencerProfile, engagement_rate: f64) -> f64 {
    if profile.followers() == 0 {
        return NO_FOLLOWERS;
    }
    let rate = non_negative(engagement_rate);
    if rate < 0.005 {
        unit((0.005 - rate) / 0.005)
    } else if rate > 0.20 {
        unit((rate - 0.20) / 0.30)
    } else {
        0.0
    }
}

fn like_comment_ratio(avg_likes: f64, avg_comments: f64) -> f64 {
    let likes = non_negative(avg_likes);
    if likes <= 0.0 {
        return NO_LIKES_DATA;
    }
    let ratio = non_negative(avg_comments) / likes;
    if ratio < 0.01 {
        unit((0.01 - ratio) / 0.01)
    } else if ratio > 0.20 {
        unit((ratio - 0.20) / 0.30)
    } else {
        0.0
    }
}

/// Near-identical like counts across posts look automated.
#[allow(clippy::cast_precision_loss)]
fn engagement_consistency(profile: &InfluencerProfile) -> f64 {
    if profile.recent_posts.len() < 3 {
        return TOO_FEW_POSTS;
    }
    let likes: Vec<f64> = profile
        .recent_posts
        .iter()
        .map(|p| p.likes_count as f64)
        .collect();
    match coefficient_of_variation(&likes) {
        Some(cv) if cv < 0.10 => unit((0.10 - cv) / 0.10),
        Some(_) => 0.0,
        None => TOO_FEW_POSTS,
    }
}

/// Clockwork posting and wildly erratic posting are both suspicious.
#[allow(clippy::cast_precision_loss)]
fn posting_regularity(profile: &InfluencerProfile) -> f64 {
    if profile.recent_posts.len() < 3 {
        return TOO_FEW_POSTS;
    }
    let mut timestamps: Vec<_> = profile.post_timestamps().collect();
    if timestamps.len() < 3 {
        return TOO_FEW_POSTS;
    }
    timestamps.sort_unstable();

    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds() as f64 / 1000.0)
        .collect();

    match coefficient_of_variation(&gaps) {
        None => ZERO_MEAN_GAP,
        Some(cv) if cv < 0.05 => TOO_REGULAR,
        Some(cv) if cv > 3.0 => unit((cv - 3.0) / 5.0),
        Some(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::engagement::calculate_engagement_metrics;
    use crate::test_support::{base_time, post, post_at, profile};

    fn assess(p: &InfluencerProfile) -> FraudAssessment {
        calculate_fraud_score(p, &calculate_engagement_metrics(p))
    }

    #[test]
    fn no_following_data_uses_half() {
        let p = profile(10_000, 0, vec![]);
        assert_eq!(assess(&p).indicators.follower_following_ratio, 0.5);
    }

    #[test]
    fn following_more_than_followers_is_suspicious() {
        let p = profile(100, 400, vec![]);
        assert_eq!(assess(&p).indicators.follower_following_ratio, 0.75);
    }

    #[test]
    fn extreme_follower_ratio_scales_up() {
        // ratio 350 -> (350 - 100) / 500
        let p = profile(350_000, 1_000, vec![]);
        assert_eq!(assess(&p).indicators.follower_following_ratio, 0.5);
    }

    #[test]
    fn healthy_follower_ratio_is_clean() {
        let p = profile(50_000, 1_000, vec![]);
        assert_eq!(assess(&p).indicators.follower_following_ratio, 0.0);
    }

    #[test]
    fn no_followers_marks_engagement_anomaly_half() {
        let p = profile(0, 100, vec![post(10, 1)]);
        assert_eq!(assess(&p).indicators.engagement_anomaly, 0.5);
    }

    #[test]
    fn very_low_engagement_is_anomalous() {
        // rate = 0 with followers present
        let p = profile(10_000, 500, vec![post(0, 0)]);
        assert_eq!(assess(&p).indicators.engagement_anomaly, 1.0);
    }

    #[test]
    fn very_high_engagement_is_anomalous() {
        let p = profile(100, 50, vec![post(50, 0)]);
        // rate 0.5 -> (0.5 - 0.2) / 0.3 = 1.0
        assert_eq!(assess(&p).indicators.engagement_anomaly, 1.0);
    }

    #[test]
    fn missing_likes_use_fallback() {
        let p = profile(1_000, 100, vec![post(0, 5)]);
        assert_eq!(assess(&p).indicators.like_comment_ratio, 0.3);
    }

    #[test]
    fn comment_free_posts_are_suspicious() {
        let p = profile(10_000, 500, vec![post(400, 0)]);
        assert_eq!(assess(&p).indicators.like_comment_ratio, 1.0);
    }

    #[test]
    fn comment_heavy_posts_are_suspicious() {
        // ratio 0.5 -> (0.5 - 0.2) / 0.3 = 1.0
        let p = profile(10_000, 500, vec![post(100, 50)]);
        assert_eq!(assess(&p).indicators.like_comment_ratio, 1.0);
    }

    #[test]
    fn identical_likes_look_like_bots() {
        let p = profile(
            10_000,
            500,
            vec![post(300, 10), post(300, 12), post(300, 9)],
        );
        assert_eq!(assess(&p).indicators.engagement_consistency, 1.0);
    }

    #[test]
    fn varied_likes_are_clean() {
        let p = profile(
            10_000,
            500,
            vec![post(100, 5), post(400, 10), post(250, 9)],
        );
        assert_eq!(assess(&p).indicators.engagement_consistency, 0.0);
    }

    #[test]
    fn too_few_posts_fall_back() {
        let p = profile(10_000, 500, vec![post(100, 5), post(200, 5)]);
        let ind = assess(&p).indicators;
        assert_eq!(ind.engagement_consistency, 0.3);
        assert_eq!(ind.posting_frequency, 0.3);
    }

    #[test]
    fn zero_like_mean_uses_fallback() {
        let p = profile(10_000, 500, vec![post(0, 1), post(0, 2), post(0, 3)]);
        assert_eq!(assess(&p).indicators.engagement_consistency, 0.3);
    }

    #[test]
    fn clockwork_posting_is_flagged() {
        let t = base_time();
        let p = profile(
            10_000,
            500,
            vec![
                post_at(100, 5, t),
                post_at(200, 5, t + Duration::days(1)),
                post_at(300, 5, t + Duration::days(2)),
                post_at(150, 5, t + Duration::days(3)),
            ],
        );
        assert_eq!(assess(&p).indicators.posting_frequency, 0.8);
    }

    #[test]
    fn irregular_but_human_posting_is_clean() {
        let t = base_time();
        let p = profile(
            10_000,
            500,
            vec![
                post_at(100, 5, t),
                post_at(200, 5, t + Duration::days(1)),
                post_at(300, 5, t + Duration::days(4)),
            ],
        );
        assert_eq!(assess(&p).indicators.posting_frequency, 0.0);
    }

    #[test]
    fn same_instant_posts_use_zero_gap_fallback() {
        let t = base_time();
        let p = profile(
            10_000,
            500,
            vec![post_at(100, 5, t), post_at(200, 5, t), post_at(300, 5, t)],
        );
        assert_eq!(assess(&p).indicators.posting_frequency, 0.5);
    }

    #[test]
    fn missing_timestamps_are_not_epoch() {
        // Two timestamped posts plus one without: insufficient data, not a huge gap.
        let t = base_time();
        let p = profile(
            10_000,
            500,
            vec![
                post_at(100, 5, t),
                post_at(200, 5, t + Duration::days(2)),
                post(300, 5),
            ],
        );
        assert_eq!(assess(&p).indicators.posting_frequency, 0.3);
    }

    #[test]
    fn composite_is_weighted_and_bounded() {
        let p = profile(0, 0, vec![]);
        let a = assess(&p);
        // 0.5*0.2 + 0.5*0.25 + 0.3*0.2 + 0.3*0.2 + 0.3*0.15
        assert_eq!(a.fraud_score, 0.39);
        assert!((0.0..=1.0).contains(&a.fraud_score));
    }

    #[test]
    fn adversarial_engagement_input_stays_bounded() {
        let p = profile(10_000, 500, vec![post(1, 1)]);
        let bogus = EngagementMetrics {
            engagement_rate: f64::NAN,
            avg_likes: -10.0,
            avg_comments: f64::INFINITY,
        };
        let a = calculate_fraud_score(&p, &bogus);
        assert!((0.0..=1.0).contains(&a.fraud_score));
        for value in a.indicators.to_map().values() {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn indicator_map_names_all_five_signals() {
        let map = FraudIndicators::default().to_map();
        assert_eq!(map.len(), 5);
        assert!(map.contains_key("posting_frequency"));
    }
}
