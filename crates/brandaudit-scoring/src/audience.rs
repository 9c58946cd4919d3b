//! Audience quality estimate, penalized by fraud risk.

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

use crate::math::{non_negative, round_to, unit};
use crate::tier::{classify_follower_tier, FollowerTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementQuality {
    High,
    Medium,
    Low,
}

/// Heuristic audience summary; no audience API data backs these figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudienceDemographics {
    pub estimated_real_followers_pct: f64,
    pub engagement_quality: EngagementQuality,
    pub follower_tier: FollowerTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudienceQuality {
    /// In `[0, 1]`, 4 decimal places.
    pub audience_quality_score: f64,
    pub demographics: AudienceDemographics,
}

/// Estimate audience quality from engagement, discounted by `fraud_score`.
#[must_use]
pub fn calculate_audience_quality(
    profile: &InfluencerProfile,
    engagement_rate: f64,
    fraud_score: f64,
) -> AudienceQuality {
    let rate = non_negative(engagement_rate);
    let fraud = unit(fraud_score);

    let base_quality = if rate >= 0.05 {
        0.9
    } else if rate >= 0.03 {
        0.7
    } else if rate >= 0.01 {
        0.5
    } else {
        0.2
    };
    let quality = base_quality * (1.0 - fraud * 0.8);

    let engagement_quality = if rate >= 0.05 {
        EngagementQuality::High
    } else if rate >= 0.02 {
        EngagementQuality::Medium
    } else {
        EngagementQuality::Low
    };

    AudienceQuality {
        audience_quality_score: round_to(unit(quality), 4),
        demographics: AudienceDemographics {
            estimated_real_followers_pct: round_to((1.0 - fraud) * 100.0, 1),
            engagement_quality,
            follower_tier: classify_follower_tier(profile.followers()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile;

    #[test]
    fn engagement_buckets_without_fraud() {
        let p = profile(20_000, 100, vec![]);
        assert_eq!(calculate_audience_quality(&p, 0.06, 0.0).audience_quality_score, 0.9);
        assert_eq!(calculate_audience_quality(&p, 0.04, 0.0).audience_quality_score, 0.7);
        assert_eq!(calculate_audience_quality(&p, 0.015, 0.0).audience_quality_score, 0.5);
        assert_eq!(calculate_audience_quality(&p, 0.001, 0.0).audience_quality_score, 0.2);
    }

    #[test]
    fn fraud_penalizes_multiplicatively() {
        let p = profile(20_000, 100, vec![]);
        let q = calculate_audience_quality(&p, 0.06, 0.5);
        // 0.9 * (1 - 0.4)
        assert_eq!(q.audience_quality_score, 0.54);
        assert_eq!(q.demographics.estimated_real_followers_pct, 50.0);
    }

    #[test]
    fn demographics_labels() {
        let p = profile(20_000, 100, vec![]);
        let q = calculate_audience_quality(&p, 0.025, 0.1);
        assert_eq!(q.demographics.engagement_quality, EngagementQuality::Medium);
        assert_eq!(q.demographics.follower_tier, FollowerTier::Micro);
        assert_eq!(q.demographics.estimated_real_followers_pct, 90.0);

        let q = calculate_audience_quality(&p, 0.01, 0.1);
        assert_eq!(q.demographics.engagement_quality, EngagementQuality::Low);
    }

    #[test]
    fn out_of_range_fraud_is_clamped() {
        let p = profile(20_000, 100, vec![]);
        let q = calculate_audience_quality(&p, 0.06, 7.0);
        assert!((0.0..=1.0).contains(&q.audience_quality_score));
        assert_eq!(q.demographics.estimated_real_followers_pct, 0.0);

        let q = calculate_audience_quality(&p, f64::NAN, -2.0);
        assert_eq!(q.audience_quality_score, 0.2);
        assert_eq!(q.demographics.estimated_real_followers_pct, 100.0);
    }
}
