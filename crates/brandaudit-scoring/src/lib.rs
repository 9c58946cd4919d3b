//! Pure scoring engine for influencer audits.
//!
//! Every function here is deterministic and free of I/O: it takes profile
//! snapshots and returns bounded metrics. Out-of-range or non-finite inputs
//! are clamped to the documented ranges instead of propagating NaN.

pub mod audience;
pub mod content;
pub mod engagement;
pub mod fraud;
pub mod health;
pub mod overlap;
pub mod reach;
pub mod tier;

mod math;

#[cfg(test)]
mod test_support;

use brandaudit_core::InfluencerProfile;
use serde::{Deserialize, Serialize};

pub use audience::{
    calculate_audience_quality, AudienceDemographics, AudienceQuality, EngagementQuality,
};
pub use content::{calculate_content_quality, ContentAnalysis, ContentQuality};
pub use engagement::{calculate_engagement_metrics, EngagementMetrics};
pub use fraud::{calculate_fraud_score, FraudAssessment, FraudIndicators};
pub use health::{calculate_health_score, HealthInput};
pub use overlap::{estimate_audience_overlap, OverlapEstimate};
pub use reach::{estimate_reach_and_cpm, ReachEstimate};
pub use tier::{classify_follower_tier, FollowerTier};

/// Everything computed for one influencer once engagement is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditScores {
    pub engagement: EngagementMetrics,
    pub fraud: FraudAssessment,
    pub content: ContentQuality,
    pub audience: AudienceQuality,
    pub reach: ReachEstimate,
}

impl AuditScores {
    /// The slice of these scores the health score consumes.
    #[must_use]
    pub fn health_input(&self) -> HealthInput {
        HealthInput {
            fraud_score: Some(self.fraud.fraud_score),
            content_quality_score: Some(self.content.content_quality_score),
            audience_quality_score: Some(self.audience.audience_quality_score),
            engagement_rate: Some(self.engagement.engagement_rate),
        }
    }
}

/// Run fraud, content, audience, and reach scoring for one profile.
///
/// Audience quality is discounted by the fraud score, and reach/CPM uses the
/// content score, so the order here matters.
#[must_use]
pub fn score_influencer(
    profile: &InfluencerProfile,
    engagement: EngagementMetrics,
) -> AuditScores {
    let fraud = calculate_fraud_score(profile, &engagement);
    let content = calculate_content_quality(profile);
    let audience =
        calculate_audience_quality(profile, engagement.engagement_rate, fraud.fraud_score);
    let reach = estimate_reach_and_cpm(
        profile.followers(),
        engagement.engagement_rate,
        content.content_quality_score,
    );

    AuditScores {
        engagement,
        fraud,
        content,
        audience,
        reach,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, profile};

    #[test]
    fn score_influencer_is_deterministic_and_bounded() {
        let p = profile(
            25_000,
            800,
            vec![post(900, 40), post(1_100, 35), post(700, 60), post(1_500, 20)],
        );
        let engagement = calculate_engagement_metrics(&p);
        let first = score_influencer(&p, engagement);
        let second = score_influencer(&p, engagement);
        assert_eq!(first, second);

        assert!((0.0..=1.0).contains(&first.fraud.fraud_score));
        assert!((0.0..=1.0).contains(&first.content.content_quality_score));
        assert!((0.0..=1.0).contains(&first.audience.audience_quality_score));
        assert!(first.reach.estimated_cpm >= 0.0);
        assert!(first.reach.estimated_reach > 0);
    }

    #[test]
    fn health_input_mirrors_scores() {
        let p = profile(25_000, 800, vec![post(900, 40)]);
        let engagement = calculate_engagement_metrics(&p);
        let scores = score_influencer(&p, engagement);
        let input = scores.health_input();
        assert_eq!(input.fraud_score, Some(scores.fraud.fraud_score));
        assert_eq!(input.engagement_rate, Some(engagement.engagement_rate));
    }
}
