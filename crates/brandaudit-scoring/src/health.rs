//! Brand health score aggregated over all scored influencers.

use serde::{Deserialize, Serialize};

use crate::math::{non_negative, round_to, unit};

const ENGAGEMENT_CAP: f64 = 0.10;

/// Per-influencer inputs to the health score. Missing values fall back to
/// fraud 0.5 and zero for everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInput {
    pub fraud_score: Option<f64>,
    pub content_quality_score: Option<f64>,
    pub audience_quality_score: Option<f64>,
    pub engagement_rate: Option<f64>,
}

impl HealthInput {
    fn composite(&self) -> f64 {
        let fraud = unit(self.fraud_score.unwrap_or(0.5));
        let content = unit(self.content_quality_score.unwrap_or(0.0));
        let audience = unit(self.audience_quality_score.unwrap_or(0.0));
        let engagement = non_negative(self.engagement_rate.unwrap_or(0.0));
        let normalized_engagement = engagement.min(ENGAGEMENT_CAP) / ENGAGEMENT_CAP;

        (1.0 - fraud) * 0.30 + content * 0.25 + audience * 0.25 + normalized_engagement * 0.20
    }
}

/// Mean per-influencer composite scaled to `[0, 100]`, 1 decimal place.
///
/// Returns `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_health_score(inputs: &[HealthInput]) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }
    let total: f64 = inputs.iter().map(HealthInput::composite).sum();
    let avg = total / inputs.len() as f64;
    round_to(avg * 100.0, 1).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(fraud: f64, content: f64, audience: f64, engagement: f64) -> HealthInput {
        HealthInput {
            fraud_score: Some(fraud),
            content_quality_score: Some(content),
            audience_quality_score: Some(audience),
            engagement_rate: Some(engagement),
        }
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(calculate_health_score(&[]), 0.0);
    }

    #[test]
    fn perfect_influencer_scores_one_hundred() {
        assert_eq!(calculate_health_score(&[input(0.0, 1.0, 1.0, 0.10)]), 100.0);
        assert_eq!(calculate_health_score(&[input(0.0, 1.0, 1.0, 0.35)]), 100.0);
    }

    #[test]
    fn worst_influencer_scores_zero() {
        assert_eq!(calculate_health_score(&[input(1.0, 0.0, 0.0, 0.0)]), 0.0);
    }

    #[test]
    fn missing_values_use_fallbacks() {
        // only (1 - 0.5) * 0.30 contributes
        assert_eq!(calculate_health_score(&[HealthInput::default()]), 15.0);
    }

    #[test]
    fn averages_across_influencers() {
        let scores = [input(0.0, 1.0, 1.0, 0.10), input(1.0, 0.0, 0.0, 0.0)];
        assert_eq!(calculate_health_score(&scores), 50.0);
    }

    #[test]
    fn engagement_is_normalized_against_ten_percent() {
        // (1 - 0.2)*0.3 + 0.5*0.25 + 0.5*0.25 + 0.5*0.2 = 0.59
        assert_eq!(calculate_health_score(&[input(0.2, 0.5, 0.5, 0.05)]), 59.0);
    }

    #[test]
    fn adversarial_inputs_stay_in_range() {
        let score = calculate_health_score(&[input(-3.0, 9.0, 9.0, 50.0)]);
        assert_eq!(score, 100.0);
        let score = calculate_health_score(&[input(f64::NAN, -1.0, -1.0, -1.0)]);
        assert!((0.0..=100.0).contains(&score));
    }
}
