//! Reach and CPM estimates by follower tier.

use serde::{Deserialize, Serialize};

use crate::math::{non_negative, round_to, unit};
use crate::tier::classify_follower_tier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachEstimate {
    pub estimated_reach: u64,
    /// EUR per thousand impressions, 2 decimal places.
    pub estimated_cpm: f64,
}

/// Estimate per-post reach and CPM.
///
/// Reach is the tier's base fraction of followers boosted by up to 2x for
/// engagement. CPM is the tier's base rate scaled by content quality
/// (0.7x to 1.3x) and engagement (0.8x to 1.6x).
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn estimate_reach_and_cpm(
    followers: u64,
    engagement_rate: f64,
    content_quality: f64,
) -> ReachEstimate {
    if followers == 0 {
        return ReachEstimate::default();
    }

    let rate = non_negative(engagement_rate);
    let quality = unit(content_quality);
    let tier = classify_follower_tier(followers);

    let engagement_boost = 1.0 + (rate * 10.0).min(1.0);
    let estimated_reach =
        (followers as f64 * tier.base_reach_fraction() * engagement_boost) as u64;

    let quality_mult = 0.7 + quality * 0.6;
    let engagement_mult = 0.8 + (rate * 8.0).min(0.8);
    let estimated_cpm = round_to(tier.base_cpm() * quality_mult * engagement_mult, 2);

    ReachEstimate {
        estimated_reach,
        estimated_cpm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_followers_zero_estimate() {
        assert_eq!(estimate_reach_and_cpm(0, 0.5, 1.0), ReachEstimate::default());
    }

    #[test]
    fn nano_tier_without_engagement() {
        let r = estimate_reach_and_cpm(8_000, 0.0, 0.5);
        assert_eq!(r.estimated_reach, 2_000);
        // 5.0 * 1.0 * 0.8
        assert_eq!(r.estimated_cpm, 4.0);
    }

    #[test]
    fn engagement_boost_caps_at_double() {
        let r = estimate_reach_and_cpm(100_000, 0.5, 1.0);
        // 100k * 0.08 * 2
        assert_eq!(r.estimated_reach, 16_000);
        // 12 * 1.3 * 1.6
        assert_eq!(r.estimated_cpm, 24.96);
    }

    #[test]
    fn macro_tier_rates() {
        let r = estimate_reach_and_cpm(1_000_000, 0.05, 0.0);
        // boost 1.5 -> 1M * 0.04 * 1.5
        assert_eq!(r.estimated_reach, 60_000);
        // 18 * 0.7 * 1.2
        assert_eq!(r.estimated_cpm, 15.12);
    }

    #[test]
    fn reach_truncates_to_integer() {
        let r = estimate_reach_and_cpm(9_999, 0.0, 0.0);
        // 9999 * 0.25 = 2499.75
        assert_eq!(r.estimated_reach, 2_499);
    }

    #[test]
    fn garbage_inputs_stay_non_negative() {
        let r = estimate_reach_and_cpm(20_000, f64::NAN, -4.0);
        assert_eq!(r.estimated_reach, 3_000);
        // 8 * 0.7 * 0.8
        assert_eq!(r.estimated_cpm, 4.48);
    }
}
