//! `score` command: run the scoring engine on one saved payload.

use std::path::Path;

use anyhow::Context;
use brandaudit_core::AppConfig;
use brandaudit_pipeline::provider::parse_influencer_profile;
use brandaudit_scoring::{calculate_engagement_metrics, classify_follower_tier, score_influencer};

/// Parse a profile-scraper item from `path` and print its scores as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a usable payload.
pub(crate) async fn run_score_command(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
    let profile = parse_influencer_profile(&payload, config.recent_posts_limit)?;

    let engagement = calculate_engagement_metrics(&profile);
    let scores = score_influencer(&profile, engagement);
    tracing::info!(
        handle = %profile.username,
        posts = profile.recent_posts.len(),
        "scored payload"
    );

    let output = serde_json::json!({
        "handle": &profile.username,
        "followers_count": profile.followers_count,
        "follower_tier": classify_follower_tier(profile.followers()),
        "posts_analyzed": profile.recent_posts.len(),
        "scores": scores,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
