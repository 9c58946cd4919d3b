//! `discover` command: run the discovery aggregator on its own.

use brandaudit_core::AppConfig;
use brandaudit_pipeline::{discover_influencers, normalize_handle, PipelineSettings};

use crate::source::build_profile_source;

/// Print discovered candidates and per-source status for `handle`.
///
/// # Errors
///
/// Returns an error only for an invalid handle; source failures are part of
/// the printed result.
pub(crate) async fn run_discover_command(
    config: &AppConfig,
    handle: &str,
    bio: Option<&str>,
) -> anyhow::Result<()> {
    let handle = normalize_handle(handle)?;
    let source = build_profile_source(config);
    let settings = PipelineSettings::from_app_config(config);

    let bio = match bio {
        Some(bio) => Some(bio.to_string()),
        None => match source.fetch_brand_profile(&handle).await {
            Ok(profile) => profile.biography,
            Err(e) => {
                tracing::warn!(brand = %handle, error = %e, "brand profile unavailable; no bio");
                None
            }
        },
    };

    let result =
        discover_influencers(source.as_ref(), &handle, bio.as_deref(), &settings.discovery).await;

    println!(
        "{} candidates for @{handle} (succeeded: {}, failed: {})",
        result.influencers.len(),
        join(&result.sources_succeeded),
        join(&result.sources_failed),
    );
    for error in &result.errors {
        eprintln!("warning: {error}");
    }
    if result.influencers.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:<28}{:<18}{:>10}", "USERNAME", "SOURCE", "FOLLOWERS");
    for c in &result.influencers {
        let followers = c
            .followers_count
            .map_or_else(|| "-".to_string(), |f| f.to_string());
        println!(
            "{:<28}{:<18}{:>10}",
            c.username,
            c.discovery_source.as_str(),
            followers
        );
    }
    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
