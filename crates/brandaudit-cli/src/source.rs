//! Profile source selection.

use brandaudit_core::AppConfig;
use brandaudit_pipeline::{FixtureProfileSource, MockProfileSource, ProfileSource};

/// Fixture payloads when a fixture directory is configured, otherwise the
/// deterministic mock source.
pub(crate) fn build_profile_source(config: &AppConfig) -> Box<dyn ProfileSource> {
    if let Some(dir) = &config.fixtures_dir {
        tracing::info!(dir = %dir.display(), "reading profiles from fixtures");
        return Box::new(FixtureProfileSource::new(
            dir.clone(),
            config.recent_posts_limit,
        ));
    }

    if config.apify_api_key.is_some() {
        tracing::warn!("APIFY_API_KEY is set but no live provider is built in; using mock data");
    } else {
        tracing::info!("no provider configured; using deterministic mock data");
    }
    Box::new(MockProfileSource::new())
}
