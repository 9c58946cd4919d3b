//! Discovery aggregator.
//!
//! Runs every discovery method concurrently, each under its own timeout,
//! and merges whatever succeeded. One method failing never fails the run.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use brandaudit_core::{DiscoveredCandidate, DiscoveryRunResult, DiscoverySource};
use futures::future::join_all;
use regex::Regex;

use crate::error::SourceError;
use crate::source::{DiscoveryQuery, ProfileSource};

pub const DEFAULT_MAX_HASHTAGS: usize = 5;
const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 180;

static BIO_HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySettings {
    /// Applied independently to each method.
    pub timeout: Duration,
    pub max_hashtags: usize,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_DISCOVERY_TIMEOUT_SECS),
            max_hashtags: DEFAULT_MAX_HASHTAGS,
        }
    }
}

/// Derive search hashtags for a brand.
///
/// Handle segments split on `.` and `_` that are longer than two characters
/// come first, then `#word` tokens from the bio. Everything is lowercased,
/// deduplicated in first-seen order and capped at `max`.
#[must_use]
pub fn extract_hashtags(handle: &str, bio: Option<&str>, max: usize) -> Vec<String> {
    let from_handle = handle
        .split(['.', '_'])
        .filter(|part| part.chars().count() > 2)
        .map(str::to_lowercase);
    let from_bio = bio
        .into_iter()
        .flat_map(|text| BIO_HASHTAG_RE.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase());

    let mut seen = HashSet::new();
    from_handle
        .chain(from_bio)
        .filter(|tag| seen.insert(tag.clone()))
        .take(max)
        .collect()
}

/// Run every discovery method for `brand_handle` and merge the results.
///
/// The hashtag method is skipped, counted as succeeded with no candidates,
/// when no hashtags can be extracted.
pub async fn discover_influencers(
    source: &dyn ProfileSource,
    brand_handle: &str,
    brand_bio: Option<&str>,
    settings: &DiscoverySettings,
) -> DiscoveryRunResult {
    let query = DiscoveryQuery {
        brand_handle: brand_handle.to_string(),
        brand_bio: brand_bio.map(str::to_string),
        hashtags: extract_hashtags(brand_handle, brand_bio, settings.max_hashtags),
    };

    let attempts = DiscoverySource::ALL.map(|method| run_method(source, method, &query, settings));
    let outcomes = join_all(attempts).await;

    let result = merge_outcomes(brand_handle, outcomes);
    tracing::info!(
        brand = brand_handle,
        source_name = source.name(),
        count = result.influencers.len(),
        succeeded = ?result.sources_succeeded,
        failed = ?result.sources_failed,
        "discovery finished"
    );
    result
}

type MethodOutcome = (DiscoverySource, Result<Vec<DiscoveredCandidate>, SourceError>);

async fn run_method(
    source: &dyn ProfileSource,
    method: DiscoverySource,
    query: &DiscoveryQuery,
    settings: &DiscoverySettings,
) -> MethodOutcome {
    if method == DiscoverySource::HashtagSearch && query.hashtags.is_empty() {
        tracing::debug!(
            brand = query.brand_handle.as_str(),
            "no hashtags extracted; skipping hashtag search"
        );
        return (method, Ok(Vec::new()));
    }

    let outcome =
        match tokio::time::timeout(settings.timeout, source.discover_candidates(method, query))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                operation: format!("discovery via {method}"),
                limit: settings.timeout,
            }),
        };

    if let Err(e) = &outcome {
        tracing::warn!(
            brand = query.brand_handle.as_str(),
            source = method.as_str(),
            error = %e,
            "discovery method failed"
        );
    }
    (method, outcome)
}

/// Fold per-method outcomes, in order, into one run result.
///
/// Candidates are re-tagged with the method that produced them; the first
/// method to surface a username keeps it, and the brand's own handle is
/// never a candidate.
fn merge_outcomes(
    brand_handle: &str,
    outcomes: impl IntoIterator<Item = MethodOutcome>,
) -> DiscoveryRunResult {
    let mut result = DiscoveryRunResult::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (method, outcome) in outcomes {
        result.sources_attempted.push(method);
        match outcome {
            Ok(candidates) => {
                result.sources_succeeded.push(method);
                for mut candidate in candidates {
                    if candidate.username == brand_handle
                        || !seen.insert(candidate.username.clone())
                    {
                        continue;
                    }
                    candidate.discovery_source = method;
                    result.influencers.push(candidate);
                }
            }
            Err(e) => {
                result.sources_failed.push(method);
                result.errors.push(format!("{method}: {e}"));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brandaudit_core::{BrandProfile, InfluencerProfile};
    use std::collections::HashMap;

    fn candidate(username: &str, source: DiscoverySource) -> DiscoveredCandidate {
        DiscoveredCandidate {
            username: username.to_string(),
            followers_count: Some(5_000),
            discovery_source: source,
            discovery_context: format!("found via {source}"),
        }
    }

    enum Scripted {
        Returns(Vec<&'static str>),
        Fails(&'static str),
        Hangs,
    }

    struct ScriptedSource {
        script: HashMap<DiscoverySource, Scripted>,
    }

    #[async_trait]
    impl ProfileSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_brand_profile(&self, handle: &str) -> Result<BrandProfile, SourceError> {
            Err(SourceError::NoData {
                handle: handle.to_string(),
            })
        }

        async fn fetch_influencer_profile(
            &self,
            handle: &str,
        ) -> Result<InfluencerProfile, SourceError> {
            Err(SourceError::NoData {
                handle: handle.to_string(),
            })
        }

        async fn discover_candidates(
            &self,
            method: DiscoverySource,
            _query: &DiscoveryQuery,
        ) -> Result<Vec<DiscoveredCandidate>, SourceError> {
            match self.script.get(&method) {
                Some(Scripted::Returns(names)) => {
                    Ok(names.iter().map(|n| candidate(n, method)).collect())
                }
                Some(Scripted::Fails(msg)) => Err(SourceError::Provider((*msg).to_string())),
                Some(Scripted::Hangs) => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Ok(Vec::new())
                }
                None => Ok(Vec::new()),
            }
        }
    }

    fn settings() -> DiscoverySettings {
        DiscoverySettings {
            timeout: Duration::from_millis(50),
            max_hashtags: DEFAULT_MAX_HASHTAGS,
        }
    }

    fn assert_status_partition(result: &DiscoveryRunResult) {
        let attempted: HashSet<_> = result.sources_attempted.iter().collect();
        let succeeded: HashSet<_> = result.sources_succeeded.iter().collect();
        let failed: HashSet<_> = result.sources_failed.iter().collect();
        assert!(succeeded.is_disjoint(&failed));
        assert_eq!(&succeeded | &failed, attempted);
        assert_eq!(result.errors.len(), result.sources_failed.len());
    }

    #[test]
    fn extract_splits_handle_segments() {
        assert_eq!(extract_hashtags("nike.poland", None, 5), ["nike", "poland"]);
        assert_eq!(extract_hashtags("ab", None, 5), Vec::<String>::new());
        assert_eq!(extract_hashtags("Zara_Home.pl", None, 5), ["zara", "home"]);
    }

    #[test]
    fn extract_appends_bio_tags_deduplicated() {
        let tags = extract_hashtags(
            "nike.poland",
            Some("Just do it #Nike #running #RUNNING #ad"),
            5,
        );
        assert_eq!(tags, ["nike", "poland", "running", "ad"]);
    }

    #[test]
    fn extract_caps_output_length() {
        let bio = "#one #two #three #four #five #six #seven";
        let tags = extract_hashtags("brand.name", Some(bio), DEFAULT_MAX_HASHTAGS);
        assert_eq!(tags.len(), 5);
        assert_eq!(tags, ["brand", "name", "one", "two", "three"]);
    }

    #[test]
    fn merge_keeps_first_source_and_drops_brand() {
        let outcomes = vec![
            (
                DiscoverySource::TaggedPosts,
                Ok(vec![
                    candidate("anna", DiscoverySource::TaggedPosts),
                    candidate("acme", DiscoverySource::TaggedPosts),
                ]),
            ),
            (
                DiscoverySource::RelatedProfiles,
                Ok(vec![
                    candidate("anna", DiscoverySource::RelatedProfiles),
                    candidate("ben", DiscoverySource::RelatedProfiles),
                ]),
            ),
            (
                DiscoverySource::HashtagSearch,
                Err(SourceError::Provider("quota exceeded".to_string())),
            ),
        ];

        let result = merge_outcomes("acme", outcomes);
        assert_eq!(result.usernames(), ["anna", "ben"]);
        assert_eq!(
            result.influencers[0].discovery_source,
            DiscoverySource::TaggedPosts
        );
        assert_eq!(result.sources_failed, [DiscoverySource::HashtagSearch]);
        assert_eq!(
            result.errors,
            ["hashtag_search: provider error: quota exceeded"]
        );
        assert_status_partition(&result);
    }

    #[test]
    fn merge_retags_candidates_with_their_method() {
        let outcomes = vec![(
            DiscoverySource::RelatedProfiles,
            Ok(vec![candidate("anna", DiscoverySource::HashtagSearch)]),
        )];
        let result = merge_outcomes("acme", outcomes);
        assert_eq!(
            result.influencers[0].discovery_source,
            DiscoverySource::RelatedProfiles
        );
    }

    #[tokio::test]
    async fn one_failing_method_does_not_abort_discovery() {
        let source = ScriptedSource {
            script: HashMap::from([
                (DiscoverySource::TaggedPosts, Scripted::Fails("actor crashed")),
                (
                    DiscoverySource::RelatedProfiles,
                    Scripted::Returns(vec!["anna", "ben"]),
                ),
                (
                    DiscoverySource::HashtagSearch,
                    Scripted::Returns(vec!["ben", "cleo", "nike.poland"]),
                ),
            ]),
        };

        let result = discover_influencers(&source, "nike.poland", None, &settings()).await;
        assert_eq!(result.usernames(), ["anna", "ben", "cleo"]);
        assert_eq!(result.sources_attempted, DiscoverySource::ALL);
        assert_eq!(result.sources_failed, [DiscoverySource::TaggedPosts]);
        assert!(result.errors[0].starts_with("tagged_posts: "));
        assert_status_partition(&result);
    }

    #[tokio::test]
    async fn hung_method_times_out_independently() {
        let source = ScriptedSource {
            script: HashMap::from([
                (DiscoverySource::TaggedPosts, Scripted::Returns(vec!["anna"])),
                (DiscoverySource::RelatedProfiles, Scripted::Hangs),
            ]),
        };

        let result = discover_influencers(&source, "acme.shop", None, &settings()).await;
        assert_eq!(result.usernames(), ["anna"]);
        assert_eq!(result.sources_failed, [DiscoverySource::RelatedProfiles]);
        assert!(result.errors[0].contains("timed out"));
        assert_status_partition(&result);
    }

    #[tokio::test]
    async fn all_methods_failing_still_returns_a_result() {
        let source = ScriptedSource {
            script: DiscoverySource::ALL
                .into_iter()
                .map(|m| (m, Scripted::Fails("down")))
                .collect(),
        };

        let result = discover_influencers(&source, "acme.shop", None, &settings()).await;
        assert!(result.influencers.is_empty());
        assert_eq!(result.sources_failed, DiscoverySource::ALL);
        assert!(result.sources_succeeded.is_empty());
        assert_status_partition(&result);
    }

    #[tokio::test]
    async fn hashtag_search_skipped_without_hashtags() {
        let source = ScriptedSource {
            script: HashMap::from([(DiscoverySource::HashtagSearch, Scripted::Fails("called"))]),
        };

        // "ab" yields no hashtags, so the failing method is never invoked.
        let result = discover_influencers(&source, "ab", None, &settings()).await;
        assert!(result.sources_failed.is_empty());
        assert!(result
            .sources_succeeded
            .contains(&DiscoverySource::HashtagSearch));
        assert_status_partition(&result);
    }
}
