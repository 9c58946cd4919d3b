//! Audit pipeline orchestrator.
//!
//! Drives one [`AuditRun`] through [`PIPELINE_STEPS`]. Entering a step is
//! committed before its work starts, and each step's writes land in a single
//! [`StepCommit`], so the stored run is never further along than the data
//! behind it. Any step error moves the run to `failed`; nothing is retried.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use brandaudit_core::{
    is_valid_handle, AppConfig, AuditRun, AuditStatus, CoreError, DiscoveredCandidate,
    InfluencerProfile,
};
use brandaudit_scoring::{
    calculate_engagement_metrics, calculate_health_score, estimate_audience_overlap,
    score_influencer,
};
use chrono::Utc;
use uuid::Uuid;

use crate::discovery::{discover_influencers, DiscoverySettings};
use crate::error::{PipelineError, SourceError, StoreError};
use crate::narrative::NarrativeGenerator;
use crate::source::ProfileSource;
use crate::steps::{PipelineStep, PIPELINE_STEPS};
use crate::store::{
    AuditInfluencerRecord, AuditStore, BrandRecord, InfluencerRecord, LinkedInfluencer,
    OverlapRecord, StepCommit,
};

const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 180;
const DEFAULT_RECENT_POSTS_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub discovery: DiscoverySettings,
    /// Limit for a single brand or influencer profile fetch.
    pub profile_timeout: Duration,
    /// Posts beyond this many are dropped before analysis.
    pub recent_posts_limit: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            discovery: DiscoverySettings {
                timeout: Duration::from_secs(config.discovery_timeout_secs),
                max_hashtags: config.max_hashtags,
            },
            profile_timeout: Duration::from_secs(config.profile_timeout_secs),
            recent_posts_limit: config.recent_posts_limit,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            discovery: DiscoverySettings::default(),
            profile_timeout: Duration::from_secs(DEFAULT_PROFILE_TIMEOUT_SECS),
            recent_posts_limit: DEFAULT_RECENT_POSTS_LIMIT,
        }
    }
}

/// Normalize user input into a stored handle: trimmed, lowercased, and
/// without a leading `@`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidHandle`] if the result is empty or holds
/// anything besides ASCII letters, digits, `.` and `_`.
pub fn normalize_handle(raw: &str) -> Result<String, PipelineError> {
    let handle = raw.trim().trim_start_matches('@').to_lowercase();
    if !is_valid_handle(&handle) {
        return Err(PipelineError::InvalidHandle(raw.to_string()));
    }
    Ok(handle)
}

/// Create a `pending` audit run for `handle`, creating the brand record on
/// first sight.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidHandle`] for an empty handle, or a store
/// error if either write fails.
pub async fn submit_audit(
    store: &dyn AuditStore,
    handle: &str,
    language: &str,
) -> Result<AuditRun, PipelineError> {
    let handle = normalize_handle(handle)?;

    match store.load_brand(&handle).await {
        Ok(_) => {}
        Err(StoreError::NotFound { .. }) => {
            store
                .commit(StepCommit {
                    brands: vec![BrandRecord::new(&handle)],
                    ..StepCommit::default()
                })
                .await?;
        }
        Err(e) => return Err(e.into()),
    }

    let audit = AuditRun::new(&handle, language);
    store.create_audit(&audit).await?;
    tracing::info!(audit_id = %audit.id, brand = %handle, "audit submitted");
    Ok(audit)
}

pub struct AuditOrchestrator<'a> {
    source: &'a dyn ProfileSource,
    store: &'a dyn AuditStore,
    narrative: Option<&'a dyn NarrativeGenerator>,
    settings: PipelineSettings,
}

impl<'a> AuditOrchestrator<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn ProfileSource,
        store: &'a dyn AuditStore,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            store,
            narrative: None,
            settings,
        }
    }

    #[must_use]
    pub fn with_narrative(mut self, generator: &'a dyn NarrativeGenerator) -> Self {
        self.narrative = Some(generator);
        self
    }

    /// Execute every pipeline step for a pending run.
    ///
    /// Returns the final run, `completed` or `failed`. A failed step is
    /// recorded on the run rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] with `NotFound` for an unknown id,
    /// [`PipelineError::Core`] if the run is not `pending`, and any store
    /// error raised while recording a failure.
    pub async fn run_audit(&self, audit_id: Uuid) -> Result<AuditRun, PipelineError> {
        let mut audit = self.store.load_audit(audit_id).await?;
        if audit.status != AuditStatus::Pending {
            return Err(CoreError::InvalidTransition {
                from: audit.status,
                to: AuditStatus::ScrapingBrand,
            }
            .into());
        }

        // Profiles fetched while analyzing, consumed by scoring. Dropped with
        // this frame on every exit path.
        let mut profile_cache: HashMap<String, InfluencerProfile> = HashMap::new();

        for step in PIPELINE_STEPS {
            if let Err(e) = self.execute_step(&mut audit, step, &mut profile_cache).await {
                return self.fail_run(audit, step, &e).await;
            }
        }

        tracing::info!(
            audit_id = %audit.id,
            brand = %audit.brand_handle,
            health_score = ?audit.health_score,
            "audit completed"
        );
        Ok(audit)
    }

    async fn execute_step(
        &self,
        audit: &mut AuditRun,
        step: PipelineStep,
        profile_cache: &mut HashMap<String, InfluencerProfile>,
    ) -> Result<(), PipelineError> {
        let mut entered = audit.clone();
        entered.advance(step.status, step.progress, step.label)?;
        self.store.commit(StepCommit::audit(entered.clone())).await?;
        *audit = entered;
        tracing::info!(
            audit_id = %audit.id,
            status = %step.status,
            progress = step.progress,
            "{}",
            step.label
        );

        match step.status {
            AuditStatus::ScrapingBrand => self.scrape_brand(audit).await,
            AuditStatus::DiscoveringInfluencers => self.discover(audit).await,
            AuditStatus::AnalyzingInfluencers => self.analyze(audit, profile_cache).await,
            AuditStatus::Scoring => self.score(audit, profile_cache).await,
            AuditStatus::GeneratingNarrative => self.narrate(audit).await,
            AuditStatus::Pending | AuditStatus::Completed | AuditStatus::Failed => Ok(()),
        }
    }

    /// Record the failure on the last committed state of the run.
    async fn fail_run(
        &self,
        mut audit: AuditRun,
        step: PipelineStep,
        error: &PipelineError,
    ) -> Result<AuditRun, PipelineError> {
        tracing::error!(
            audit_id = %audit.id,
            brand = %audit.brand_handle,
            step = %step.status,
            error = %error,
            "audit failed"
        );
        audit.fail(&error.to_string())?;
        self.store.commit(StepCommit::audit(audit.clone())).await?;
        Ok(audit)
    }

    async fn scrape_brand(&self, audit: &AuditRun) -> Result<(), PipelineError> {
        let handle = audit.brand_handle.as_str();
        let profile = with_timeout(
            self.settings.profile_timeout,
            || format!("brand profile fetch for @{handle}"),
            self.source.fetch_brand_profile(handle),
        )
        .await?;

        let mut brand = self.store.load_brand(handle).await?;
        brand.apply_profile(&profile, Utc::now());
        self.store
            .commit(StepCommit {
                brands: vec![brand],
                ..StepCommit::default()
            })
            .await?;
        Ok(())
    }

    async fn discover(&self, audit: &AuditRun) -> Result<(), PipelineError> {
        let brand = self.store.load_brand(&audit.brand_handle).await?;
        let result = discover_influencers(
            self.source,
            &audit.brand_handle,
            brand.bio.as_deref(),
            &self.settings.discovery,
        )
        .await;
        if result.sources_succeeded.is_empty() {
            tracing::warn!(
                audit_id = %audit.id,
                errors = ?result.errors,
                "every discovery method failed; continuing with no influencers"
            );
        }

        let commit = self.link_commit(audit.id, &result.influencers).await?;
        let linked = commit.audit_influencers.len();
        let created = commit.influencers.len();
        match self.store.commit(commit).await {
            Ok(()) => {}
            // Another run created one of these handles between lookup and
            // commit. Its records now exist, so one rebuild links to them.
            Err(StoreError::Conflict {
                entity: "influencer",
                key,
            }) => {
                tracing::debug!(
                    audit_id = %audit.id,
                    influencer = %key,
                    "influencer created concurrently; relinking"
                );
                let commit = self.link_commit(audit.id, &result.influencers).await?;
                self.store.commit(commit).await?;
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(audit_id = %audit.id, linked, created, "influencers linked");
        Ok(())
    }

    /// Link every candidate to the run, reusing stored influencers by exact
    /// handle and creating the rest.
    async fn link_commit(
        &self,
        audit_id: Uuid,
        candidates: &[DiscoveredCandidate],
    ) -> Result<StepCommit, PipelineError> {
        let handles: Vec<String> = candidates.iter().map(|c| c.username.clone()).collect();
        let existing: HashMap<String, InfluencerRecord> = self
            .store
            .find_influencers_by_handles(&handles)
            .await?
            .into_iter()
            .map(|record| (record.handle.clone(), record))
            .collect();

        let mut commit = StepCommit::default();
        for candidate in candidates {
            let influencer_id = if let Some(record) = existing.get(&candidate.username) {
                record.id
            } else {
                let record = InfluencerRecord::from_candidate(candidate);
                let id = record.id;
                commit.influencers.push(record);
                id
            };
            commit.audit_influencers.push(AuditInfluencerRecord::new(
                audit_id,
                influencer_id,
                candidate.discovery_source,
            ));
        }
        Ok(commit)
    }

    async fn analyze(
        &self,
        audit: &AuditRun,
        profile_cache: &mut HashMap<String, InfluencerProfile>,
    ) -> Result<(), PipelineError> {
        let linked = self.store.list_audit_influencers(audit.id).await?;
        let mut commit = StepCommit::default();

        for LinkedInfluencer {
            mut link,
            mut influencer,
        } in linked
        {
            let handle = influencer.handle.clone();
            let mut profile = with_timeout(
                self.settings.profile_timeout,
                || format!("influencer profile fetch for @{handle}"),
                self.source.fetch_influencer_profile(&handle),
            )
            .await?;
            profile
                .recent_posts
                .truncate(self.settings.recent_posts_limit);

            influencer.apply_profile(&profile, Utc::now());
            let engagement = calculate_engagement_metrics(&profile);
            tracing::debug!(
                audit_id = %audit.id,
                influencer = %handle,
                engagement_rate = engagement.engagement_rate,
                "influencer analyzed"
            );
            link.engagement = Some(engagement);

            commit.influencers.push(influencer);
            commit.audit_influencers.push(link);
            profile_cache.insert(handle, profile);
        }

        self.store.commit(commit).await?;
        Ok(())
    }

    async fn score(
        &self,
        audit: &mut AuditRun,
        profile_cache: &mut HashMap<String, InfluencerProfile>,
    ) -> Result<(), PipelineError> {
        // Taken up front so the cache is empty whether or not scoring succeeds.
        let profiles = std::mem::take(profile_cache);
        let linked = self.store.list_audit_influencers(audit.id).await?;

        let mut commit = StepCommit::default();
        let mut health_inputs = Vec::with_capacity(linked.len());
        let mut scored: Vec<(Uuid, &InfluencerProfile)> = Vec::with_capacity(linked.len());

        for LinkedInfluencer {
            mut link,
            influencer,
        } in linked
        {
            let Some(profile) = profiles.get(&influencer.handle) else {
                tracing::warn!(
                    audit_id = %audit.id,
                    influencer = %influencer.handle,
                    "no analyzed profile; skipping scoring"
                );
                continue;
            };

            let engagement = link
                .engagement
                .unwrap_or_else(|| calculate_engagement_metrics(profile));
            let scores = score_influencer(profile, engagement);
            health_inputs.push(scores.health_input());
            link.engagement = Some(engagement);
            link.scores = Some(scores);

            scored.push((influencer.id, profile));
            commit.audit_influencers.push(link);
        }

        // Every unordered pair: quadratic in the number of scored influencers.
        for (i, (a_id, a)) in scored.iter().enumerate() {
            for (b_id, b) in &scored[i + 1..] {
                commit.overlaps.push(OverlapRecord::new(
                    audit.id,
                    *a_id,
                    *b_id,
                    estimate_audience_overlap(a, b),
                ));
            }
        }

        let mut updated = audit.clone();
        updated.health_score = Some(calculate_health_score(&health_inputs));
        updated.updated_at = Some(Utc::now());
        commit.audit = Some(updated.clone());

        tracing::info!(
            audit_id = %audit.id,
            scored = scored.len(),
            overlaps = commit.overlaps.len(),
            health_score = ?updated.health_score,
            "scoring finished"
        );
        self.store.commit(commit).await?;
        *audit = updated;
        Ok(())
    }

    async fn narrate(&self, audit: &mut AuditRun) -> Result<(), PipelineError> {
        let Some(generator) = self.narrative else {
            tracing::debug!(audit_id = %audit.id, "no narrative generator configured");
            return Ok(());
        };

        let linked = self.store.list_audit_influencers(audit.id).await?;
        let narrative = match generator.generate(audit, &linked).await {
            Ok(Some(narrative)) => narrative,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(audit_id = %audit.id, error = %e, "narrative generation failed");
                return Ok(());
            }
        };

        let mut updated = audit.clone();
        updated.executive_summary = narrative.executive_summary;
        updated.recommendations = narrative.recommendations;
        updated.updated_at = Some(Utc::now());
        self.store.commit(StepCommit::audit(updated.clone())).await?;
        *audit = updated;
        Ok(())
    }
}

async fn with_timeout<T, F>(
    limit: Duration,
    operation: impl FnOnce() -> String,
    fut: F,
) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout {
            operation: operation(),
            limit,
        }),
    }
}
