//! Read model assembled from a stored audit run.

use std::collections::{BTreeMap, HashMap};

use brandaudit_core::{AuditStatus, DiscoverySource};
use brandaudit_scoring::{AudienceDemographics, ContentAnalysis};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::store::{AuditStore, LinkedInfluencer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandOverview {
    pub handle: String,
    pub display_name: Option<String>,
    pub followers_count: Option<u64>,
    pub profile_pic_url: Option<String>,
    pub bio: Option<String>,
}

/// One linked influencer with whatever metrics the run got to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerAnalysis {
    pub handle: String,
    pub display_name: Option<String>,
    pub profile_pic_url: Option<String>,
    pub followers_count: Option<u64>,
    pub discovery_source: DiscoverySource,
    pub engagement_rate: Option<f64>,
    pub avg_likes: Option<f64>,
    pub avg_comments: Option<f64>,
    pub fraud_score: Option<f64>,
    pub fraud_indicators: Option<BTreeMap<&'static str, f64>>,
    pub content_quality_score: Option<f64>,
    pub content_analysis: Option<ContentAnalysis>,
    pub audience_quality_score: Option<f64>,
    pub audience_demographics: Option<AudienceDemographics>,
    pub estimated_reach: Option<u64>,
    pub estimated_cpm: Option<f64>,
}

impl InfluencerAnalysis {
    fn from_linked(linked: &LinkedInfluencer) -> Self {
        let LinkedInfluencer { link, influencer } = linked;
        let engagement = link.engagement;
        let scores = link.scores;
        Self {
            handle: influencer.handle.clone(),
            display_name: influencer.display_name.clone(),
            profile_pic_url: influencer.profile_pic_url.clone(),
            followers_count: influencer.followers_count,
            discovery_source: link.discovery_source,
            engagement_rate: engagement.map(|e| e.engagement_rate),
            avg_likes: engagement.map(|e| e.avg_likes),
            avg_comments: engagement.map(|e| e.avg_comments),
            fraud_score: scores.map(|s| s.fraud.fraud_score),
            fraud_indicators: scores.map(|s| s.fraud.indicators.to_map()),
            content_quality_score: scores.map(|s| s.content.content_quality_score),
            content_analysis: scores.map(|s| s.content.analysis),
            audience_quality_score: scores.map(|s| s.audience.audience_quality_score),
            audience_demographics: scores.map(|s| s.audience.demographics),
            estimated_reach: scores.map(|s| s.reach.estimated_reach),
            estimated_cpm: scores.map(|s| s.reach.estimated_cpm),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapEntry {
    pub influencer_a_handle: String,
    pub influencer_b_handle: String,
    pub overlap_percentage: f64,
    pub sample_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub id: Uuid,
    pub status: AuditStatus,
    pub progress: u8,
    pub current_step: Option<String>,
    pub error_message: Option<String>,
    pub language: String,
    pub brand: Option<BrandOverview>,
    pub health_score: Option<f64>,
    pub executive_summary: Option<String>,
    pub recommendations: Vec<String>,
    pub influencers: Vec<InfluencerAnalysis>,
    pub audience_overlaps: Vec<OverlapEntry>,
    pub created_at: DateTime<Utc>,
}

/// Assemble the report for `audit_id` from whatever the run has committed.
///
/// A missing brand record leaves `brand` empty; overlaps pointing at
/// influencers no longer linked to the run are dropped.
///
/// # Errors
///
/// Returns a `NotFound` store error for an unknown audit id, or any other
/// store failure.
pub async fn load_audit_report(
    store: &dyn AuditStore,
    audit_id: Uuid,
) -> Result<AuditReport, PipelineError> {
    let audit = store.load_audit(audit_id).await?;
    let brand = match store.load_brand(&audit.brand_handle).await {
        Ok(brand) => Some(BrandOverview {
            handle: brand.handle,
            display_name: brand.display_name,
            followers_count: brand.followers_count,
            profile_pic_url: brand.profile_pic_url,
            bio: brand.bio,
        }),
        Err(e) => {
            let e = PipelineError::from(e);
            if !e.is_not_found() {
                return Err(e);
            }
            None
        }
    };

    let linked = store.list_audit_influencers(audit_id).await?;
    let handles: HashMap<Uuid, &str> = linked
        .iter()
        .map(|l| (l.influencer.id, l.influencer.handle.as_str()))
        .collect();

    let audience_overlaps = store
        .list_overlaps(audit_id)
        .await?
        .into_iter()
        .filter_map(|overlap| {
            Some(OverlapEntry {
                influencer_a_handle: (*handles.get(&overlap.influencer_a_id)?).to_string(),
                influencer_b_handle: (*handles.get(&overlap.influencer_b_id)?).to_string(),
                overlap_percentage: overlap.estimate.overlap_percentage,
                sample_size: overlap.estimate.sample_size,
            })
        })
        .collect();

    Ok(AuditReport {
        id: audit.id,
        status: audit.status,
        progress: audit.progress,
        current_step: audit.current_step,
        error_message: audit.error_message,
        language: audit.language,
        brand,
        health_score: audit.health_score,
        executive_summary: audit.executive_summary,
        recommendations: audit.recommendations,
        influencers: linked.iter().map(InfluencerAnalysis::from_linked).collect(),
        audience_overlaps,
        created_at: audit.created_at,
    })
}
