//! Process-local [`AuditStore`] backed by a mutex-guarded map set.
//!
//! Used by the CLI and by tests. Every [`StepCommit`] is validated against
//! the current state before any write is applied, so a rejected commit
//! leaves the store untouched.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use brandaudit_core::AuditRun;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{
    AuditInfluencerRecord, AuditStore, BrandRecord, InfluencerRecord, LinkedInfluencer,
    OverlapRecord, StepCommit,
};

#[derive(Debug, Default)]
struct Tables {
    audits: HashMap<Uuid, AuditRun>,
    brands: HashMap<String, BrandRecord>,
    influencers: HashMap<Uuid, InfluencerRecord>,
    influencer_ids_by_handle: HashMap<String, Uuid>,
    /// Insertion-ordered; upserted by id.
    audit_influencers: Vec<AuditInfluencerRecord>,
    overlaps: Vec<OverlapRecord>,
}

impl Tables {
    fn validate(&self, commit: &StepCommit) -> Result<(), StoreError> {
        if let Some(audit) = &commit.audit {
            if !self.audits.contains_key(&audit.id) {
                return Err(StoreError::NotFound {
                    entity: "audit",
                    key: audit.id.to_string(),
                });
            }
        }

        let mut handles_in_commit: HashMap<&str, Uuid> = HashMap::new();
        for influencer in &commit.influencers {
            let owner = handles_in_commit
                .get(influencer.handle.as_str())
                .copied()
                .or_else(|| self.influencer_ids_by_handle.get(&influencer.handle).copied());
            if owner.is_some_and(|id| id != influencer.id) {
                return Err(StoreError::Conflict {
                    entity: "influencer",
                    key: influencer.handle.clone(),
                });
            }
            handles_in_commit.insert(influencer.handle.as_str(), influencer.id);
        }

        let committed_influencers: HashSet<Uuid> =
            commit.influencers.iter().map(|i| i.id).collect();
        let influencer_exists =
            |id: &Uuid| committed_influencers.contains(id) || self.influencers.contains_key(id);
        let audit_exists = |id: &Uuid| self.audits.contains_key(id);

        for link in &commit.audit_influencers {
            if !audit_exists(&link.audit_id) {
                return Err(StoreError::NotFound {
                    entity: "audit",
                    key: link.audit_id.to_string(),
                });
            }
            if !influencer_exists(&link.influencer_id) {
                return Err(StoreError::NotFound {
                    entity: "influencer",
                    key: link.influencer_id.to_string(),
                });
            }
        }

        for overlap in &commit.overlaps {
            if !audit_exists(&overlap.audit_id) {
                return Err(StoreError::NotFound {
                    entity: "audit",
                    key: overlap.audit_id.to_string(),
                });
            }
            for id in [&overlap.influencer_a_id, &overlap.influencer_b_id] {
                if !influencer_exists(id) {
                    return Err(StoreError::NotFound {
                        entity: "influencer",
                        key: id.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn apply(&mut self, commit: StepCommit) {
        if let Some(audit) = commit.audit {
            self.audits.insert(audit.id, audit);
        }
        for brand in commit.brands {
            self.brands.insert(brand.handle.clone(), brand);
        }
        for influencer in commit.influencers {
            if let Some(previous) = self.influencers.get(&influencer.id) {
                if previous.handle != influencer.handle {
                    self.influencer_ids_by_handle.remove(&previous.handle);
                }
            }
            self.influencer_ids_by_handle
                .insert(influencer.handle.clone(), influencer.id);
            self.influencers.insert(influencer.id, influencer);
        }
        for link in commit.audit_influencers {
            match self.audit_influencers.iter_mut().find(|l| l.id == link.id) {
                Some(existing) => *existing = link,
                None => self.audit_influencers.push(link),
            }
        }
        self.overlaps.extend(commit.overlaps);
    }
}

/// In-memory storage collaborator.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // No invariant spans a panic: writes are applied only after validation.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn load_audit(&self, id: Uuid) -> Result<AuditRun, StoreError> {
        self.lock()
            .audits
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "audit",
                key: id.to_string(),
            })
    }

    async fn create_audit(&self, audit: &AuditRun) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if tables.audits.contains_key(&audit.id) {
            return Err(StoreError::Conflict {
                entity: "audit",
                key: audit.id.to_string(),
            });
        }
        tables.audits.insert(audit.id, audit.clone());
        Ok(())
    }

    async fn load_brand(&self, handle: &str) -> Result<BrandRecord, StoreError> {
        self.lock()
            .brands
            .get(handle)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "brand",
                key: handle.to_string(),
            })
    }

    async fn find_influencers_by_handles(
        &self,
        handles: &[String],
    ) -> Result<Vec<InfluencerRecord>, StoreError> {
        let tables = self.lock();
        let mut seen = HashSet::new();
        Ok(handles
            .iter()
            .filter(|h| seen.insert(h.as_str()))
            .filter_map(|h| tables.influencer_ids_by_handle.get(h))
            .filter_map(|id| tables.influencers.get(id))
            .cloned()
            .collect())
    }

    async fn list_audit_influencers(
        &self,
        audit_id: Uuid,
    ) -> Result<Vec<LinkedInfluencer>, StoreError> {
        let tables = self.lock();
        tables
            .audit_influencers
            .iter()
            .filter(|link| link.audit_id == audit_id)
            .map(|link| {
                let influencer = tables.influencers.get(&link.influencer_id).ok_or_else(|| {
                    StoreError::Backend(format!(
                        "audit influencer {} points at missing influencer {}",
                        link.id, link.influencer_id
                    ))
                })?;
                Ok(LinkedInfluencer {
                    link: link.clone(),
                    influencer: influencer.clone(),
                })
            })
            .collect()
    }

    async fn list_overlaps(&self, audit_id: Uuid) -> Result<Vec<OverlapRecord>, StoreError> {
        Ok(self
            .lock()
            .overlaps
            .iter()
            .filter(|o| o.audit_id == audit_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, commit: StepCommit) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.validate(&commit)?;
        tables.apply(commit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandaudit_core::{DiscoveredCandidate, DiscoverySource};

    fn candidate(username: &str) -> DiscoveredCandidate {
        DiscoveredCandidate {
            username: username.to_string(),
            followers_count: Some(12_000),
            discovery_source: DiscoverySource::TaggedPosts,
            discovery_context: String::new(),
        }
    }

    #[tokio::test]
    async fn load_missing_audit_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.load_audit(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "audit", .. }));
    }

    #[tokio::test]
    async fn create_audit_rejects_duplicate_id() {
        let store = InMemoryStore::new();
        let audit = AuditRun::new("acme", "en");
        store.create_audit(&audit).await.unwrap();
        let err = store.create_audit(&audit).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "audit", .. }));
    }

    #[tokio::test]
    async fn commit_upserts_brand_by_handle() {
        let store = InMemoryStore::new();
        let mut brand = BrandRecord::new("acme");
        store
            .commit(StepCommit {
                brands: vec![brand.clone()],
                ..StepCommit::default()
            })
            .await
            .unwrap();

        brand.followers_count = Some(42);
        store
            .commit(StepCommit {
                brands: vec![brand.clone()],
                ..StepCommit::default()
            })
            .await
            .unwrap();

        assert_eq!(store.load_brand("acme").await.unwrap().followers_count, Some(42));
    }

    #[tokio::test]
    async fn duplicate_handle_with_new_id_conflicts() {
        let store = InMemoryStore::new();
        let first = InfluencerRecord::from_candidate(&candidate("anna"));
        store
            .commit(StepCommit {
                influencers: vec![first],
                ..StepCommit::default()
            })
            .await
            .unwrap();

        let second = InfluencerRecord::from_candidate(&candidate("anna"));
        let err = store
            .commit(StepCommit {
                influencers: vec![second],
                ..StepCommit::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "influencer", .. }));
    }

    #[tokio::test]
    async fn rejected_commit_writes_nothing() {
        let store = InMemoryStore::new();
        let audit = AuditRun::new("acme", "en");
        store.create_audit(&audit).await.unwrap();

        let influencer = InfluencerRecord::from_candidate(&candidate("anna"));
        let dangling = AuditInfluencerRecord::new(
            audit.id,
            Uuid::new_v4(),
            DiscoverySource::RelatedProfiles,
        );
        let err = store
            .commit(StepCommit {
                influencers: vec![influencer],
                audit_influencers: vec![dangling],
                ..StepCommit::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "influencer", .. }));

        let found = store
            .find_influencers_by_handles(&["anna".to_string()])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn links_are_listed_in_insertion_order_with_influencers() {
        let store = InMemoryStore::new();
        let audit = AuditRun::new("acme", "en");
        store.create_audit(&audit).await.unwrap();

        let a = InfluencerRecord::from_candidate(&candidate("zoe"));
        let b = InfluencerRecord::from_candidate(&candidate("adam"));
        let link_a = AuditInfluencerRecord::new(audit.id, a.id, DiscoverySource::TaggedPosts);
        let link_b = AuditInfluencerRecord::new(audit.id, b.id, DiscoverySource::HashtagSearch);
        store
            .commit(StepCommit {
                influencers: vec![a, b],
                audit_influencers: vec![link_a, link_b],
                ..StepCommit::default()
            })
            .await
            .unwrap();

        let linked = store.list_audit_influencers(audit.id).await.unwrap();
        let handles: Vec<&str> = linked.iter().map(|l| l.influencer.handle.as_str()).collect();
        assert_eq!(handles, ["zoe", "adam"]);
        assert!(store
            .list_audit_influencers(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn bulk_lookup_is_case_sensitive_and_skips_unknown() {
        let store = InMemoryStore::new();
        store
            .commit(StepCommit {
                influencers: vec![InfluencerRecord::from_candidate(&candidate("Anna"))],
                ..StepCommit::default()
            })
            .await
            .unwrap();

        let handles = ["anna", "Anna", "x"].map(String::from);
        let found = store.find_influencers_by_handles(&handles).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, "Anna");
    }
}
