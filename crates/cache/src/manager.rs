//! Tiered lookup-and-generate cache: the volatile session tier in front of
//! the persistent exact-match store, with transparent fallback to a
//! caller-supplied generator.

use std::future::Future;
use std::sync::Arc;

use adforge_core::error::{AdForgeError, AdForgeResult};
use adforge_core::types::{CacheEntry, CompositeKey, Provenance};
use chrono::Utc;
use tracing::{debug, warn};

use crate::store::{AnalysisStore, DocumentMetadata, StoreFilter};
use crate::volatile::SessionCache;

/// Get-or-generate semantics over composite keys. One manager per logical
/// session; the persistent store may be shared across sessions.
pub struct TieredCache {
    volatile: SessionCache,
    store: Arc<dyn AnalysisStore>,
    session_id: String,
}

impl TieredCache {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        session_id: impl Into<String>,
        max_entries: usize,
    ) -> Self {
        Self {
            volatile: SessionCache::new(max_entries),
            store,
            session_id: session_id.into(),
        }
    }

    /// Look `key` up in the volatile tier, then the persistent tier, then
    /// fall back to `generator` (always, when `force_fresh` is set).
    ///
    /// `generator` is invoked at most once per call and never retried here;
    /// callers wanting retries wrap it with the retry policy. A generation
    /// failure is returned as an error with nothing cached, so callers can
    /// always tell "generated" from "failed" apart.
    pub async fn get_or_generate<F, Fut>(
        &self,
        key: &CompositeKey,
        generator: F,
        force_fresh: bool,
    ) -> AdForgeResult<CacheEntry>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        if !force_fresh {
            if let Some(mut entry) = self.volatile.get(key) {
                metrics::counter!("cache.volatile.hit").increment(1);
                // The tag reflects the tier that served this call.
                entry.provenance = Provenance::VolatileHit;
                return Ok(entry);
            }
            metrics::counter!("cache.volatile.miss").increment(1);

            match self.store.query(&StoreFilter::from_key(key), 1).await {
                Ok(documents) => {
                    if let Some(doc) = documents.into_iter().next() {
                        metrics::counter!("cache.persistent.hit").increment(1);
                        let entry = CacheEntry {
                            value: doc.document,
                            provenance: Provenance::PersistentHit,
                            generated_at: doc.metadata.timestamp,
                        };
                        // Promote for the rest of this session.
                        self.volatile.put(key.clone(), entry.clone());
                        return Ok(entry);
                    }
                    metrics::counter!("cache.persistent.miss").increment(1);
                }
                Err(e) => {
                    // The persistent tier is never a hard dependency; a
                    // failed query is a miss.
                    warn!(key = %key, error = %e, "persistent tier query failed, treating as miss");
                    metrics::counter!("cache.persistent.error").increment(1);
                }
            }
        }

        debug!(key = %key, force_fresh, "cache miss, invoking generator");
        let value = generator()
            .await
            .map_err(|e| AdForgeError::Generation(e.to_string()))?;
        metrics::counter!("cache.generated").increment(1);

        let entry = CacheEntry {
            value: value.clone(),
            provenance: Provenance::FreshlyGenerated,
            generated_at: Utc::now(),
        };
        self.volatile.put(key.clone(), entry.clone());

        let metadata = DocumentMetadata::new(&key.subject, key.purpose, &self.session_id);
        if let Err(e) = self
            .store
            .add_texts(vec![value], vec![metadata], &self.session_id)
            .await
        {
            warn!(key = %key, error = %e, "persistent tier write failed, result not persisted");
            metrics::counter!("cache.persistent.write_error").increment(1);
        }

        Ok(entry)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Discard the volatile tier. Persistent documents are untouched.
    pub fn end_session(&self) {
        self.volatile.clear();
    }
}
