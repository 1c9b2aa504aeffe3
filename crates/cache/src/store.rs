//! Persistent analysis store capability: append-only documents with
//! exact-match metadata lookup. A real deployment points this at a vector
//! store; the cache manager only ever supplies exact-equality filters and
//! ignores ranking distance for correctness.

use adforge_core::types::{CompositeKey, Purpose};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub subject: String,
    pub content_type: Purpose,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn new(
        subject: impl Into<String>,
        content_type: Purpose,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            content_type,
            session_id: session_id.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One stored document plus the ranking distance reported by the backing
/// store. In-process implementations report `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub document: String,
    pub metadata: DocumentMetadata,
    pub distance: f32,
}

/// Exact-equality predicate over metadata fields.
#[derive(Debug, Clone)]
pub struct StoreFilter {
    pub subject: String,
    pub content_type: Purpose,
}

impl StoreFilter {
    pub fn from_key(key: &CompositeKey) -> Self {
        Self {
            subject: key.subject.clone(),
            content_type: key.purpose,
        }
    }

    pub fn matches(&self, metadata: &DocumentMetadata) -> bool {
        metadata.subject == self.subject && metadata.content_type == self.content_type
    }
}

/// Persistent tier capability. Append-only: adds never replace earlier
/// documents carrying the same metadata.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Store `texts` with their metadata under `session_id`, returning the
    /// assigned document ids.
    async fn add_texts(
        &self,
        texts: Vec<String>,
        metadatas: Vec<DocumentMetadata>,
        session_id: &str,
    ) -> anyhow::Result<Vec<String>>;

    /// Exact-match lookup, most recent first, at most `limit` documents.
    async fn query(
        &self,
        filter: &StoreFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredDocument>>;
}

/// In-memory store for tests and ephemeral runs. Append-only like its
/// durable counterparts.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn add_texts(
        &self,
        texts: Vec<String>,
        metadatas: Vec<DocumentMetadata>,
        session_id: &str,
    ) -> anyhow::Result<Vec<String>> {
        anyhow::ensure!(
            texts.len() == metadatas.len(),
            "texts and metadatas must be the same length"
        );

        let mut documents = self.documents.write();
        let mut ids = Vec::with_capacity(texts.len());
        for (text, mut metadata) in texts.into_iter().zip(metadatas) {
            metadata.session_id = session_id.to_string();
            let id = Uuid::new_v4().to_string();
            ids.push(id.clone());
            documents.push(StoredDocument {
                id,
                document: text,
                metadata,
                distance: 0.0,
            });
        }
        Ok(ids)
    }

    async fn query(
        &self,
        filter: &StoreFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredDocument>> {
        let documents = self.documents.read();
        Ok(documents
            .iter()
            .rev()
            .filter(|doc| filter.matches(&doc.metadata))
            .take(limit)
            .cloned()
            .collect())
    }
}
