//! Durable analysis store backed by an append-only JSON-lines file. The
//! file is the only resource shared across sessions; concurrent processes
//! may both append for the same key (duplicate generation, not corruption)
//! and a reader may lag another process's very recent write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use crate::store::{AnalysisStore, DocumentMetadata, StoreFilter, StoredDocument};

pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> anyhow::Result<Vec<StoredDocument>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("reading analysis store"),
        };

        let mut documents = Vec::new();
        for line in raw.lines().filter(|line| !line.trim().is_empty()) {
            match serde_json::from_str::<StoredDocument>(line) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    // A torn write from a crashed process; skip the line
                    // rather than failing the whole query.
                    warn!(error = %e, "skipping unparseable store line");
                }
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl AnalysisStore for JsonlStore {
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

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("creating analysis store directory")?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .context("opening analysis store for append")?;

        let mut ids = Vec::with_capacity(texts.len());
        let mut buffer = String::new();
        for (text, mut metadata) in texts.into_iter().zip(metadatas) {
            metadata.session_id = session_id.to_string();
            let id = Uuid::new_v4().to_string();
            let doc = StoredDocument {
                id: id.clone(),
                document: text,
                metadata,
                distance: 0.0,
            };
            buffer.push_str(&serde_json::to_string(&doc)?);
            buffer.push('\n');
            ids.push(id);
        }

        file.write_all(buffer.as_bytes())
            .await
            .context("appending to analysis store")?;
        file.flush().await?;
        Ok(ids)
    }

    async fn query(
        &self,
        filter: &StoreFilter,
        limit: usize,
    ) -> anyhow::Result<Vec<StoredDocument>> {
        let documents = self.read_all().await?;
        Ok(documents
            .into_iter()
            .rev()
            .filter(|doc| filter.matches(&doc.metadata))
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::types::Purpose;

    fn metadata(subject: &str, content_type: Purpose) -> DocumentMetadata {
        DocumentMetadata::new(subject, content_type, "session-1")
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("analyses.jsonl"));

        store
            .add_texts(
                vec!["brand voice notes".into()],
                vec![metadata("EcoTech", Purpose::BrandAnalysis)],
                "session-1",
            )
            .await
            .unwrap();

        let filter = StoreFilter {
            subject: "EcoTech".to_string(),
            content_type: Purpose::BrandAnalysis,
        };
        let docs = store.query(&filter, 1).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document, "brand voice notes");
        assert_eq!(docs[0].metadata.session_id, "session-1");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("nonexistent.jsonl"));

        let filter = StoreFilter {
            subject: "EcoTech".to_string(),
            content_type: Purpose::Research,
        };
        assert!(store.query(&filter, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_survive_a_new_store_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyses.jsonl");

        JsonlStore::new(&path)
            .add_texts(
                vec!["report".into()],
                vec![metadata("EcoTech", Purpose::Research)],
                "session-1",
            )
            .await
            .unwrap();

        // A later session opens the same file.
        let reopened = JsonlStore::new(&path);
        let filter = StoreFilter {
            subject: "EcoTech".to_string(),
            content_type: Purpose::Research,
        };
        let docs = reopened.query(&filter, 1).await.unwrap();
        assert_eq!(docs[0].document, "report");
    }

    #[tokio::test]
    async fn test_unparseable_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyses.jsonl");

        let store = JsonlStore::new(&path);
        store
            .add_texts(
                vec!["good".into()],
                vec![metadata("EcoTech", Purpose::Research)],
                "session-1",
            )
            .await
            .unwrap();
        tokio::fs::write(
            &path,
            format!(
                "{}not-json\n",
                tokio::fs::read_to_string(&path).await.unwrap()
            ),
        )
        .await
        .unwrap();

        let filter = StoreFilter {
            subject: "EcoTech".to_string(),
            content_type: Purpose::Research,
        };
        let docs = store.query(&filter, 10).await.unwrap();
        assert_eq!(docs.len(), 1);
    }
}
