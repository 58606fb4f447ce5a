use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use nanoid::nanoid;
use serde_json::Value;

use crate::db::{DatabaseBackend, RecordCollection};
use crate::embeddings::EmbeddingProvider;
use crate::error::{ConciergeError, Result};
use crate::models::KnowledgeChunk;

use super::{loader, TextChunker};

pub const OPERATIONS_FILE: &str = "mock_operations.json";

/// Counts reported after an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    /// Records loaded per operational collection, in load order.
    pub records: Vec<(RecordCollection, u64)>,
}

/// Batch job that rebuilds the knowledge store from a data directory.
///
/// The knowledge collection is cleared before anything is embedded. A
/// failure part-way leaves it partially populated; re-running the job
/// starts over.
pub struct IngestPipeline {
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        chunker: TextChunker,
    ) -> Self {
        Self {
            db,
            embeddings,
            chunker,
        }
    }

    /// Load, chunk, embed and store every document under `data_dir`, then
    /// load the operational collections.
    pub async fn run(&self, data_dir: &Path) -> Result<IngestReport> {
        let start = Instant::now();

        let documents = loader::load_knowledge(data_dir)?;
        tracing::info!(documents = documents.len(), "Loaded knowledge documents");

        let chunks = self.chunker.chunk_documents(&documents);
        tracing::info!(
            chunks = chunks.len(),
            chunk_size = self.chunker.chunk_size(),
            "Chunked documents"
        );

        let cleared = self.db.clear_knowledge().await?;
        tracing::info!(cleared, "Cleared knowledge store");

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embeddings.embed_passages(texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(ConciergeError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let knowledge: Vec<KnowledgeChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                KnowledgeChunk::new(nanoid!(), chunk.content, chunk.metadata, embedding)
            })
            .collect();

        self.db.insert_knowledge_chunks(&knowledge).await?;
        let stored = self.db.count_knowledge_chunks().await?;
        tracing::info!(stored, "Stored knowledge chunks");

        let records = self
            .load_operations(&data_dir.join(OPERATIONS_FILE))
            .await?;

        tracing::info!(
            took_ms = start.elapsed().as_millis() as u64,
            "Ingestion complete"
        );

        Ok(IngestReport {
            documents: documents.len(),
            chunks: knowledge.len(),
            records,
        })
    }

    /// Replace each operational collection present in `path`. A missing
    /// file is skipped.
    pub async fn load_operations(&self, path: &Path) -> Result<Vec<(RecordCollection, u64)>> {
        if !path.is_file() {
            tracing::info!(path = %path.display(), "No operations file, skipping");
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(path)?;
        let data: Value = serde_json::from_str(&raw)?;

        let mut loaded = Vec::new();
        for collection in RecordCollection::ALL {
            let Some(records) = data.get(collection.as_str()) else {
                continue;
            };
            let records = records.as_array().ok_or_else(|| {
                ConciergeError::Processing(format!(
                    "{} in {} must be an array",
                    collection,
                    path.display()
                ))
            })?;

            let inserted = self.db.replace_records(collection, records).await?;
            tracing::info!(%collection, inserted, "Loaded operational records");
            loaded.push((collection, inserted));
        }

        Ok(loaded)
    }
}

/// Resolve the data directory: an explicit path wins over the configured one.
pub fn resolve_data_dir(explicit: Option<PathBuf>, configured: &str) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(configured))
}
