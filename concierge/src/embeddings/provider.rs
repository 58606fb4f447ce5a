use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};

use super::api::{default_base_url, ApiConfig, EmbeddingApiClient};
use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{ConciergeError, Result};

#[derive(Clone)]
enum EmbeddingBackend {
    Api(EmbeddingApiClient),
    Local(Arc<Mutex<TextEmbedding>>),
}

/// Turns text into vectors, either through a remote OpenAI-compatible API or
/// an in-process fastembed model (`local/...` model names).
///
/// Ingestion and retrieval must use the same provider configuration so that
/// stored and query vectors live in the same space.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: EmbeddingBackend,
    dimensions: usize,
    batch_size: usize,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (provider, model_name) = parse_provider_model(&config.model);
        let batch_size = config.batch_size.max(1);

        let backend = if provider.eq_ignore_ascii_case("local") {
            tracing::info!(model = model_name, "Loading local embedding model");
            EmbeddingBackend::Local(Arc::new(Mutex::new(build_model(resolve_embedding_model(
                model_name,
            ))?)))
        } else {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url(provider).to_string());
            tracing::info!(provider, model = model_name, %base_url, "Using embedding API");
            EmbeddingBackend::Api(EmbeddingApiClient::new(ApiConfig {
                base_url,
                api_key: config.api_key.clone(),
                model: model_name.to_string(),
                timeout_secs: config.timeout_secs,
                max_retries: config.max_retries,
            })?)
        };

        Ok(Self {
            backend,
            dimensions: config.dimensions,
            batch_size,
        })
    }

    /// Embed a search query.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(vec![query.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ConciergeError::Embedding("No embedding generated".to_string()))
    }

    /// Embed passages for storage, `batch_size` texts per request.
    pub async fn embed_passages(&self, passages: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut all_embeddings = Vec::with_capacity(passages.len());
        for batch in passages.chunks(self.batch_size) {
            let mut embedded = self.embed_batch(batch.to_vec()).await?;
            all_embeddings.append(&mut embedded);
            tracing::debug!(done = all_embeddings.len(), total = passages.len(), "Embedded batch");
        }
        Ok(all_embeddings)
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = match &self.backend {
            EmbeddingBackend::Api(client) => {
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                client.embed(&refs).await?
            }
            EmbeddingBackend::Local(model) => {
                let model = Arc::clone(model);
                let batch_size = self.batch_size;
                tokio::task::spawn_blocking(move || {
                    let mut model = model.lock().map_err(|e| {
                        ConciergeError::Embedding(format!("Embedding model lock poisoned: {e}"))
                    })?;
                    model
                        .embed(texts, Some(batch_size))
                        .map_err(|e| ConciergeError::Embedding(e.to_string()))
                })
                .await
                .map_err(|e| ConciergeError::Embedding(format!("Embedding worker failed: {e}")))??
            }
        };

        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimensions) {
            return Err(ConciergeError::Embedding(format!(
                "Embedding has {} dimensions, expected {}",
                bad.len(),
                self.dimensions
            )));
        }

        Ok(embeddings)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "BAAI/bge-large-en-v1.5" | "bge-large-en-v1.5" => EmbeddingModel::BGELargeENV15,
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            EmbeddingModel::AllMiniLML6V2
        }
        "paraphrase-multilingual-MiniLM-L12-v2"
        | "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2" => {
            EmbeddingModel::ParaphraseMLMiniLML12V2
        }
        "multilingual-e5-small" | "intfloat/multilingual-e5-small" => {
            EmbeddingModel::MultilingualE5Small
        }
        _ => EmbeddingModel::BGESmallENV15,
    }
}

fn build_model(embedding_model: EmbeddingModel) -> Result<TextEmbedding> {
    TextEmbedding::try_new(InitOptions::new(embedding_model).with_show_download_progress(true))
        .map_err(|e| ConciergeError::Embedding(e.to_string()))
}
