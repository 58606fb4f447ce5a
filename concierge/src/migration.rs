use crate::db::traits::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::error::{ConciergeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationDecision {
    NotNeeded,
    Approved,
    Rejected,
}

/// Check if the stored embedding width matches what the provider produces.
///
/// A fresh database records the provider's width. On a mismatch the
/// decision is `Approved` only when `allow_rebuild` is set.
pub async fn check_dimension_compatibility(
    db: &dyn DatabaseBackend,
    provider: &EmbeddingProvider,
    allow_rebuild: bool,
) -> Result<MigrationDecision> {
    let model_dimensions = provider.dimensions();
    let stored_dimensions = db.get_embedding_dimensions().await?;

    match stored_dimensions {
        None => {
            tracing::info!(
                "Fresh database, storing embedding dimensions: {}",
                model_dimensions
            );
            db.set_embedding_dimensions(model_dimensions).await?;
            Ok(MigrationDecision::NotNeeded)
        }
        Some(db_dims) if db_dims == model_dimensions => {
            tracing::info!("Embedding dimensions match: {}", model_dimensions);
            Ok(MigrationDecision::NotNeeded)
        }
        Some(db_dims) => {
            tracing::warn!(
                "Dimension mismatch: database has {} dimensions, model produces {}",
                db_dims,
                model_dimensions
            );

            if allow_rebuild {
                tracing::info!("Rebuild requested, knowledge table will be recreated");
                Ok(MigrationDecision::Approved)
            } else {
                Ok(MigrationDecision::Rejected)
            }
        }
    }
}

/// Startup check for the server: any mismatch is fatal.
pub async fn ensure_dimensions_match(
    db: &dyn DatabaseBackend,
    provider: &EmbeddingProvider,
) -> Result<()> {
    match check_dimension_compatibility(db, provider, false).await? {
        MigrationDecision::NotNeeded => Ok(()),
        MigrationDecision::Approved | MigrationDecision::Rejected => {
            let stored = db.get_embedding_dimensions().await?.unwrap_or_default();
            Err(ConciergeError::Embedding(format!(
                "Knowledge store holds {stored}-dimension embeddings but the model produces {}. \
                 Run `concierge ingest --rebuild-embeddings`",
                provider.dimensions()
            )))
        }
    }
}

/// Recreate the knowledge table at the new width and record it.
///
/// Every stored chunk is dropped; the caller re-ingests afterwards.
pub async fn rebuild_knowledge(db: &dyn DatabaseBackend, new_dimensions: usize) -> Result<()> {
    tracing::info!(
        "Rebuilding knowledge table for {} dimensions",
        new_dimensions
    );

    db.rebuild_knowledge(new_dimensions).await?;
    db.set_embedding_dimensions(new_dimensions).await?;

    tracing::info!("Knowledge table rebuilt");

    Ok(())
}
