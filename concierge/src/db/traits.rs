use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{KnowledgeChunk, Reservation, RetrievedChunk};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Operational collections served read-only over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCollection {
    Rooms,
    Catalog,
    Reservations,
}

impl RecordCollection {
    pub const ALL: [RecordCollection; 3] = [Self::Rooms, Self::Reservations, Self::Catalog];

    /// Table name, also the key under which the collection appears in the
    /// operations data file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Catalog => "catalog",
            Self::Reservations => "reservations",
        }
    }
}

impl std::fmt::Display for RecordCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// Vector store for knowledge chunks.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Delete every stored chunk, returning how many were removed.
    async fn clear_knowledge(&self) -> Result<u64>;
    async fn insert_knowledge_chunks(&self, chunks: &[KnowledgeChunk]) -> Result<()>;
    /// Nearest chunks by cosine similarity, best first.
    async fn search_knowledge(&self, embedding: &[f32], limit: u32)
        -> Result<Vec<RetrievedChunk>>;
    async fn count_knowledge_chunks(&self) -> Result<u64>;
    /// Drop and recreate the knowledge table with a new embedding width.
    async fn rebuild_knowledge(&self, embedding_dimensions: usize) -> Result<()>;
}

/// Opaque JSON records for rooms, catalog items and reservations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_records(&self, collection: RecordCollection) -> Result<Vec<Value>>;
    /// Clear the collection and insert `records`, returning the stored count.
    /// Reservations repeating an already stored id are skipped.
    async fn replace_records(&self, collection: RecordCollection, records: &[Value])
        -> Result<u64>;
}

/// Reservation requests created by guests.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Count reservations whose identifier contains `fragment`.
    async fn count_reservations_matching(&self, fragment: &str) -> Result<u64>;
    /// Insert a reservation. Returns `false` without writing when the
    /// identifier is already taken.
    async fn insert_reservation(&self, reservation: &Reservation) -> Result<bool>;
}

/// Key-value metadata store (e.g. embedding dimensions).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>>;
    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete database backend that combines all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend: KnowledgeStore + RecordStore + ReservationStore + MetadataStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<()>;
}
