use crate::db::connection::Database;
use crate::db::repository::{KnowledgeRepository, RecordRepository, ReservationRepository};
use crate::db::schema;
use crate::db::traits::{
    DatabaseBackend, KnowledgeStore, MetadataStore, RecordCollection, RecordStore,
    ReservationStore,
};
use crate::db::MetadataRepository;
use crate::error::Result;
use crate::models::{KnowledgeChunk, Reservation, RetrievedChunk};
use async_trait::async_trait;
use serde_json::Value;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KnowledgeStore for LibSqlBackend {
    async fn clear_knowledge(&self) -> Result<u64> {
        let conn = self.db.connect().await?;
        KnowledgeRepository::delete_all(&conn).await
    }
    async fn insert_knowledge_chunks(&self, chunks: &[KnowledgeChunk]) -> Result<()> {
        let conn = self.db.connect().await?;
        KnowledgeRepository::create_batch(&conn, chunks).await
    }
    async fn search_knowledge(
        &self,
        embedding: &[f32],
        limit: u32,
    ) -> Result<Vec<RetrievedChunk>> {
        let conn = self.db.connect().await?;
        KnowledgeRepository::search_similar(&conn, embedding, limit).await
    }
    async fn count_knowledge_chunks(&self) -> Result<u64> {
        let conn = self.db.connect().await?;
        KnowledgeRepository::count(&conn).await
    }
    async fn rebuild_knowledge(&self, embedding_dimensions: usize) -> Result<()> {
        let conn = self.db.connect().await?;
        schema::rebuild_knowledge_table(&conn, embedding_dimensions).await
    }
}

#[async_trait]
impl RecordStore for LibSqlBackend {
    async fn list_records(&self, collection: RecordCollection) -> Result<Vec<Value>> {
        let conn = self.db.connect().await?;
        RecordRepository::list(&conn, collection).await
    }
    async fn replace_records(
        &self,
        collection: RecordCollection,
        records: &[Value],
    ) -> Result<u64> {
        let conn = self.db.connect().await?;
        RecordRepository::replace_all(&conn, collection, records).await
    }
}

#[async_trait]
impl ReservationStore for LibSqlBackend {
    async fn count_reservations_matching(&self, fragment: &str) -> Result<u64> {
        let conn = self.db.connect().await?;
        ReservationRepository::count_matching(&conn, fragment).await
    }
    async fn insert_reservation(&self, reservation: &Reservation) -> Result<bool> {
        let conn = self.db.connect().await?;
        ReservationRepository::try_create(&conn, reservation).await
    }
}

#[async_trait]
impl MetadataStore for LibSqlBackend {
    async fn get_embedding_dimensions(&self) -> Result<Option<usize>> {
        let conn = self.db.connect().await?;
        MetadataRepository::get_embedding_dimensions(&conn).await
    }
    async fn set_embedding_dimensions(&self, dims: usize) -> Result<()> {
        let conn = self.db.connect().await?;
        MetadataRepository::set_embedding_dimensions(&conn, dims).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect().await?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }
}
