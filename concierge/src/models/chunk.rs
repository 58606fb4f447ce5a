use serde::{Deserialize, Serialize};

use super::DocumentMetadata;

/// Metadata stored with every chunk: the parent document's metadata plus
/// the chunk's position within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(flatten)]
    pub document: DocumentMetadata,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// A chunk of knowledge text with its embedding, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl KnowledgeChunk {
    pub fn new(id: String, text: String, metadata: ChunkMetadata, embedding: Vec<f32>) -> Self {
        Self {
            id,
            text,
            metadata,
            embedding,
        }
    }
}

/// A stored chunk returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}
