use serde::{Deserialize, Serialize};

/// Metadata shared by a knowledge document and every chunk cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: String,
}

/// A loaded knowledge record, before chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl KnowledgeDocument {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// One item of the curated `hotel_knowledge.json` file.
#[derive(Debug, Clone, Deserialize)]
pub struct CuratedKnowledgeItem {
    pub id: serde_json::Value,
    pub text: String,
    pub metadata: CuratedKnowledgeMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CuratedKnowledgeMetadata {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub category: String,
}
