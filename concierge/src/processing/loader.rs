use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ConciergeError, Result};
use crate::models::{
    title_case, value_to_text, CuratedKnowledgeItem, DocumentMetadata, KnowledgeDocument,
};

pub const KNOWLEDGE_FILE: &str = "hotel_knowledge.json";
pub const CONTENT_DIR: &str = "content";
pub const CURATED_SOURCE: &str = "hotel_knowledge";

/// Load every knowledge document under `data_dir`: the curated knowledge
/// file first, then the supplementary `content/*.json` files in file-name
/// order.
pub fn load_knowledge(data_dir: &Path) -> Result<Vec<KnowledgeDocument>> {
    let mut documents = load_curated_knowledge(&data_dir.join(KNOWLEDGE_FILE))?;
    documents.extend(load_content_dir(&data_dir.join(CONTENT_DIR))?);
    Ok(documents)
}

/// Load the curated knowledge file. A missing or malformed file is fatal.
pub fn load_curated_knowledge(path: &Path) -> Result<Vec<KnowledgeDocument>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ConciergeError::Processing(format!("Cannot read {}: {e}", path.display()))
    })?;
    let items: Vec<CuratedKnowledgeItem> = serde_json::from_str(&raw)?;

    let documents: Vec<KnowledgeDocument> = items
        .into_iter()
        .map(|item| {
            KnowledgeDocument::new(
                item.text,
                DocumentMetadata {
                    id: value_to_text(&item.id),
                    doc_type: item.metadata.doc_type,
                    category: Some(item.metadata.category),
                    title: None,
                    source: CURATED_SOURCE.to_string(),
                },
            )
        })
        .collect();

    tracing::info!(count = documents.len(), path = %path.display(), "Loaded curated knowledge");
    Ok(documents)
}

/// Load supplementary `*.json` files. A missing directory yields nothing.
pub fn load_content_dir(dir: &Path) -> Result<Vec<KnowledgeDocument>> {
    if !dir.is_dir() {
        tracing::info!(path = %dir.display(), "No content directory, skipping");
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json")
        })
        .collect();
    files.sort();

    let mut documents = Vec::new();
    for path in files {
        let source = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let raw = std::fs::read_to_string(&path)?;
        let data: Value = serde_json::from_str(&raw)?;

        let before = documents.len();
        match data {
            Value::Array(items) => {
                documents.extend(items.iter().map(|item| content_document(item, &source)));
            }
            single => {
                documents.push(KnowledgeDocument::new(
                    transform_item(&single, &source),
                    DocumentMetadata {
                        doc_type: source.clone(),
                        source: source.clone(),
                        ..Default::default()
                    },
                ));
            }
        }
        tracing::debug!(file = %path.display(), count = documents.len() - before, "Loaded content file");
    }

    tracing::info!(count = documents.len(), "Loaded supplementary content");
    Ok(documents)
}

fn content_document(item: &Value, source: &str) -> KnowledgeDocument {
    let fields = item.as_object();
    let field = |name: &str| fields.and_then(|f| f.get(name)).and_then(value_to_text);

    KnowledgeDocument::new(
        transform_item(item, source),
        DocumentMetadata {
            id: field("id"),
            doc_type: source.to_string(),
            category: field("category"),
            title: field("title"),
            source: source.to_string(),
        },
    )
}

/// Render a supplementary record as prose.
///
/// `hotel_info` records read `Hotel {Category} - {title}: {description}`;
/// others use `{title}: {description}`, the bare description, or a dump of
/// the whole record, whichever is available first.
pub fn transform_item(item: &Value, doc_type: &str) -> String {
    let empty = Map::new();
    let fields = item.as_object().unwrap_or(&empty);
    let text_of = |name: &str| -> Option<String> { fields.get(name).and_then(value_to_text) };

    let title = text_of("title").unwrap_or_default();
    let description = text_of("description").unwrap_or_default();

    if doc_type == "hotel_info" {
        let category = text_of("category").unwrap_or_else(|| "general".to_string());
        return format!("Hotel {} - {title}: {description}", title_case(&category));
    }

    if !title.is_empty() && !description.is_empty() {
        format!("{title}: {description}")
    } else if !description.is_empty() {
        description
    } else {
        item.to_string()
    }
}
