use crate::config::ProcessingConfig;
use crate::error::{ConciergeError, Result};
use crate::models::{ChunkMetadata, KnowledgeDocument};

/// Separators tried in order: paragraphs, lines, sentences, words, characters.
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// A chunk of a document's text, before ids and embeddings are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Recursive character splitter.
///
/// Lengths are counted in chars. Text is split on the first separator it
/// contains, keeping the separator at the start of the following piece.
/// Pieces shorter than `chunk_size` are merged greedily, carrying up to
/// `chunk_overlap` chars of trailing context into the next chunk; longer
/// pieces are split again with the remaining separators.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(config: &ProcessingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(ConciergeError::Validation(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(ConciergeError::Validation(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }

        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk every document. Documents no longer than `chunk_size` pass
    /// through whole as a single chunk.
    pub fn chunk_documents(&self, documents: &[KnowledgeDocument]) -> Vec<TextChunk> {
        let mut chunks = Vec::new();

        for document in documents {
            let pieces = if char_len(&document.text) > self.chunk_size {
                self.split_text(&document.text)
            } else {
                vec![document.text.clone()]
            };

            let total_chunks = pieces.len();
            chunks.extend(pieces.into_iter().enumerate().map(|(chunk_index, content)| {
                TextChunk {
                    content,
                    metadata: ChunkMetadata {
                        document: document.metadata.clone(),
                        chunk_index,
                        total_chunks,
                    },
                }
            }));
        }

        chunks
    }

    /// Split text into trimmed, non-empty chunks of at most `chunk_size`
    /// chars, except where a single indivisible piece is longer.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &DEFAULT_SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut good: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                chunks.extend(self.merge_pieces(&good));
                good.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good.is_empty() {
            chunks.extend(self.merge_pieces(&good));
        }

        chunks
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_trimmed(&window) {
                    merged.push(chunk);
                }
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    total -= char_len(window[0]);
                    window.remove(0);
                }
            }
            window.push(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&window) {
            merged.push(chunk);
        }

        merged
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        let config = ProcessingConfig::default();
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join_trimmed(pieces: &[&str]) -> Option<String> {
    let joined = pieces.concat();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split on `separator`, attaching each separator to the piece after it.
/// The empty separator splits into single chars. Empty pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect()
}
