mod chunker;
mod ingest;
pub mod loader;

pub use chunker::{TextChunk, TextChunker, DEFAULT_SEPARATORS};
pub use ingest::{resolve_data_dir, IngestPipeline, IngestReport, OPERATIONS_FILE};
