//! libSQL storage: knowledge vectors, operational records and metadata.

pub mod backends;
mod connection;
mod metadata;
pub mod repository;
mod schema;
pub mod traits;

pub use backends::libsql::LibSqlBackend;
pub use connection::Database;
pub use metadata::MetadataRepository;
pub use traits::*;
