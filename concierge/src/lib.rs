//! Customer-support chatbot for the Hôtel So'Co.
//!
//! Guest messages are screened, classified into an intent and answered
//! either from fixed templates or by retrieval-augmented generation over
//! hotel knowledge stored in libSQL.

pub mod api;
pub mod config;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod intelligence;
pub mod llm;
pub mod migration;
pub mod models;
pub mod processing;
pub mod services;
