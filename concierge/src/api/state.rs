use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::intelligence::IntentClassifier;
use crate::llm::LlmProvider;
use crate::services::{AnswerGenerator, ChatService, KnowledgeRetriever, ReservationService};

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseBackend>,
    pub chat: ChatService,
    pub reservations: ReservationService,
}

impl AppState {
    pub fn new(
        config: &Config,
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        llm: LlmProvider,
    ) -> Self {
        let retriever =
            KnowledgeRetriever::new(db.clone(), embeddings, config.retrieval.top_k);
        let generator = AnswerGenerator::new(retriever, llm.clone());
        let chat = ChatService::new(IntentClassifier::new(llm), generator);
        let reservations = ReservationService::new(db.clone());

        Self {
            db,
            chat,
            reservations,
        }
    }
}
