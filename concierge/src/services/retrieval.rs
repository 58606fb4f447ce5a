use std::sync::Arc;
use std::time::Instant;

use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::intelligence::templates;
use crate::llm::{prompts, LlmProvider};
use crate::models::{ChatOutcome, ChatResult, Intent, RetrievedChunk};

/// Nearest-neighbour lookup over the knowledge store.
#[derive(Clone)]
pub struct KnowledgeRetriever {
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
    top_k: u32,
}

impl KnowledgeRetriever {
    pub fn new(db: Arc<dyn DatabaseBackend>, embeddings: EmbeddingProvider, top_k: u32) -> Self {
        Self {
            db,
            embeddings,
            top_k: top_k.max(1),
        }
    }

    /// The `top_k` chunks closest to `query`, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        let start = Instant::now();
        let embedding = self.embeddings.embed_query(query).await?;
        let chunks = self.db.search_knowledge(&embedding, self.top_k).await?;

        tracing::debug!(
            found = chunks.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "Retrieved knowledge chunks"
        );
        Ok(chunks)
    }
}

/// Retrieval-augmented answers for information questions.
#[derive(Clone)]
pub struct AnswerGenerator {
    retriever: KnowledgeRetriever,
    llm: LlmProvider,
}

impl AnswerGenerator {
    pub fn new(retriever: KnowledgeRetriever, llm: LlmProvider) -> Self {
        Self { retriever, llm }
    }

    /// Answer `question` from stored knowledge, reporting the result as
    /// `intent`.
    ///
    /// Never fails: a retrieval error yields the fallback answer with a
    /// `RetrievalFailed` outcome, a completion error the fallback answer
    /// with a `GenerationFailed` outcome.
    pub async fn answer(&self, question: &str, intent: Intent) -> ChatResult {
        let chunks = match self.retriever.retrieve(question).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::error!(error = %e, "Knowledge retrieval failed");
                return Self::fallback(intent).with_outcome(ChatOutcome::RetrievalFailed {
                    reason: e.to_string(),
                });
            }
        };

        let context = format_context(&chunks);
        let prompt = prompts::grounded_question_prompt(&context, question);

        let (answer, outcome) = match self
            .llm
            .complete(&prompt, Some(prompts::CONCIERGE_SYSTEM_PROMPT))
            .await
        {
            Ok(raw) => (templates::clean_answer(&raw), ChatOutcome::Answered),
            Err(e) => {
                tracing::warn!(error = %e, "Answer generation failed, serving fallback");
                (
                    templates::FALLBACK_ANSWER.to_string(),
                    ChatOutcome::GenerationFailed {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let sources = templates::collect_sources(&answer, &chunks);

        ChatResult {
            answer,
            intent,
            sources,
            requires_action: false,
            outcome,
        }
    }

    fn fallback(intent: Intent) -> ChatResult {
        ChatResult {
            answer: templates::FALLBACK_ANSWER.to_string(),
            intent,
            sources: Vec::new(),
            requires_action: false,
            outcome: ChatOutcome::Answered,
        }
    }
}

/// Retrieved chunk texts separated by blank lines.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
