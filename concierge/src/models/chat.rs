use serde::Serialize;

use super::Intent;

/// How a chat request was served.
///
/// Recoverable failures are reported here instead of being folded into an
/// ordinary answer, so callers can tell "classified as unknown" apart from
/// "classification failed and fell back to unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatOutcome {
    Answered,
    /// The classifier call failed; the message was handled as `unknown`.
    ClassificationFailed { reason: String },
    /// Embedding the question or searching the knowledge store failed.
    RetrievalFailed { reason: String },
    /// The completion call failed; the fallback answer was served.
    GenerationFailed { reason: String },
}

impl ChatOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered)
    }
}

/// Result of handling one guest message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub answer: String,
    pub intent: Intent,
    /// Source labels, deduplicated, at most three.
    pub sources: Vec<String>,
    pub requires_action: bool,
    pub outcome: ChatOutcome,
}

impl ChatResult {
    pub fn canned(answer: impl Into<String>, intent: Intent, source: &str) -> Self {
        Self {
            answer: answer.into(),
            intent,
            sources: vec![source.to_string()],
            requires_action: true,
            outcome: ChatOutcome::Answered,
        }
    }

    pub fn with_outcome(mut self, outcome: ChatOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}
