use std::time::Instant;

use crate::intelligence::{guard, templates, Classification, IntentClassifier};
use crate::models::{ChatOutcome, ChatResult, Intent};

use super::retrieval::AnswerGenerator;

/// Routes each guest message to exactly one handler.
///
/// Blocked messages are refused before any model call. Everything else is
/// classified once and dispatched once on the resulting intent.
#[derive(Clone)]
pub struct ChatService {
    classifier: IntentClassifier,
    generator: AnswerGenerator,
}

impl ChatService {
    pub fn new(classifier: IntentClassifier, generator: AnswerGenerator) -> Self {
        Self {
            classifier,
            generator,
        }
    }

    pub async fn ask(&self, question: &str) -> ChatResult {
        let start = Instant::now();

        if let Some(keyword) = guard::blocked_keyword(question) {
            tracing::warn!(keyword, "Blocked message on a sensitive topic");
            return blocked_result();
        }

        let classification = self.classifier.classify(question).await;
        let intent = classification.intent();
        tracing::info!(%intent, "Classified guest message");

        let mut result = self.dispatch(intent, question).await;

        if let Classification::Failed(reason) = classification {
            if result.outcome.is_answered() {
                result.outcome = ChatOutcome::ClassificationFailed { reason };
            }
        }

        tracing::info!(
            intent = %result.intent,
            sources = result.sources.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "Answered guest message"
        );
        result
    }

    async fn dispatch(&self, intent: Intent, question: &str) -> ChatResult {
        match intent {
            Intent::CheckAvailability => ChatResult::canned(
                templates::AVAILABILITY_RESPONSE,
                intent,
                templates::AVAILABILITY_SOURCE,
            ),
            Intent::MakeReservation => ChatResult::canned(
                templates::RESERVATION_RESPONSE,
                intent,
                templates::RESERVATION_SOURCE,
            ),
            Intent::CancelReservation => ChatResult::canned(
                templates::cancellation_response(question),
                intent,
                templates::CANCELLATION_SOURCE,
            ),
            Intent::TalkToHuman => ChatResult::canned(
                templates::HUMAN_HANDOFF_RESPONSE,
                intent,
                templates::CONTACT_SOURCE,
            ),
            Intent::HotelInformation | Intent::Unknown => {
                self.generator.answer(question, intent).await
            }
            Intent::Blocked => blocked_result(),
        }
    }
}

fn blocked_result() -> ChatResult {
    ChatResult {
        answer: templates::BLOCKED_RESPONSE.to_string(),
        intent: Intent::Blocked,
        sources: Vec::new(),
        requires_action: false,
        outcome: ChatOutcome::Answered,
    }
}
