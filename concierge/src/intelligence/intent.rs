use crate::llm::{prompts, LlmProvider};
use crate::models::Intent;

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The model answered with one of the six labels.
    Recognized(Intent),
    /// The model answered, but not with a known label.
    Unrecognized(String),
    /// The call itself failed.
    Failed(String),
}

impl Classification {
    /// Intent used for dispatch. Anything but a recognised label is `Unknown`.
    pub fn intent(&self) -> Intent {
        match self {
            Classification::Recognized(intent) => *intent,
            Classification::Unrecognized(_) | Classification::Failed(_) => Intent::Unknown,
        }
    }

    /// Parse raw model output into a classification.
    pub fn from_response(raw: &str) -> Self {
        match Intent::from_label(raw) {
            Some(intent) => Classification::Recognized(intent),
            None => Classification::Unrecognized(raw.trim().to_string()),
        }
    }
}

/// LLM-backed intent classifier. One completion call per message, no retry.
#[derive(Clone)]
pub struct IntentClassifier {
    llm: LlmProvider,
}

impl IntentClassifier {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    pub async fn classify(&self, message: &str) -> Classification {
        let prompt = prompts::intent_classification_prompt(message);

        match self.llm.complete(&prompt, None).await {
            Ok(response) => {
                let classification = Classification::from_response(&response);
                if let Classification::Unrecognized(ref raw) = classification {
                    tracing::debug!(raw = %raw, "Classifier returned an unknown label");
                }
                classification
            }
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification failed, treating as unknown");
                Classification::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_normalization() {
        assert_eq!(
            Classification::from_response(" Cancel Reservation \n"),
            Classification::Recognized(Intent::CancelReservation)
        );
        assert_eq!(
            Classification::from_response("hotel_information"),
            Classification::Recognized(Intent::HotelInformation)
        );
    }

    #[test]
    fn test_unrecognized_and_failed_fall_back_to_unknown() {
        let unrecognized = Classification::from_response("intent: booking");
        assert_eq!(
            unrecognized,
            Classification::Unrecognized("intent: booking".to_string())
        );
        assert_eq!(unrecognized.intent(), Intent::Unknown);
        assert_eq!(Classification::from_response("").intent(), Intent::Unknown);
        assert_eq!(
            Classification::Failed("timeout".to_string()).intent(),
            Intent::Unknown
        );
    }

    #[test]
    fn test_blocked_is_never_a_classifier_label() {
        assert!(matches!(
            Classification::from_response("blocked"),
            Classification::Unrecognized(_)
        ));
    }

    #[tokio::test]
    async fn test_unavailable_model_yields_failed() {
        let classifier = IntentClassifier::new(LlmProvider::unavailable("disabled"));
        let classification = classifier.classify("Bonjour").await;
        assert!(matches!(classification, Classification::Failed(reason) if reason.contains("disabled")));
    }
}
