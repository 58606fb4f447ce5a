use serde::{Deserialize, Serialize};

/// Purpose of a guest message.
///
/// The first six variants are the labels the classifier may produce.
/// `Blocked` is assigned locally when a message trips the sensitive-keyword
/// guard and is never returned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CheckAvailability,
    MakeReservation,
    CancelReservation,
    HotelInformation,
    TalkToHuman,
    Unknown,
    Blocked,
}

impl Intent {
    /// Labels the classifier is allowed to return, in prompt order.
    pub const CLASSIFIABLE: [Intent; 6] = [
        Intent::CheckAvailability,
        Intent::MakeReservation,
        Intent::CancelReservation,
        Intent::HotelInformation,
        Intent::TalkToHuman,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckAvailability => "check_availability",
            Self::MakeReservation => "make_reservation",
            Self::CancelReservation => "cancel_reservation",
            Self::HotelInformation => "hotel_information",
            Self::TalkToHuman => "talk_to_human",
            Self::Unknown => "unknown",
            Self::Blocked => "blocked",
        }
    }

    /// Parse a raw classifier label: trimmed, lowercased, spaces turned into
    /// underscores. Only the six classifiable labels are accepted.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace(' ', "_");
        Self::CLASSIFIABLE
            .into_iter()
            .find(|intent| intent.as_str() == normalized)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
