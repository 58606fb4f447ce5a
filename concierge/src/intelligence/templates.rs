//! Fixed French responses and source labelling.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ChunkMetadata, RetrievedChunk};

pub const AVAILABILITY_RESPONSE: &str = "📅 **Disponibilités à l'Hôtel So'Co**\n\n\
Nous avons plusieurs options pour votre séjour ! Voici nos catégories :\n\
• **Standard** (89€) : Idéal pour un court séjour chic.\n\
• **Supérieure** (115€) : Plus d'espace et de confort.\n\
• **Familiale** (145€) : Parfaite pour les tribus.\n\n\
J'ai ouvert le **formulaire interactif** juste en dessous pour que vous puissiez calculer le prix exact avec vos dates et ajouter nos services exclusifs (Petit-déjeuner bio, Parking, Spa).";

pub const RESERVATION_RESPONSE: &str = "Je serais enchanté de vous aider à réserver une chambre ! \
Pour procéder, j'aurais besoin des informations suivantes :\n\n\
1. **Nom complet** pour la réservation\n\
2. **Date d'arrivée**\n\
3. **Date de départ**\n\
4. **Type de chambre** (Standard, Supérieure ou Familiale)\n\
5. **Nombre de personnes**\n\
6. **Email ou téléphone de contact**\n\n\
Veuillez me fournir ces informations et je préparerai votre demande de réservation. \
Note : La confirmation finale et le paiement seront traités à l'arrivée ou via un lien de paiement sécurisé.";

pub const CANCELLATION_POLICY_RESPONSE: &str = "Je peux vous aider avec l'annulation. \
Veuillez noter notre politique d'annulation :\n\n\
• **Annulation gratuite** : Jusqu'à 48 heures avant l'arrivée\n\
• **Annulation tardive** (moins de 48 heures) : Frais d'une nuit\n\n\
Pour traiter votre annulation, je vais vous mettre en contact avec notre équipe \
qui vérifiera votre réservation et confirmera l'annulation. \
Souhaitez-vous que je procède ?";

pub const CANCELLATION_DETAILS_RESPONSE: &str = "Je serais heureux de vous aider à annuler une réservation. \
Pourriez-vous me fournir l'une des informations suivantes :\n\n\
• Votre **numéro de confirmation** (ex: SC-20260110-001)\n\
• L'**adresse email** utilisée pour la réservation\n\n\
Une fois ces informations reçues, je pourrai rechercher votre réservation.";

pub const HUMAN_HANDOFF_RESPONSE: &str = "Je comprends tout à fait. Permettez-moi de vous mettre en contact avec un membre de notre équipe.\n\n\
**Options de contact :**\n\
• 📞 Réception : Disponible 24h/24 et 7j/7\n\
• 📍 Adresse : 27 Avenue Thiers, 06000 Nice\n\
• 💬 Chat en direct : Un membre de l'équipe sera bientôt avec vous\n\n\
Si vous êtes actuellement à l'hôtel, vous pouvez composer le 0 depuis le téléphone de votre chambre \
pour une assistance immédiate.\n\n\
Y a-t-il autre chose que je puisse faire pour vous en attendant (réservation de spa, informations touristiques) ?";

pub const BLOCKED_RESPONSE: &str = "Je suis désolé, mais je ne peux pas partager ce type d'information. \
Puis-je vous aider avec autre chose concernant votre séjour ?";

/// Served when generation returns nothing or fails.
pub const FALLBACK_ANSWER: &str = "Je n'ai pas cette information spécifique. \
Souhaitez-vous que je vous mette en contact avec notre réception ?";

pub const AVAILABILITY_SOURCE: &str = "Disponibilité des chambres";
pub const RESERVATION_SOURCE: &str = "Processus de réservation";
pub const CANCELLATION_SOURCE: &str = "Politique d'annulation";
pub const CONTACT_SOURCE: &str = "Informations de contact";

pub const MAX_SOURCES: usize = 3;

/// Phrases meaning the model admitted it had no answer.
const NO_ANSWER_MARKERS: &[&str] = &["n'ai pas", "je ne sais pas"];

fn confirmation_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z]{2,3}-?\d{4,8}").expect("valid regex"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid regex"))
}

/// Whether a cancellation message already identifies the booking, by
/// confirmation number or by email.
pub fn identifies_booking(message: &str) -> bool {
    confirmation_number_pattern().is_match(&message.to_uppercase())
        || email_pattern().is_match(message)
}

pub fn cancellation_response(message: &str) -> &'static str {
    if identifies_booking(message) {
        CANCELLATION_POLICY_RESPONSE
    } else {
        CANCELLATION_DETAILS_RESPONSE
    }
}

/// Guest-facing label for a retrieved chunk.
pub fn source_label(metadata: &ChunkMetadata) -> String {
    let doc_type = metadata.document.doc_type.as_str();
    let label = match doc_type {
        "policy" => Some("Politique"),
        "service" => Some("Service"),
        "room" => Some("Chambre"),
        "location" => Some("Localisation"),
        "contact" => Some("Contact"),
        "hotel" => Some("Hôtel"),
        _ => None,
    };

    match label {
        Some(label) => {
            let category = metadata.document.category.as_deref().unwrap_or_default();
            format!("{label}: {category}")
        }
        None if doc_type.is_empty() => "General".to_string(),
        None => crate::models::capitalize(doc_type),
    }
}

/// Labels for the retrieved chunks, in retrieval order, deduplicated and
/// capped at [`MAX_SOURCES`]. Empty when the answer admits it has no answer.
pub fn collect_sources(answer: &str, chunks: &[RetrievedChunk]) -> Vec<String> {
    let lower = answer.to_lowercase();
    if NO_ANSWER_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return Vec::new();
    }

    let mut sources: Vec<String> = Vec::new();
    for chunk in chunks {
        let label = source_label(&chunk.metadata);
        if !label.is_empty() && !sources.contains(&label) {
            sources.push(label);
        }
    }
    sources.truncate(MAX_SOURCES);
    sources
}

/// Strip sentence markers some models leak and fall back when nothing is left.
pub fn clean_answer(raw: &str) -> String {
    let cleaned = raw.replace("<s>", "").replace("</s>", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_ANSWER.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentMetadata;
    use pretty_assertions::assert_eq;

    fn chunk(doc_type: &str, category: Option<&str>) -> RetrievedChunk {
        RetrievedChunk {
            id: "c".to_string(),
            text: "texte".to_string(),
            metadata: ChunkMetadata {
                document: DocumentMetadata {
                    id: None,
                    doc_type: doc_type.to_string(),
                    category: category.map(str::to_string),
                    title: None,
                    source: "hotel_knowledge".to_string(),
                },
                chunk_index: 0,
                total_chunks: 1,
            },
            score: 0.9,
        }
    }

    #[test]
    fn test_cancellation_with_confirmation_number() {
        assert_eq!(
            cancellation_response("Je veux annuler sc-20260110-001"),
            CANCELLATION_POLICY_RESPONSE
        );
        assert_eq!(
            cancellation_response("Annuler la réservation ABC12345"),
            CANCELLATION_POLICY_RESPONSE
        );
        assert!(cancellation_response("annulation SC-20260110").contains("mettre en contact"));
    }

    #[test]
    fn test_cancellation_with_email() {
        assert!(
            cancellation_response("Annulez pour marie.dupont@example.fr")
                .contains("mettre en contact")
        );
    }

    #[test]
    fn test_cancellation_without_identifier_asks_for_details() {
        let response = cancellation_response("Je veux annuler ma réservation");
        assert!(response.contains("fournir l'une des informations"));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(source_label(&chunk("policy", Some("cancellation")).metadata), "Politique: cancellation");
        assert_eq!(source_label(&chunk("hotel", Some("general")).metadata), "Hôtel: general");
        assert_eq!(source_label(&chunk("room", None).metadata), "Chambre: ");
        assert_eq!(source_label(&chunk("faq", Some("x")).metadata), "Faq");
        assert_eq!(source_label(&chunk("", None).metadata), "General");
    }

    #[test]
    fn test_sources_deduplicated_and_capped() {
        let chunks = vec![
            chunk("policy", Some("pets")),
            chunk("policy", Some("pets")),
            chunk("service", Some("spa")),
            chunk("room", Some("standard")),
            chunk("location", Some("beach")),
        ];
        assert_eq!(
            collect_sources("Les animaux sont acceptés.", &chunks),
            vec!["Politique: pets", "Service: spa", "Chambre: standard"]
        );
    }

    #[test]
    fn test_sources_dropped_when_answer_admits_ignorance() {
        let chunks = vec![chunk("policy", Some("pets"))];
        assert!(collect_sources(FALLBACK_ANSWER, &chunks).is_empty());
        assert!(collect_sources("Je ne sais pas, désolé.", &chunks).is_empty());
    }

    #[test]
    fn test_clean_answer() {
        assert_eq!(clean_answer("<s> Bonjour ! </s>\n"), "Bonjour !");
        assert_eq!(clean_answer("<s></s>  "), FALLBACK_ANSWER);
        assert_eq!(clean_answer(""), FALLBACK_ANSWER);
    }

    #[test]
    fn test_fixed_texts() {
        assert!(AVAILABILITY_RESPONSE.contains("**Standard** (89€)"));
        assert!(RESERVATION_RESPONSE.contains("6. **Email ou téléphone de contact**"));
        assert!(HUMAN_HANDOFF_RESPONSE.contains("27 Avenue Thiers, 06000 Nice"));
        assert!(FALLBACK_ANSWER.contains("n'ai pas"));
    }
}
