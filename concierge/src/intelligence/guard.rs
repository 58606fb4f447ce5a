//! Sensitive-topic guard evaluated before any model call.

/// Lowercase substrings that make a message ineligible for an answer.
///
/// Matching is plain substring containment, so short entries such as `env`
/// also match inside longer words.
pub const BLOCKED_KEYWORDS: &[&str] = &[
    "mongodb_uri",
    "api_key",
    "openrouter",
    "env",
    "environment variable",
    "secret",
    "password",
    "credential",
    "variable d'environnement",
    "mot de passe",
    "database_url",
    "database_auth_token",
];

/// First blocked keyword contained in `message`, ignoring case.
pub fn blocked_keyword(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    BLOCKED_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lower.contains(keyword))
}
