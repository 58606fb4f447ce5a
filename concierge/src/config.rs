use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// First non-empty value among `vars`.
fn env_first(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: Option<LlmConfig>,
    pub processing: ProcessingConfig,
    pub retrieval: RetrievalConfig,
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub dimensions: usize,
    pub batch_size: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Sampling temperature for guest-facing answers.
    pub temperature: f32,
    /// Completion cap for guest-facing answers.
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("CONCIERGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("CONCIERGE_PORT", 8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:concierge.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            embeddings: EmbeddingsConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "openrouter/openai/text-embedding-ada-002".to_string()),
                dimensions: parse_env_or("EMBEDDING_DIMENSIONS", 1536),
                batch_size: parse_env_or("EMBEDDING_BATCH_SIZE", 64),
                api_key: env_first(&["EMBEDDING_API_KEY", "OPENROUTER_API_KEY"]),
                base_url: env::var("EMBEDDING_BASE_URL").ok(),
                timeout_secs: parse_env_or("EMBEDDING_TIMEOUT", 30),
                max_retries: parse_env_or("EMBEDDING_MAX_RETRIES", 0),
            },
            llm: {
                let model = env::var("LLM_MODEL")
                    .unwrap_or_else(|_| "openrouter/nvidia/nemotron-3-nano-30b-a3b:free".to_string());
                Some(LlmConfig {
                    model,
                    api_key: env_first(&["LLM_API_KEY", "OPENROUTER_API_KEY"]),
                    base_url: env::var("LLM_BASE_URL").ok(),
                    timeout_secs: parse_env_or("LLM_TIMEOUT", 60),
                    max_retries: parse_env_or("LLM_MAX_RETRIES", 0),
                    temperature: parse_env_or("LLM_TEMPERATURE", 0.3),
                    max_tokens: parse_env_or("LLM_MAX_TOKENS", 500),
                })
            },
            processing: ProcessingConfig {
                chunk_size: parse_env_or("CHUNK_SIZE", 500),
                chunk_overlap: parse_env_or("CHUNK_OVERLAP", 50),
            },
            retrieval: RetrievalConfig {
                top_k: parse_env_or("RETRIEVAL_TOP_K", 4),
            },
            ingestion: IngestionConfig {
                data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if parse_env_opt::<bool>("LLM_DISABLED").unwrap_or(false) {
            config.llm = None;
        }
        config
    }
}

/// Known embedding providers that use OpenAI-compatible APIs
const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio", "local"];

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        // Check if prefix is a known provider
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to local provider
    ("local", model)
}

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_processing_defaults() {
        std::env::remove_var("CHUNK_SIZE");
        std::env::remove_var("CHUNK_OVERLAP");

        let config = Config::default();
        assert_eq!(config.processing.chunk_size, 500);
        assert_eq!(config.processing.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    #[serial]
    fn test_llm_defaults() {
        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_TEMPERATURE");
        std::env::remove_var("LLM_MAX_TOKENS");
        std::env::remove_var("LLM_MAX_RETRIES");

        let config = Config::default();
        let llm = config.llm.expect("llm config present by default");
        assert!(llm.model.starts_with("openrouter/"));
        assert_eq!(llm.temperature, 0.3);
        assert_eq!(llm.max_tokens, 500);
        assert_eq!(llm.max_retries, 0);
    }

    #[test]
    #[serial]
    fn test_llm_disabled_from_env() {
        std::env::set_var("LLM_DISABLED", "true");
        let config = Config::from_env();
        assert!(config.llm.is_none());
        std::env::remove_var("LLM_DISABLED");
    }

    #[test]
    #[serial]
    fn test_openrouter_key_shared_by_both_clients() {
        std::env::remove_var("LLM_API_KEY");
        std::env::remove_var("EMBEDDING_API_KEY");
        std::env::set_var("OPENROUTER_API_KEY", "sk-or-test");

        let config = Config::default();
        assert_eq!(config.embeddings.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(
            config.llm.and_then(|l| l.api_key).as_deref(),
            Some("sk-or-test")
        );

        std::env::remove_var("OPENROUTER_API_KEY");
    }

    #[test]
    #[serial]
    fn test_specific_key_wins_over_openrouter_key() {
        std::env::set_var("OPENROUTER_API_KEY", "sk-or-test");
        std::env::set_var("EMBEDDING_API_KEY", "sk-embed");

        let config = Config::default();
        assert_eq!(config.embeddings.api_key.as_deref(), Some("sk-embed"));

        std::env::remove_var("OPENROUTER_API_KEY");
        std::env::remove_var("EMBEDDING_API_KEY");
    }

    #[test]
    #[serial]
    fn test_parse_env_or_invalid_value_uses_default() {
        std::env::set_var("__TEST_PARSE_PORT", "not-a-port");
        let result: u16 = parse_env_or("__TEST_PARSE_PORT", 8000);
        assert_eq!(result, 8000);
        std::env::remove_var("__TEST_PARSE_PORT");
    }

    #[test]
    fn test_parse_provider_model() {
        assert_eq!(
            parse_provider_model("openrouter/openai/text-embedding-ada-002"),
            ("openrouter", "openai/text-embedding-ada-002")
        );
        assert_eq!(
            parse_provider_model("BAAI/bge-small-en-v1.5"),
            ("local", "BAAI/bge-small-en-v1.5")
        );
        assert_eq!(
            parse_llm_provider_model("openrouter/nvidia/nemotron-3-nano-30b-a3b:free"),
            ("openrouter", "nvidia/nemotron-3-nano-30b-a3b:free")
        );
    }
}
