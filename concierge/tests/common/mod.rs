#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use concierge::api::{create_router, AppState};
use concierge::config::{
    Config, DatabaseConfig, EmbeddingsConfig, IngestionConfig, LlmConfig, ProcessingConfig,
    RetrievalConfig, ServerConfig,
};
use concierge::db::{Database, DatabaseBackend, LibSqlBackend};
use concierge::embeddings::EmbeddingProvider;
use concierge::llm::LlmProvider;

pub const DIMS: usize = 3;

static INIT: Once = Once::new();

pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("concierge=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic 3-d embedding: one axis per topic the fixtures talk about.
pub fn topic_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    if lower.contains("animaux") || lower.contains("chien") {
        vec![1.0, 0.0, 0.0]
    } else if lower.contains("spa") || lower.contains("massage") {
        vec![0.0, 1.0, 0.0]
    } else {
        vec![0.0, 0.0, 1.0]
    }
}

pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ],
        "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
    })
}

pub fn api_error_body(message: &str) -> Value {
    json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "param": Value::Null,
            "code": "bad_request"
        }
    })
}

/// Answer `/embeddings` with [`topic_vector`] for every input, in order.
pub async fn mount_embeddings(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(|req: &wiremock::Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or_default();
            let inputs: Vec<String> = match &body["input"] {
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect(),
                Value::String(s) => vec![s.clone()],
                _ => Vec::new(),
            };
            let data: Vec<Value> = inputs
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    json!({ "object": "embedding", "index": i, "embedding": topic_vector(text) })
                })
                .collect();
            ResponseTemplate::new(200).set_body_json(json!({ "object": "list", "data": data }))
        })
        .mount(server)
        .await;
}

/// Classifier requests are recognised by their instruction text.
pub async fn mount_classifier(server: &MockServer, label: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Classifie le message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(label)))
        .mount(server)
        .await;
}

/// Generation requests carry the retrieved context.
pub async fn mount_generator(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Contexte:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(answer)))
        .mount(server)
        .await;
}

pub fn test_config(models_uri: &str, db_path: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: format!("file:{}", db_path.display()),
            auth_token: None,
            local_path: None,
        },
        embeddings: EmbeddingsConfig {
            model: "openai/text-embedding-3-small".to_string(),
            dimensions: DIMS,
            batch_size: 2,
            api_key: Some("test-key".to_string()),
            base_url: Some(models_uri.to_string()),
            timeout_secs: 5,
            max_retries: 0,
        },
        llm: Some(LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(models_uri.to_string()),
            timeout_secs: 5,
            max_retries: 0,
            temperature: 0.3,
            max_tokens: 500,
        }),
        processing: ProcessingConfig::default(),
        retrieval: RetrievalConfig { top_k: 4 },
        ingestion: IngestionConfig {
            data_dir: "data".to_string(),
        },
    }
}

/// A router wired to `models` for embeddings and completions and to a
/// fresh libSQL file under `dir`.
pub struct TestApp {
    pub router: Router,
    pub db: Arc<dyn DatabaseBackend>,
    pub embeddings: EmbeddingProvider,
    pub config: Config,
}

impl TestApp {
    pub async fn new(models: &MockServer, dir: &TempDir) -> Self {
        init_test_logger();
        let config = test_config(&models.uri(), &dir.path().join("concierge.db"));
        let embeddings = EmbeddingProvider::new(&config.embeddings).expect("embedding provider");
        let database = Database::new(&config.database, DIMS).await.expect("database");
        let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(database));
        let llm = LlmProvider::new(config.llm.as_ref());

        let state = AppState::new(&config, db.clone(), embeddings.clone(), llm);
        Self {
            router: create_router(state),
            db,
            embeddings,
            config,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// Write a small knowledge data directory: curated knowledge, one content
/// file and the operational collections.
pub fn write_data_dir(dir: &Path) {
    std::fs::write(
        dir.join("hotel_knowledge.json"),
        json!([
            {
                "id": 1,
                "text": "Les animaux de compagnie sont acceptés moyennant 15€ par nuit.",
                "metadata": { "type": "policy", "category": "animaux" }
            },
            {
                "id": 2,
                "text": "Le spa est ouvert de 9h à 20h, massage sur réservation.",
                "metadata": { "type": "service", "category": "spa" }
            },
            {
                "id": 3,
                "text": "L'hôtel se trouve au 27 Avenue Thiers, face à la gare de Nice.",
                "metadata": { "type": "location", "category": "acces" }
            }
        ])
        .to_string(),
    )
    .unwrap();

    std::fs::create_dir_all(dir.join("content")).unwrap();
    std::fs::write(
        dir.join("content").join("faq.json"),
        json!([
            { "id": "faq-1", "title": "Check-in", "description": "Le check-in commence à 15h." }
        ])
        .to_string(),
    )
    .unwrap();

    std::fs::write(
        dir.join("mock_operations.json"),
        json!({
            "rooms": [
                { "room_id": "101", "type": "standard", "price": 89 },
                { "room_id": "201", "type": "family", "price": 145 }
            ],
            "catalog": [
                { "id": "breakfast", "name": "Petit-déjeuner bio", "price": 18 }
            ]
        })
        .to_string(),
    )
    .unwrap();
}
