//! Tests for the OpenAI-compatible embeddings client and provider.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::embeddings::api::{default_base_url, ApiConfig, EmbeddingApiClient};
use crate::embeddings::EmbeddingProvider;
use crate::error::ConciergeError;

fn test_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-api-key".to_string()),
        model: "openai/text-embedding-ada-002".to_string(),
        timeout_secs: 10,
        max_retries: 2,
    }
}

fn provider_config(base_url: &str, dimensions: usize, batch_size: usize) -> EmbeddingsConfig {
    EmbeddingsConfig {
        model: "openrouter/openai/text-embedding-ada-002".to_string(),
        dimensions,
        batch_size,
        api_key: Some("test-api-key".to_string()),
        base_url: Some(base_url.to_string()),
        timeout_secs: 10,
        max_retries: 0,
    }
}

fn embedding_response(embeddings: Vec<Vec<f32>>) -> serde_json::Value {
    json!({
        "object": "list",
        "data": embeddings
            .into_iter()
            .enumerate()
            .map(|(i, e)| json!({ "object": "embedding", "index": i, "embedding": e }))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn test_request_format_and_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(json!({
            "model": "openai/text-embedding-ada-002",
            "input": ["Où se trouve l'hôtel ?"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.1, 0.2, 0.3]])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let embeddings = client.embed(&["Où se trouve l'hôtel ?"]).await.unwrap();

    assert_eq!(embeddings, vec![vec![0.1, 0.2, 0.3]]);
}

#[tokio::test]
async fn test_out_of_order_response_is_reordered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "index": 1, "embedding": [0.4, 0.5] },
                { "index": 0, "embedding": [0.1, 0.2] }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let embeddings = client.embed(&["un", "deux"]).await.unwrap();

    assert_eq!(embeddings, vec![vec![0.1, 0.2], vec![0.4, 0.5]]);
}

#[tokio::test]
async fn test_missing_embeddings_are_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.1, 0.2]])),
        )
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let result = client.embed(&["un", "deux"]).await;

    assert!(matches!(result, Err(ConciergeError::Embedding(_))));
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.7, 0.8]])),
        )
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let embeddings = client.embed(&["spa"]).await.unwrap();

    assert_eq!(embeddings, vec![vec![0.7, 0.8]]);
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let result = client.embed(&["spa"]).await;

    assert!(matches!(
        result,
        Err(ConciergeError::ApiRateLimit {
            retry_after: Some(7)
        })
    ));
}

#[tokio::test]
async fn test_auth_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(test_config(&mock_server.uri())).unwrap();
    let result = client.embed(&["spa"]).await;

    assert!(matches!(result, Err(ConciergeError::ApiAuth(body)) if body == "invalid key"));
}

#[tokio::test]
async fn test_provider_batches_passages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_json(json!({
            "model": "openai/text-embedding-ada-002",
            "input": ["a", "b"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(embedding_response(vec![vec![1.0, 0.0], vec![0.0, 1.0]])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_json(json!({
            "model": "openai/text-embedding-ada-002",
            "input": ["c"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.5, 0.5]])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = EmbeddingProvider::new(&provider_config(&mock_server.uri(), 2, 2)).unwrap();
    let embeddings = provider
        .embed_passages(vec!["a".into(), "b".into(), "c".into()])
        .await
        .unwrap();

    assert_eq!(
        embeddings,
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]]
    );
}

#[tokio::test]
async fn test_provider_rejects_wrong_dimensions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.1, 0.2, 0.3]])),
        )
        .mount(&mock_server)
        .await;

    let provider = EmbeddingProvider::new(&provider_config(&mock_server.uri(), 4, 8)).unwrap();
    let result = provider.embed_query("parking").await;

    assert!(matches!(result, Err(ConciergeError::Embedding(msg)) if msg.contains("expected 4")));
    assert_eq!(provider.dimensions(), 4);
}

#[test]
fn test_provider_model_parsing() {
    assert_eq!(
        parse_provider_model("openrouter/openai/text-embedding-ada-002"),
        ("openrouter", "openai/text-embedding-ada-002")
    );
    assert_eq!(
        parse_provider_model("local/BAAI/bge-small-en-v1.5"),
        ("local", "BAAI/bge-small-en-v1.5")
    );
    assert_eq!(parse_provider_model("bge-small-en-v1.5"), ("local", "bge-small-en-v1.5"));
}

#[test]
fn test_default_base_urls() {
    assert_eq!(default_base_url("openrouter"), "https://openrouter.ai/api/v1");
    assert_eq!(default_base_url("OpenAI"), "https://api.openai.com/v1");
    assert_eq!(default_base_url("ollama"), "http://localhost:11434/v1");
}
