use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::api::response::ApiError;

/// `axum::Json` whose rejections use the `{"detail"}` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            match extract_missing_field(&message) {
                Some(field) => ApiError::bad_request(format!("Missing required field: {field}")),
                None => ApiError::bad_request(format!("Invalid request body: {message}")),
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::bad_request(format!("Malformed JSON: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::bad_request("Missing `Content-Type: application/json` header")
        }
        JsonRejection::BytesRejection(err) => ApiError::new(err.status(), err.body_text()),
        other => ApiError::new(other.status(), other.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
