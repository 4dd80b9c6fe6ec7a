//! Interpretation of raw `/qa` responses.

use std::error::Error;

use serde_json::Value;

use crate::endpoint::{QaError, RawResponse};

use super::types::{AnswerResult, Source};

impl AnswerResult {
    /// Classifies one request attempt.
    ///
    /// Transport failures become `NetworkError`; non-2xx statuses become `HttpError`
    /// without looking at the body; 2xx bodies are handed to [`AnswerResult::from_body`].
    pub fn from_response(response: Result<RawResponse, QaError>) -> Self {
        match response {
            Err(error) => Self::NetworkError {
                message: network_message(&error),
            },
            Ok(raw) if !raw.is_success() => Self::HttpError {
                status_code: raw.status,
                status_text: raw.status_text,
                raw_body: raw.body,
            },
            Ok(raw) => Self::from_body(raw.body),
        }
    }

    /// Interprets a 2xx body: JSON gives `Success`, anything else `MalformedResponse`.
    pub fn from_body(body: String) -> Self {
        let document: Value = match serde_json::from_str(&body) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(error = %e, "response body is not JSON");
                return Self::MalformedResponse { raw_body: body };
            }
        };

        Self::Success {
            answer: answer_text(&document),
            sources: sources(&document),
        }
    }
}

/// Resolves the answer region text for a parsed document.
fn answer_text(document: &Value) -> String {
    match document.get("answer") {
        Some(Value::String(answer)) if !answer.is_empty() => answer.clone(),
        Some(answer) if !answer.is_string() && is_truthy(answer) => answer.to_string(),
        _ => serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string()),
    }
}

/// Collects the `sources` array; anything else counts as no sources.
fn sources(document: &Value) -> Vec<Source> {
    match document.get("sources") {
        Some(Value::Array(entries)) => entries.iter().cloned().map(Source::from_value).collect(),
        Some(other) if is_truthy(other) => {
            tracing::warn!(sources = %other, "ignoring non-array sources field");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn network_message(error: &QaError) -> String {
    match error {
        // The variant's own message only repeats the wrapped error
        QaError::Network(inner) | QaError::Timeout(inner) => describe_error(inner),
        other => describe_error(other),
    }
}

/// Formats an error and its source chain as `outer: inner: root`.
///
/// Messages already contained in the previous link are skipped.
pub fn describe_error(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut last = message.clone();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !last.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        last = text;
        source = cause.source();
    }

    message
}
