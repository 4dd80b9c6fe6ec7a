//! Types for question-answering outcomes.

use serde::Serialize;
use serde_json::Value;

/// Answer text shown while a request is in flight.
pub const PLACEHOLDER: &str = "Thinking…";

/// A supporting snippet returned alongside an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    /// The entry's `text` field, when it is a non-empty string
    text: Option<String>,
    /// The entry exactly as returned by the service
    raw: Value,
}

impl Source {
    /// Wraps one entry of the `sources` array.
    pub fn from_value(raw: Value) -> Self {
        let text = raw
            .get("text")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { text, raw }
    }

    /// Returns the snippet text, if the entry carried one.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the entry as returned by the service.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the text shown for this source: the snippet, else the whole entry as JSON.
    pub fn display_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.raw.to_string(),
        }
    }
}

/// One rendered entry of the sources region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlock {
    /// Zero-based position in the `sources` array
    pub index: usize,
    pub text: String,
}

impl std::fmt::Display for SourceBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.index, self.text)
    }
}

/// Outcome of one request cycle. Exactly one is produced per submitted query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerResult {
    /// 2xx with a JSON body
    Success {
        /// Resolved answer text (the `answer` field or the pretty-printed body)
        answer: String,
        sources: Vec<Source>,
    },
    /// The service answered with a non-2xx status
    HttpError {
        status_code: u16,
        status_text: String,
        raw_body: String,
    },
    /// 2xx whose body is not JSON
    MalformedResponse { raw_body: String },
    /// The request never produced a response
    NetworkError { message: String },
}

/// Discriminant of an `AnswerResult`, used for logging and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    HttpError,
    MalformedResponse,
    NetworkError,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::HttpError => write!(f, "http_error"),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::NetworkError => write!(f, "network_error"),
        }
    }
}

impl AnswerResult {
    /// Returns the variant discriminant.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::HttpError { .. } => OutcomeKind::HttpError,
            Self::MalformedResponse { .. } => OutcomeKind::MalformedResponse,
            Self::NetworkError { .. } => OutcomeKind::NetworkError,
        }
    }

    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the text written to the answer region for this outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use qask::AnswerResult;
    ///
    /// let result = AnswerResult::MalformedResponse { raw_body: "not json".to_string() };
    /// assert_eq!(result.display_text(), "not json");
    ///
    /// let result = AnswerResult::NetworkError { message: "connection refused".to_string() };
    /// assert_eq!(result.display_text(), "Fetch/network error: connection refused");
    /// ```
    pub fn display_text(&self) -> String {
        match self {
            Self::Success { answer, .. } => answer.clone(),
            Self::HttpError {
                status_code,
                status_text,
                raw_body,
            } => format!("HTTP {status_code} {status_text}\n\n{raw_body}"),
            Self::MalformedResponse { raw_body } => raw_body.clone(),
            Self::NetworkError { message } => format!("Fetch/network error: {message}"),
        }
    }

    /// Returns one block per source, in input order. Empty for failure outcomes.
    pub fn source_blocks(&self) -> Vec<SourceBlock> {
        match self {
            Self::Success { sources, .. } => sources
                .iter()
                .enumerate()
                .map(|(index, source)| SourceBlock {
                    index,
                    text: source.display_text(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
