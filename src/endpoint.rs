/// HTTP client for the question-answering service.
///
/// This module provides the blocking client used to query `/qa`, plus the
/// `/health` and `/add` calls used by the `doctor` and `add` commands.
mod client;

pub use client::{
    AddReceipt, DEFAULT_BASE_URL, NewDocument, QaClient, QaClientBuilder, QaError, QaTransport,
    RawResponse, ServiceHealth, encode_query_component,
};
