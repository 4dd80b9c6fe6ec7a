//! Answers returned by the question-answering service.
//!
//! This module turns one raw `/qa` exchange into an `AnswerResult` and knows how
//! each outcome is displayed: answer text, error strings and source blocks.

mod interpret;
mod types;

pub use interpret::describe_error;
pub use types::{AnswerResult, OutcomeKind, PLACEHOLDER, Source, SourceBlock};
