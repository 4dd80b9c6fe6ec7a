pub mod answer;
pub mod controller;
pub mod doctor;
pub mod endpoint;
pub mod surface;
pub mod telemetry;
pub mod tui;
pub mod utils;

pub use answer::{AnswerResult, OutcomeKind, PLACEHOLDER, Source, SourceBlock};
pub use controller::{QueryController, TriggerGuard};
pub use endpoint::{QaClient, QaClientBuilder, QaError, QaTransport, RawResponse};
pub use surface::{AnswerSurface, MemorySurface, SharedSurface};
