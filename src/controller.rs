//! Request/response/render cycle for one submitted question.
//!
//! `QueryController` reads the query from its surface, sends it to the service
//! through a `QaTransport` and renders whichever outcome comes back. The
//! trigger stays disabled for the whole cycle and is re-enabled by a guard on
//! every exit path, panics included.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::answer::{AnswerResult, PLACEHOLDER};
use crate::endpoint::QaTransport;
use crate::surface::AnswerSurface;

/// Holds the trigger disabled until dropped.
pub struct TriggerGuard<'a, S: AnswerSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: AnswerSurface + ?Sized> TriggerGuard<'a, S> {
    /// Disables the trigger, or returns `None` if another cycle already holds it.
    pub fn acquire(surface: &'a mut S) -> Option<Self> {
        if surface.try_disable_trigger() {
            Some(Self { surface })
        } else {
            None
        }
    }
}

impl<S: AnswerSurface + ?Sized> Deref for TriggerGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: AnswerSurface + ?Sized> DerefMut for TriggerGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: AnswerSurface + ?Sized> Drop for TriggerGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_trigger_enabled(true);
    }
}

/// Binds a display surface to the question-answering service.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use qask::{MemorySurface, QaClientBuilder, QueryController};
///
/// let client = QaClientBuilder::new().build().expect("valid endpoint");
/// let mut controller = QueryController::new(
///     Arc::new(client),
///     MemorySurface::with_query("What is the capital of France?"),
/// );
///
/// if let Some(result) = controller.submit_query() {
///     println!("{}", result.display_text());
/// }
/// ```
#[derive(Clone)]
pub struct QueryController<S: AnswerSurface> {
    transport: Arc<dyn QaTransport>,
    surface: S,
}

impl<S: AnswerSurface> QueryController<S> {
    /// Creates a controller writing to `surface` and querying through `transport`.
    pub fn new(transport: Arc<dyn QaTransport>, surface: S) -> Self {
        Self { transport, surface }
    }

    /// Returns the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the surface mutably, e.g. to edit the query between cycles.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consumes the controller, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Runs one request cycle and returns the rendered outcome.
    ///
    /// Returns `None` without touching the surface when the trigger is already
    /// disabled by a cycle in progress.
    pub fn submit_query(&mut self) -> Option<AnswerResult> {
        let Some(mut surface) = TriggerGuard::acquire(&mut self.surface) else {
            tracing::debug!("query already in flight, ignoring submit");
            return None;
        };

        let query = surface.read_query();
        surface.set_answer(PLACEHOLDER);
        surface.clear_sources();

        tracing::debug!(url = %self.transport.query_url(&query), "submitting query");
        let result = AnswerResult::from_response(self.transport.fetch_answer(&query));
        log_outcome(&result);

        render(&mut *surface, &result);
        Some(result)
    }
}

/// Writes `result` to `surface`, replacing the previous answer and sources.
pub fn render<S: AnswerSurface + ?Sized>(surface: &mut S, result: &AnswerResult) {
    surface.set_answer(&result.display_text());
    surface.clear_sources();
    for block in result.source_blocks() {
        surface.append_source(block);
    }
}

fn log_outcome(result: &AnswerResult) {
    match result {
        AnswerResult::Success { sources, .. } => {
            tracing::info!(sources = sources.len(), "answer received");
        }
        AnswerResult::HttpError {
            status_code,
            status_text,
            raw_body,
        } => {
            tracing::error!(status = status_code, %status_text, body = %raw_body, "request failed");
        }
        AnswerResult::MalformedResponse { raw_body } => {
            tracing::warn!(body = %raw_body, "response was not JSON");
        }
        AnswerResult::NetworkError { message } => {
            tracing::error!(%message, "fetch/network error");
        }
    }
}
