//! Display surfaces the query controller writes to.
//!
//! A surface exposes the three regions of the question page (query input,
//! answer output, sources container) and the enabled flag of the trigger that
//! starts a request cycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::answer::SourceBlock;

/// The display regions and trigger a `QueryController` drives.
pub trait AnswerSurface {
    /// Returns the current content of the query input.
    fn read_query(&self) -> String;

    /// Replaces the answer region.
    fn set_answer(&mut self, text: &str);

    /// Removes every block from the sources region.
    fn clear_sources(&mut self);

    /// Appends one block to the sources region.
    fn append_source(&mut self, block: SourceBlock);

    /// Returns whether the trigger is currently enabled.
    fn trigger_enabled(&self) -> bool;

    /// Enables or disables the trigger.
    fn set_trigger_enabled(&mut self, enabled: bool);

    /// Disables the trigger if it is enabled.
    ///
    /// Returns `false` when the trigger was already disabled, meaning another
    /// cycle owns the surface. Implementations shared between threads must
    /// perform the check and the update atomically.
    fn try_disable_trigger(&mut self) -> bool {
        if !self.trigger_enabled() {
            return false;
        }
        self.set_trigger_enabled(false);
        true
    }
}

/// In-memory surface holding the regions as plain values.
///
/// # Examples
///
/// ```
/// use qask::{AnswerSurface, MemorySurface};
///
/// let surface = MemorySurface::with_query("capital of France?");
/// assert_eq!(surface.read_query(), "capital of France?");
/// assert!(surface.trigger_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    query: String,
    answer: String,
    sources: Vec<SourceBlock>,
    trigger_enabled: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Creates an empty surface with the trigger enabled.
    pub fn new() -> Self {
        Self {
            query: String::new(),
            answer: String::new(),
            sources: Vec::new(),
            trigger_enabled: true,
        }
    }

    /// Creates a surface whose query input already holds `query`.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::new()
        }
    }

    /// Returns the query input.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the query input.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Appends a character to the query input.
    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
    }

    /// Removes the last character of the query input.
    pub fn pop_query_char(&mut self) {
        self.query.pop();
    }

    /// Returns the answer region.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the source blocks in display order.
    pub fn sources(&self) -> &[SourceBlock] {
        &self.sources
    }
}

impl AnswerSurface for MemorySurface {
    fn read_query(&self) -> String {
        self.query.clone()
    }

    fn set_answer(&mut self, text: &str) {
        self.answer = text.to_string();
    }

    fn clear_sources(&mut self) {
        self.sources.clear();
    }

    fn append_source(&mut self, block: SourceBlock) {
        self.sources.push(block);
    }

    fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }
}

/// Cloneable handle to a `MemorySurface` shared between threads.
///
/// Each region update takes the lock once, so a renderer can read a consistent
/// snapshot while a worker thread runs a request cycle.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<MemorySurface>>,
}

impl SharedSurface {
    /// Wraps `surface` in a shared handle.
    pub fn new(surface: MemorySurface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Locks the underlying surface.
    ///
    /// A panic on another thread never leaves the regions half-written, so a
    /// poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, MemorySurface> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current regions.
    pub fn snapshot(&self) -> MemorySurface {
        self.lock().clone()
    }
}

impl AnswerSurface for SharedSurface {
    fn read_query(&self) -> String {
        self.lock().read_query()
    }

    fn set_answer(&mut self, text: &str) {
        self.lock().set_answer(text);
    }

    fn clear_sources(&mut self) {
        self.lock().clear_sources();
    }

    fn append_source(&mut self, block: SourceBlock) {
        self.lock().append_source(block);
    }

    fn trigger_enabled(&self) -> bool {
        self.lock().trigger_enabled()
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.lock().set_trigger_enabled(enabled);
    }

    fn try_disable_trigger(&mut self) -> bool {
        self.lock().try_disable_trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(index: usize, text: &str) -> SourceBlock {
        SourceBlock {
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn new_surface_is_empty_and_enabled() {
        let surface = MemorySurface::new();
        assert_eq!(surface.query(), "");
        assert_eq!(surface.answer(), "");
        assert!(surface.sources().is_empty());
        assert!(surface.trigger_enabled());
    }

    #[test]
    fn query_editing() {
        let mut surface = MemorySurface::new();
        surface.push_query_char('h');
        surface.push_query_char('i');
        assert_eq!(surface.read_query(), "hi");

        surface.pop_query_char();
        surface.pop_query_char();
        surface.pop_query_char();
        assert_eq!(surface.read_query(), "");
    }

    #[test]
    fn sources_append_in_order_and_clear() {
        let mut surface = MemorySurface::new();
        surface.append_source(block(0, "a"));
        surface.append_source(block(1, "b"));
        assert_eq!(surface.sources(), &[block(0, "a"), block(1, "b")]);

        surface.clear_sources();
        assert!(surface.sources().is_empty());
    }

    #[test]
    fn try_disable_trigger_only_succeeds_once() {
        let mut surface = MemorySurface::new();
        assert!(surface.try_disable_trigger());
        assert!(!surface.trigger_enabled());
        assert!(!surface.try_disable_trigger());

        surface.set_trigger_enabled(true);
        assert!(surface.try_disable_trigger());
    }

    #[test]
    fn shared_surface_clones_see_same_regions() {
        let mut writer = SharedSurface::new(MemorySurface::with_query("q"));
        let reader = writer.clone();

        writer.set_answer("answer");
        writer.append_source(block(0, "s"));

        let snapshot = reader.snapshot();
        assert_eq!(snapshot.answer(), "answer");
        assert_eq!(snapshot.sources().len(), 1);
        assert_eq!(reader.read_query(), "q");
    }

    #[test]
    fn shared_surface_trigger_is_exclusive_across_threads() {
        let surface = SharedSurface::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mut surface = surface.clone();
                std::thread::spawn(move || surface.try_disable_trigger())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
