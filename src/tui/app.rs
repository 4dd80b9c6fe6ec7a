use crate::surface::{AnswerSurface, MemorySurface, SharedSurface};

/// Application state for the TUI.
///
/// The question, answer and sources live in a `SharedSurface` so a worker
/// thread can run the request cycle while the UI keeps rendering. Focus and
/// scroll offsets are local to the UI thread.
#[derive(Debug, Clone)]
pub struct App {
    /// Regions written by the query controller
    surface: SharedSurface,
    /// Currently focused panel
    focus: Focus,
    /// Scroll offset for the answer panel
    answer_scroll: u16,
    /// Scroll offset for the sources panel
    sources_scroll: u16,
}

/// Panel focus state for keyboard navigation.
///
/// Determines which panel receives keyboard input and how keys are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Question input is focused (typing edits the question, Enter asks)
    QueryInput,
    /// Answer panel is focused (j/k scrolling)
    Answer,
    /// Sources panel is focused (j/k scrolling)
    Sources,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App with an empty question and the trigger enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use qask::tui::{App, Focus};
    ///
    /// let app = App::new();
    /// assert_eq!(app.query(), "");
    /// assert_eq!(app.focus(), Focus::QueryInput);
    /// assert!(app.can_submit());
    /// ```
    pub fn new() -> Self {
        Self::with_surface(SharedSurface::new(MemorySurface::new()))
    }

    /// Creates an App rendering `surface`.
    pub fn with_surface(surface: SharedSurface) -> Self {
        Self {
            surface,
            focus: Focus::QueryInput,
            answer_scroll: 0,
            sources_scroll: 0,
        }
    }

    /// Returns the shared surface handle.
    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    /// Returns a copy of the current regions for rendering.
    pub fn snapshot(&self) -> MemorySurface {
        self.surface.snapshot()
    }

    /// Returns the question being typed.
    pub fn query(&self) -> String {
        self.surface.read_query()
    }

    /// Returns the current focus state.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns whether a new question can be sent (no cycle in flight).
    pub fn can_submit(&self) -> bool {
        self.surface.trigger_enabled()
    }

    /// Adds a character to the question.
    pub fn push_query_char(&mut self, c: char) {
        self.surface.lock().push_query_char(c);
    }

    /// Removes the last character of the question.
    pub fn pop_query_char(&mut self) {
        self.surface.lock().pop_query_char();
    }

    /// Cycles focus to the next panel in Tab order.
    ///
    /// Order: `QueryInput` -> `Answer` -> `Sources` -> `QueryInput`
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::Answer,
            Focus::Answer => Focus::Sources,
            Focus::Sources => Focus::QueryInput,
        };
    }

    /// Cycles focus to the previous panel in reverse Tab order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::Sources,
            Focus::Answer => Focus::QueryInput,
            Focus::Sources => Focus::Answer,
        };
    }

    /// Returns focus to `QueryInput` (Esc key behavior).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::QueryInput;
    }

    /// Returns the answer panel scroll offset.
    pub fn answer_scroll(&self) -> u16 {
        self.answer_scroll
    }

    /// Returns the sources panel scroll offset.
    pub fn sources_scroll(&self) -> u16 {
        self.sources_scroll
    }

    /// Scrolls the focused panel down. Does nothing when the input is focused.
    pub fn scroll_down(&mut self, amount: u16) {
        match self.focus {
            Focus::Answer => self.answer_scroll = self.answer_scroll.saturating_add(amount),
            Focus::Sources => self.sources_scroll = self.sources_scroll.saturating_add(amount),
            Focus::QueryInput => {}
        }
    }

    /// Scrolls the focused panel up. Does nothing when the input is focused.
    pub fn scroll_up(&mut self, amount: u16) {
        match self.focus {
            Focus::Answer => self.answer_scroll = self.answer_scroll.saturating_sub(amount),
            Focus::Sources => self.sources_scroll = self.sources_scroll.saturating_sub(amount),
            Focus::QueryInput => {}
        }
    }

    /// Resets both panels to the top, done whenever a new question is sent.
    pub fn reset_scroll(&mut self) {
        self.answer_scroll = 0;
        self.sources_scroll = 0;
    }
}
