//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes.
//! Handles focus-shifting model where key behavior depends on current focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running
    Continue,
    /// Start a request cycle for the current question
    Submit,
    /// Leave the TUI
    Quit,
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+C`: Quit application (from any focus state)
/// - `q`: Quit when a panel other than the input is focused
/// - `Tab` / `Shift+Tab`: Cycle focus between panels
/// - `Esc`: Return to the question input
/// - When `QueryInput` focused: characters and Backspace edit the question,
///   Enter asks it unless a request is already in flight
/// - When `Answer` or `Sources` focused: j/k (or arrows) scroll
///
/// # Examples
///
/// ```
/// use qask::tui::{App, event::{KeyAction, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new();
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), KeyAction::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    if key.code == KeyCode::Tab {
        app.next_focus();
        return KeyAction::Continue;
    }
    if key.code == KeyCode::BackTab {
        app.prev_focus();
        return KeyAction::Continue;
    }

    if key.code == KeyCode::Esc {
        app.reset_focus();
        return KeyAction::Continue;
    }

    match app.focus() {
        Focus::QueryInput => handle_query_input(app, key),
        Focus::Answer | Focus::Sources => handle_panel(app, key),
    }
}

/// Handles keyboard input when the question input is focused.
fn handle_query_input(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            if app.can_submit() {
                app.reset_scroll();
                KeyAction::Submit
            } else {
                // Trigger disabled while a request is in flight
                KeyAction::Continue
            }
        }
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_query_char(c);
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            app.pop_query_char();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// Handles keyboard input when the answer or sources panel is focused.
fn handle_panel(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::PageUp => app.scroll_up(10),
        _ => {}
    }
    KeyAction::Continue
}
