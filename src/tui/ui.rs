//! UI rendering functions for the TUI.
//!
//! Implements the question input, answer panel and sources panel using
//! ratatui widgets and layout management.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::{App, Focus};
use crate::surface::{AnswerSurface, MemorySurface};

/// Hint shown in the answer panel before the first question.
const ANSWER_HINT: &str = "Type a question and press Enter.";

/// Main rendering function for the TUI.
///
/// Takes one snapshot of the shared regions so every panel in a frame shows
/// the same state, even while a worker thread is writing.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let regions = app.snapshot();

    // Question input at top, content in middle, shortcuts at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Question input
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    // Split content area horizontally: answer (60%) | sources (40%)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    render_query_input(frame, app, &regions, main_chunks[0]);
    render_answer(frame, app, &regions, content_chunks[0]);
    render_sources(frame, app, &regions, content_chunks[1]);
    render_shortcut_bar(frame, app, &regions, main_chunks[2]);
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the question input; the title doubles as the trigger state.
fn render_query_input(frame: &mut Frame, app: &App, regions: &MemorySurface, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::QueryInput);

    let title = if regions.trigger_enabled() {
        "Ask"
    } else {
        "Ask (waiting…)"
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let mut content = regions.query().to_string();
    if is_focused {
        content.push('█'); // Cursor indicator
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the answer region, scrolled to the app's offset.
fn render_answer(frame: &mut Frame, app: &App, regions: &MemorySurface, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::Answer);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Answer")
        .border_style(border_style(is_focused));

    let text = if regions.answer().is_empty() && regions.trigger_enabled() {
        Text::from(Span::styled(
            ANSWER_HINT,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(regions.answer().to_string())
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders one block per source as `[index] text`, separated by blank lines.
fn render_sources(frame: &mut Frame, app: &App, regions: &MemorySurface, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::Sources);

    let title = format!("Sources ({})", regions.sources().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let mut text = Text::default();
    for (i, source) in regions.sources().iter().enumerate() {
        if i > 0 {
            text.lines.push(Line::from(""));
        }
        text.lines.push(Line::from(vec![
            Span::styled(
                format!("[{}]", source.index),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(source.text.clone()),
        ]));
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.sources_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, app: &App, regions: &MemorySurface, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled("Ctrl+C", key_style),
        Span::raw(": quit"),
        Span::styled(" | ", sep_style),
        Span::styled("Tab", key_style),
        Span::raw(": next panel"),
        Span::styled(" | ", sep_style),
        Span::styled("Esc", key_style),
        Span::raw(": back to question"),
    ];

    match app.focus() {
        Focus::QueryInput if regions.trigger_enabled() => {
            spans.push(Span::styled(" | ", sep_style));
            spans.push(Span::styled("Enter", key_style));
            spans.push(Span::raw(": ask"));
        }
        Focus::QueryInput => {}
        Focus::Answer | Focus::Sources => {
            spans.push(Span::styled(" | ", sep_style));
            spans.push(Span::styled("j/k", key_style));
            spans.push(Span::raw(": scroll"));
            spans.push(Span::styled(" | ", sep_style));
            spans.push(Span::styled("q", key_style));
            spans.push(Span::raw(": quit"));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
