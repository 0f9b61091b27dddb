//! Screen rendering: pure presentation over session state. Given the
//! mirror, the edit buffer, and any status messages, produce the two-pane
//! screen (list + editor) or the empty-state prompt. No state lives here.

use chrono::{DateTime, Utc};
use colored::Colorize;
use jotz::api::{MessageLevel, UiMessage};
use jotz::session::Session;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LIST_WIDTH: usize = 44;
const TIME_WIDTH: usize = 14;
const SELECTED_MARKER: &str = "▸";

pub(crate) fn print_messages(messages: &[UiMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Render the full screen for the current state.
pub(crate) fn render_screen(session: &Session, buffer: &str) -> String {
    if session.is_empty() {
        return render_empty_state();
    }

    let list_lines = list_pane_lines(session);
    let editor_lines: Vec<&str> = buffer.lines().collect();
    let rows = list_lines.len().max(editor_lines.len()).max(1);

    let blank_cell = " ".repeat(LIST_WIDTH);
    let mut screen = String::new();
    for row in 0..rows {
        let left = list_lines.get(row).cloned().unwrap_or_else(|| blank_cell.clone());
        let right = editor_lines.get(row).copied().unwrap_or("");
        screen.push_str(&format!("{} │ {}\n", left, right));
    }
    screen.push_str(&format!(
        "\n{}\n",
        "commands: :new  :open N  :rm N  :clear  :quit".dimmed()
    ));
    screen
}

fn render_empty_state() -> String {
    format!(
        "{}\n{}\n",
        "You have no notes".bold(),
        "Create one now with :new".dimmed()
    )
}

fn list_pane_lines(session: &Session) -> Vec<String> {
    let selected = session.selected_id().cloned();
    let mut lines = Vec::new();

    for (i, note) in session.sorted().iter().enumerate() {
        let is_selected = selected.as_ref() == Some(&note.id);
        let marker = if is_selected { SELECTED_MARKER } else { " " };
        let idx_str = format!("{} {}. ", marker, i + 1);

        let time_ago = format_time_ago(note.updated_at);

        let available = LIST_WIDTH
            .saturating_sub(idx_str.width())
            .saturating_sub(TIME_WIDTH);
        let title = truncate_to_width(&note.display_title(), available);
        let padding = available.saturating_sub(title.width());

        // Pad with plain text, colorize segments afterwards so escape
        // codes never enter the width math
        let title_styled = if is_selected {
            title.bold().to_string()
        } else {
            title
        };

        lines.push(format!(
            "{}{}{}{}",
            idx_str,
            title_styled,
            " ".repeat(padding),
            time_ago.dimmed()
        ));
    }

    lines
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
