// TUI widget modules for each screen and overlay, plus the table helpers
// the two list screens share.

pub mod confirm_delete;
pub mod dashboard;
pub mod form_modal;
pub mod login;
pub mod quit_confirm;
pub mod sidebar;
pub mod status_bar;
pub mod teams;
pub mod toast;
pub mod tournaments;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row};
use ratatui::Frame;

use polla_core::listing::{Column, Listable, ListView};

/// Header row: `N°` followed by every sortable column, the active one
/// marked with the direction arrow.
pub(crate) fn header_row<T: Listable>(view: &ListView<T>) -> Row<'static> {
    let sort = view.sort();
    let mut cells = vec![Cell::from("N°")];
    cells.extend(T::Column::all().iter().map(|column| {
        if *column == sort.column {
            Cell::from(format!("{} {}", column.label(), sort.direction.arrow()))
        } else {
            Cell::from(column.label())
        }
    }));

    Row::new(cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

/// Block title: screen name, filtered count, active filter and page.
pub(crate) fn list_title<T: Listable>(name: &str, view: &ListView<T>) -> Line<'static> {
    let mut title = format!(" {} ({})", name, view.filtered_len());
    if !view.filter().is_empty() {
        title.push_str(&format!(" [filtro: {}]", view.filter()));
    }
    title.push_str(&format!(" | Página {}/{} ", view.page(), view.page_count()));
    Line::from(title)
}

/// Centered single message inside a bordered block, for loading and empty
/// tables.
pub(crate) fn render_placeholder(frame: &mut Frame, area: Rect, title: Line<'static>, text: &str) {
    let paragraph = Paragraph::new(Line::from(text.to_string()))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// Highlight for the row under the cursor.
pub(crate) fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Amount with two decimals and `.` as the thousands separator, e.g.
/// `$ 1.234,50`.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}$ {grouped},{frac_part}")
}

#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
