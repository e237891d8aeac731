// Create/edit form overlay. Each field is a labelled value with its inline
// validation message underneath.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::modal::FormModal;

use super::quit_confirm::centered_rect;

const DIALOG_WIDTH: u16 = 60;

pub fn render(frame: &mut Frame, area: Rect, form: &FormModal, busy: bool) {
    let lines = form_lines(form, busy);
    let height = lines.len() as u16 + 2;
    let dialog_area = centered_rect(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            form.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn form_lines(form: &FormModal, busy: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for row in form.rows() {
        let marker = if row.focused { "> " } else { "  " };
        let label_style = if row.focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if row.focused { "_" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<16}", row.label), label_style),
            Span::styled(format!("{}{cursor}", row.value), Style::default().fg(Color::White)),
        ]));
        if let Some(error) = row.error {
            lines.push(Line::styled(
                format!("                  {error}"),
                Style::default().fg(Color::Red),
            ));
        }
    }

    if let Some(summary) = form.errors().summary() {
        lines.push(Line::styled(format!("  {summary}"), Style::default().fg(Color::Red)));
    }

    lines.push(Line::from(""));
    let footer = if busy {
        Line::styled("  Guardando...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled(
            "  Tab:Campo | Espacio:Alternar | Enter:Guardar | Esc:Cancelar",
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(footer);
    lines
}
