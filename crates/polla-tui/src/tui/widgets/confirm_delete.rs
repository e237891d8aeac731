// Delete confirmation overlay for the teams screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::quit_confirm::{centered_rect, yes_no_line};

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, name: &str, busy: bool) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            " Eliminar equipo ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let last = if busy {
        Line::styled("  Eliminando...", Style::default().fg(Color::Yellow))
    } else {
        yes_no_line("  ¿Confirmar? ")
    };
    let lines = vec![
        Line::from(format!("  ¿Eliminar el equipo \"{name}\"?")),
        Line::styled(
            "  Esta acción no se puede deshacer.",
            Style::default().fg(Color::DarkGray),
        ),
        last,
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}
