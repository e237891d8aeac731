// Login screen: centered box with the user and password fields, the last
// error and a pending indicator. The password is masked.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::{LoginField, LoginState};

use super::quit_confirm::centered_rect;

const BOX_WIDTH: u16 = 50;
const BOX_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, area: Rect, login: &LoginState) {
    let box_area = centered_rect(BOX_WIDTH, BOX_HEIGHT, area);
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Polla Admin · Iniciar Sesión ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let rows = Layout::vertical([
        Constraint::Length(3), // usuario
        Constraint::Length(3), // contraseña
        Constraint::Min(1),    // error / pending
        Constraint::Length(1), // hint
    ])
    .split(inner);

    render_field(
        frame,
        rows[0],
        "Usuario",
        &login.usuario,
        login.focus == LoginField::Usuario,
    );
    render_field(
        frame,
        rows[1],
        "Contraseña",
        &mask(&login.contrasena),
        login.focus == LoginField::Contrasena,
    );

    let message = if login.pending {
        Some(Line::styled("Ingresando...", Style::default().fg(Color::Yellow)))
    } else {
        login
            .error
            .as_ref()
            .map(|e| Line::styled(e.clone(), Style::default().fg(Color::Red)))
    };
    if let Some(line) = message {
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), rows[2]);
    }

    let hint = Line::styled(
        " Tab:Campo | Enter:Ingresar | Esc:Salir",
        Style::default().fg(Color::DarkGray),
    );
    frame.render_widget(Paragraph::new(hint), rows[3]);
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };
    let paragraph = Paragraph::new(format!("{value}{cursor}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {label} ")),
    );
    frame.render_widget(paragraph, area);
}

fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}
