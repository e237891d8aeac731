// Dashboard widget: landing panel of the protected area with the signed-in
// user and the size of each loaded collection.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (name, role) = state
        .profile
        .as_ref()
        .map(|p| (p.username.as_str(), p.role_label()))
        .unwrap_or(("-", "-"));

    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Bienvenido, ", label),
            Span::styled(name.to_string(), value),
        ]),
        Line::from(vec![Span::styled(" Rol: ", label), Span::styled(role, value)]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Torneos: ", label),
            Span::styled(
                count(state.tournaments.items().len(), state.tournaments_loading),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled(" Equipos: ", label),
            Span::styled(count(state.teams.items().len(), state.teams_loading), value),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Dashboard "),
    );
    frame.render_widget(paragraph, area);
}

fn count(len: usize, loading: bool) -> String {
    if loading {
        "...".to_string()
    } else {
        len.to_string()
    }
}
