// Status bar widget: console name, current screen, busy indicator, user.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use polla_core::session::UserProfile;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [console name] [screen title] [busy] ... [user (role)]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " Polla Admin ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(state.route.title(), Style::default().fg(Color::White)),
    ];

    if state.busy {
        spans.push(Span::styled(
            "  Guardando...",
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(user_span(state.profile.as_ref()));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "name (role)" for the signed-in user.
pub fn user_span(profile: Option<&UserProfile>) -> Span<'static> {
    match profile {
        Some(p) => Span::styled(
            format!("{} ({})", p.username, p.role_label()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("sin sesión", Style::default().fg(Color::Red)),
    }
}
