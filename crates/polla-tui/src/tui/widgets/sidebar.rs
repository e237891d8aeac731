// Sidebar widget: numbered navigation entries with the active route
// highlighted.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use polla_core::routes::Route;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let items: Vec<ListItem> = Route::NAVIGATION
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let style = if *route == state.route {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(format!(" {}  {}", i + 1, route.title()))).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Menú "));
    frame.render_widget(list, area);
}
