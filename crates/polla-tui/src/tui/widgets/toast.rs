// Toast stack, drawn in the top-right corner, newest at the bottom.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::protocol::ToastKind;
use crate::tui::ActiveToast;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, area: Rect, toasts: &[ActiveToast]) {
    for (i, active) in toasts.iter().enumerate() {
        let Some(slot) = toast_area(area, i) else {
            break;
        };
        frame.render_widget(Clear, slot);

        let color = match active.toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} ", active.toast.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        let paragraph = Paragraph::new(Line::from(active.toast.description.clone()))
            .wrap(Wrap { trim: true })
            .block(block)
            .style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, slot);
    }
}

/// Slot for the `index`-th toast, or `None` once the stack would leave the
/// area.
fn toast_area(area: Rect, index: usize) -> Option<Rect> {
    let width = TOAST_WIDTH.min(area.width);
    let y = area.y + 1 + (index as u16).checked_mul(TOAST_HEIGHT)?;
    if y + TOAST_HEIGHT > area.y + area.height {
        return None;
    }
    Some(Rect::new(area.x + area.width - width, y, width, TOAST_HEIGHT))
}
