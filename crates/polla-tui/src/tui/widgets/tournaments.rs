// Tournaments screen: the current page of the filtered, sorted tournament
// list.
//
// Columns: N°, NOMBRE, FECHA INICIO, FECHA FIN, MONTO, ESTADO.

use chrono::NaiveDate;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use polla_core::models::{format_date, Finalized, Tournament};

use crate::tui::ViewState;

use super::{format_money, header_row, list_title, render_placeholder, selected_style};

pub const EMPTY_TEXT: &str = "No se encontraron torneos";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let view = &state.tournaments;
    let title = list_title("Torneos", view);

    if state.tournaments_loading {
        return render_placeholder(frame, area, title, "Cargando...");
    }
    let visible = view.visible();
    if visible.is_empty() {
        return render_placeholder(frame, area, title, EMPTY_TEXT);
    }

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let row = tournament_row(view.row_number(i), t);
            if i == state.selected_row {
                row.style(selected_style())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(18),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(18),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(view))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn tournament_row(number: usize, t: &Tournament) -> Row<'static> {
    let date = |d: Option<NaiveDate>| d.map(format_date).unwrap_or_else(|| "-".to_string());
    let status_color = match t.finalized {
        Finalized::Yes => Color::DarkGray,
        Finalized::No => Color::Green,
    };
    Row::new(vec![
        Cell::from(number.to_string()),
        Cell::from(t.name.clone()),
        Cell::from(date(t.start_date)),
        Cell::from(date(t.end_date)),
        Cell::from(format_money(t.total_amount)),
        Cell::from(t.finalized.label()).style(Style::default().fg(status_color)),
    ])
}
