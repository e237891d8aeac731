// Teams screen: the current page of the filtered, sorted team list.
//
// Columns: N°, NOMBRE, DESCRIPCIÓN. The row under the cursor is
// highlighted; a loading or empty collection shows a placeholder instead.

use ratatui::layout::{Constraint, Rect};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::tui::ViewState;

use super::{header_row, list_title, render_placeholder, selected_style};

pub const EMPTY_TEXT: &str = "No se encontraron equipos";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let view = &state.teams;
    let title = list_title("Equipos", view);

    if state.teams_loading {
        return render_placeholder(frame, area, title, "Cargando...");
    }
    let visible = view.visible();
    if visible.is_empty() {
        return render_placeholder(frame, area, title, EMPTY_TEXT);
    }

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let row = Row::new(vec![
                Cell::from(view.row_number(i).to_string()),
                Cell::from(team.name.clone()),
                Cell::from(team.description.clone()),
            ]);
            if i == state.selected_row {
                row.style(selected_style())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(35),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(view))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}
