// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the protected screens:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------+------------------------------------+
// | Sidebar     | Main Panel                          |
// | (22 cols)   | dashboard / torneos / equipos       |
// |             |                                     |
// +-------------+------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The login screen uses the whole area with a centered form.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the navigation sidebar.
const SIDEBAR_WIDTH: u16 = 22;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: console name, current screen, signed-in user.
    pub status_bar: Rect,
    /// Left column: navigation entries.
    pub sidebar: Rect,
    /// Content area of the current route.
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // sidebar + main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    // Horizontal: sidebar (fixed) | main panel (fill)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(vertical[1]);

    AppLayout {
        status_bar: vertical[0],
        sidebar: horizontal[0],
        main_panel: horizontal[1],
        help_bar: vertical[2],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
