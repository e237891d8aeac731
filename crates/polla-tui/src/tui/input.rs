// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (row selection,
// paging, sorting, filtering, form editing).
//
// Modes are checked in priority order: quit confirmation, open modal,
// login screen, filter entry, then the normal list/dashboard keys.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use polla_core::forms::{TeamForm, TournamentForm};
use polla_core::routes::Route;

use super::modal::{FormModal, Modal};
use super::ViewState;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally
/// by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events; some terminals also report releases.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.modal.is_some() {
        return handle_modal(key_event, view_state);
    }

    if !view_state.route.is_protected() {
        return handle_login(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    handle_normal(key_event, view_state)
}

fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Login screen
// ---------------------------------------------------------------------------

fn handle_login(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let login = &mut view_state.login;
    match key_event.code {
        KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.toggle_focus();
            None
        }
        KeyCode::Enter if !login.pending => Some(UserCommand::Login {
            usuario: login.usuario.clone(),
            contrasena: login.contrasena.clone(),
        }),
        KeyCode::Backspace => {
            login.focused_mut().pop();
            None
        }
        KeyCode::Char(c) => {
            login.focused_mut().push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Filter entry
// ---------------------------------------------------------------------------

fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.set_active_filter(String::new());
            view_state.filter_mode = false;
        }
        KeyCode::Enter => view_state.filter_mode = false,
        KeyCode::Backspace => {
            let mut text = view_state.active_filter().to_string();
            text.pop();
            view_state.set_active_filter(text);
        }
        KeyCode::Char(c) => {
            let mut text = view_state.active_filter().to_string();
            text.push(c);
            view_state.set_active_filter(text);
        }
        _ => {}
    }
    None
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

fn handle_modal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let busy = view_state.busy;
    let modal = view_state.modal.as_mut()?;

    match modal {
        Modal::ConfirmDelete { id, .. } => match key_event.code {
            KeyCode::Char('y') | KeyCode::Enter if !busy => Some(UserCommand::DeleteTeam(*id)),
            KeyCode::Char('n') | KeyCode::Esc => {
                view_state.modal = None;
                None
            }
            _ => None,
        },
        Modal::Form(form) => match key_event.code {
            KeyCode::Esc => {
                view_state.modal = None;
                None
            }
            KeyCode::Enter if !busy => Some(form.submit()),
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                None
            }
            KeyCode::Backspace => {
                form.backspace();
                None
            }
            KeyCode::Char(c) => {
                form.type_char(c);
                None
            }
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        KeyCode::Esc | KeyCode::Char('x') => {
            view_state.dismiss_toast();
            None
        }
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            Route::NAVIGATION
                .get(index)
                .map(|route| UserCommand::Navigate(*route))
        }
        KeyCode::Char('L') => Some(UserCommand::Logout),
        KeyCode::Char('r') => Some(UserCommand::Refresh),
        _ if is_list_route(view_state.route) => handle_list_key(key_event, view_state),
        _ => None,
    }
}

fn is_list_route(route: Route) -> bool {
    matches!(route, Route::Teams | Route::Tournaments)
}

fn handle_list_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let on_teams = view_state.route == Route::Teams;

    match key_event.code {
        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected_row = view_state.selected_row.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.selected_row += 1;
            view_state.clamp_selection();
            None
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            if on_teams {
                view_state.teams.next_page();
            } else {
                view_state.tournaments.next_page();
            }
            view_state.selected_row = 0;
            None
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            if on_teams {
                view_state.teams.prev_page();
            } else {
                view_state.tournaments.prev_page();
            }
            view_state.selected_row = 0;
            None
        }
        KeyCode::Char('s') => {
            if on_teams {
                view_state.teams.cycle_sort_column();
            } else {
                view_state.tournaments.cycle_sort_column();
            }
            None
        }
        KeyCode::Char('S') => {
            if on_teams {
                view_state.teams.toggle_direction();
            } else {
                view_state.tournaments.toggle_direction();
            }
            None
        }
        KeyCode::Char('n') if !view_state.busy => {
            let form = if on_teams {
                FormModal::team(TeamForm::default())
            } else {
                FormModal::tournament(TournamentForm::new(Local::now().date_naive()))
            };
            view_state.modal = Some(Modal::Form(form));
            None
        }
        KeyCode::Char('e') | KeyCode::Enter if !view_state.busy => {
            let form = if on_teams {
                view_state.selected_team().map(|t| FormModal::team(TeamForm::for_team(t)))
            } else {
                view_state.selected_tournament().map(|t| {
                    FormModal::tournament(TournamentForm::for_tournament(
                        t,
                        Local::now().date_naive(),
                    ))
                })
            };
            if let Some(form) = form {
                view_state.modal = Some(Modal::Form(form));
            }
            None
        }
        KeyCode::Char('d') if on_teams && !view_state.busy => {
            let target = view_state
                .selected_team()
                .filter(|t| !t.id.is_new())
                .map(|t| Modal::ConfirmDelete {
                    id: t.id.raw(),
                    name: t.name.clone(),
                });
            if target.is_some() {
                view_state.modal = target;
            }
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
