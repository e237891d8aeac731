// TUI front-end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the screens need: the current
// route, the signed-in user, the cached collections with their list-view
// state, the open modal and the toast stack. The app orchestrator pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod modal;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use polla_core::config::UiConfig;
use polla_core::listing::{ListView, SortDescriptor, TeamColumn, TournamentColumn};
use polla_core::models::{Team, Tournament};
use polla_core::routes::Route;
use polla_core::session::UserProfile;

use crate::protocol::{Collection, Toast, ToastKind, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};
use modal::Modal;

// ---------------------------------------------------------------------------
// Login screen state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Usuario,
    Contrasena,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub usuario: String,
    pub contrasena: String,
    pub focus: LoginField,
    /// Message from the last failed attempt.
    pub error: Option<String>,
    /// A login request is in flight.
    pub pending: bool,
}

impl LoginState {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Usuario => &mut self.usuario,
            LoginField::Contrasena => &mut self.contrasena,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Usuario => LoginField::Contrasena,
            LoginField::Contrasena => LoginField::Usuario,
        };
    }
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ActiveToast {
    pub toast: Toast,
    pub expires_at: Instant,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// All state the TUI needs to render a frame.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub route: Route,
    pub profile: Option<UserProfile>,
    pub login: LoginState,
    pub teams: ListView<Team>,
    pub tournaments: ListView<Tournament>,
    pub teams_loading: bool,
    pub tournaments_loading: bool,
    /// Highlighted row within the current page of the active list.
    pub selected_row: usize,
    /// Typing edits the active list's filter.
    pub filter_mode: bool,
    pub modal: Option<Modal>,
    pub confirm_quit: bool,
    /// A save or delete is in flight.
    pub busy: bool,
    pub toasts: Vec<ActiveToast>,
    success_toast: Duration,
    error_toast: Duration,
}

impl ViewState {
    pub fn new(ui: &UiConfig) -> Self {
        ViewState {
            route: Route::Root,
            profile: None,
            login: LoginState::default(),
            teams: ListView::new(ui.teams_page_size, SortDescriptor::ascending(TeamColumn::Name)),
            tournaments: ListView::new(
                ui.tournaments_page_size,
                SortDescriptor::ascending(TournamentColumn::Name),
            ),
            teams_loading: false,
            tournaments_loading: false,
            selected_row: 0,
            filter_mode: false,
            modal: None,
            confirm_quit: false,
            busy: false,
            toasts: Vec::new(),
            success_toast: Duration::from_secs(ui.success_toast_secs),
            error_toast: Duration::from_secs(ui.error_toast_secs),
        }
    }

    pub fn push_toast(&mut self, toast: Toast, now: Instant) {
        let ttl = match toast.kind {
            ToastKind::Success => self.success_toast,
            ToastKind::Error => self.error_toast,
        };
        self.toasts.push(ActiveToast {
            toast,
            expires_at: now + ttl,
        });
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Dismiss the newest toast. Returns false when there was none.
    pub fn dismiss_toast(&mut self) -> bool {
        self.toasts.pop().is_some()
    }

    /// Number of rows on the current page of the active list.
    pub fn visible_len(&self) -> usize {
        match self.route {
            Route::Teams => self.teams.visible().len(),
            Route::Tournaments => self.tournaments.visible().len(),
            _ => 0,
        }
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }

    /// Filter text of the active list.
    pub fn active_filter(&self) -> &str {
        match self.route {
            Route::Teams => self.teams.filter(),
            Route::Tournaments => self.tournaments.filter(),
            _ => "",
        }
    }

    pub fn set_active_filter(&mut self, filter: String) {
        match self.route {
            Route::Teams => self.teams.set_filter(filter),
            Route::Tournaments => self.tournaments.set_filter(filter),
            _ => return,
        }
        self.selected_row = 0;
    }

    /// The team under the cursor on the teams screen.
    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.visible().get(self.selected_row).copied()
    }

    pub fn selected_tournament(&self) -> Option<&Tournament> {
        self.tournaments.visible().get(self.selected_row).copied()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&UiConfig::default())
    }
}

/// Apply a UI update from the app orchestrator to the view state.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Routed(route) => {
            if route != state.route {
                state.route = route;
                state.selected_row = 0;
                state.filter_mode = false;
                state.modal = None;
            }
        }
        UiUpdate::SessionChanged(profile) => {
            if profile.is_some() {
                state.login = LoginState::default();
            } else {
                state.login.pending = false;
                state.busy = false;
            }
            state.profile = profile;
        }
        UiUpdate::LoginPending => {
            state.login.pending = true;
            state.login.error = None;
        }
        UiUpdate::LoginFailed(message) => {
            state.login.pending = false;
            state.login.error = Some(message);
        }
        UiUpdate::Loading(collection) => set_loading(state, collection, true),
        UiUpdate::TeamsLoaded(teams) => {
            state.teams.set_items(teams);
            state.teams_loading = false;
            state.clamp_selection();
        }
        UiUpdate::TournamentsLoaded(tournaments) => {
            state.tournaments.set_items(tournaments);
            state.tournaments_loading = false;
            state.clamp_selection();
        }
        UiUpdate::LoadFailed(collection) => set_loading(state, collection, false),
        UiUpdate::Toast(toast) => state.push_toast(toast, Instant::now()),
        UiUpdate::MutationStarted => state.busy = true,
        UiUpdate::MutationFinished => state.busy = false,
        UiUpdate::FormRejected(errors) => {
            if let Some(Modal::Form(form)) = state.modal.as_mut() {
                form.set_errors(errors);
            }
        }
        UiUpdate::FormClosed => state.modal = None,
    }
}

fn set_loading(state: &mut ViewState, collection: Collection, loading: bool) {
    match collection {
        Collection::Teams => state.teams_loading = loading,
        Collection::Tournaments => state.tournaments_loading = loading,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full screen for the current route, then the overlays.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();

    if state.route.is_protected() {
        let layout = build_layout(area);
        widgets::status_bar::render(frame, layout.status_bar, state);
        widgets::sidebar::render(frame, layout.sidebar, state);
        render_main_panel(frame, &layout, state);
        render_help_bar(frame, &layout, state);
    } else {
        widgets::login::render(frame, area, &state.login);
    }

    match &state.modal {
        Some(Modal::Form(form)) => widgets::form_modal::render(frame, area, form, state.busy),
        Some(Modal::ConfirmDelete { name, .. }) => {
            widgets::confirm_delete::render(frame, area, name, state.busy)
        }
        None => {}
    }

    widgets::toast::render(frame, area, &state.toasts);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area);
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.route {
        Route::Teams => widgets::teams::render(frame, layout.main_panel, state),
        Route::Tournaments => widgets::tournaments::render(frame, layout.main_panel, state),
        _ => widgets::dashboard::render(frame, layout.main_panel, state),
    }
}

fn help_text(state: &ViewState) -> &'static str {
    if state.filter_mode {
        return " Enter:Aplicar | Esc:Limpiar filtro";
    }
    match state.route {
        Route::Teams => {
            " 1-3:Menú | j/k:Fila | ←/→:Página | /:Filtrar | s/S:Orden | n:Nuevo | e:Editar | d:Eliminar | r:Recargar | L:Salir sesión | q:Salir"
        }
        Route::Tournaments => {
            " 1-3:Menú | j/k:Fila | ←/→:Página | /:Filtrar | s/S:Orden | n:Nuevo | e:Editar | r:Recargar | L:Salir sesión | q:Salir"
        }
        _ => " 1-3:Menú | r:Recargar | L:Salir sesión | x:Cerrar aviso | q:Salir",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_config: UiConfig,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::new(&ui_config);

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App task is gone.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Resize and mouse events need no handling; the next
                    // tick redraws at the new size.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                view_state.prune_toasts(Instant::now());
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    // 7. Restore terminal
    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
