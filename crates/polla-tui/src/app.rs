// Application orchestrator: owns the auth flow and the domain services,
// turns `UserCommand`s into backend calls and reports back to the TUI with
// `UiUpdate`s.
//
// Navigation always goes through the route guard. Entering a list route
// fetches its collection; a successful save or delete closes the form and
// re-fetches. A 401 anywhere tears the session down in the HTTP layer; the
// loop observes that through the session watch channel and sends the TUI
// back to the login screen.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use polla_core::auth::{AuthFlow, AuthState};
use polla_core::forms::{FormErrors, TeamForm, TournamentForm};
use polla_core::http::ApiClient;
use polla_core::models::LoginCredentials;
use polla_core::routes::{self, Route};
use polla_core::services::teams::TeamService;
use polla_core::services::tournaments::TournamentService;
use polla_core::services::Catalog;
use polla_core::session::{EndReason, SessionSignal, UserProfile};

use crate::protocol::{Collection, Toast, UiUpdate, UserCommand};

pub const TEAM_CREATED: &str = "Equipo registrado correctamente";
pub const TEAM_UPDATED: &str = "Equipo actualizado correctamente";
pub const TEAM_DELETED: &str = "Equipo eliminado correctamente";
pub const TOURNAMENT_CREATED: &str = "Torneo registrado correctamente";
pub const TOURNAMENT_UPDATED: &str = "Torneo actualizado correctamente";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    api: Arc<ApiClient>,
    auth: AuthFlow,
    teams: TeamService,
    tournaments: TournamentService,
    route: Route,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>) -> Self {
        AppState {
            auth: AuthFlow::new(api.clone()),
            teams: TeamService::new(api.clone()),
            tournaments: TournamentService::new(api.clone()),
            api,
            route: Route::Root,
        }
    }

    /// Route the guard last settled on.
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application loop until `Quit` arrives or the command channel
/// closes.
///
/// Listens on two sources using `tokio::select!`:
/// - `cmd_rx`: commands from the TUI
/// - the session watch channel: teardown after a 401
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let mut session_rx = state.api.session().subscribe();
    // The store lives as long as `state`, but stop polling if the sender
    // ever goes away so the select does not spin.
    let mut session_open = true;

    let restored = match state.auth.state() {
        AuthState::Authenticated(profile) => Some(profile.clone()),
        _ => None,
    };
    if let Some(profile) = &restored {
        info!(username = %profile.username, "restored persisted session");
    }
    let _ = ui_tx.send(UiUpdate::SessionChanged(restored)).await;
    navigate(&mut state, Route::Root, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            changed = session_rx.changed(), if session_open => {
                if changed.is_err() {
                    session_open = false;
                    continue;
                }
                let signal = session_rx.borrow_and_update().clone();
                handle_session_signal(&mut state, signal, &ui_tx).await;
            }
        }
    }

    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Login { usuario, contrasena } => {
            let _ = ui_tx.send(UiUpdate::LoginPending).await;
            match state.auth.login(LoginCredentials::new(usuario, contrasena)).await {
                Ok(session) => {
                    let profile = UserProfile {
                        username: session.username,
                        is_admin: session.is_admin,
                        user_id: session.user_id,
                    };
                    let _ = ui_tx.send(UiUpdate::SessionChanged(Some(profile))).await;
                    navigate(state, Route::Dashboard, ui_tx).await;
                }
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::LoginFailed(e.to_string())).await;
                }
            }
        }
        UserCommand::Logout => {
            let target = state.auth.logout();
            let _ = ui_tx.send(UiUpdate::SessionChanged(None)).await;
            navigate(state, target, ui_tx).await;
        }
        UserCommand::Navigate(route) => navigate(state, route, ui_tx).await,
        UserCommand::Refresh => load_route(state, ui_tx).await,
        UserCommand::SaveTeam(form) => save_team(state, form, ui_tx).await,
        UserCommand::DeleteTeam(id) => delete_team(state, id, ui_tx).await,
        UserCommand::SaveTournament(form) => save_tournament(state, form, ui_tx).await,
        UserCommand::Quit => {}
    }
}

async fn handle_session_signal(
    state: &mut AppState,
    signal: SessionSignal,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    // Logout navigates on its own; only a backend rejection needs handling.
    if signal == SessionSignal::Ended(EndReason::Unauthorized) {
        warn!("Backend rejected the session token, returning to login");
        state.auth.session_expired();
        let _ = ui_tx.send(UiUpdate::SessionChanged(None)).await;
        navigate(state, Route::Login, ui_tx).await;
    }
}

// ---------------------------------------------------------------------------
// Navigation and loading
// ---------------------------------------------------------------------------

async fn navigate(state: &mut AppState, requested: Route, ui_tx: &mpsc::Sender<UiUpdate>) {
    let has_token = state.api.session().is_authenticated();
    let landed = routes::resolve(requested, has_token);
    if landed != requested {
        debug!(from = %requested, to = %landed, "guard redirected navigation");
    }
    state.route = landed;
    let _ = ui_tx.send(UiUpdate::Routed(landed)).await;
    load_route(state, ui_tx).await;
}

/// Fetch whatever the current route displays. The dashboard shows counts of
/// both collections.
async fn load_route(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match state.route {
        Route::Teams => load_teams(state, ui_tx).await,
        Route::Tournaments => load_tournaments(state, ui_tx).await,
        Route::Dashboard => {
            load_teams(state, ui_tx).await;
            load_tournaments(state, ui_tx).await;
        }
        Route::Root | Route::Login => {}
    }
}

async fn load_teams(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    load(state, &state.teams, Collection::Teams, UiUpdate::TeamsLoaded, ui_tx).await;
}

async fn load_tournaments(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    load(
        state,
        &state.tournaments,
        Collection::Tournaments,
        UiUpdate::TournamentsLoaded,
        ui_tx,
    )
    .await;
}

async fn load<C: Catalog>(
    state: &AppState,
    catalog: &C,
    collection: Collection,
    loaded: fn(Vec<C::Item>) -> UiUpdate,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    // An earlier fetch in the same pass may have ended the session.
    if !state.api.session().is_authenticated() {
        return;
    }

    let _ = ui_tx.send(UiUpdate::Loading(collection)).await;
    match catalog.list().await {
        Ok(items) => {
            debug!(?collection, count = items.len(), "collection fetched");
            let _ = ui_tx.send(loaded(items)).await;
        }
        Err(e) => {
            warn!(?collection, "fetch failed: {e}");
            let _ = ui_tx.send(UiUpdate::LoadFailed(collection)).await;
            let _ = ui_tx.send(UiUpdate::Toast(Toast::error(e.to_string()))).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

async fn reject_form(errors: FormErrors, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(summary) = errors.summary() {
        let _ = ui_tx.send(UiUpdate::Toast(Toast::error(summary))).await;
    }
    let _ = ui_tx.send(UiUpdate::FormRejected(errors)).await;
}

/// Close the form, confirm, and re-fetch.
async fn mutation_succeeded(
    state: &AppState,
    message: &str,
    collection: Collection,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let _ = ui_tx.send(UiUpdate::FormClosed).await;
    let _ = ui_tx.send(UiUpdate::Toast(Toast::success(message))).await;
    match collection {
        Collection::Teams => load_teams(state, ui_tx).await,
        Collection::Tournaments => load_tournaments(state, ui_tx).await,
    }
}

/// Save through the collection's catalog, then close and re-fetch.
async fn persist<C: Catalog>(
    state: &AppState,
    catalog: &C,
    item: &C::Item,
    message: &str,
    collection: Collection,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let _ = ui_tx.send(UiUpdate::MutationStarted).await;
    let result = catalog.save(item).await;
    let _ = ui_tx.send(UiUpdate::MutationFinished).await;

    match result {
        Ok(outcome) => {
            debug!(?collection, backend_message = ?outcome.message, "save acknowledged");
            mutation_succeeded(state, message, collection, ui_tx).await;
        }
        Err(e) => {
            warn!(?collection, "save failed: {e}");
            let _ = ui_tx.send(UiUpdate::Toast(Toast::error(e.to_string()))).await;
        }
    }
}

async fn save_team(state: &AppState, form: TeamForm, ui_tx: &mpsc::Sender<UiUpdate>) {
    let team = match form.validate(state.api.session().user_id()) {
        Ok(team) => team,
        Err(errors) => return reject_form(errors, ui_tx).await,
    };
    let message = if form.is_edit() { TEAM_UPDATED } else { TEAM_CREATED };
    persist(state, &state.teams, &team, message, Collection::Teams, ui_tx).await;
}

async fn delete_team(state: &AppState, id: i64, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::MutationStarted).await;
    let result = state.teams.delete(id).await;
    let _ = ui_tx.send(UiUpdate::MutationFinished).await;

    match result {
        Ok(_) => {
            mutation_succeeded(state, TEAM_DELETED, Collection::Teams, ui_tx).await;
        }
        Err(e) => {
            warn!(id, "failed to delete team: {e}");
            let _ = ui_tx.send(UiUpdate::FormClosed).await;
            let _ = ui_tx.send(UiUpdate::Toast(Toast::error(e.to_string()))).await;
        }
    }
}

async fn save_tournament(state: &AppState, form: TournamentForm, ui_tx: &mpsc::Sender<UiUpdate>) {
    let tournament = match form.validate(state.api.session().user_id()) {
        Ok(tournament) => tournament,
        Err(errors) => return reject_form(errors, ui_tx).await,
    };
    let message = if form.is_edit() {
        TOURNAMENT_UPDATED
    } else {
        TOURNAMENT_CREATED
    };
    persist(
        state,
        &state.tournaments,
        &tournament,
        message,
        Collection::Tournaments,
        ui_tx,
    )
    .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
