// Messages exchanged between the app task and the TUI task.
//
// The TUI turns key presses into `UserCommand`s; the app task answers with
// `UiUpdate`s that the TUI folds into its `ViewState`.

use polla_core::forms::{FormErrors, TeamForm, TournamentForm};
use polla_core::models::{Team, Tournament};
use polla_core::routes::Route;
use polla_core::session::UserProfile;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Login { usuario: String, contrasena: String },
    Logout,
    /// Go to a route. The app runs it through the guard first.
    Navigate(Route),
    /// Re-fetch the collections shown on the current route.
    Refresh,
    SaveTeam(TeamForm),
    DeleteTeam(i64),
    SaveTournament(TournamentForm),
    Quit,
}

/// A backend collection cached by a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Teams,
    Tournaments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification with a title and a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            title: "Éxito".to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Updates sent from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// The guard settled on this route.
    Routed(Route),
    /// Signed-in user, or `None` once the session is gone.
    SessionChanged(Option<UserProfile>),
    LoginPending,
    LoginFailed(String),
    Loading(Collection),
    TeamsLoaded(Vec<Team>),
    TournamentsLoaded(Vec<Tournament>),
    /// A fetch failed; the screen keeps its previous rows.
    LoadFailed(Collection),
    Toast(Toast),
    /// A save or delete is in flight; mutation actions are disabled.
    MutationStarted,
    MutationFinished,
    /// Local validation failed; the open form shows these messages.
    FormRejected(FormErrors),
    /// The mutation succeeded; close the open modal.
    FormClosed,
}
