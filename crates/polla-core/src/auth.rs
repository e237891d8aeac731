// Authentication flow: credential submission, token exchange, session
// establishment and logout.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::http::{ApiClient, HttpError};
use crate::models::{LoginCredentials, LoginResponse};
use crate::routes::Route;
use crate::session::{EndReason, Session, UserProfile};

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Ingresa tu usuario y contraseña")]
    MissingCredentials,

    /// The backend answered 2xx without a token.
    #[error("Respuesta inválida del servidor")]
    InvalidResponse,

    /// Transport or backend failure; the message is shown verbatim.
    #[error(transparent)]
    Request(#[from] HttpError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous { error: Option<String> },
    Pending,
    Authenticated(UserProfile),
}

/// Drives the login screen. Owns no session data itself; everything is
/// persisted through the client's `SessionStore`.
pub struct AuthFlow {
    api: Arc<ApiClient>,
    state: AuthState,
}

impl AuthFlow {
    /// Start authenticated when a persisted token survives from an earlier run.
    pub fn new(api: Arc<ApiClient>) -> Self {
        let state = match (api.session().is_authenticated(), api.session().profile()) {
            (true, Some(profile)) => AuthState::Authenticated(profile),
            _ => AuthState::Anonymous { error: None },
        };
        Self { api, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AuthState::Anonymous { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Submit credentials. On success the session is established and the
    /// caller should navigate to `Route::Dashboard`.
    pub async fn login(&mut self, credentials: LoginCredentials) -> Result<Session, AuthError> {
        self.state = AuthState::Pending;

        match self.exchange(credentials).await {
            Ok(session) => {
                self.api.session().establish(&session);
                self.state = AuthState::Authenticated(UserProfile {
                    username: session.username.clone(),
                    is_admin: session.is_admin,
                    user_id: session.user_id,
                });
                Ok(session)
            }
            Err(err) => {
                warn!("login failed: {err}");
                self.state = AuthState::Anonymous {
                    error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }

    async fn exchange(&self, credentials: LoginCredentials) -> Result<Session, AuthError> {
        if credentials.usuario.trim().is_empty() || credentials.contrasena.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let resp = self.api.post(LOGIN_PATH, &credentials).await?;
        let login: LoginResponse =
            serde_json::from_value(resp.body).map_err(|_| AuthError::InvalidResponse)?;

        let token = login
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidResponse)?;

        info!(usuario = %credentials.usuario, "login accepted");
        Ok(Session {
            token,
            username: login.usuario.unwrap_or(credentials.usuario),
            is_admin: login.es_admin,
            user_id: login.cod_usuario,
        })
    }

    /// Local logout: tear the session down. The caller navigates to login.
    pub fn logout(&mut self) -> Route {
        self.api.session().teardown(EndReason::Logout);
        self.state = AuthState::Anonymous { error: None };
        Route::Login
    }

    /// Reset after the HTTP layer tore the session down on a 401.
    pub fn session_expired(&mut self) {
        if !matches!(self.state, AuthState::Anonymous { .. }) {
            self.state = AuthState::Anonymous { error: None };
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::{MockBackend, Reply};
    use crate::session::SessionStore;
    use serde_json::json;
    use std::time::Duration;

    fn flow(base_url: &str) -> (AuthFlow, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::in_memory().unwrap());
        let api = ApiClient::new(base_url, Duration::from_secs(5), store.clone()).unwrap();
        (AuthFlow::new(Arc::new(api)), store)
    }

    #[tokio::test]
    async fn successful_login_establishes_session() {
        let backend = MockBackend::start(vec![Reply::json(
            200,
            json!({"token": "jwt-1", "usuario": "ana", "esAdmin": 1, "codUsuario": 42}),
        )])
        .await;
        let (mut auth, store) = flow(&backend.base_url);

        let session = auth
            .login(LoginCredentials::new("ana", "secreto"))
            .await
            .unwrap();

        assert_eq!(session.token, "jwt-1");
        assert_eq!(store.current_token().as_deref(), Some("jwt-1"));
        assert_eq!(store.user_id(), Some(42));
        match auth.state() {
            AuthState::Authenticated(profile) => {
                assert_eq!(profile.username, "ana");
                assert!(profile.is_admin);
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }

        let req = &backend.requests()[0];
        assert_eq!(req.path, "/api/polla/auth/login");
        assert_eq!(req.body, json!({"usuario": "ana", "contrasena": "secreto"}));
    }

    #[tokio::test]
    async fn wrong_password_shows_backend_message() {
        let backend = MockBackend::start(vec![Reply::json(
            401,
            json!({"message": "Credenciales inválidas"}),
        )])
        .await;
        let (mut auth, store) = flow(&backend.base_url);

        let err = auth
            .login(LoginCredentials::new("ana", "mala"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Credenciales inválidas");
        assert_eq!(auth.error(), Some("Credenciales inválidas"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn response_without_token_is_invalid() {
        let backend =
            MockBackend::start(vec![Reply::json(200, json!({"usuario": "ana", "esAdmin": 0}))])
                .await;
        let (mut auth, store) = flow(&backend.base_url);

        let err = auth
            .login(LoginCredentials::new("ana", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse));
        assert_eq!(auth.error(), Some("Respuesta inválida del servidor"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_locally() {
        let backend = MockBackend::start(vec![]).await;
        let (mut auth, _store) = flow(&backend.base_url);

        let err = auth
            .login(LoginCredentials::new("  ", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let backend = MockBackend::start(vec![Reply::json(
            200,
            json!({"token": "jwt-2", "usuario": "luis", "esAdmin": 0, "codUsuario": 5}),
        )])
        .await;
        let (mut auth, store) = flow(&backend.base_url);
        auth.login(LoginCredentials::new("luis", "pw")).await.unwrap();

        assert_eq!(auth.logout(), Route::Login);
        assert!(!store.is_authenticated());
        assert_eq!(auth.state(), &AuthState::Anonymous { error: None });
    }

    #[test]
    fn restores_persisted_session() {
        let store = Arc::new(SessionStore::in_memory().unwrap());
        store.establish(&Session {
            token: "kept".into(),
            username: "ana".into(),
            is_admin: false,
            user_id: Some(1),
        });
        let api = ApiClient::new("http://localhost:1/api/polla", Duration::from_secs(1), store)
            .unwrap();
        let auth = AuthFlow::new(Arc::new(api));
        assert!(matches!(auth.state(), AuthState::Authenticated(p) if p.username == "ana"));
    }
}
