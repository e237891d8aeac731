// Integration tests for the polla console core.
//
// These run the public API end-to-end against the in-process fake backend in
// `common`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use polla_core::auth::AuthFlow;
use polla_core::forms::{TeamForm, TournamentForm, DATE_RANGE};
use polla_core::http::ApiClient;
use polla_core::listing::{ListView, SortDescriptor, TeamColumn};
use polla_core::models::{EntityId, LoginCredentials, Team};
use polla_core::services::{Catalog, TeamService, TournamentService};
use polla_core::session::{
    CookieJar, EndReason, KvStore, SessionSignal, SessionStore, TokenStore, PROFILE_KEY, TOKEN_KEY,
};

use common::FakeBackend;

// ===========================================================================
// Test helpers
// ===========================================================================

struct Console {
    cookies: Arc<CookieJar>,
    kv: Arc<KvStore>,
    session: Arc<SessionStore>,
    api: Arc<ApiClient>,
}

fn console(base_url: &str) -> Console {
    let cookies = Arc::new(CookieJar::in_memory(24));
    let kv = Arc::new(KvStore::open(":memory:").unwrap());
    let session = Arc::new(SessionStore::new(cookies.clone(), kv.clone()));
    let api = Arc::new(ApiClient::new(base_url, Duration::from_secs(5), session.clone()).unwrap());
    Console {
        cookies,
        kv,
        session,
        api,
    }
}

async fn signed_in(backend: &FakeBackend) -> Console {
    let c = console(&backend.base_url);
    let mut auth = AuthFlow::new(c.api.clone());
    auth.login(LoginCredentials::new("admin", "admin123"))
        .await
        .expect("login should succeed");
    c
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[tokio::test]
async fn saving_new_team_then_listing_includes_it() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;
    let teams = TeamService::new(c.api.clone());

    let form = TeamForm {
        name: "Bolivia".into(),
        description: "La Verde".into(),
        ..Default::default()
    };
    let team = form.validate(c.session.user_id()).unwrap();
    assert!(team.id.is_new());
    teams.save(&team).await.unwrap();

    let listed = teams.list().await.unwrap();
    let found = listed
        .iter()
        .find(|t| t.name == "Bolivia" && t.description == "La Verde")
        .expect("saved team should be listed");
    assert!(matches!(found.id, EntityId::Existing(id) if id > 0));
    assert_eq!(found.last_edited_by, Some(1));
}

#[tokio::test]
async fn edit_and_delete_round_trip() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;
    let teams = TeamService::new(c.api.clone());

    teams.save(&Team::new("Peru", "Blanquirroja")).await.unwrap();
    let mut saved = teams.list().await.unwrap().remove(0);
    saved.name = "Perú".into();
    teams.save(&saved).await.unwrap();

    let listed = teams.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Perú");

    teams.delete(saved.id.raw()).await.unwrap();
    assert!(teams.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_establishes_no_session() {
    let backend = FakeBackend::start().await;
    let c = console(&backend.base_url);
    let mut auth = AuthFlow::new(c.api.clone());

    let err = auth
        .login(LoginCredentials::new("admin", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Credenciales inválidas");
    assert_eq!(auth.error(), Some("Credenciales inválidas"));
    assert!(!c.session.is_authenticated());
}

#[tokio::test]
async fn unauthorized_clears_all_artifacts_and_signals_login() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;
    let mut signals = c.session.subscribe();
    assert_eq!(*signals.borrow_and_update(), SessionSignal::Established);

    assert!(c.cookies.get(TOKEN_KEY).unwrap().is_some());
    assert!(c.kv.get(TOKEN_KEY).unwrap().is_some());
    assert!(c.kv.get(PROFILE_KEY).unwrap().is_some());

    backend.revoke();
    let err = TournamentService::new(c.api.clone()).list().await.unwrap_err();
    assert!(err.is_unauthorized());

    assert_eq!(c.cookies.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(c.kv.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(c.kv.get(PROFILE_KEY).unwrap(), None);
    assert!(signals.has_changed().unwrap());
    assert_eq!(
        *signals.borrow_and_update(),
        SessionSignal::Ended(EndReason::Unauthorized)
    );
}

#[tokio::test]
async fn tournament_with_inverted_dates_sends_nothing() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;

    let mut form = TournamentForm::new(chrono::NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
    form.name = "Mundial".into();
    form.end_date = "01/06/2026".into();

    let errors = form.validate(c.session.user_id()).unwrap_err();
    assert_eq!(errors.field("fechaFin"), Some(DATE_RANGE));
    assert_eq!(backend.hits("/register-torneo"), 0);
}

#[tokio::test]
async fn catalog_trait_drives_tournament_round_trip() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;
    let catalog: Box<dyn Catalog<Item = polla_core::models::Tournament>> =
        Box::new(TournamentService::new(c.api.clone()));

    let mut form = TournamentForm::new(chrono::NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
    form.name = "Mundial".into();
    form.end_date = "19/07/2026".into();
    form.total_amount = "1000".into();
    let tournament = form.validate(c.session.user_id()).unwrap();

    let outcome = catalog.save(&tournament).await.unwrap();
    assert!(outcome.success);
    let listed = catalog.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Mundial");
    assert_eq!(listed[0].end_date, chrono::NaiveDate::from_ymd_opt(2026, 7, 19));
}

#[tokio::test]
async fn list_view_over_fetched_teams() {
    let backend = FakeBackend::start().await;
    let c = signed_in(&backend).await;
    let teams = TeamService::new(c.api.clone());
    for i in 0..12 {
        teams
            .save(&Team::new(format!("Equipo {i:02}"), "grupo"))
            .await
            .unwrap();
    }

    let mut view = ListView::new(10, SortDescriptor::ascending(TeamColumn::Name));
    view.set_items(teams.list().await.unwrap());
    assert_eq!(view.page_count(), 2);
    view.set_page(2);
    assert_eq!(view.visible().len(), 2);

    view.set_filter("equipo 1");
    assert_eq!(view.page(), 1);
    assert_eq!(view.visible().len(), 2);
}

#[tokio::test]
async fn session_survives_reopening_stores() {
    let dir = std::env::temp_dir().join("polla_core_session_reopen");
    let _ = std::fs::remove_dir_all(&dir);
    let config = polla_core::config::SessionConfig {
        data_dir: Some(dir.to_string_lossy().to_string()),
        ..Default::default()
    };

    {
        let session = SessionStore::from_config(&config).unwrap();
        session.establish(&polla_core::session::Session {
            token: "persisted".into(),
            username: "admin".into(),
            is_admin: true,
            user_id: Some(1),
        });
    }

    let reopened = SessionStore::from_config(&config).unwrap();
    assert_eq!(reopened.current_token().as_deref(), Some("persisted"));
    assert_eq!(reopened.user_id(), Some(1));

    reopened.teardown(EndReason::Logout);
    let again = SessionStore::from_config(&config).unwrap();
    assert!(!again.is_authenticated());

    let _ = std::fs::remove_dir_all(&dir);
}
