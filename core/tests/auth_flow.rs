mod common;

use std::sync::Arc;

use common::{probe_config, Outcome, ScriptedBackend};
use kanban_core::api::{
    AuthError, AuthService, ConnectionState, ConnectivityProbe, ProfileService, RegisterForm,
    SessionStore, UpdateUserRequest,
};
use pretty_assertions::assert_eq;

struct Harness {
    api: Arc<ScriptedBackend>,
    probe: Arc<ConnectivityProbe>,
    session: Arc<SessionStore>,
    auth: AuthService,
    profile: ProfileService,
}

fn harness(api: ScriptedBackend) -> Harness {
    let api = api.into_arc();
    let probe = Arc::new(ConnectivityProbe::new(api.clone(), &probe_config(6)));
    let session = Arc::new(SessionStore::new(api.clone()));
    let auth = AuthService::new(api.clone(), session.clone(), probe.clone());
    let profile = ProfileService::new(api.clone(), session.clone());
    Harness {
        api,
        probe,
        session,
        auth,
        profile,
    }
}

fn form() -> RegisterForm {
    RegisterForm {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "s3cret".to_string(),
        confirm_password: "s3cret".to_string(),
    }
}

#[tokio::test]
async fn test_login_refused_until_ready() {
    let h = harness(ScriptedBackend::ready());

    let err = h.auth.login("ana@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::NotReady(ConnectionState::InitialLoading)));
    assert!(h.api.log().is_empty());

    assert_eq!(h.probe.check_once().await, ConnectionState::Ready);
    let user = h.auth.login("ana@example.com", "pw").await.unwrap();

    assert_eq!(user.name, "tok-login");
    assert_eq!(h.api.log(), vec!["check_status", "login", "fetch_profile"]);
    assert_eq!(h.session.auth_token().as_deref(), Some("Bearer tok-login"));
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn test_login_refused_while_server_error() {
    let h = harness(ScriptedBackend::new([Outcome::Status(503)], Outcome::Ok));
    h.probe.check_once().await;

    let err = h.auth.login("ana@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::NotReady(ConnectionState::ServerError)));
    assert_eq!(h.api.log(), vec!["check_status"]);
}

#[tokio::test]
async fn test_blank_fields_are_rejected_first() {
    let h = harness(ScriptedBackend::ready());

    let err = h.auth.login("", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "email and password are required");
    assert!(h.api.log().is_empty());
}

#[tokio::test]
async fn test_bad_credentials_skip_profile_fetch() {
    let h = harness(ScriptedBackend::ready().with_login(Outcome::Status(401)));
    h.probe.check_once().await;

    let err = h.auth.login("ana@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(h.api.log(), vec!["check_status", "login"]);
    assert_eq!(h.session.auth_token(), None);
}

#[tokio::test]
async fn test_login_transport_failure_is_not_bad_credentials() {
    let h = harness(ScriptedBackend::ready().with_login(Outcome::Refused));
    h.probe.check_once().await;

    let err = h.auth.login("ana@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Api(_)));
}

#[tokio::test]
async fn test_register_then_session() {
    let h = harness(ScriptedBackend::ready());
    h.probe.check_once().await;

    let user = h.auth.register(&form()).await.unwrap();
    assert_eq!(user.name, "tok-register");
    assert_eq!(h.api.log(), vec!["check_status", "register", "fetch_profile"]);
    assert_eq!(h.session.auth_token().as_deref(), Some("Bearer tok-register"));
}

#[tokio::test]
async fn test_register_conflict_is_email_taken() {
    let h = harness(ScriptedBackend::ready().with_register(Outcome::Status(409)));
    h.probe.check_once().await;

    let err = h.auth.register(&form()).await.unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(err.to_string(), "email is already registered");
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let h = harness(ScriptedBackend::ready());
    h.probe.check_once().await;

    let mismatch = RegisterForm {
        confirm_password: "different".to_string(),
        ..form()
    };
    let err = h.auth.register(&mismatch).await.unwrap_err();
    assert_eq!(err.to_string(), "passwords do not match");
    assert_eq!(h.api.log(), vec!["check_status"]);
}

#[tokio::test]
async fn test_profile_fetch_failure_surfaces_as_session_error() {
    let h = harness(ScriptedBackend::ready().with_profile(Outcome::Status(401)));
    h.probe.check_once().await;

    let err = h.auth.login("ana@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Session(_)));
    assert!(err.to_string().contains("401"));
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn test_profile_operations() {
    let h = harness(ScriptedBackend::ready());
    assert!(matches!(h.profile.load(), Err(AuthError::NoActiveSession)));

    h.probe.check_once().await;
    h.auth.login("ana@example.com", "pw").await.unwrap();
    assert_eq!(h.profile.load().unwrap().name, "tok-login");

    let updated = h
        .profile
        .update_profile(UpdateUserRequest {
            name: Some("Ana Maria".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(h.session.user().map(|u| u.name), Some("Ana Maria".to_string()));
    assert_eq!(h.session.auth_token().as_deref(), Some("Bearer tok-login"));

    assert!(h.profile.change_password("  ").await.is_err());
    h.profile.change_password("n3w").await.unwrap();

    h.profile.delete_account().await.unwrap();
    assert_eq!(h.session.auth_token(), None);
    assert_eq!(h.session.user_id(), "");
    assert!(matches!(
        h.profile.delete_account().await,
        Err(AuthError::NoActiveSession)
    ));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let h = harness(ScriptedBackend::ready());
    h.probe.check_once().await;
    h.auth.login("ana@example.com", "pw").await.unwrap();

    h.profile.logout();
    h.profile.logout();
    assert_eq!(h.session.auth_token(), None);
    assert!(h.profile.load().is_err());
}
