use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::normalize_bearer;
use crate::error::{ApiError, ApiErrorKind, SessionError};
use crate::models::User;
use crate::transport::AccountPlugin;

/// Immutable view of the session at one instant.
///
/// Records are never mutated in place; the store swaps whole records, so a
/// reader holding one always sees a token and user from the same session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    pub session_id: Option<Uuid>,
    pub token: Option<String>,
    pub user: Option<User>,
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    fn started(token: String) -> Self {
        Self {
            session_id: Some(Uuid::new_v4()),
            token: Some(token),
            user: None,
            started_at: Some(Utc::now()),
        }
    }

    /// A token alone is not enough; the profile must have arrived too.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Decimal user id, or an empty string when no profile is held.
    pub fn user_id(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.id.to_string())
            .unwrap_or_default()
    }
}

pub struct SessionStore {
    api: Arc<dyn AccountPlugin>,
    record: RwLock<Arc<SessionRecord>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AccountPlugin>) -> Self {
        Self {
            api,
            record: RwLock::new(Arc::new(SessionRecord::default())),
        }
    }

    pub fn snapshot(&self) -> Arc<SessionRecord> {
        let guard = self.record.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn replace(&self, next: SessionRecord) -> Arc<SessionRecord> {
        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(next))
    }

    /// Start a session from a freshly issued token and fetch its profile.
    ///
    /// The token is stored before the fetch (replacing any previous session),
    /// the profile only once the fetch succeeds. If the session is cleared or
    /// replaced while the fetch is in flight the profile is dropped and
    /// [`SessionError::Superseded`] returned. No retries.
    pub async fn initialize_session(&self, raw_token: &str) -> Result<User, SessionError> {
        let token = normalize_bearer(raw_token);
        let started = SessionRecord::started(token.clone());
        let session_id = started.session_id;
        self.replace(started);

        tracing::info!(
            target: "kanban.session",
            stage = "session.init.in",
            session_id = ?session_id
        );

        let user = match self.api.fetch_profile(&token).await {
            Ok(user) => user,
            Err(err) => {
                let err = profile_error(&err);
                tracing::warn!(
                    target: "kanban.session",
                    stage = "session.init.failed",
                    session_id = ?session_id,
                    error = %err
                );
                return Err(err);
            }
        };

        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        if guard.session_id != session_id {
            tracing::debug!(
                target: "kanban.session",
                stage = "session.init.superseded",
                session_id = ?session_id
            );
            return Err(SessionError::Superseded);
        }
        *guard = Arc::new(SessionRecord {
            user: Some(user.clone()),
            ..(**guard).clone()
        });
        drop(guard);

        tracing::info!(
            target: "kanban.session",
            stage = "session.init.ready",
            session_id = ?session_id,
            user_id = user.id
        );
        Ok(user)
    }

    /// Callback form of [`SessionStore::initialize_session`]. Exactly one of
    /// the callbacks runs; `on_error` receives a message carrying the status
    /// code or the transport failure reason.
    pub async fn initialize<R, E>(&self, raw_token: &str, on_ready: R, on_error: E)
    where
        R: FnOnce(),
        E: FnOnce(String),
    {
        match self.initialize_session(raw_token).await {
            Ok(_) => on_ready(),
            Err(err) => on_error(err.to_string()),
        }
    }

    pub fn auth_token(&self) -> Option<String> {
        self.snapshot().token.clone()
    }

    pub fn user_id(&self) -> String {
        self.snapshot().user_id()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Replace the cached profile after an edit round trip. The token is kept.
    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        if guard.token.is_none() {
            return Err(SessionError::NoActiveSession);
        }
        tracing::debug!(
            target: "kanban.session",
            stage = "session.user.updated",
            user_id = user.id
        );
        *guard = Arc::new(SessionRecord {
            user: Some(user),
            ..(**guard).clone()
        });
        Ok(())
    }

    /// Drop token and user. Safe to call without a session.
    pub fn clear_session(&self) {
        let previous = self.replace(SessionRecord::default());
        if previous.token.is_some() {
            tracing::info!(
                target: "kanban.session",
                stage = "session.cleared",
                session_id = ?previous.session_id
            );
        }
    }
}

fn profile_error(err: &ApiError) -> SessionError {
    match err.kind() {
        ApiErrorKind::Status => SessionError::ProfileFetchFailed {
            status: err.status().unwrap_or_default(),
        },
        ApiErrorKind::Decode | ApiErrorKind::Body => SessionError::MissingProfile,
        ApiErrorKind::Timeout
        | ApiErrorKind::Connect
        | ApiErrorKind::Request
        | ApiErrorKind::Unknown => SessionError::ProfileFetchNetworkError(err.message().to_string()),
    }
}
