use std::sync::Arc;

use super::validation::{check_login, check_register, RegisterForm};
use crate::error::{ApiErrorKind, AuthError};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::probe::ConnectivityProbe;
use crate::session::SessionStore;
use crate::transport::AccountPlugin;

/// Login and registration.
///
/// Both flows are gated on a `Ready` backend and only hand the issued token
/// to the session once the authenticate call has succeeded.
pub struct AuthService {
    accounts: Arc<dyn AccountPlugin>,
    session: Arc<SessionStore>,
    probe: Arc<ConnectivityProbe>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountPlugin>,
        session: Arc<SessionStore>,
        probe: Arc<ConnectivityProbe>,
    ) -> Self {
        Self {
            accounts,
            session,
            probe,
        }
    }

    fn ensure_ready(&self) -> Result<(), AuthError> {
        let state = self.probe.state();
        if state.permits_submission() {
            Ok(())
        } else {
            Err(AuthError::NotReady(state))
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        check_login(email, password)?;
        self.ensure_ready()?;

        tracing::info!(target: "kanban.auth", stage = "auth.login.in");
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.accounts.login(request).await.map_err(|err| {
            tracing::warn!(target: "kanban.auth", stage = "auth.login.rejected", error = %err);
            if err.kind() == ApiErrorKind::Status {
                AuthError::InvalidCredentials
            } else {
                AuthError::Api(err)
            }
        })?;

        let user = self.session.initialize_session(&response.token).await?;
        tracing::info!(target: "kanban.auth", stage = "auth.login.out", user_id = user.id);
        Ok(user)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<User, AuthError> {
        check_register(form)?;
        self.ensure_ready()?;

        tracing::info!(target: "kanban.auth", stage = "auth.register.in");
        let request = RegisterRequest {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let response = self.accounts.register(request).await.map_err(|err| {
            tracing::warn!(target: "kanban.auth", stage = "auth.register.rejected", error = %err);
            if err.is_status(409) {
                AuthError::EmailTaken
            } else {
                AuthError::Api(err)
            }
        })?;

        let user = self.session.initialize_session(&response.token).await?;
        tracing::info!(target: "kanban.auth", stage = "auth.register.out", user_id = user.id);
        Ok(user)
    }
}
