use std::sync::Arc;

use super::validation::check_password;
use crate::error::AuthError;
use crate::models::{MessageResponse, UpdatePasswordRequest, UpdateUserRequest, User};
use crate::session::SessionStore;
use crate::transport::AccountPlugin;

/// Operations on the signed-in user's own account.
pub struct ProfileService {
    accounts: Arc<dyn AccountPlugin>,
    session: Arc<SessionStore>,
}

impl ProfileService {
    pub fn new(accounts: Arc<dyn AccountPlugin>, session: Arc<SessionStore>) -> Self {
        Self { accounts, session }
    }

    /// Token and user id of the current session, read from one snapshot.
    fn credentials(&self) -> Result<(String, i64), AuthError> {
        let record = self.session.snapshot();
        match (&record.token, &record.user) {
            (Some(token), Some(user)) => Ok((token.clone(), user.id)),
            _ => Err(AuthError::NoActiveSession),
        }
    }

    pub fn load(&self) -> Result<User, AuthError> {
        self.session.user().ok_or(AuthError::NoActiveSession)
    }

    pub async fn update_profile(&self, request: UpdateUserRequest) -> Result<User, AuthError> {
        let (token, user_id) = self.credentials()?;
        let user = self.accounts.update_user(&token, user_id, request).await?;
        self.session.update_user(user.clone())?;
        tracing::info!(target: "kanban.auth", stage = "profile.updated", user_id);
        Ok(user)
    }

    pub async fn change_password(&self, password: &str) -> Result<MessageResponse, AuthError> {
        check_password(password)?;
        let (token, user_id) = self.credentials()?;
        let request = UpdatePasswordRequest {
            password: password.to_string(),
        };
        let response = self.accounts.update_password(&token, user_id, request).await?;
        tracing::info!(target: "kanban.auth", stage = "profile.password_changed", user_id);
        Ok(response)
    }

    /// Delete the account server-side; the local session is cleared on success.
    pub async fn delete_account(&self) -> Result<MessageResponse, AuthError> {
        let (token, user_id) = self.credentials()?;
        let response = self.accounts.delete_user(&token, user_id).await?;
        self.session.clear_session();
        tracing::info!(target: "kanban.auth", stage = "profile.deleted", user_id);
        Ok(response)
    }

    pub fn logout(&self) {
        self.session.clear_session();
    }
}
