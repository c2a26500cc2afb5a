#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use kanban_core::api::{
    AccountPlugin, ApiError, AuthResponse, LivenessPlugin, LoginRequest, MessageResponse,
    ProbeConfig, RegisterRequest, UpdatePasswordRequest, UpdateUserRequest, User,
};

/// What a scripted call resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    /// Fails immediately with a timeout-kind error.
    Timeout,
    /// Never resolves; only the caller's own deadline ends it.
    Hang,
    Refused,
    Status(u16),
}

impl Outcome {
    async fn resolve(self, url: &str) -> Result<(), ApiError> {
        match self {
            Outcome::Ok => Ok(()),
            Outcome::Timeout => Err(ApiError::timeout("operation timed out")),
            Outcome::Hang => std::future::pending().await,
            Outcome::Refused => Err(ApiError::connect("connection refused")),
            Outcome::Status(code) => Err(ApiError::status_error(code, url, "scripted failure")),
        }
    }
}

/// In-memory stand-in for the backend. Liveness outcomes are consumed from a
/// script (then `fallback` forever); account calls use fixed outcomes.
pub struct ScriptedBackend {
    liveness: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    liveness_calls: AtomicUsize,
    login: Outcome,
    register: Outcome,
    profile: Outcome,
    profile_gate: Option<Arc<Notify>>,
    log: Mutex<Vec<&'static str>>,
    tokens: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Outcome>, fallback: Outcome) -> Self {
        Self {
            liveness: Mutex::new(script.into_iter().collect()),
            fallback,
            liveness_calls: AtomicUsize::new(0),
            login: Outcome::Ok,
            register: Outcome::Ok,
            profile: Outcome::Ok,
            profile_gate: None,
            log: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn ready() -> Self {
        Self::new([], Outcome::Ok)
    }

    pub fn with_login(mut self, outcome: Outcome) -> Self {
        self.login = outcome;
        self
    }

    pub fn with_register(mut self, outcome: Outcome) -> Self {
        self.register = outcome;
        self
    }

    pub fn with_profile(mut self, outcome: Outcome) -> Self {
        self.profile = outcome;
        self
    }

    /// Hold every profile fetch until `gate` is notified.
    pub fn with_profile_gate(mut self, gate: Arc<Notify>) -> Self {
        self.profile_gate = Some(gate);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn liveness_calls(&self) -> usize {
        self.liveness_calls.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    /// Authorization values seen by profile fetches, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.log.lock().unwrap().push(call);
    }
}

/// Profile whose name is the raw token, so tests can tell sessions apart.
pub fn user_for_token(token: &str) -> User {
    let raw = token.strip_prefix("Bearer ").unwrap_or(token);
    User {
        id: 42,
        name: raw.to_string(),
        email: format!("{raw}@example.com"),
        role: "user".to_string(),
        created_at: Some("2024-05-01T10:00:00Z".to_string()),
    }
}

pub fn probe_config(max_retries: u32) -> ProbeConfig {
    ProbeConfig {
        max_retries,
        retry_delay_ms: 5_000,
        call_timeout_ms: 10_000,
        event_capacity: 256,
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kanban=debug")
        .with_test_writer()
        .try_init();
}

#[async_trait]
impl LivenessPlugin for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn check_status(&self) -> Result<String, ApiError> {
        self.liveness_calls.fetch_add(1, Ordering::SeqCst);
        self.record("check_status");
        let outcome = self
            .liveness
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        outcome.resolve("http://scripted/").await?;
        Ok("API running".to_string())
    }
}

#[async_trait]
impl AccountPlugin for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record("login");
        self.login.resolve("http://scripted/api/users/login").await?;
        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token: "tok-login".to_string(),
            user: Some(User {
                email: request.email,
                ..user_for_token("tok-login")
            }),
        })
    }

    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record("register");
        self.register
            .resolve("http://scripted/api/users/register")
            .await?;
        Ok(AuthResponse {
            message: "User registered".to_string(),
            token: "tok-register".to_string(),
            user: Some(User {
                name: request.name,
                email: request.email,
                ..user_for_token("tok-register")
            }),
        })
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, ApiError> {
        self.record("fetch_profile");
        self.tokens.lock().unwrap().push(token.to_string());
        if let Some(gate) = &self.profile_gate {
            gate.notified().await;
        }
        self.profile
            .resolve("http://scripted/api/users/auth/me")
            .await?;
        Ok(user_for_token(token))
    }

    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        self.record("update_user");
        let current = user_for_token(token);
        Ok(User {
            id: user_id,
            name: request.name.unwrap_or(current.name),
            email: request.email.unwrap_or(current.email),
            role: request.role.unwrap_or(current.role),
            created_at: current.created_at,
        })
    }

    async fn update_password(
        &self,
        _token: &str,
        _user_id: i64,
        _request: UpdatePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.record("update_password");
        Ok(MessageResponse {
            message: "Password updated".to_string(),
        })
    }

    async fn delete_user(&self, _token: &str, _user_id: i64) -> Result<MessageResponse, ApiError> {
        self.record("delete_user");
        Ok(MessageResponse {
            message: "User deleted".to_string(),
        })
    }
}
