use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::{AuthService, ProfileService};
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::probe::ConnectivityProbe;
use crate::session::SessionStore;
use crate::transport::{AccountPlugin, BoardPlugin, LivenessPlugin};

#[derive(Clone)]
pub struct Services {
    pub liveness: Arc<dyn LivenessPlugin>,
    pub accounts: Arc<dyn AccountPlugin>,
    pub board: Arc<dyn BoardPlugin>,
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, ClientError>;
}

/// Everything a front end needs, wired once per process.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    services: Services,
    probe: Arc<ConnectivityProbe>,
    session: Arc<SessionStore>,
    auth: Arc<AuthService>,
    profile: Arc<ProfileService>,
}

impl AppContext {
    pub async fn new(
        cfg: AppConfig,
        factory: &dyn ServicesFactory,
        shutdown: &CancellationToken,
    ) -> Result<Self, ClientError> {
        let services = factory.build_services(&cfg).await?;
        Ok(Self::from_services(cfg, services, shutdown))
    }

    pub fn from_services(cfg: AppConfig, services: Services, shutdown: &CancellationToken) -> Self {
        let probe = Arc::new(ConnectivityProbe::with_cancellation(
            services.liveness.clone(),
            &cfg.probe,
            shutdown,
        ));
        let session = Arc::new(SessionStore::new(services.accounts.clone()));
        let auth = Arc::new(AuthService::new(
            services.accounts.clone(),
            session.clone(),
            probe.clone(),
        ));
        let profile = Arc::new(ProfileService::new(services.accounts.clone(), session.clone()));

        tracing::debug!(
            target: "kanban.context",
            stage = "context.ready",
            liveness = services.liveness.name(),
            accounts = services.accounts.name(),
            board = services.board.name()
        );

        Self {
            cfg,
            services,
            probe,
            session,
            auth,
            profile,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn board(&self) -> Arc<dyn BoardPlugin> {
        self.services.board.clone()
    }

    pub fn probe(&self) -> &Arc<ConnectivityProbe> {
        &self.probe
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }
}
