use clap::Parser;
mod app;
mod commands;
use commands::cli;
use kanban_core::api::{AppContext, AuthError, ClientError, SessionError};
use kanban_plugins::services::PluginServicesFactory;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, ClientError> {
    let args = cli::Args::parse();

    let mut cfg = match args.config.as_deref() {
        Some(path) => kanban_core::config::load_from_path(path).map(|mut cfg| {
            kanban_core::config::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
            cfg
        }),
        None => kanban_core::config::load_default(),
    }
    .map_err(|e| ClientError::Config(e.to_string()))?;
    if let Some(url) = args.api_url.as_deref() {
        cfg.api.base_url = url.trim().to_string();
    }
    init_tracing(&cfg.logging).map_err(ClientError::Config)?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!(target: "kanban.cli", stage = "cli.interrupted");
                shutdown.cancel();
            }
        });
    }

    let ctx = AppContext::new(cfg, &PluginServicesFactory, &shutdown).await?;
    let exit = app::dispatch(args.command, args.json, &ctx).await;
    shutdown.cancel();
    exit
}

fn exit_code_for_error(e: &ClientError) -> i32 {
    // 0: success
    // 11: config error
    // 12: invalid input
    // 20: transport / IO error
    // 30: backend unavailable (not ready)
    // 40: rejected by the backend (credentials, conflict, session)
    // 50: internal/uncategorized
    match e {
        ClientError::Config(_) => 11,
        ClientError::Auth(ae) => match ae {
            AuthError::Validation(_) => 12,
            AuthError::NotReady(_) => app::EXIT_UNAVAILABLE,
            AuthError::InvalidCredentials | AuthError::EmailTaken => 40,
            AuthError::NoActiveSession => 40,
            AuthError::Api(_) => 20,
            AuthError::Session(se) => session_exit_code(se),
        },
        ClientError::Session(se) => session_exit_code(se),
        ClientError::Api(_) => 20,
        ClientError::Unavailable(_) => app::EXIT_UNAVAILABLE,
        ClientError::Io(_) => 20,
        ClientError::Anyhow(_) => 50,
    }
}

fn session_exit_code(e: &SessionError) -> i32 {
    match e {
        SessionError::ProfileFetchNetworkError(_) => 20,
        SessionError::ProfileFetchFailed { .. }
        | SessionError::MissingProfile
        | SessionError::Superseded
        | SessionError::NoActiveSession => 40,
    }
}

/// Directives for a bare level: the `kanban*` targets log at `level`, the
/// HTTP stack underneath stays at `warn`. Full directive strings pass through.
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return "warn,kanban=info".to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("warn,kanban={level}")
}

fn init_tracing(logging: &kanban_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter_directives(&logging.level)).map_err(|e| e.to_string())?,
    };

    let file_writer = if logging.file {
        let dir = logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("kanban"));
        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;

        let (non_blocking, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "kanban.log"));
        let _ = LOG_GUARD.set(guard);
        Some(non_blocking)
    } else {
        None
    };

    if !logging.console && file_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    // stdout carries command output; diagnostics go to stderr
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = file_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
            .with_thread_ids(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
