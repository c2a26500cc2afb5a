use kanban_core::api::{AppContext, ClientError, ConnectionState, RegisterForm, User};
use serde_json::json;

use crate::commands::cli::{Commands, LoginArgs, ProjectsArgs, RegisterArgs, StatusArgs};

/// Exit code for `status` when the backend did not become ready.
pub const EXIT_UNAVAILABLE: i32 = 30;

pub async fn dispatch(cmd: Commands, as_json: bool, ctx: &AppContext) -> Result<i32, ClientError> {
    match cmd {
        Commands::Status(args) => status(args, as_json, ctx).await,
        Commands::Login(args) => login(args, as_json, ctx).await,
        Commands::Register(args) => register(args, as_json, ctx).await,
        Commands::Projects(args) => projects(args, as_json, ctx).await,
    }
}

/// Run the initial check, follow the wake-up loop to a terminal state, and
/// issue up to `manual_retries` retries while the probe sits in an error state.
async fn wait_for_backend(ctx: &AppContext, manual_retries: u32) -> ConnectionState {
    let probe = ctx.probe().clone();

    let mut sub = probe.subscribe();
    let watcher = tokio::spawn(async move {
        while let Some(state) = sub.changed().await {
            tracing::info!(
                target: "kanban.cli",
                stage = "cli.state",
                state = %state,
                "{}",
                state.description()
            );
        }
    });

    let mut state = probe.check_once().await;
    if !state.is_terminal() {
        state = probe.settled().await;
    }

    let mut left = manual_retries;
    while state.offers_retry() && left > 0 && !probe.is_shut_down() {
        left -= 1;
        tracing::warn!(
            target: "kanban.cli",
            stage = "cli.retry",
            state = %state,
            retries_left = left
        );
        if !probe.retry_connection() {
            break;
        }
        state = probe.settled().await;
    }

    watcher.abort();
    state
}

fn require_ready(state: ConnectionState) -> Result<(), ClientError> {
    if state.permits_submission() {
        Ok(())
    } else {
        Err(ClientError::Unavailable(format!(
            "{} ({})",
            state.description(),
            state
        )))
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), ClientError> {
    let text = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{text}");
    Ok(())
}

fn print_user(user: &User, as_json: bool) -> Result<(), ClientError> {
    if as_json {
        return print_json(&json!(user));
    }
    println!("{} <{}> id={} role={}", user.name, user.email, user.id, user.role);
    Ok(())
}

async fn status(args: StatusArgs, as_json: bool, ctx: &AppContext) -> Result<i32, ClientError> {
    let state = wait_for_backend(ctx, args.manual_retries).await;
    let probe = ctx.probe();

    if as_json {
        print_json(&json!({
            "state": state.as_str(),
            "description": state.description(),
            "attempts": probe.attempt(),
            "max_retries": probe.max_retries(),
            "base_url": ctx.cfg().api.base_url,
        }))?;
    } else {
        println!("{}: {}", state, state.description());
    }

    Ok(if state == ConnectionState::Ready {
        0
    } else {
        EXIT_UNAVAILABLE
    })
}

async fn login(args: LoginArgs, as_json: bool, ctx: &AppContext) -> Result<i32, ClientError> {
    require_ready(wait_for_backend(ctx, 0).await)?;
    let user = ctx.auth().login(&args.email, &args.password).await?;
    print_user(&user, as_json)?;
    Ok(0)
}

async fn register(args: RegisterArgs, as_json: bool, ctx: &AppContext) -> Result<i32, ClientError> {
    require_ready(wait_for_backend(ctx, 0).await)?;
    let form = RegisterForm {
        confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
        name: args.name,
        email: args.email,
        password: args.password,
    };
    let user = ctx.auth().register(&form).await?;
    print_user(&user, as_json)?;
    Ok(0)
}

async fn projects(args: ProjectsArgs, as_json: bool, ctx: &AppContext) -> Result<i32, ClientError> {
    require_ready(wait_for_backend(ctx, 0).await)?;
    let board = ctx.board();
    let projects = board.list_projects().await?;

    let mut rows = Vec::with_capacity(projects.len());
    for project in projects {
        let columns = if args.with_columns {
            board.list_project_columns(project.id).await?
        } else {
            Vec::new()
        };
        rows.push((project, columns));
    }

    if as_json {
        let value: Vec<_> = rows
            .iter()
            .map(|(project, columns)| json!({ "project": project, "columns": columns }))
            .collect();
        return print_json(&json!(value)).map(|_| 0);
    }

    if rows.is_empty() {
        println!("no projects");
    }
    for (project, columns) in &rows {
        println!(
            "#{} {}{}",
            project.id,
            project.name,
            project
                .description
                .as_deref()
                .map(|d| format!(" - {d}"))
                .unwrap_or_default()
        );
        for column in columns {
            println!("    [{}] {}", column.id, column.name);
        }
    }
    Ok(0)
}
