use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Headless client for the Kanban board backend")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to load instead of ~/.kanban/config.toml / ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override `api.base_url`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the backend and report its connection state.
    Status(StatusArgs),
    /// Log in and print the profile.
    Login(LoginArgs),
    /// Create an account and print the profile.
    Register(RegisterArgs),
    /// List projects (and optionally their columns).
    Projects(ProjectsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StatusArgs {
    /// Manual retries to issue after an error state, like pressing "retry".
    #[arg(long, default_value_t = 0)]
    pub manual_retries: u32,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Defaults to `--password`.
    #[arg(long)]
    pub confirm_password: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProjectsArgs {
    #[arg(long)]
    pub with_columns: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_defaults() {
        let args = Args::try_parse_from(["kanban", "status"]).unwrap();
        match args.command {
            Commands::Status(s) => assert_eq!(s.manual_retries, 0),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!args.json);
    }

    #[test]
    fn test_parse_login_with_global_flags() {
        let args = Args::try_parse_from([
            "kanban",
            "login",
            "--email",
            "ana@example.com",
            "--password",
            "pw",
            "--api-url",
            "http://localhost:3000",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:3000"));
        assert!(args.json);
        assert!(matches!(args.command, Commands::Login(ref l) if l.email == "ana@example.com"));
    }

    #[test]
    fn test_login_requires_password() {
        assert!(Args::try_parse_from(["kanban", "login", "--email", "a@b.c"]).is_err());
    }
}
