use std::path::PathBuf;
use std::sync::Arc;

use chatgate::config::{
    ConfigError, DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_STORAGE_DIR, GateConfig,
};
use chatgate::context::AppContext;
use chatgate::net::HttpSessionService;
use chatgate::net::types::SessionError;
use chatgate::router::{Router, RouterError};
use chatgate::state::app::{ParseThemeError, Theme};
use chatgate::storage::{FileStorage, StorageError};
use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("navigation failed: {0}")]
    Router(#[from] RouterError),
    #[error("{0}")]
    Theme(#[from] ParseThemeError),
}

#[derive(Parser, Debug)]
#[command(name = "chatgate", about = "Session gate for the chat app")]
struct Cli {
    /// Base URL of the session service.
    #[arg(long, env = "CHATGATE_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Directory holding persisted preferences and the token.
    #[arg(long, env = "CHATGATE_STORAGE_DIR", default_value = DEFAULT_STORAGE_DIR)]
    storage_dir: PathBuf,

    #[arg(long, env = "CHATGATE_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn config(&self) -> Result<GateConfig, ConfigError> {
        GateConfig::new(self.base_url.as_str(), self.storage_dir.as_path(), self.connect_timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a navigation from a cold start and print where it settles.
    Navigate {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Exchange an invitation code for a token.
    Verify { code: String },
    /// Forget the stored token.
    Logout,
    /// Show or change app preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,
    Theme { theme: String },
    Language { language: String },
    Sider {
        #[arg(action = clap::ArgAction::Set)]
        collapsed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let storage = Arc::new(FileStorage::open(&config.storage_dir)?);
    let service = Arc::new(HttpSessionService::from_config(&config)?);
    let mut ctx = AppContext::new(service, storage);

    match cli.command {
        Command::Navigate { path } => run_navigate(&mut ctx, &path).await,
        Command::Verify { code } => run_verify(&mut ctx, &code).await,
        Command::Logout => {
            ctx.auth.remove_token();
            println!("token removed");
            Ok(())
        }
        Command::Prefs(cmd) => run_prefs(&mut ctx, cmd),
    }
}

async fn run_navigate(ctx: &mut AppContext, path: &str) -> Result<(), CliError> {
    let mut router = Router::new();
    let settled = router.push(ctx, path).await?;
    println!("{} ({})", settled, settled.name());
    Ok(())
}

async fn run_verify(ctx: &mut AppContext, code: &str) -> Result<(), CliError> {
    match ctx.auth.verify_invitation_code(code).await {
        Ok(result) => {
            println!("{}", result.message.as_deref().unwrap_or("invitation code accepted"));
            Ok(())
        }
        Err(e) if e.is_transport() => {
            tracing::error!(error = %e, "verification request failed");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_prefs(ctx: &mut AppContext, cmd: PrefsCommand) -> Result<(), CliError> {
    match cmd {
        PrefsCommand::Show => {}
        PrefsCommand::Theme { theme } => ctx.app.set_theme(theme.parse::<Theme>()?),
        PrefsCommand::Language { language } => ctx.app.set_language(&language),
        PrefsCommand::Sider { collapsed } => ctx.app.set_sider_collapsed(collapsed),
    }
    let prefs = ctx.app.state();
    println!("theme: {}", prefs.theme);
    println!("language: {}", prefs.language);
    println!("sider collapsed: {}", prefs.sider_collapsed);
    println!("user: {}", ctx.user.user_info().name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_env_and_env_overrides_defaults() {
        // Only test in this binary that touches the environment.
        unsafe {
            std::env::set_var("CHATGATE_API_BASE_URL", "ftp://not-http");
            std::env::set_var("CHATGATE_STORAGE_DIR", "/tmp/chatgate-env");
            std::env::remove_var("CHATGATE_CONNECT_TIMEOUT_SECS");
        }

        let cli = Cli::try_parse_from(["chatgate", "--base-url", "http://127.0.0.1:9/api/", "navigate"]).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9/api");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/chatgate-env"));
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

        let cli = Cli::try_parse_from(["chatgate", "logout"]).unwrap();
        assert!(matches!(cli.config(), Err(ConfigError::InvalidBaseUrl(_))));

        unsafe {
            std::env::remove_var("CHATGATE_API_BASE_URL");
            std::env::remove_var("CHATGATE_STORAGE_DIR");
        }
    }
}
