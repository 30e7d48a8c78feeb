//! CLI command implementations
//!
//! `init` creates the database file and schema, `start` boots the server,
//! `add-user` provisions a login credential. The schema bootstrap is
//! idempotent, so `start` also runs it.

use std::io::Write;
use std::path::Path;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::auth;
use crate::db::{ensure_schema, DbPool};
use crate::http_server::{HttpServer, ServerConfig};

/// Dispatch a parsed command
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
        Command::AddUser {
            config,
            user_name,
            lang_id,
            password,
        } => add_user(&config, &user_name, lang_id, password),
    }
}

/// Create the database file and schema
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let pool = open_database(&config)?;
    println!("initialized database at {}", pool.path().display());
    Ok(())
}

/// Boot the server and serve until interrupted
pub fn start(config_path: &Path) -> CliResult<()> {
    init_tracing();

    let config = load_config(config_path)?;
    let pool = open_database(&config)?;
    let server = HttpServer::with_config(config, pool);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.start())?;
    Ok(())
}

/// Create a login user
pub fn add_user(
    config_path: &Path,
    user_name: &str,
    lang_id: Option<i64>,
    password: Option<String>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let pool = open_database(&config)?;

    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    if password.is_empty() {
        return Err(CliError::InvalidInput("password must not be empty".to_string()));
    }

    let user_id = auth::create_user(&pool, user_name, &password, lang_id)?;
    println!("created user {} with id {}", user_name, user_id);
    Ok(())
}

fn load_config(path: &Path) -> CliResult<ServerConfig> {
    ServerConfig::load(path).map_err(CliError::Config)
}

fn open_database(config: &ServerConfig) -> CliResult<DbPool> {
    let pool = DbPool::open(&config.db_path)?;
    let conn = pool.get()?;
    ensure_schema(&conn)?;
    Ok(pool)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stocksync=info,tower_http=info")),
        )
        .init();
}

fn prompt_password() -> CliResult<String> {
    print!("password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
