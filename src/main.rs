use anyhow::Result;
use clap::Parser;
use crewboard::auth::{Authenticator, StaticTokenVerifier};
use crewboard::config::parse_auth_token;
use crewboard::server;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct ServerArgs {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(short, long, default_value = "3000")]
    port: u16,
    #[clap(short, long, default_value = "crewboard.db")]
    database: String,
    #[clap(long)]
    cors_origin: Option<String>,
    /// Bearer token granting API access, as "subject:token". Repeatable.
    #[clap(long = "auth-token")]
    auth_tokens: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    setup_logging(&args.log_level);

    let tokens = args
        .auth_tokens
        .iter()
        .map(|spec| parse_auth_token(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let authenticator = Authenticator::new(StaticTokenVerifier::new(tokens));

    info!("Starting server on port {}", args.port);
    server::start_server(
        args.port,
        &args.database,
        args.cors_origin.as_deref(),
        authenticator,
    )
    .await?;

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
