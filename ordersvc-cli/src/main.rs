//! ordersvc CLI - customer order management service
//!
//! The only subcommand today is `serve`, which connects to PostgreSQL,
//! bootstraps the schema, and runs the HTTP API until shutdown.

use std::net::SocketAddr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use ordersvc_core::AppConfig;
use ordersvc_server::db;
use ordersvc_server::http;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "ordersvc",
    author,
    version,
    about = "Customer order management service"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8080 (overrides ORDERSVC_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// PostgreSQL connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // a .env file is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => serve(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    db::migrations::run(&pool).await?;

    info!(bind = %config.bind_addr, pool_size = config.max_connections, "starting order service");
    http::run_server(pool, config.retry, config.bind_addr).await?;

    Ok(())
}
