//! runnerz: run tracking REST service

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use runnerz::user::DEFAULT_USERS_BASE_URL;
use runnerz::{RunServer, Schema, ServerConfig, SqliteConfig, UserClient};

/// Run tracking REST service. Serves the /api/runs HTTP API unless a
/// subcommand is given.
#[derive(Parser)]
#[command(name = "runnerz")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the remote user directory
    Users {
        /// Base URL of the user directory
        #[arg(long, env = "RUNNERZ_USERS_URL", default_value = DEFAULT_USERS_BASE_URL)]
        base_url: String,

        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "RUNNERZ_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, env = "RUNNERZ_DATABASE", default_value = "runnerz.db")]
    database: String,

    /// JSON file of runs loaded when the database is empty
    #[arg(long, env = "RUNNERZ_SEED")]
    seed: Option<PathBuf>,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            bind: args.bind,
            database: SqliteConfig::new(args.database, Schema::runs()),
            seed_file: args.seed,
        }
    }
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List every user
    List,
    /// Show one user
    Get {
        /// User id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        None => RunServer::start(cli.serve.into()).await?,
        Some(Commands::Users { base_url, command }) => {
            let client = UserClient::new(&base_url);
            let output = match command {
                UsersCommand::List => serde_json::to_string_pretty(&client.find_all().await?)?,
                UsersCommand::Get { id } => {
                    serde_json::to_string_pretty(&client.find_by_id(id).await?)?
                }
            };
            println!("{output}");
        }
    }

    Ok(())
}

/// Initialize logging from `RUST_LOG`, defaulting to `info`
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
