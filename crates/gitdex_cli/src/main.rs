//! Gitdex CLI - push GitHub content into a Microsoft Search connection.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand, ValueEnum};
use console::Term;
use gitdex::ItemType;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gitdex")]
#[command(version)]
#[command(about = "Sync GitHub repositories and issues into a search connection")]
#[command(
    long_about = "Gitdex pulls repositories, issues, and issue timelines from the GitHub \
REST API and pushes them into a Microsoft Graph external connection as \
searchable items with activity feeds."
)]
#[command(after_long_help = r#"EXAMPLES
    Create a connection for issues and register its schema:
        $ gitdex connection create gitdexissues --name "GitHub Issues" --item-type issues
        $ gitdex schema register gitdexissues --item-type issues

    Push every issue of the configured repository:
        $ gitdex push issues gitdexissues

    Tear a connection down:
        $ gitdex connection delete gitdexissues

CONFIGURATION
    Gitdex reads configuration from:
      1. ~/.config/gitdex/config.toml (or $XDG_CONFIG_HOME/gitdex/config.toml)
      2. ./gitdex.toml
      3. Environment variables (GITDEX_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GITDEX_GITHUB_TOKEN               GitHub personal access token
    GITDEX_GITHUB_OWNER               Owner of the repository to sync
    GITDEX_GITHUB_REPO                Repository name to sync
    GITDEX_GRAPH_TOKEN                Microsoft Graph access token
    GITDEX_GRAPH_PLACEHOLDER_USER_ID  Surrogate identity for all source logins
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage external connections
    Connection {
        #[command(subcommand)]
        action: ConnectionAction,
    },
    /// Register a connection's search schema
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
    /// Push source entities into a connection
    Push {
        #[command(subcommand)]
        action: PushAction,
    },
}

/// Entity kind a connection indexes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ItemKind {
    Issues,
    Repositories,
}

impl From<ItemKind> for ItemType {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Issues => ItemType::Issues,
            ItemKind::Repositories => ItemType::Repositories,
        }
    }
}

#[derive(Subcommand)]
enum ConnectionAction {
    /// Create a connection with a URL resolver for the given item type
    Create {
        /// Connection id (3-32 characters, immutable)
        id: String,

        /// Display name shown in the search admin UI
        #[arg(short, long)]
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Entity kind this connection will index
        #[arg(short = 't', long, value_enum)]
        item_type: ItemKind,
    },
    /// List all connections in the tenant
    List,
    /// Delete a connection and everything indexed under it
    Delete {
        /// Connection id
        id: String,
    },
    /// Add or replace the connection's URL-to-item resolvers
    AddActivitySettings {
        /// Connection id
        id: String,

        /// Entity kind the resolver should match
        #[arg(short = 't', long, value_enum)]
        item_type: ItemKind,
    },
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Submit the schema and poll the registration operation to completion
    Register {
        /// Connection id
        id: String,

        /// Entity kind whose schema to register
        #[arg(short = 't', long, value_enum)]
        item_type: ItemKind,

        /// Seconds between status polls
        #[arg(long, default_value_t = 10)]
        poll_secs: u64,

        /// Overall deadline in seconds
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,
    },
}

#[derive(Subcommand)]
enum PushAction {
    /// Push every issue of the configured repository
    Issues {
        /// Connection id
        id: String,

        /// Retries per event-page fetch before an issue is skipped
        #[arg(long, default_value_t = 3)]
        max_event_retries: usize,
    },
    /// Push every repository owned by the configured owner
    #[command(visible_alias = "repos")]
    Repositories {
        /// Connection id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging for non-TTY runs; TTY runs get console output
    // from the progress renderer instead.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("gitdex=info,gitdex_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let settings = config::load()?;

    match cli.command {
        Commands::Connection { action } => match action {
            ConnectionAction::Create {
                id,
                name,
                description,
                item_type,
            } => {
                commands::connection::create(&settings, &id, &name, description, item_type.into())
                    .await?;
            }
            ConnectionAction::List => {
                commands::connection::list(&settings).await?;
            }
            ConnectionAction::Delete { id } => {
                commands::connection::delete(&settings, &id).await?;
            }
            ConnectionAction::AddActivitySettings { id, item_type } => {
                commands::connection::add_activity_settings(&settings, &id, item_type.into())
                    .await?;
            }
        },
        Commands::Schema { action } => match action {
            SchemaAction::Register {
                id,
                item_type,
                poll_secs,
                timeout_secs,
            } => {
                commands::schema::register(&settings, &id, item_type.into(), poll_secs, timeout_secs)
                    .await?;
            }
        },
        Commands::Push { action } => match action {
            PushAction::Issues {
                id,
                max_event_retries,
            } => {
                commands::push::issues(&settings, &id, max_event_retries).await?;
            }
            PushAction::Repositories { id } => {
                commands::push::repositories(&settings, &id).await?;
            }
        },
    }

    Ok(())
}
