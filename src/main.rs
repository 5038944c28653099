use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use product_catalog::config::Config;
use product_catalog::graphql::create_schema;
use product_catalog::logging;
use product_catalog::media::MediaStore;
use product_catalog::observability::metrics;
use product_catalog::server;
use product_catalog::storage::{InMemoryStorage, SqliteStorage, Storage};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog GraphQL service")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to catalog.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GraphQL HTTP server
    Serve {
        /// Port to run the server on
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Directory where uploaded images are written
        #[arg(long)]
        media_root: Option<PathBuf>,

        /// Keep products in memory instead of SQLite (data will not persist)
        #[arg(long)]
        in_memory: bool,
    },
    /// Create the database schema and exit
    InitDb {
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Print the GraphQL schema (SDL)
    PrintSchema,
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => return Ok(Config::load()?),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn create_storage(config: &Config, in_memory: bool) -> Result<Arc<dyn Storage>> {
    if in_memory {
        info!("Using in-memory storage");
        Ok(Arc::new(InMemoryStorage::new()))
    } else {
        let storage = SqliteStorage::open(&config.database.path)?;
        Ok(Arc::new(storage))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = load_config(cli.config)?;

    match cli.command {
        Commands::Serve {
            port,
            database,
            media_root,
            in_memory,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(database) = database {
                config.database.path = database;
            }
            if let Some(media_root) = media_root {
                config.media.root = media_root;
            }

            logging::init_logging(&config.logging.dir);
            if let Err(e) = metrics::init() {
                warn!("Failed to initialize metrics: {}", e);
            }

            let storage = create_storage(&config, in_memory)?;
            let media = MediaStore::new(&config.media.root, config.media.url.clone());

            if in_memory {
                println!("🧠 Using in-memory storage (data will not persist)");
            } else {
                println!("💾 Using SQLite database at {}", config.database.path.display());
            }

            server::start_server(storage, media, config.server.port).await?;
        }
        Commands::InitDb { database } => {
            if let Some(database) = database {
                config.database.path = database;
            }
            SqliteStorage::open(&config.database.path)?;
            println!("✅ Database ready at {}", config.database.path.display());
        }
        Commands::PrintSchema => {
            let schema = create_schema(
                Arc::new(InMemoryStorage::new()),
                MediaStore::new(&config.media.root, config.media.url.clone()),
            );
            println!("{}", schema.sdl());
        }
    }

    Ok(())
}
