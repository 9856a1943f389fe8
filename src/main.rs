//! # Shoebox CLI (`sbx`)
//!
//! The `sbx` binary is the primary interface for shoebox. It provides
//! commands for database initialization, consume-directory ingestion,
//! listing, tag search, tagging, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! sbx --config ./config/shoebox.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sbx init` | Create the SQLite database and run schema migrations |
//! | `sbx ingest` | Hash, archive, and index the consume directory |
//! | `sbx images` | List all archived images |
//! | `sbx search "<query>"` | Find images by tag name(s) |
//! | `sbx show <id>` | Show one image with its tags |
//! | `sbx tag <id> <name>` | Attach a tag to an image |
//! | `sbx serve` | Start the JSON HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shoebox::store::ContentStore;
use shoebox::{config, db, ingest, migrate, search, server, show, tag};

/// Shoebox — a content-addressed image archive with tag-based retrieval.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/shoebox.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "sbx",
    about = "Shoebox — a content-addressed image archive with tag-based retrieval",
    version,
    long_about = "Shoebox ingests image files dropped into a consume directory, deduplicates \
    and archives them by content hash, and exposes a tag-based retrieval index over the \
    archived set via a CLI and a JSON HTTP server."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/shoebox.toml`. Database, ingest, and server
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./config/shoebox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the image/tag/image_tag
    /// tables. This command is idempotent — running it multiple times
    /// is safe.
    Init,

    /// Ingest the consume directory.
    ///
    /// Scans the configured consume directory, hashes every matching file
    /// concurrently, copies new content into the archive, and records an
    /// image row per distinct digest. Per-file failures are reported in
    /// the summary without aborting the batch.
    Ingest,

    /// List all archived images.
    Images,

    /// Find images by tag name(s).
    ///
    /// The query is split on whitespace into tag names; images linked to
    /// any of the named tags are returned.
    Search {
        /// The search query string.
        query: String,
    },

    /// Show one image: name, digest, archive path, and tags.
    Show {
        /// Image id.
        id: i64,
    },

    /// Attach a tag to an image.
    ///
    /// Creates the tag on first use of the name; repeating the action is
    /// harmless.
    Tag {
        /// Image id.
        id: i64,
        /// Tag name (case-sensitive).
        name: String,
    },

    /// Start the JSON HTTP server.
    ///
    /// Serves the image listing and the message-based UI endpoint on the
    /// configured bind address.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("database initialized at {}", config.db.path.display());
        }
        Commands::Ingest => {
            let pool = db::connect(&config).await?;
            ingest::run_ingest(&config, &pool).await?;
            pool.close().await;
        }
        Commands::Images => {
            let pool = db::connect(&config).await?;
            search::run_images(&pool).await?;
            pool.close().await;
        }
        Commands::Search { query } => {
            let pool = db::connect(&config).await?;
            search::run_search(&pool, &query).await?;
            pool.close().await;
        }
        Commands::Show { id } => {
            let pool = db::connect(&config).await?;
            let store = ContentStore::new(&config.ingest.archive_dir);
            show::run_show(&pool, &store, id).await?;
            pool.close().await;
        }
        Commands::Tag { id, name } => {
            let pool = db::connect(&config).await?;
            tag::run_tag(&pool, id, &name).await?;
            pool.close().await;
        }
        Commands::Serve => {
            let pool = db::connect(&config).await?;
            server::run_server(&config, pool).await?;
        }
    }

    Ok(())
}
