//! # Tanya Sekolah CLI (`tanya`)
//!
//! Entry point for the school chat responder. Provides commands for
//! database initialization, seeding, one-shot questions, and the HTTP
//! server the website widget talks to.
//!
//! ## Usage
//!
//! ```bash
//! tanya --config ./config/tanya.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tanya init` | Create the SQLite database and run schema migrations |
//! | `tanya seed` | Load the baseline school dataset |
//! | `tanya ask "<question>"` | Answer one question on the command line |
//! | `tanya serve` | Start the HTTP API |

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use tanya_sekolah::ai::GeminiClient;
use tanya_sekolah::bot::ChatBot;
use tanya_sekolah::store::SqliteStore;
use tanya_sekolah::{config, db, migrate, seed, server};

/// Tanya Sekolah — FAQ chat responder for the school website.
#[derive(Parser)]
#[command(
    name = "tanya",
    about = "FAQ chat responder for the school website",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/tanya.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Idempotent.
    Init,

    /// Load the baseline school dataset (facts, programs, clubs, news).
    Seed,

    /// Answer a single question and print the result.
    Ask {
        /// The question to resolve.
        question: String,
    },

    /// Start the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            println!("Database initialized at {}", config.db.path.display());
        }
        Commands::Seed => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            seed::seed_database(&pool).await?;
            println!("Database seeded");
        }
        Commands::Ask { question } => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            let store = Arc::new(SqliteStore::new(pool));
            let ai = GeminiClient::from_env(&config.ai)?;
            let bot = ChatBot::new(&config, store, ai);

            let response = bot.answer_question(&question).await;
            println!("{}", response.answer);
            if !response.quick_replies.is_empty() {
                println!("\nSaran: {}", response.quick_replies.join(" | "));
            }
        }
        Commands::Serve => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            let store = Arc::new(SqliteStore::new(pool.clone()));
            let ai = GeminiClient::from_env(&config.ai)?;
            let bot = Arc::new(ChatBot::new(&config, store, ai));

            server::run_server(&config, bot, pool).await?;
        }
    }

    Ok(())
}
