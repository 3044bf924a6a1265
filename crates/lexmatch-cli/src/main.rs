mod display;
mod server;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lexmatch_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use lexmatch_ai::{GeminiClient, Matcher};
use lexmatch_core::CaseDescription;
use lexmatch_store::{AdvocateRepository, AdvocateStore, DuckStore, MemoryStore};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Extra time the HTTP client allows beyond the matcher's oracle timeout.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "lexmatch")]
#[command(about = "Match legal case descriptions to the best-suited advocate")]
#[command(version)]
struct Cli {
    /// DuckDB file holding the advocate pool
    #[arg(long, env = "LEXMATCH_DB", default_value = "data/advocates.duckdb", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the matching API over HTTP
    Serve(ServeArgs),

    /// Replace the advocate pool with the records in a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Print every advocate in the pool
    List,

    /// Match one case description and print the chosen advocate
    Match {
        /// Free-text case description (at least 20 characters)
        description: String,

        #[command(flatten)]
        oracle: OracleArgs,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "LEXMATCH_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Serve an in-memory pool loaded from this JSON file instead of the database
    #[arg(long)]
    memory_seed: Option<PathBuf>,

    #[command(flatten)]
    oracle: OracleArgs,
}

#[derive(Args)]
struct OracleArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: String,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Upper bound on one oracle call, in seconds (at least 1)
    #[arg(
        long,
        env = "LEXMATCH_ORACLE_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    oracle_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before parsing so clap's env fallbacks see .env values.
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env loaded"),
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve(&cli.db, args).await,
        Commands::Import { file } => import(&cli.db, &file),
        Commands::List => list(&cli.db).await,
        Commands::Match {
            description,
            oracle,
        } => match_once(&cli.db, description, oracle).await,
    }
}

// ── Subcommands ──

async fn serve(db: &Path, args: ServeArgs) -> anyhow::Result<()> {
    info!("lexmatch v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn AdvocateStore> = match &args.memory_seed {
        Some(seed) => {
            let store = MemoryStore::from_json_file(seed)
                .with_context(|| format!("loading advocate seed {}", seed.display()))?;
            if store.is_empty() {
                warn!(seed = %seed.display(), "advocate seed file is empty");
            } else {
                let count = store.len();
                info!(seed = %seed.display(), count, "serving in-memory advocate pool");
            }
            Arc::new(store)
        }
        None => {
            let store = open_store(db)?;
            if store.has_advocates() {
                let count = store.advocate_count().context("counting advocates")?;
                info!(db = %db.display(), count, "connected to advocate store");
            } else {
                warn!(db = %db.display(), "advocate pool is empty; run `lexmatch import` first");
            }
            Arc::new(store)
        }
    };

    let matcher = build_matcher(AdvocateRepository::new(store), &args.oracle)?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    server::serve(addr, server::AppState::new(matcher)).await
}

fn import(db: &Path, file: &Path) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let count = store
        .load_json(file)
        .with_context(|| format!("importing {}", file.display()))?;
    info!(count, db = %db.display(), "advocate pool replaced");
    println!("Imported {count} advocate(s) into {}", db.display());
    Ok(())
}

async fn list(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let repo = AdvocateRepository::new(Arc::new(store));
    let advocates = repo.list_all().await;
    display::print_advocate_table(&advocates);
    Ok(())
}

async fn match_once(db: &Path, description: String, oracle: OracleArgs) -> anyhow::Result<()> {
    let case = CaseDescription::new(description)?;
    let store = open_store(db)?;
    let matcher = build_matcher(AdvocateRepository::new(Arc::new(store)), &oracle)?;
    let result = matcher.find_best_advocate(&case).await?;
    display::print_match_card(&result);
    Ok(())
}

// ── Wiring ──

fn open_store(db: &Path) -> anyhow::Result<DuckStore> {
    if let Some(parent) = db.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    DuckStore::open_persistent(db)
        .with_context(|| format!("opening advocate store {}", db.display()))
}

fn build_matcher(repo: AdvocateRepository, args: &OracleArgs) -> anyhow::Result<Matcher> {
    let timeout = Duration::from_secs(args.oracle_timeout_secs);
    let oracle = GeminiClient::new(args.gemini_api_key.clone())
        .with_base_url(&args.gemini_base_url)
        .with_model(&args.model)
        .with_request_timeout(client_timeout(timeout))
        .context("building Gemini client")?;
    info!(
        model = %args.model,
        timeout_secs = args.oracle_timeout_secs,
        "scoring oracle configured"
    );
    Ok(Matcher::new(repo, Arc::new(oracle)).with_oracle_timeout(timeout))
}

/// HTTP client timeout for an oracle timeout, so the matcher's fires first.
fn client_timeout(oracle_timeout: Duration) -> Duration {
    oracle_timeout.saturating_add(CLIENT_TIMEOUT_SLACK)
}
