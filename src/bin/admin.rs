//! CLI administration tool for url-keeper.
//!
//! Shortens, inspects, and deactivates URLs and shows store statistics
//! directly against the database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- url create https://example.com
//!
//! # Show a record by its secret key
//! cargo run --bin admin -- url info ABCDE_FGHIJKLM
//!
//! # Deactivate a record
//! cargo run --bin admin -- url deactivate ABCDE_FGHIJKLM
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*`): PostgreSQL connection string
//! - `BASE_URL`: used to print short and admin links
//!
//! # Features
//!
//! - **URL Management**: Create, inspect, and deactivate records
//! - **Statistics**: Record and click counts
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: Confirmation before deactivation
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use url_keeper::application::services::{TargetValidator, UrlService};
use url_keeper::config::Config;
use url_keeper::domain::entities::UrlRecord;
use url_keeper::domain::repositories::UrlRepository;
use url_keeper::infrastructure::persistence::PgUrlRepository;
use url_keeper::infrastructure::reachability::{HttpProbe, NullProbe, ReachabilityProbe};
use url_keeper::server::connect_pool;
use url_keeper::utils::public_url::{admin_url, short_url};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// CLI tool for managing url-keeper.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage shortened URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// URL management subcommands.
#[derive(Subcommand)]
enum UrlAction {
    /// Shorten a target URL
    Create {
        /// Target URL (prompted for if omitted)
        target: Option<String>,

        /// Skip the reachability check
        #[arg(long)]
        skip_check: bool,
    },

    /// Show a record by its secret key
    Info {
        /// Secret admin key
        secret_key: String,
    },

    /// Deactivate a record by its secret key
    Deactivate {
        /// Secret admin key
        secret_key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Url { action } => handle_url_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn url_service(config: &Config, pool: &PgPool) -> UrlService {
    let repository: Arc<dyn UrlRepository> =
        Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
    UrlService::new(repository, config.key_settings())
}

/// Dispatches URL management commands.
async fn handle_url_action(action: UrlAction, config: &Config, pool: &PgPool) -> Result<()> {
    let service = url_service(config, pool);

    match action {
        UrlAction::Create { target, skip_check } => {
            create_url(&service, config, target, skip_check).await?;
        }
        UrlAction::Info { secret_key } => {
            show_url(&service, &config.base_url, &secret_key).await?;
        }
        UrlAction::Deactivate { secret_key, yes } => {
            deactivate_url(&service, &secret_key, yes).await?;
        }
    }

    Ok(())
}

/// Validates and shortens a target URL, printing both links.
async fn create_url(
    service: &UrlService,
    config: &Config,
    target: Option<String>,
    skip_check: bool,
) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let target = match target {
        Some(t) => t,
        None => Input::new().with_prompt("Target URL").interact_text()?,
    };

    let probe: Arc<dyn ReachabilityProbe> = if skip_check || !config.check_reachability {
        println!("{}", "⚠️  Skipping reachability check".yellow());
        Arc::new(NullProbe::new())
    } else {
        Arc::new(
            HttpProbe::new(Duration::from_secs(config.reachability_timeout_secs))
                .context("Failed to build HTTP client")?,
        )
    };

    let target = TargetValidator::new(probe)
        .validate(&target)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let record = service
        .create_url(&target)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create URL: {}", e))?;

    println!("{}", "✅ URL shortened!".green().bold());
    println!();
    print_record(&record, &config.base_url);
    println!(
        "{}",
        "⚠️  Keep the admin URL private. Anyone holding it can deactivate the link."
            .red()
            .bold()
    );
    println!();

    Ok(())
}

/// Shows an active record by its secret key.
async fn show_url(service: &UrlService, base_url: &Url, secret_key: &str) -> Result<()> {
    let record = service
        .admin_info(secret_key)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "ℹ️  URL Information".bright_blue().bold());
    println!();
    print_record(&record, base_url);

    Ok(())
}

/// Deactivates a record after confirmation.
///
/// Deactivation cannot be undone: the key stays reserved and the record is
/// no longer visible through any lookup.
async fn deactivate_url(service: &UrlService, secret_key: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Deactivate URL".bright_blue().bold());
    println!();

    let record = service
        .admin_info(secret_key)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Key:    {}", record.key.cyan());
    println!("  Target: {}", record.target_url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Deactivate this URL? This cannot be undone")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .deactivate(secret_key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate URL: {}", e))?;

    println!();
    println!("{}", "✅ URL deactivated".green().bold());
    println!();

    Ok(())
}

fn print_record(record: &UrlRecord, base_url: &Url) {
    let status = if record.is_active() {
        "ACTIVE".green()
    } else {
        "INACTIVE".red()
    };

    println!("  Target:    {}", record.target_url.bright_white());
    println!("  Short URL: {}", short_url(base_url, &record.key).cyan());
    println!(
        "  Admin URL: {}",
        admin_url(base_url, &record.secret_key).bright_yellow()
    );
    println!("  Clicks:    {}", record.clicks.to_string().bright_green());
    println!("  Status:    {}", status);
    println!(
        "  Created:   {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays store statistics.
///
/// Shows:
/// - Total number of records, split by active and inactive
/// - Total number of clicks
async fn handle_stats(config: &Config, pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = url_service(config, pool)
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  URLs:     {}",
        stats.total.to_string().bright_green().bold()
    );
    println!("  Active:   {}", stats.active.to_string().bright_green());
    println!("  Inactive: {}", stats.inactive().to_string().bright_black());
    println!(
        "  Clicks:   {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
