//! # CLI Module
//!
//! This module provides the command-line interface for logsink. Besides
//! starting the HTTP service it offers a few operator commands that reuse
//! the same configuration, pool and queries as the server.
//!
//! ## Commands
//!
//! ### Server Operations
//! - `start` (default): initialize the schema and serve HTTP
//! - `init-db`: create the `logs` table and indexes, then exit
//!
//! ### Configuration
//! - `check-env`: validate environment variables and print the result
//! - `env-example`: print an example `.env` file
//!
//! ### Data
//! - `stats`: print the same summary `GET /stats` returns
//! - `clear --yes`: delete every stored log entry
//!
//! ## Usage Example
//!
//! ```bash
//! # Start the server on the default port 5000
//! logsink
//!
//! # Point at a local database and inspect what is stored
//! DB_HOST=localhost logsink stats
//! ```

use crate::{database, env, logging, routing::handlers, server};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;

///////////////////////////////////////////////////////////////////////////////
//****                        Private Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Parser)]
#[command(name = "logsink")]
#[command(version, about = "Log ingestion and query service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

///////////////////////////////////////////////////////////////////////////////
//****                         Private Types                             ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    #[command(name = "start")]
    Start,
    /// Create the logs table and indexes if they are missing
    #[command(name = "init-db")]
    InitDb,
    /// Validate environment configuration
    #[command(name = "check-env")]
    CheckEnv,
    /// Print an example .env file
    #[command(name = "env-example")]
    EnvExample,
    /// Print log statistics
    #[command(name = "stats")]
    Stats,
    /// Delete every stored log entry
    #[command(name = "clear")]
    Clear {
        #[arg(long, help = "Confirm the irreversible deletion")]
        yes: bool,
    },
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub async fn parse_cli_commands() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Start) {
        Commands::CheckEnv => {
            let result = env::validate_environment();
            env::print_validation_results(&result);
            if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::EnvExample => {
            print!("{}", env::generate_env_example());
            ExitCode::SUCCESS
        }
        Commands::Clear { yes: false } => {
            eprintln!("Refusing to clear logs without --yes");
            ExitCode::from(2)
        }
        Commands::Start => {
            let config = load_config();
            let pool = database::create_pool(&config);
            database::initialize_schema_or_warn(&pool).await;
            match server::start_server(pool, config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Failed to start server: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::InitDb => {
            let config = load_config();
            let pool = database::create_pool(&config);
            let result = database::initialize_schema(&pool).await;
            pool.close().await;
            match result {
                Ok(()) => {
                    println!("Database schema ready");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Database schema initialization failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Stats => {
            let config = load_config();
            let pool = database::create_pool(&config);
            let result = handlers::collect_stats(&pool).await;
            pool.close().await;
            match result {
                Ok(stats) => {
                    println!("\n=== Log Statistics ===");
                    println!("Total Logs: {}", stats.total_logs);

                    if !stats.levels.is_empty() {
                        println!("\n{:<12} | {:>10}", "Level", "Count");
                        println!("{:-<25}", "");
                        for (level, count) in &stats.levels {
                            println!("{:<12} | {:>10}", level, count);
                        }
                    }

                    if !stats.services.is_empty() {
                        println!("\n{:<30} | {:>10}", "Service", "Count");
                        println!("{:-<43}", "");
                        for (service, count) in &stats.services {
                            println!("{:<30} | {:>10}", service, count);
                        }
                    }

                    match stats.last_log {
                        Some(log) => println!(
                            "\nLast Log: [{}] {} {}: {}",
                            crate::models::log_entry::format_timestamp(&log.timestamp),
                            log.level,
                            log.service.as_deref().unwrap_or("-"),
                            log.message
                        ),
                        None => println!("\nLast Log: none"),
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to fetch statistics: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Clear { yes: true } => {
            let config = load_config();
            let pool = database::create_pool(&config);
            let result = handlers::clear_logs(&pool).await;
            pool.close().await;
            match result {
                Ok(deleted) => {
                    println!("{} logs cleared", deleted);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to clear logs: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

/// Install tracing, then validate the environment (exits on critical errors)
fn load_config() -> env::AppConfig {
    logging::init_tracing(&env::resolve_log_level());
    env::get_config()
}
